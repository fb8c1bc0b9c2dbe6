use clap::{Parser, Subcommand};
use guardian_oracle::{
    classifier::{Classifier, create_classifier},
    context::{AppContextBuilder, AppMetrics},
    supervisor::Supervisor,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing `app.yaml`.
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the HTTP API and the source-chain event ingestor.
    Run,
    /// Classifies a single piece of content with the configured classifier.
    Classify {
        /// The text to classify.
        content: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_supervisor(cli.config_dir).await?,
        Commands::Classify { content } => classify(cli.config_dir, &content).await?,
    }

    Ok(())
}

async fn run_supervisor(config_dir: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let context = AppContextBuilder::new(config_dir).build().await?;
    let repo = context.repo.clone();

    let supervisor = Supervisor::builder()
        .config(context.config)
        .state(repo.clone())
        .gateway(context.gateway)
        .classifier(context.classifier)
        .app_metrics(AppMetrics::default())
        .build()?;

    tracing::info!("Supervisor initialized, starting oracle...");
    supervisor.run().await?;

    repo.close().await;
    Ok(())
}

async fn classify(config_dir: Option<String>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppContextBuilder::new(config_dir).load_config()?;
    let classifier = create_classifier(&config)?;

    let verdict = classifier.classify(content).await;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
