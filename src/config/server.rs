use serde::Deserialize;

/// Configuration for the HTTP API that fronts the moderation pipeline.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Whether the HTTP API is started by the supervisor.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Address and port for the HTTP server to listen on.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { enabled: default_enabled(), listen_address: default_listen_address() }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_listen_address() -> String {
    "0.0.0.0:5000".to_string()
}

#[cfg(test)]
mod tests {
    use config::Config;

    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = Config::builder()
            .add_source(config::File::from_str("", config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<ServerConfig>()
            .unwrap();
        assert!(config.enabled);
        assert_eq!(config.listen_address, "0.0.0.0:5000");
    }

    #[test]
    fn test_custom_server_config() {
        let yaml = r#"
          enabled: false
          listen_address: "127.0.0.1:3333"
        "#;
        let config = Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<ServerConfig>()
            .unwrap();
        assert!(!config.enabled);
        assert_eq!(config.listen_address, "127.0.0.1:3333");
    }
}
