//! Classifier backed by an OpenAI-compatible chat-completion endpoint.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

use super::{AMBIGUOUS_OUTPUT_LABEL, Classifier, ClassifierError};
use crate::{
    config::{ClassifierConfig, FailurePolicy, SecretString},
    models::{ClassificationResult, Label},
};

/// Longest slice of the content that is embedded in the prompt.
const MAX_PROMPT_CONTENT_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Builds the fixed classification prompt around `content`.
fn build_prompt(content: &str) -> String {
    let excerpt: String = content.trim().chars().take(MAX_PROMPT_CONTENT_CHARS).collect();
    format!(
        "Analyze the following content and classify it as either 'SAFE' or 'MALICIOUS'.\n\n\
         Content to analyze: \"{excerpt}\"\n\n\
         Classification criteria:\n\
         - MALICIOUS: Contains hate speech, threats, scams, phishing attempts, or harmful content\n\
         - SAFE: Normal, non-harmful content\n\n\
         Respond with only one word: SAFE or MALICIOUS"
    )
}

/// Maps raw model output onto a verdict. Output that is not exactly one of
/// the two tokens after trimming and upper-casing is treated as
/// [`AMBIGUOUS_OUTPUT_LABEL`].
pub fn interpret_model_output(raw: &str) -> ClassificationResult {
    let token = raw.trim().to_uppercase();
    match Label::from_token(&token) {
        Some(Label::Safe) => ClassificationResult::safe("Language model classified content as safe"),
        Some(Label::Malicious) => {
            ClassificationResult::malicious("Language model detected potentially harmful content")
        }
        None => {
            tracing::warn!(output = %token, "Unexpected classification from language model.");
            ClassificationResult::new(
                AMBIGUOUS_OUTPUT_LABEL,
                format!("Unrecognised model output {token:?}; defaulted to {AMBIGUOUS_OUTPUT_LABEL}"),
            )
        }
    }
}

/// A classifier that asks a hosted language model for a one-word verdict.
pub struct LlmClassifier {
    client: Arc<ClientWithMiddleware>,
    completions_url: String,
    model_id: String,
    max_output_tokens: u32,
    temperature: f32,
    api_key: SecretString,
    request_timeout: Duration,
    failure_policy: FailurePolicy,
}

impl LlmClassifier {
    /// Creates a classifier that calls the model API through `client`.
    pub fn new(
        client: Arc<ClientWithMiddleware>,
        config: &ClassifierConfig,
        api_key: SecretString,
    ) -> Self {
        Self {
            client,
            completions_url: format!(
                "{}/chat/completions",
                config.endpoint.as_str().trim_end_matches('/')
            ),
            model_id: config.model_id.clone(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            api_key,
            request_timeout: config.request_timeout,
            failure_policy: config.failure_policy,
        }
    }

    /// Sends the prompt and returns the first choice's raw text.
    async fn request_verdict(&self, content: &str) -> Result<String, ClassifierError> {
        let request = ChatCompletionRequest {
            model: &self.model_id,
            messages: [ChatMessage { role: "user", content: build_prompt(content) }],
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(ClassifierError::Decode)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ClassifierError::EmptyResponse)
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    #[tracing::instrument(skip_all, level = "debug", fields(model = %self.model_id))]
    async fn classify(&self, content: &str) -> ClassificationResult {
        let outcome = match tokio::time::timeout(self.request_timeout, self.request_verdict(content))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.request_timeout)),
        };

        match outcome {
            Ok(raw) => {
                let result = interpret_model_output(&raw);
                tracing::info!(label = %result.label, "Content classified by language model.");
                result
            }
            Err(error) => {
                let label = self.failure_policy.fallback_label();
                tracing::error!(%error, fallback = %label, "Language model classification failed.");
                ClassificationResult::new(
                    label,
                    format!("Classifier unavailable ({error}); defaulted to {label} by failure policy"),
                )
            }
        }
    }

    fn strategy(&self) -> &'static str {
        "llm"
    }
}
