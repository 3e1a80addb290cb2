pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use super::{ LlmConfig, LlmType };
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use crate::models::chat::TranscriptTurn;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: String,
}

/// A hosted completion API: role-tagged transcript in, one reply out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        turns: &[TranscriptTurn]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_default_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub(crate) fn build_http_client(
    headers: reqwest::header::HeaderMap,
    timeout: Option<Duration>
) -> Result<HttpClient, Box<dyn StdError + Send + Sync>> {
    let mut builder = HttpClient::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}
