use reqwest::Client as HttpClient;
use reqwest::header::{ HeaderMap, HeaderValue, CONTENT_TYPE };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use std::time::Duration;
use async_trait::async_trait;
use super::{ build_http_client, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmType };
use crate::models::chat::TranscriptTurn;
use log::debug;

pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [TranscriptTurn],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(
        base_url: Option<String>,
        timeout: Option<Duration>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http: build_http_client(headers, timeout)?,
            base_url: url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if config.llm_type != LlmType::Ollama {
            return Err("Invalid config type for OllamaClient".into());
        }

        Self::new(config.base_url.clone(), config.timeout)
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn complete(
        &self,
        model: &str,
        turns: &[TranscriptTurn]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        debug!("Ollama completion: model={}, turns={}", model, turns.len());
        let req = ChatRequest {
            model,
            messages: turns,
            stream: false,
        };
        let resp = self.http.post(&url).json(&req).send().await?.error_for_status()?;
        let data = resp.json::<ChatResponse>().await?;
        Ok(CompletionResponse { response: data.message.content })
    }

    fn get_default_model(&self) -> String {
        DEFAULT_MODEL.to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
