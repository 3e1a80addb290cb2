use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use std::time::Duration;

use super::{ build_http_client, ChatClient, CompletionResponse };
use crate::llm::LlmConfig;
use crate::models::chat::TranscriptTurn;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIChatClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [TranscriptTurn],
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );

        Ok(Self {
            http: build_http_client(headers, timeout)?,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| "OpenAI API key is required (set OPENAI_API_KEY)".to_string())?;

        Self::new(api_key, config.base_url.clone(), config.timeout)
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        model: &str,
        turns: &[TranscriptTurn]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("OpenAI completion: model={}, turns={}", model, turns.len());

        let req = OpenAIChatRequest {
            model,
            messages: turns,
        };

        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<OpenAIResponse>()
            .await?;

        let content = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| "No response from OpenAI API".to_string())?
            .message.content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| "OpenAI response contained no content".to_string())?;

        Ok(CompletionResponse { response: content })
    }

    fn get_default_model(&self) -> String {
        DEFAULT_MODEL.to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
