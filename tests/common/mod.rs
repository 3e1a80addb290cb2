#![allow(dead_code)]

use async_trait::async_trait;
use coach_relay::llm::chat::{ ChatClient, CompletionResponse };
use coach_relay::models::chat::TranscriptTurn;
use coach_relay::server::api::{ self, AppState };
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::{ Arc, Mutex };

pub const TEST_ORIGIN: &str = "http://localhost:3000";
pub const TEST_MODEL: &str = "gpt-3.5-turbo";

/// Provider stand-in that replies with a fixed text, or fails, and records every call.
pub struct ScriptedClient {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, Vec<TranscriptTurn>)>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(text.to_string()), calls: Mutex::new(Vec::new()) })
    }

    pub fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(msg.to_string()), calls: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<(String, Vec<TranscriptTurn>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(
        &self,
        model: &str,
        turns: &[TranscriptTurn]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        self.calls.lock().unwrap().push((model.to_string(), turns.to_vec()));
        match &self.reply {
            Ok(text) => Ok(CompletionResponse { response: text.clone() }),
            Err(msg) => Err(msg.clone().into()),
        }
    }

    fn get_default_model(&self) -> String {
        TEST_MODEL.to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub fn app(client: Arc<ScriptedClient>) -> axum::Router {
    api::app(AppState::new(client, TEST_MODEL), TEST_ORIGIN).expect("build app")
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.expect("serve");
    });
    format!("http://{}", addr)
}
