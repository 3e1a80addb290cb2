pub mod api;

use crate::cli::Args;
use crate::llm::chat::ChatClient;
use std::error::Error;
use std::sync::Arc;
use log::{ info, warn };

use self::api::AppState;

pub struct Server {
    args: Args,
    state: AppState,
}

impl Server {
    pub fn new(chat_client: Arc<dyn ChatClient>, args: Args) -> Self {
        let model = if args.chat_model.trim().is_empty() {
            warn!("Empty chat model configured; using provider default.");
            chat_client.get_default_model()
        } else {
            args.chat_model.clone()
        };
        info!(
            "Relay configured: Model={}, Provider BaseURL={:?}, CORS origin={}",
            model,
            chat_client.get_base_url().as_deref().unwrap_or("adapter default"),
            args.cors_origin
        );

        Self {
            state: AppState::new(chat_client, model),
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.args, self.state.clone()).await
    }
}
