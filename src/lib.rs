pub mod cli;
pub mod client;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod transport;

use cli::Args;
use llm::LlmConfig;
use llm::chat::new_client as new_chat_client;
use log::info;
use server::Server;
use std::error::Error;
use std::time::Duration;

pub fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr());
    info!("CORS Origin: {}", args.cors_origin);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat API Key Set: {}", !args.chat_api_key.trim().is_empty());
    info!("Completion Timeout (s): {}", args.completion_timeout_secs);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let chat_config = LlmConfig {
        llm_type: args.chat_llm_type
            .parse()
            .map_err(|e| format!("Invalid chat LLM type: {}", e))?,
        base_url: args.chat_base_url.clone(),
        api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
        timeout: (args.completion_timeout_secs > 0).then(||
            Duration::from_secs(args.completion_timeout_secs)
        ),
    };
    let chat_client = new_chat_client(&chat_config)?;

    info!("Starting server on: {}", args.server_addr());
    let server = Server::new(chat_client, args);
    server.run().await?;

    Ok(())
}
