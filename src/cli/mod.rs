use clap::Parser;

use crate::llm::chat::openai;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "HTTP relay between the coach chat and a completion API", long_about = None)]
pub struct Args {
    // --- Listener Args ---
    /// Port for the relay server to listen on.
    #[arg(long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Host address to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    /// The single browser origin allowed to make credentialed requests.
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "openai")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model identifier sent with every completion request.
    #[arg(long, env = "CHAT_MODEL", default_value = openai::DEFAULT_MODEL)]
    pub chat_model: String,

    /// Upper bound in seconds on a single completion call. 0 disables the bound.
    #[arg(long, env = "COMPLETION_TIMEOUT_SECS", default_value = "60")]
    pub completion_timeout_secs: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal chat with your coach", long_about = None)]
pub struct ChatArgs {
    /// Base URL of the relay server.
    #[arg(long, env = "API_URL", default_value = "http://localhost:3001")]
    pub api_url: String,

    /// Conversation identifier placed in the request path.
    #[arg(long, env = "CHAT_ID", default_value = crate::client::DEFAULT_CHAT_ID)]
    pub chat_id: String,

    /// Upper bound in seconds on one send round-trip. 0 disables the bound.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "90")]
    pub request_timeout_secs: u64,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_addr_joins_host_and_port() {
        let args = Args::try_parse_from([
            "coach-relay",
            "--bind-host",
            "127.0.0.1",
            "--port",
            "8080",
        ]).unwrap();
        assert_eq!(args.server_addr(), "127.0.0.1:8080");
        assert!(!args.enable_tls);
    }

    #[test]
    fn chat_flags_override() {
        let args = ChatArgs::try_parse_from([
            "coach-chat",
            "--api-url",
            "http://relay:9000",
            "--chat-id",
            "abc",
        ]).unwrap();
        assert_eq!(args.api_url, "http://relay:9000");
        assert_eq!(args.chat_id, "abc");
    }
}
