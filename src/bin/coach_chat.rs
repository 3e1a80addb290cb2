use clap::Parser;
use coach_relay::cli::ChatArgs;
use coach_relay::client::repl::run_chat;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = ChatArgs::parse();
    coach_relay::init_logging(if args.debug { "debug" } else { "warn" });

    run_chat(args).await
}
