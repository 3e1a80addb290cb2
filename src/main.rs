use clap::Parser;
use coach_relay::cli::Args;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();
    coach_relay::init_logging(if args.debug { "debug" } else { "info" });

    coach_relay::run(args).await
}
