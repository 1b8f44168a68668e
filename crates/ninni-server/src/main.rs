use anyhow::Result;
use clap::Parser;

use ninni::app::{run_chat_repl, run_models_mode, run_web_server, setup_from_cli};
use ninni::logging::init_tracing;
use ninni::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.effective_command() {
        Commands::Serve(args) => {
            let config = setup_from_cli(&args)?;
            run_web_server(config).await
        }
        Commands::Chat(args) => run_chat_repl(&args).await,
        Commands::Models(args) => run_models_mode(&args).await,
    }
}
