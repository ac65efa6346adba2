mod assemble;
mod search;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::assemble::AssembleArgs;
use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "nearby-cli")]
#[command(about = "Drive the nearby-listings search controller from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a location and dispatch a results request
    Search(SearchArgs),
    /// Print the canonical results URL for fixed coordinates
    Assemble(AssembleArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nearby_core::load_page_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Search(args)) => search::run_search(Arc::new(config), &args).await?,
        Some(Commands::Assemble(args)) => println!("{}", assemble::run_assemble(&config, &args)),
        None => println!("nothing to do; try `nearby-cli search --help`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
