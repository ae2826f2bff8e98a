use advisor_cli::cli::{Cli, Commands};
use advisor_cli::commands;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat => commands::chat(&cli).await,
        Commands::Ask { ref question } => commands::ask(&cli, question).await,
        Commands::Categorize {
            ref description,
            amount,
        } => commands::categorize(&cli, description, amount).await,
    }
}
