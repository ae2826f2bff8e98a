use std::io::{self, Write};

use anyhow::{Context, Result};

use advisor_engine::{bootstrap, EngineStats, FinanceEngine};
use advisor_types::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Run an interactive chat session on stdin/stdout.
pub async fn chat(cli: &Cli) -> Result<()> {
    let engine = build_engine(cli).await?;

    println!("\nFinance AI Chatbot Ready!");
    println!("Type 'exit' or 'quit' to end session.\n");

    let stdin = io::stdin();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF (ctrl-D or closed pipe)
            println!();
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let command = message.to_lowercase();
        if matches!(command.as_str(), "quit" | "exit" | "bye") {
            print_stats(&engine.stats());
            println!("\nGoodbye! Stay financially smart.");
            break;
        }
        if command == "stats" {
            print_stats(&engine.stats());
            continue;
        }

        let reply = engine.answer(message).await;
        println!("\nBot:\n{}\n", reply.text);
    }

    Ok(())
}

/// Answer a single question and print the reply.
pub async fn ask(cli: &Cli, question: &str) -> Result<()> {
    let engine = build_engine(cli).await?;
    let reply = engine.answer(question).await;
    println!("{}", reply.text);
    Ok(())
}

/// Classify a transaction description and print the category.
pub async fn categorize(cli: &Cli, description: &str, amount: f64) -> Result<()> {
    let engine = build_engine(cli).await?;
    let category = engine
        .categorize(description, amount)
        .await
        .context("Categorization request failed")?;
    println!("{category}");
    Ok(())
}

async fn build_engine(cli: &Cli) -> Result<FinanceEngine> {
    let settings = load_settings(cli)?;
    init_logging(&settings)?;
    info!(
        model = %settings.model,
        dataset = %settings.dataset_path,
        "starting fin-advisor"
    );
    let engine = bootstrap(&settings).await.context("Engine startup failed")?;
    Ok(engine)
}

/// Load settings and apply CLI flag overrides.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(dataset) = &cli.dataset {
        settings.dataset_path = dataset.clone();
    }
    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }

    settings.validate()?;
    Ok(settings)
}

fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;
    Ok(())
}

fn print_stats(stats: &EngineStats) {
    println!(
        "\nSession stats: {} queries answered, {} cached responses, {} minutes elapsed",
        stats.total_queries, stats.cache_entries, stats.session_minutes
    );
}
