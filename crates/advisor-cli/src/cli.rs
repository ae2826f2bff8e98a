use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fin-advisor", version, about = "Retrieval-augmented financial Q&A assistant")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Path to the FAQ dataset CSV
    #[arg(short, long, global = true)]
    pub dataset: Option<String>,

    /// Generative model to use for answers
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,
    },

    /// Classify a transaction description into a spending category
    Categorize {
        /// Free-form transaction description
        description: String,

        /// Transaction amount in rupees
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat() {
        let cli = Cli::parse_from(["fin-advisor", "chat"]);
        assert!(matches!(cli.command, Commands::Chat));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_ask_with_question() {
        let cli = Cli::parse_from(["fin-advisor", "ask", "What is an ETF?"]);
        match cli.command {
            Commands::Ask { question } => assert_eq!(question, "What is an ETF?"),
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_parse_categorize_default_amount() {
        let cli = Cli::parse_from(["fin-advisor", "categorize", "Grocery run"]);
        match cli.command {
            Commands::Categorize {
                description,
                amount,
            } => {
                assert_eq!(description, "Grocery run");
                assert_eq!(amount, 0.0);
            }
            _ => panic!("expected categorize command"),
        }
    }

    #[test]
    fn test_parse_categorize_with_amount() {
        let cli = Cli::parse_from(["fin-advisor", "categorize", "Uber ride", "--amount", "432.5"]);
        match cli.command {
            Commands::Categorize { amount, .. } => assert_eq!(amount, 432.5),
            _ => panic!("expected categorize command"),
        }
    }

    #[test]
    fn test_parse_global_config_before_subcommand() {
        let cli = Cli::parse_from(["fin-advisor", "--config", "/tmp/advisor.toml", "chat"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/advisor.toml"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["fin-advisor", "ask", "hello", "--log-level", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_dataset_and_model_overrides() {
        let cli = Cli::parse_from([
            "fin-advisor",
            "-d",
            "data/faq.csv",
            "-m",
            "gemini-2.0-flash",
            "chat",
        ]);
        assert_eq!(cli.dataset.as_deref(), Some("data/faq.csv"));
        assert_eq!(cli.model.as_deref(), Some("gemini-2.0-flash"));
    }
}
