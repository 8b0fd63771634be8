use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "illunare-ai")]
#[command(about = "Illunare assistant: chat with a self-hosted model, with offline answers")]
#[command(version)]
pub struct Args {
    /// Provider name from the config file
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Answer language (en or pt-BR)
    #[arg(short = 'l', long = "lang", global = true)]
    pub language: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat mode (the default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Check whether the configured endpoint is reachable
    Probe,
    /// Print the offline answer for a question without contacting any endpoint
    Fallback {
        /// The question
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// Show or clear the saved conversation
    History {
        /// Delete the saved conversation
        #[arg(long)]
        clear: bool,
    },
    /// Configure default provider, model and language
    Configure,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_chat() {
        let args = Args::try_parse_from(["illunare-ai", "--lang", "pt-BR"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.language.as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args =
            Args::try_parse_from(["illunare-ai", "ask", "what", "is", "obd?", "-m", "qwen3"])
                .unwrap();
        assert_eq!(args.model.as_deref(), Some("qwen3"));
        match args.command {
            Some(Command::Ask { text }) => assert_eq!(text.join(" "), "what is obd?"),
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Args::try_parse_from(["illunare-ai", "ask"]).is_err());
    }
}
