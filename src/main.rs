use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use illunare_assistant::cli::commands::{
    SessionOptions, ask, chat, configure, fallback, history, probe, providers,
};
use illunare_assistant::cli::{Args, Command};

/// Environment variable holding a tracing filter, checked before `RUST_LOG`.
const LOG_ENV: &str = "ILLUNARE_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let session_options = SessionOptions {
        provider: args.provider,
        model: args.model,
        language: args.language,
    };

    match args.command {
        None | Some(Command::Chat) => chat::run_chat(&session_options).await?,
        Some(Command::Ask { text }) => ask::run_ask(&session_options, &text.join(" ")).await?,
        Some(Command::Probe) => {
            if !probe::run_probe(&session_options).await? {
                std::process::exit(exitcode::UNAVAILABLE);
            }
        }
        Some(Command::Fallback { text }) => {
            fallback::print_fallback(&text.join(" "), session_options.language.as_deref())?;
        }
        Some(Command::Providers { provider }) => providers::print_providers(provider.as_deref())?,
        Some(Command::History { clear }) => history::run_history(clear)?,
        Some(Command::Configure) => configure::run_configure()?,
    }

    Ok(())
}

/// Logs go to stderr so answers on stdout stay pipeable.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("illunare_assistant=debug")
    } else {
        match std::env::var(LOG_ENV) {
            Ok(directives) => directives.parse::<EnvFilter>().unwrap_or_else(|e| {
                eprintln!(
                    "WARN: {LOG_ENV}='{directives}' is not a valid tracing filter ({e}); \
                     falling back to 'warn'"
                );
                EnvFilter::new("warn")
            }),
            Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
