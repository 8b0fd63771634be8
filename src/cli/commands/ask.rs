//! One-shot question: probe, ask, print.

use anyhow::Result;
use tracing::debug;

use super::{SessionOptions, open_session};
use crate::assistant::ConnectionState;
use crate::ui::{Spinner, Style};

/// Asks a single question and prints the answer to stdout.
///
/// When the endpoint is unreachable the offline answer is printed instead,
/// with a note on stderr.
pub async fn run_ask(options: &SessionOptions, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        anyhow::bail!("Question cannot be empty");
    }
    let (_, session) = open_session(options)?;

    let spinner = Spinner::new("Thinking...");
    let state = session.probe_connection().await;
    debug!(%state, "endpoint probed");
    let reply = session.ask(question).await;
    spinner.stop();

    let Some(reply) = reply else {
        anyhow::bail!("Question cannot be empty");
    };

    if session.connection_state() != ConnectionState::Connected {
        eprintln!(
            "{} assistant endpoint is unreachable, showing the offline answer",
            Style::warning("Note:")
        );
    }
    println!("{}", reply.text());
    Ok(())
}
