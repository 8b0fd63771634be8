use anyhow::Result;

use super::SessionOptions;
use crate::assistant::{ChatSession, ConnectionState, HttpBackend};
use crate::ui::Style;

/// Probes the configured endpoint once. Returns whether it is reachable.
pub async fn run_probe(options: &SessionOptions) -> Result<bool> {
    let resolved = options.resolve()?;
    let backend = HttpBackend::new(&resolved.session.endpoint)?;
    let health_url = backend.health_url().to_string();

    let session = ChatSession::with_backend(resolved.session, backend)?;
    let state = session.probe_connection().await;

    println!(
        "{}  {}  {}",
        Style::value(&resolved.provider_name),
        Style::connection(state),
        Style::secondary(health_url)
    );
    Ok(state == ConnectionState::Connected)
}
