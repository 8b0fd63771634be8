use anyhow::Result;

use super::{SessionOptions, open_session};
use crate::chat::ChatRepl;

pub async fn run_chat(options: &SessionOptions) -> Result<()> {
    let (resolved, session) = open_session(options)?;
    let repl = ChatRepl::new(session, resolved.provider_name, resolved.probe_interval);
    repl.run().await
}
