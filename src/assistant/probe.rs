//! Periodic connectivity checks owned by the host.

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::client::InferenceBackend;
use super::session::ChatSession;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Background task calling [`ChatSession::probe_connection`] on a fixed interval.
///
/// The first probe runs immediately. Call [`ProbeTask::stop`] on teardown;
/// dropping the handle aborts the task instead. Either way a probe in flight
/// is cancelled rather than waited for.
pub struct ProbeTask {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProbeTask {
    pub fn spawn<B: InferenceBackend>(session: ChatSession<B>, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = &mut shutdown_rx => break,
                            state = session.probe_connection() => {
                                debug!(%state, "periodic probe finished");
                            }
                        }
                    }
                }
            }
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Signals the task to finish and waits for it.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ProbeTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
