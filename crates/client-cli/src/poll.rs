//! Background refresh of a student's application list

use std::time::Duration;

use shared::{applications_for, Application, Ident};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiError};

pub type PollResult = Result<Vec<Application>, ApiError>;

/// Owns the polling task. Fetches once immediately, then every `period`,
/// until `stop()` is called or the poller is dropped.
pub struct ApplicationPoller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ApplicationPoller {
    pub fn spawn(
        api: ApiClient,
        student: Ident,
        period: Duration,
    ) -> (Self, mpsc::Receiver<PollResult>) {
        let (tx, rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(api, student, period, tx, cancel.clone()));

        let poller = Self {
            cancel,
            handle: Some(handle),
        };
        (poller, rx)
    }

    /// Cancel the timer and wait for the task to finish. No request is
    /// issued after this returns.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Application poller ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ApplicationPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    api: ApiClient,
    student: Ident,
    period: Duration,
    tx: mpsc::Sender<PollResult>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = api.applications() => result,
        };
        let result = result.map(|apps| applications_for(apps, &student));
        if let Err(e) = &result {
            tracing::error!("Polling applications failed: {}", e);
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = tx.send(result) => {
                if sent.is_err() {
                    // Receiver gone, nobody is watching
                    break;
                }
            }
        }
    }

    tracing::debug!("Application poller for student {} stopped", student);
}
