//! Connection lifecycle: keep exactly one stream connection alive.

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use responder_core::ReplySender;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::ListenerError;
use crate::processor::EventSink;
use crate::transport::StreamTransport;

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// First reconnect delay; doubles on each consecutive failure.
    pub initial_backoff: Duration,
    /// Ceiling for the reconnect delay. Reaching it triggers the
    /// once-per-outage operator notice.
    pub max_backoff: Duration,
    /// Reconnect if nothing (not even a keepalive) arrives within this
    /// window while connected.
    pub idle_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(300),
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
    Reconnecting,
}

/// What to do after one connection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FailureAction {
    delay: Duration,
    notify: bool,
}

/// Backoff bookkeeping, kept separate from the I/O loop so the doubling,
/// cap, and notice-once rules are testable on their own.
#[derive(Debug, Clone)]
struct ReconnectState {
    backoff: Duration,
    initial: Duration,
    max: Duration,
    outage_notified: bool,
}

impl ReconnectState {
    fn new(initial: Duration, max: Duration) -> Self {
        Self {
            backoff: initial,
            initial,
            max,
            outage_notified: false,
        }
    }

    /// Reset on a successful connection: backoff returns to its initial
    /// value and the outage notice is re-armed.
    fn on_ready(&mut self) {
        self.backoff = self.initial;
        self.outage_notified = false;
    }

    /// Register one failure: returns the delay to wait before the retry and
    /// whether the operator notice is due. The notice fires at most once per
    /// unbroken outage.
    fn on_failure(&mut self) -> FailureAction {
        let delay = self.backoff;

        let notify = if self.backoff >= self.max {
            self.backoff = self.max;
            !std::mem::replace(&mut self.outage_notified, true)
        } else {
            self.backoff = std::cmp::min(self.backoff * 2, self.max);
            false
        };

        FailureAction { delay, notify }
    }
}

/// Owns the single stream connection and restarts it on any fault.
///
/// State machine: `Disconnected -> Connecting -> Ready -> Reconnecting ->
/// Connecting -> ...`. Exactly one connection is live at a time; the prior
/// stream is dropped before a fresh connect is attempted, and the single
/// loop means at most one retry delay is ever pending.
pub struct ConnectionManager<T, P, S> {
    transport: T,
    processor: P,
    sender: S,
    config: ManagerConfig,
    state: ConnectionState,
    reconnect: ReconnectState,
    outage_since: Option<Instant>,
}

impl<T, P, S> ConnectionManager<T, P, S>
where
    T: StreamTransport,
    P: EventSink,
    S: ReplySender,
{
    pub fn new(transport: T, processor: P, sender: S, config: ManagerConfig) -> Self {
        let reconnect = ReconnectState::new(config.initial_backoff, config.max_backoff);
        Self {
            transport,
            processor,
            sender,
            config,
            state: ConnectionState::Disconnected,
            reconnect,
            outage_since: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run until the process is shut down.
    pub async fn run(self) -> Result<(), ListenerError> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run until `shutdown_signal` completes. The active stream and any
    /// pending retry delay are torn down on shutdown.
    pub async fn run_with_shutdown<F>(mut self, shutdown_signal: F) -> Result<(), ListenerError>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown_signal);

        loop {
            self.state = ConnectionState::Connecting;

            let connected = tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received while connecting");
                    return Ok(());
                }

                result = self.connect_once() => result,
            };

            let mut stream = match connected {
                Ok(stream) => stream,
                Err(e) => {
                    error!("Connect failed: {}", e);
                    if self.backoff_or_shutdown(&mut shutdown_signal).await {
                        return Ok(());
                    }
                    continue;
                }
            };

            self.state = ConnectionState::Ready;
            self.reconnect.on_ready();
            self.outage_since = None;
            info!("Stream ready");

            loop {
                // The idle timer re-arms on every received unit, keepalives
                // included: it measures from last-received data, not from
                // connection open.
                let next = tokio::select! {
                    biased;

                    () = &mut shutdown_signal => {
                        info!("Shutdown signal received, closing stream");
                        return Ok(());
                    }

                    result = tokio::time::timeout(self.config.idle_timeout, stream.next()) => result,
                };

                match next {
                    Err(_elapsed) => {
                        error!(
                            "No data for {:?}, reconnecting",
                            self.config.idle_timeout
                        );
                        break;
                    }
                    Ok(None) => {
                        error!("Stream ended");
                        break;
                    }
                    Ok(Some(Err(e))) => {
                        error!("Stream error: {}", e);
                        break;
                    }
                    Ok(Some(Ok(message))) => {
                        let outcome = self.processor.handle_message(message).await;
                        debug!("Message outcome: {:?}", outcome);
                    }
                }
            }

            // Tear the connection down fully before scheduling the retry.
            drop(stream);
            self.state = ConnectionState::Reconnecting;

            if self.backoff_or_shutdown(&mut shutdown_signal).await {
                return Ok(());
            }
        }
    }

    /// Reload the high-water mark from the durable store, then open a fresh
    /// connection. The reload is deliberate: an external process may have
    /// advanced the mark, and a stale value would re-process events already
    /// marked seen.
    async fn connect_once(
        &mut self,
    ) -> Result<
        futures::stream::BoxStream<
            'static,
            Result<stream_client::StreamMessage, stream_client::StreamError>,
        >,
        ListenerError,
    > {
        self.processor.reload_mark().await?;
        Ok(self.transport.connect().await?)
    }

    /// Register a failure, possibly send the outage notice, and wait out the
    /// backoff delay. Returns true if shutdown arrived during the wait.
    async fn backoff_or_shutdown<F>(&mut self, shutdown_signal: &mut F) -> bool
    where
        F: Future<Output = ()> + Unpin,
    {
        if self.outage_since.is_none() {
            self.outage_since = Some(Instant::now());
        }

        let action = self.reconnect.on_failure();

        if action.notify {
            let down_for = self
                .outage_since
                .map(|since| since.elapsed().as_secs())
                .unwrap_or_default();
            let message = format!(
                "Report stream connection has been offline for {} seconds",
                down_for
            );
            warn!("{}", message);
            if let Err(e) = self.sender.notify_admin(&message).await {
                error!("Failed to send outage notice: {}", e);
            }
        }

        info!("Scheduling reconnect in {:?}", action.delay);
        tokio::select! {
            biased;

            () = &mut *shutdown_signal => {
                info!("Shutdown signal received during backoff");
                true
            }

            () = tokio::time::sleep(action.delay) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(initial_secs: u64, max_secs: u64) -> ReconnectState {
        ReconnectState::new(
            Duration::from_secs(initial_secs),
            Duration::from_secs(max_secs),
        )
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let mut reconnect = state(1, 8);

        let delays: Vec<u64> = (0..6)
            .map(|_| reconnect.on_failure().delay.as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 8, 8]);
    }

    #[test]
    fn ready_resets_backoff_to_initial() {
        let mut reconnect = state(1, 8);
        for _ in 0..5 {
            reconnect.on_failure();
        }
        reconnect.on_ready();
        assert_eq!(reconnect.on_failure().delay, Duration::from_secs(1));
    }

    #[test]
    fn notice_fires_once_per_outage() {
        let mut reconnect = state(1, 4);

        let notices: Vec<bool> = (0..6).map(|_| reconnect.on_failure().notify).collect();
        // Backoff reaches the cap after two failures; the first capped
        // failure notifies, later ones stay quiet.
        assert_eq!(notices, vec![false, false, true, false, false, false]);
    }

    #[test]
    fn notice_rearms_only_after_ready() {
        let mut reconnect = state(1, 2);
        for _ in 0..4 {
            reconnect.on_failure();
        }
        // Still the same outage: no second notice.
        assert!(!reconnect.on_failure().notify);

        reconnect.on_ready();
        assert!(!reconnect.on_failure().notify); // 1s, doubles to the cap
        assert!(reconnect.on_failure().notify); // capped: notice due again
    }
}
