//! Per-event processing pipeline with one fault boundary per event.

use async_trait::async_trait;
use responder_core::{CardIssuer, DispatchOutcome, InviteeRegistry, ReplyDispatcher, ReplySender};
use stream_client::{StreamActivity, StreamMessage};
use tracing::{debug, error, info, warn};

use crate::classifier::EventClassifier;
use crate::dedup::DedupGate;
use crate::error::ListenerError;
use crate::store::HighWaterMarkStore;

/// Result of processing a single stream message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A keepalive; nothing to do.
    Keepalive,
    /// A system message; logged and skipped.
    System,
    /// The event id was at or below the high-water mark.
    Duplicate,
    /// The event was admitted, classified, and dispatched.
    Processed(DispatchOutcome),
    /// The event could not be processed (malformed, or a store fault) and
    /// was dropped.
    Dropped,
    /// Classification succeeded but the outbound dispatch failed. The event
    /// still counts as seen.
    DispatchFailed,
}

/// What the connection manager needs from the event pipeline.
///
/// Faults inside an implementation must be absorbed per event: a failure to
/// route one event must never surface to the transport layer, where it would
/// be mistaken for a connection fault.
#[async_trait]
pub trait EventSink: Send {
    /// Re-read the high-water mark from the durable store.
    async fn reload_mark(&mut self) -> Result<(), ListenerError>;

    /// Handle one unit received from the stream.
    async fn handle_message(&mut self, message: StreamMessage) -> ProcessOutcome;
}

/// The sequential dedup -> classify -> dispatch pipeline.
///
/// Events are handled one at a time in delivery order; the next event is not
/// considered until this one is done.
pub struct EventProcessor<M, S, R, C> {
    gate: DedupGate<M>,
    classifier: EventClassifier,
    dispatcher: ReplyDispatcher<S, R, C>,
}

impl<M, S, R, C> EventProcessor<M, S, R, C>
where
    M: HighWaterMarkStore,
    S: ReplySender,
    R: InviteeRegistry,
    C: CardIssuer,
{
    pub fn new(
        gate: DedupGate<M>,
        classifier: EventClassifier,
        dispatcher: ReplyDispatcher<S, R, C>,
    ) -> Self {
        Self {
            gate,
            classifier,
            dispatcher,
        }
    }

    async fn process_activity(
        &mut self,
        activity: &StreamActivity,
    ) -> Result<ProcessOutcome, ListenerError> {
        let event_id = activity.event_id()?;
        let author = activity
            .author()
            .ok_or_else(|| ListenerError::MalformedEvent("missing author".to_string()))?
            .to_string();

        if !self.gate.admit(event_id).await? {
            return Ok(ProcessOutcome::Duplicate);
        }

        let classification = self.classifier.classify(activity);
        debug!("Event {} classified: {:?}", event_id, classification);

        match self
            .dispatcher
            .dispatch(&author, event_id, &classification)
            .await
        {
            Ok(outcome) => Ok(ProcessOutcome::Processed(outcome)),
            Err(e) => {
                // The mark already advanced: the event is seen whether or not
                // the reply made it out.
                warn!("Dispatch failed for event {}: {}", event_id, e);
                Ok(ProcessOutcome::DispatchFailed)
            }
        }
    }
}

#[async_trait]
impl<M, S, R, C> EventSink for EventProcessor<M, S, R, C>
where
    M: HighWaterMarkStore + Send,
    S: ReplySender + Send,
    R: InviteeRegistry + Send,
    C: CardIssuer + Send,
{
    async fn reload_mark(&mut self) -> Result<(), ListenerError> {
        self.gate.reload().await
    }

    async fn handle_message(&mut self, message: StreamMessage) -> ProcessOutcome {
        match message {
            StreamMessage::Keepalive => ProcessOutcome::Keepalive,
            StreamMessage::System(raw) => {
                info!("Received system message: {}", raw);
                ProcessOutcome::System
            }
            StreamMessage::Activity(activity) => {
                debug!(
                    "Received event: author={:?} body={:?}",
                    activity.author(),
                    activity.body.as_deref().map(|b| b.replace('\n', " "))
                );
                match self.process_activity(&activity).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        // Event-boundary fault: log and drop, keep the stream.
                        error!("Error processing event: {}", e);
                        ProcessOutcome::Dropped
                    }
                }
            }
        }
    }
}
