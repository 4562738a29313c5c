//! Turns a classification into outbound action.

use tracing::{debug, info};

use crate::classification::Classification;
use crate::dialogue::Dialogue;
use crate::error::ReplyError;
use crate::sender::{CardIssuer, InviteeRegistry, ReplySender};

/// What the dispatcher did for one classified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Classification was `Ignore`; nothing sent.
    Ignored,
    /// A reporting-card link was sent.
    ResourceSent { language: String },
    /// A welcome was sent and the author recorded as an invitee.
    WelcomeSent { language: String },
    /// The author was already an invitee; no welcome sent.
    AlreadyInvited,
}

/// Dispatches routing decisions: fetches card links, composes reply text
/// from the injected dialogue tables, sends through the [`ReplySender`]
/// capability, and keeps the invitee registry current.
pub struct ReplyDispatcher<S, R, C> {
    sender: S,
    invitees: R,
    cards: C,
    dialogue: Dialogue,
}

impl<S, R, C> ReplyDispatcher<S, R, C>
where
    S: ReplySender,
    R: InviteeRegistry,
    C: CardIssuer,
{
    pub fn new(sender: S, invitees: R, cards: C, dialogue: Dialogue) -> Self {
        Self {
            sender,
            invitees,
            cards,
            dialogue,
        }
    }

    /// Act on one classification for the event authored by `author` with the
    /// given upstream-native id.
    pub async fn dispatch(
        &self,
        author: &str,
        event_id: u64,
        classification: &Classification,
    ) -> Result<DispatchOutcome, ReplyError> {
        match classification {
            Classification::Ignore => {
                debug!("Ignoring event {} from {}", event_id, author);
                Ok(DispatchOutcome::Ignored)
            }

            Classification::SendResource { disaster, language } => {
                info!(
                    "Sending {} resource link to {} (event {})",
                    disaster, author, event_id
                );
                let link = self.cards.request_card_link(author, language).await?;
                let text = self
                    .dialogue
                    .card_request_text(language)
                    .ok_or_else(|| ReplyError::MissingDialogue(language.clone()))?;
                let message = format!("{} {}", text, link);
                self.sender.send_reply(author, event_id, &message).await?;
                Ok(DispatchOutcome::ResourceSent {
                    language: language.clone(),
                })
            }

            Classification::SendWelcome {
                language,
                disaster_hint,
            } => {
                if self.invitees.is_invitee(author).await? {
                    debug!("{} already invited, skipping welcome", author);
                    return Ok(DispatchOutcome::AlreadyInvited);
                }

                let text = self
                    .dialogue
                    .welcome_text(language)
                    .ok_or_else(|| ReplyError::MissingDialogue(language.clone()))?;
                let message = match (*disaster_hint)
                    .and_then(|kind| self.dialogue.disaster_mention(kind.as_str()))
                {
                    Some(mention) => format!("{} {}", text, mention),
                    None => text.to_string(),
                };

                info!("Sending welcome to {} (event {})", author, event_id);
                self.sender.send_reply(author, event_id, &message).await?;
                self.invitees.record_invitee(author).await?;
                Ok(DispatchOutcome::WelcomeSent {
                    language: language.clone(),
                })
            }
        }
    }

}
