use std::time::Duration;

use derive_more::Display;
use tokio::select;
use tokio::sync::{mpsc, watch};

use super::{PollBackoff, RequestSequencer, Ticket};
use crate::api::{ApiClient, ApiError, GroupMessages, Message, MessagesBetween};
use crate::http_api::HttpCallSource;
use crate::screen::FetchState;
use crate::session::Session;

pub const FETCH_MESSAGES_FAILED: &str = "Failed to fetch messages.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_backoff: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_backoff: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum ConversationId {
    #[display("chat with {friend}")]
    Direct { friend: String },
    #[display("group #{id}")]
    Group { id: i64 },
}

/// What a conversation screen renders: the bound conversation, its last good message
/// list and the state of the most recent fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub conversation: Option<ConversationId>,
    pub messages: Vec<Message>,
    pub status: FetchState,
}

/// Publishes a [`Timeline`] and decides which fetch results are allowed to land in it.
///
/// Tickets are issued, superseded and checked while holding the watch lock, so a
/// result from a closed conversation or an older request can never overwrite newer state.
pub struct TimelineChannel {
    tx: watch::Sender<Timeline>,
    sequencer: RequestSequencer,
}

impl Default for TimelineChannel {
    fn default() -> Self {
        let (tx, _) = watch::channel(Timeline::default());
        Self {
            tx,
            sequencer: RequestSequencer::default(),
        }
    }
}

impl TimelineChannel {
    pub fn subscribe(&self) -> watch::Receiver<Timeline> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Timeline {
        self.tx.borrow().clone()
    }

    /// Binds the timeline to `conversation` with an empty message list and invalidates
    /// every outstanding fetch.
    pub fn reset(&self, conversation: Option<ConversationId>) {
        self.tx.send_modify(|timeline| {
            self.sequencer.supersede();
            *timeline = Timeline {
                conversation,
                ..Default::default()
            };
        });
    }

    /// Marks a fetch for `conversation` as started. Returns `None` once the timeline has
    /// moved on to another conversation.
    pub fn begin_fetch(&self, conversation: &ConversationId) -> Option<Ticket> {
        let mut ticket = None;
        self.tx.send_if_modified(|timeline| {
            if timeline.conversation.as_ref() != Some(conversation) {
                return false;
            }

            ticket = Some(self.sequencer.issue());
            timeline.status = FetchState::Loading;
            true
        });
        ticket
    }

    /// Applies a fetch result if `ticket` is still the latest one. A failure keeps the
    /// previous messages.
    pub fn commit(&self, ticket: Ticket, result: Result<Vec<Message>, String>) -> bool {
        self.tx.send_if_modified(|timeline| {
            if !self.sequencer.is_current(ticket) {
                return false;
            }

            match result {
                Ok(messages) => {
                    timeline.messages = messages;
                    timeline.status = FetchState::Success;
                }
                Err(reason) => timeline.status = FetchState::Failure(reason),
            }
            true
        })
    }

    /// Adds a locally sent message. Fetches issued before this point may predate the
    /// message on the server, so none of them may commit afterwards.
    pub fn append(&self, conversation: &ConversationId, message: Message) -> bool {
        self.tx.send_if_modified(|timeline| {
            if timeline.conversation.as_ref() != Some(conversation) {
                return false;
            }

            self.sequencer.supersede();
            timeline.messages.push(message);
            true
        })
    }
}

pub async fn fetch_messages<CS: HttpCallSource>(
    client: &ApiClient<CS>,
    session: &Session,
    conversation: &ConversationId,
) -> Result<Vec<Message>, ApiError> {
    match conversation {
        ConversationId::Direct { friend } => {
            client
                .call(
                    Some(session.token()),
                    &MessagesBetween {
                        nickname: session.nickname(),
                        friend,
                    },
                )
                .await
        }
        ConversationId::Group { id } => {
            client
                .call(Some(session.token()), &GroupMessages { group_id: *id })
                .await
        }
    }
}

pub fn describe_fetch_failure(e: &ApiError) -> String {
    e.server_message()
        .unwrap_or(FETCH_MESSAGES_FAILED)
        .to_string()
}

/// Keeps `channel` in sync with the server copy of `conversation` until the trigger
/// sender is dropped or the timeline is rebound elsewhere.
pub async fn poll_timeline<CS: HttpCallSource>(
    client: &ApiClient<CS>,
    session: &Session,
    conversation: &ConversationId,
    channel: &TimelineChannel,
    settings: PollSettings,
    mut manual_poll_trigger: mpsc::Receiver<()>,
) {
    log::info!("Start polling {conversation}");
    let mut backoff = PollBackoff::new(settings.interval, settings.max_backoff);

    loop {
        let Some(ticket) = channel.begin_fetch(conversation) else {
            break;
        };

        match fetch_messages(client, session, conversation).await {
            Ok(messages) => {
                backoff.record_success();
                log::debug!("Fetched {} messages for {conversation}", messages.len());
                channel.commit(ticket, Ok(messages));
            }
            Err(e) => {
                let streak = backoff.record_failure();
                if streak == 1 {
                    log::error!("Error polling {conversation}: {e:?}");
                } else {
                    log::debug!("Error polling {conversation} ({streak} in a row): {e}");
                }
                channel.commit(ticket, Err(describe_fetch_failure(&e)));
            }
        }

        let delay = backoff.next_delay();
        select! {
            _ = tokio::time::sleep(delay) => {
                log::debug!("{}s delay reached for polling {conversation}", delay.as_secs());
            }
            trigger = manual_poll_trigger.recv() => {
                if trigger.is_none() {
                    break;
                }
                log::debug!("Manual trigger received for polling {conversation}");
            }
        }
    }

    log::info!("Stop polling {conversation}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> Message {
        Message {
            id: None,
            sender: "alice".into(),
            receiver: Some("bob".into()),
            content: content.into(),
        }
    }

    fn bob() -> ConversationId {
        ConversationId::Direct {
            friend: "bob".into(),
        }
    }

    #[test]
    fn latest_ticket_wins() {
        let channel = TimelineChannel::default();
        channel.reset(Some(bob()));

        let slow = channel.begin_fetch(&bob()).expect("ticket");
        let fast = channel.begin_fetch(&bob()).expect("ticket");

        assert!(channel.commit(fast, Ok(vec![message("new")])));
        assert!(!channel.commit(slow, Ok(vec![message("stale")])));

        let timeline = channel.snapshot();
        assert_eq!(timeline.messages, vec![message("new")]);
        assert_eq!(timeline.status, FetchState::Success);
    }

    #[test]
    fn reset_discards_in_flight_results() {
        let channel = TimelineChannel::default();
        channel.reset(Some(bob()));
        let ticket = channel.begin_fetch(&bob()).expect("ticket");

        let carol = ConversationId::Direct {
            friend: "carol".into(),
        };
        channel.reset(Some(carol.clone()));

        assert!(!channel.commit(ticket, Ok(vec![message("for bob")])));
        assert!(channel.begin_fetch(&bob()).is_none());

        let timeline = channel.snapshot();
        assert_eq!(timeline.conversation, Some(carol));
        assert!(timeline.messages.is_empty());
    }

    #[test]
    fn failure_keeps_last_good_messages() {
        let channel = TimelineChannel::default();
        channel.reset(Some(bob()));
        let ticket = channel.begin_fetch(&bob()).expect("ticket");
        channel.commit(ticket, Ok(vec![message("hi")]));

        let ticket = channel.begin_fetch(&bob()).expect("ticket");
        assert_eq!(channel.snapshot().status, FetchState::Loading);
        channel.commit(ticket, Err(FETCH_MESSAGES_FAILED.to_string()));

        let timeline = channel.snapshot();
        assert_eq!(timeline.messages, vec![message("hi")]);
        assert_eq!(
            timeline.status,
            FetchState::Failure(FETCH_MESSAGES_FAILED.to_string())
        );
    }

    #[test]
    fn append_only_targets_bound_conversation() {
        let channel = TimelineChannel::default();
        channel.reset(Some(bob()));

        assert!(!channel.append(&ConversationId::Group { id: 3 }, message("lost")));
        assert!(channel.append(&bob(), message("kept")));
        assert_eq!(channel.snapshot().messages, vec![message("kept")]);
    }

    #[test]
    fn append_discards_fetches_issued_before_it() {
        let channel = TimelineChannel::default();
        channel.reset(Some(bob()));
        let in_flight = channel.begin_fetch(&bob()).expect("ticket");

        channel.append(&bob(), message("hello"));

        assert!(!channel.commit(in_flight, Ok(vec![message("hi")])));
        assert_eq!(channel.snapshot().messages, vec![message("hello")]);

        let next = channel.begin_fetch(&bob()).expect("ticket");
        assert!(channel.commit(next, Ok(vec![message("hi"), message("hello")])));
        assert_eq!(
            channel.snapshot().messages,
            vec![message("hi"), message("hello")]
        );
    }

    #[test]
    fn conversation_display() {
        assert_eq!(bob().to_string(), "chat with bob");
        assert_eq!(ConversationId::Group { id: 4 }.to_string(), "group #4");
    }
}
