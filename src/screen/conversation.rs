use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::{required, AppContext, ScreenError};
use crate::api::{Message, SendGroupMessage, SendMessage};
use crate::http_api::HttpCallSource;
use crate::session::Session;
use crate::worker::{
    describe_fetch_failure, fetch_messages, poll_timeline, ConversationId, Timeline,
    TimelineChannel, FETCH_MESSAGES_FAILED,
};

const SEND_FAILED: &str = "Failed to send message.";
const SENT: &str = "Message sent.";
pub const ENTER_MESSAGE: &str = "Please enter a message.";
pub const NO_CONVERSATION: &str = "No conversation is open.";

struct ActivePoll {
    conversation: ConversationId,
    session: Session,
    task: JoinHandle<()>,
    trigger: mpsc::Sender<()>,
}

/// A direct or group conversation kept fresh by one background polling task.
///
/// At most one task exists per screen, bound to the open conversation. Opening another
/// conversation or closing the screen cancels it before anything else happens.
pub struct ConversationScreen<CS> {
    ctx: AppContext<CS>,
    channel: Arc<TimelineChannel>,
    active: Option<ActivePoll>,
    pub draft: String,
}

impl<CS: HttpCallSource + 'static> ConversationScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            channel: Arc::new(TimelineChannel::default()),
            active: None,
            draft: String::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Timeline> {
        self.channel.subscribe()
    }

    pub fn timeline(&self) -> Timeline {
        self.channel.snapshot()
    }

    pub fn active_conversation(&self) -> Option<&ConversationId> {
        self.active.as_ref().map(|a| &a.conversation)
    }

    pub fn is_polling(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.task.is_finished())
    }

    /// Binds the screen to `conversation`. Re-opening the current conversation is a no-op;
    /// anything else starts from an empty list.
    pub fn open(&mut self, conversation: ConversationId) -> Result<(), ScreenError> {
        if self.active_conversation() == Some(&conversation) {
            return Ok(());
        }

        self.close();
        let session = self.ctx.session()?;
        self.channel.reset(Some(conversation.clone()));

        let (trigger, manual_poll_trigger) = mpsc::channel(1);
        let task = tokio::spawn({
            let client = self.ctx.client.clone();
            let channel = self.channel.clone();
            let session = session.clone();
            let conversation = conversation.clone();
            let settings = self.ctx.poll;
            async move {
                poll_timeline(
                    &*client,
                    &session,
                    &conversation,
                    &*channel,
                    settings,
                    manual_poll_trigger,
                )
                .await
            }
        });

        log::info!("Opened {conversation}");
        self.active = Some(ActivePoll {
            conversation,
            session,
            task,
            trigger,
        });
        Ok(())
    }

    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
            log::info!("Closed {}", active.conversation);
        }
        self.channel.reset(None);
    }

    /// Asks the polling task to fetch now instead of waiting out its delay.
    pub fn request_poll(&self) {
        if let Some(active) = &self.active {
            let _ = active.trigger.try_send(());
        }
    }

    /// Fetches immediately, outside the polling task. Whichever of this and a timer fetch
    /// was issued last decides what is shown.
    pub async fn refresh(&self) -> Result<(), ScreenError> {
        let Some(active) = &self.active else {
            return Err(ScreenError::validation(NO_CONVERSATION));
        };
        let Some(ticket) = self.channel.begin_fetch(&active.conversation) else {
            return Ok(());
        };

        match fetch_messages(&*self.ctx.client, &active.session, &active.conversation).await {
            Ok(messages) => {
                self.channel.commit(ticket, Ok(messages));
                Ok(())
            }
            Err(e) => {
                self.channel.commit(ticket, Err(describe_fetch_failure(&e)));
                Err(ScreenError::from_api(e, FETCH_MESSAGES_FAILED))
            }
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Posts the draft and appends it locally; the next poll replaces the list with the
    /// server's copy.
    pub async fn send(&mut self) -> Result<String, ScreenError> {
        let Some(active) = &self.active else {
            return Err(ScreenError::validation(NO_CONVERSATION));
        };
        let content = required(&self.draft, ENTER_MESSAGE)?;
        let session = self.ctx.session()?;
        let sender = session.nickname();

        let (confirmation, receiver) = match &active.conversation {
            ConversationId::Direct { friend } => (
                self.ctx
                    .client
                    .acknowledge(
                        Some(session.token()),
                        &SendMessage {
                            sender,
                            receiver: friend,
                            content,
                        },
                        SENT,
                    )
                    .await,
                Some(friend.clone()),
            ),
            ConversationId::Group { id } => (
                self.ctx
                    .client
                    .acknowledge(
                        Some(session.token()),
                        &SendGroupMessage {
                            group_id: *id,
                            sender,
                            content,
                        },
                        SENT,
                    )
                    .await,
                None,
            ),
        };
        let confirmation = confirmation.map_err(|e| ScreenError::from_api(e, SEND_FAILED))?;

        self.channel.append(
            &active.conversation,
            Message {
                id: None,
                sender: sender.to_string(),
                receiver,
                content: content.to_string(),
            },
        );
        self.draft.clear();
        Ok(confirmation)
    }
}

impl<CS> Drop for ConversationScreen<CS> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
        }
    }
}
