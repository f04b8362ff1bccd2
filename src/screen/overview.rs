use std::collections::HashSet;

use super::{AppContext, FetchState, Route, ScreenError};
use crate::api::{AllMessages, ApiError, Group, ListGroups, Message};
use crate::http_api::HttpCallSource;

const FETCH_CHATS_FAILED: &str = "Failed to fetch chats.";
const FETCH_GROUPS_FAILED: &str = "Failed to fetch groups.";

/// Distinct nicknames `me` has exchanged direct messages with, in first-seen order.
///
/// This scans every message the user can see, so its cost grows with the whole message
/// history. A server-side "list my conversations" call is the way past that ceiling.
pub fn derive_chat_partners(messages: &[Message], me: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .iter()
        .filter_map(|m| m.other_party(me))
        .filter(|other| *other != me && seen.insert(*other))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem<'a> {
    Direct(&'a str),
    Group(&'a Group),
}

impl FeedItem<'_> {
    /// `None` for groups the server listed without an id.
    pub fn route(&self) -> Option<Route> {
        match self {
            FeedItem::Direct(friend) => Some(Route::DirectMessages {
                friend: friend.to_string(),
            }),
            FeedItem::Group(group) => group.id.map(|group_id| Route::GroupMessages {
                group_id,
                group_name: group.name.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatFeed {
    pub partners: Vec<String>,
    pub groups: Vec<Group>,
}

impl ChatFeed {
    pub fn items(&self) -> impl Iterator<Item = FeedItem<'_>> {
        self.partners
            .iter()
            .map(|p| FeedItem::Direct(p.as_str()))
            .chain(self.groups.iter().map(FeedItem::Group))
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty() && self.groups.is_empty()
    }
}

pub struct ChatOverviewScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
    pub feed: ChatFeed,
}

impl<CS: HttpCallSource> ChatOverviewScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
            feed: ChatFeed::default(),
        }
    }

    pub fn friends(&self) -> Route {
        Route::Friends
    }

    pub fn groups(&self) -> Route {
        Route::Groups
    }

    /// Rebuilds the merged feed. A half the server declined comes back empty with its
    /// reason in the returned notices; a transport failure aborts the whole refresh.
    pub async fn focus(&mut self) -> Result<Vec<String>, ScreenError> {
        let ctx = &self.ctx;
        let (feed, notices) = self
            .state
            .track(async {
                let session = ctx.session()?;
                let mut notices = Vec::new();

                let messages = ctx
                    .client
                    .call(Some(session.token()), &AllMessages)
                    .await
                    .or_else(|e| accept_application_failure(e, FETCH_CHATS_FAILED, &mut notices))?;

                let groups = ctx
                    .client
                    .call(
                        Some(session.token()),
                        &ListGroups {
                            nickname: session.nickname(),
                        },
                    )
                    .await
                    .or_else(|e| accept_application_failure(e, FETCH_GROUPS_FAILED, &mut notices))?;

                let feed = ChatFeed {
                    partners: derive_chat_partners(&messages, session.nickname()),
                    groups,
                };
                Ok::<_, ScreenError>((feed, notices))
            })
            .await?;

        self.feed = feed;
        Ok(notices)
    }
}

fn accept_application_failure<T: Default>(
    e: ApiError,
    fallback: &'static str,
    notices: &mut Vec<String>,
) -> Result<T, ScreenError> {
    match ScreenError::from_api(e, fallback) {
        ScreenError::Application(reason) => {
            notices.push(reason);
            Ok(T::default())
        }
        other => Err(other),
    }
}
