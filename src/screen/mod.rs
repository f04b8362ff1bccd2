use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::http_api::HttpCallSource;
use crate::session::{IdentityStore, Session};
use crate::utils::NonEmptyStringRef;
use crate::worker::PollSettings;

mod conversation;
mod friends;
mod groups;
mod overview;
mod session;

pub use conversation::*;
pub use friends::*;
pub use groups::*;
pub use overview::*;
pub use session::*;

/// Where the front end should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ChatOverview,
    Friends,
    AddFriend,
    FriendRequests,
    Groups,
    CreateGroup,
    DirectMessages { friend: String },
    GroupMessages { group_id: i64, group_name: String },
}

/// Progress of the latest fetch a screen started. The data itself stays on the screen so a
/// failed refresh does not hide what was already shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success,
    Failure(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Enters `Loading`, runs `op` and records how it went.
    pub async fn track<T>(
        &mut self,
        op: impl Future<Output = Result<T, ScreenError>>,
    ) -> Result<T, ScreenError> {
        *self = FetchState::Loading;
        let result = op.await;
        *self = match &result {
            Ok(_) => FetchState::Success,
            Err(e) => FetchState::Failure(e.to_string()),
        };
        result
    }
}

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("You are not logged in. Please login again.")]
    MissingSession,

    #[error("{0}")]
    Validation(String),

    #[error("{fallback}")]
    Transport {
        fallback: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{0}")]
    Application(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ScreenError {
    /// Sorts an API failure into the transport or application class. `fallback` is the
    /// text shown when the server gave no reason of its own.
    pub fn from_api(err: ApiError, fallback: &'static str) -> Self {
        if err.is_transport() {
            log::error!("{fallback} {err:?}");
            return ScreenError::Transport {
                fallback,
                source: err,
            };
        }

        log::warn!("{fallback} {err}");
        ScreenError::Application(err.server_message().unwrap_or(fallback).to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ScreenError::Validation(message.into())
    }

    pub fn redirect(&self) -> Option<Route> {
        match self {
            ScreenError::MissingSession => Some(Route::Login),
            _ => None,
        }
    }
}

pub(crate) fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, ScreenError> {
    NonEmptyStringRef::new(value)
        .map(|s| s.as_str())
        .ok_or_else(|| ScreenError::validation(message))
}

/// Everything a screen needs from the outside world.
pub struct AppContext<CS> {
    pub client: Arc<ApiClient<CS>>,
    pub store: Arc<IdentityStore>,
    pub poll: PollSettings,
}

impl<CS> Clone for AppContext<CS> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            store: self.store.clone(),
            poll: self.poll,
        }
    }
}

impl<CS: HttpCallSource> AppContext<CS> {
    pub fn new(client: ApiClient<CS>, store: IdentityStore, poll: PollSettings) -> Self {
        Self {
            client: Arc::new(client),
            store: Arc::new(store),
            poll,
        }
    }

    pub fn session(&self) -> Result<Session, ScreenError> {
        self.store.session()?.ok_or(ScreenError::MissingSession)
    }

    pub fn logout(&self) -> Result<Route, ScreenError> {
        self.store.clear()?;
        Ok(Route::Login)
    }
}
