use super::{required, AppContext, FetchState, Route, ScreenError};
use crate::api::{
    AcceptFriendRequest, FriendRequest, ListFriendRequests, ListFriends, SendFriendRequest,
};
use crate::http_api::HttpCallSource;

const FETCH_FRIENDS_FAILED: &str = "Failed to fetch friends.";
const FETCH_REQUESTS_FAILED: &str = "Failed to fetch friend requests.";
const ACCEPT_FAILED: &str = "Failed to accept the friend request.";
const ACCEPTED: &str = "Friend request accepted.";
const SEND_REQUEST_FAILED: &str = "Failed to send friend request.";
const REQUEST_SENT: &str = "Friend request sent!";
pub const ENTER_FRIEND_NICKNAME: &str = "Please enter your friend's nickname.";

pub struct FriendsScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
    pub friends: Vec<String>,
}

impl<CS: HttpCallSource> FriendsScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
            friends: Vec::new(),
        }
    }

    pub async fn focus(&mut self) -> Result<&[String], ScreenError> {
        let ctx = &self.ctx;
        let friends = self
            .state
            .track(async {
                let session = ctx.session()?;
                ctx.client
                    .call(
                        Some(session.token()),
                        &ListFriends {
                            nickname: session.nickname(),
                        },
                    )
                    .await
                    .map_err(|e| ScreenError::from_api(e, FETCH_FRIENDS_FAILED))
            })
            .await?;

        self.friends = friends;
        Ok(&self.friends)
    }

    pub fn add_friend(&self) -> Route {
        Route::AddFriend
    }

    pub fn friend_requests(&self) -> Route {
        Route::FriendRequests
    }

    pub fn open_chat(&self, friend: &str) -> Route {
        Route::DirectMessages {
            friend: friend.to_string(),
        }
    }
}

pub struct AddFriendScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
    pub target: String,
}

impl<CS: HttpCallSource> AddFriendScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
            target: String::new(),
        }
    }

    pub fn set_target(&mut self, nickname: impl Into<String>) {
        self.target = nickname.into();
    }

    /// Sends a request to `target`; the friendship stays pending until they accept.
    pub async fn submit(&mut self) -> Result<String, ScreenError> {
        let receiver = required(&self.target, ENTER_FRIEND_NICKNAME)?;
        let ctx = &self.ctx;

        let confirmation = self
            .state
            .track(async {
                let session = ctx.session()?;
                ctx.client
                    .acknowledge(
                        Some(session.token()),
                        &SendFriendRequest {
                            sender: session.nickname(),
                            receiver,
                        },
                        REQUEST_SENT,
                    )
                    .await
                    .map_err(|e| ScreenError::from_api(e, SEND_REQUEST_FAILED))
            })
            .await?;

        self.target.clear();
        Ok(confirmation)
    }
}

pub struct FriendRequestsScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
    pub requests: Vec<FriendRequest>,
}

impl<CS: HttpCallSource> FriendRequestsScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
            requests: Vec::new(),
        }
    }

    pub async fn fetch(&mut self) -> Result<&[FriendRequest], ScreenError> {
        let ctx = &self.ctx;
        let requests = self
            .state
            .track(async {
                let session = ctx.session()?;
                ctx.client
                    .call(
                        Some(session.token()),
                        &ListFriendRequests {
                            receiver: session.nickname(),
                        },
                    )
                    .await
                    .map_err(|e| ScreenError::from_api(e, FETCH_REQUESTS_FAILED))
            })
            .await?;

        self.requests = requests;
        Ok(&self.requests)
    }

    /// Accepts the request from `sender`. The entry disappears right away and the list is
    /// re-fetched afterwards whether or not the server agreed.
    pub async fn accept(&mut self, sender: &str) -> Result<String, ScreenError> {
        let session = self.ctx.session()?;
        self.requests.retain(|r| r.sender != sender);

        let accepted = self
            .ctx
            .client
            .acknowledge(
                Some(session.token()),
                &AcceptFriendRequest {
                    sender,
                    receiver: session.nickname(),
                },
                ACCEPTED,
            )
            .await
            .map_err(|e| ScreenError::from_api(e, ACCEPT_FAILED));

        if let Err(e) = self.fetch().await {
            log::warn!("Reconciling friend requests after accept failed: {e}");
        }

        accepted
    }
}
