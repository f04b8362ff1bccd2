use std::borrow::Cow;

use crate::http_api::HttpJsonApi;
use http::Method;
use serde::Serialize;

use super::FriendRequest;

pub struct ListFriends<'a> {
    pub nickname: &'a str,
}

#[derive(Serialize, Debug)]
pub struct SendFriendRequest<'a> {
    pub sender: &'a str,
    pub receiver: &'a str,
}

/// Pending requests addressed to `receiver`.
pub struct ListFriendRequests<'a> {
    pub receiver: &'a str,
}

/// The server reads the pair from the query string; the body repeats it.
#[derive(Serialize, Debug)]
pub struct AcceptFriendRequest<'a> {
    pub sender: &'a str,
    pub receiver: &'a str,
}

impl<'a> HttpJsonApi for ListFriends<'a> {
    type Data = Vec<String>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(Cow::Borrowed("friends"))
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::once((Cow::Borrowed("nickname"), Cow::Borrowed(self.nickname)))
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for SendFriendRequest<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        ["friends", "add"].into_iter().map(Cow::Borrowed)
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}

impl<'a> HttpJsonApi for ListFriendRequests<'a> {
    type Data = Vec<FriendRequest>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        ["friends", "requests"].into_iter().map(Cow::Borrowed)
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::once((
            Cow::Borrowed("receiverNickname"),
            Cow::Borrowed(self.receiver),
        ))
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for AcceptFriendRequest<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        ["friends", "accept"].into_iter().map(Cow::Borrowed)
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        [
            (Cow::Borrowed("senderNickname"), Cow::Borrowed(self.sender)),
            (Cow::Borrowed("receiverNickname"), Cow::Borrowed(self.receiver)),
        ]
        .into_iter()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}
