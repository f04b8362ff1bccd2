use std::borrow::Cow;

use crate::http_api::HttpJsonApi;
use http::Method;
use serde::Serialize;

use super::Message;

/// Every direct message the authenticated user can see.
pub struct AllMessages;

pub struct MessagesBetween<'a> {
    pub nickname: &'a str,
    pub friend: &'a str,
}

#[derive(Serialize, Debug)]
pub struct SendMessage<'a> {
    pub sender: &'a str,
    pub receiver: &'a str,
    pub content: &'a str,
}

impl HttpJsonApi for AllMessages {
    type Data = Vec<Message>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(Cow::Borrowed("messages"))
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for MessagesBetween<'a> {
    type Data = Vec<Message>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(Cow::Borrowed("messagesbetween"))
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        [
            (Cow::Borrowed("nickname"), Cow::Borrowed(self.nickname)),
            (Cow::Borrowed("friend"), Cow::Borrowed(self.friend)),
        ]
        .into_iter()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for SendMessage<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        ["messages", "send"].into_iter().map(Cow::Borrowed)
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}
