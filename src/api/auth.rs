use std::borrow::Cow;

use crate::http_api::HttpJsonApi;
use http::Method;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub lastname: &'a str,
    pub nickname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub nickname: &'a str,
    pub password: &'a str,
}

impl<'a> HttpJsonApi for RegisterRequest<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(Cow::Borrowed("register"))
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}

impl<'a> HttpJsonApi for LoginRequest<'a> {
    /// The bearer token.
    type Data = String;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(Cow::Borrowed("login"))
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}
