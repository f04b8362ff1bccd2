use std::borrow::Cow;

use crate::http_api::HttpJsonApi;
use crate::utils::NonEmpty;
use http::Method;
use serde::Serialize;

use super::{Group, GroupDetails, Message};

pub struct ListGroups<'a> {
    pub nickname: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup<'a> {
    pub group_name: &'a str,
    pub members: &'a NonEmpty<String>,
    pub creator_name: &'a str,
}

pub struct GroupDetailsRequest {
    pub group_id: i64,
}

pub struct GroupMembers {
    pub group_id: i64,
}

pub struct AddGroupMember<'a> {
    pub group_id: i64,
    pub member: &'a str,
}

pub struct GroupMessages {
    pub group_id: i64,
}

#[derive(Serialize, Debug)]
pub struct SendGroupMessage<'a> {
    #[serde(skip)]
    pub group_id: i64,
    pub sender: &'a str,
    pub content: &'a str,
}

fn build_group_path_segments<'a>(
    group_id: i64,
    operation: &'a str,
) -> impl Iterator<Item = Cow<'a, str>> {
    [
        Cow::Borrowed("groups"),
        Cow::Owned(group_id.to_string()),
        Cow::Borrowed(operation),
    ]
    .into_iter()
}

impl<'a> HttpJsonApi for ListGroups<'a> {
    type Data = Vec<Group>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(Cow::Borrowed("groups"))
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::once((Cow::Borrowed("nickname"), Cow::Borrowed(self.nickname)))
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for CreateGroup<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        ["groups", "create"].into_iter().map(Cow::Borrowed)
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}

impl HttpJsonApi for GroupDetailsRequest {
    type Data = GroupDetails;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        build_group_path_segments(self.group_id, "details")
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl HttpJsonApi for GroupMembers {
    type Data = Vec<String>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        build_group_path_segments(self.group_id, "members")
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for AddGroupMember<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        build_group_path_segments(self.group_id, "add-member")
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::once((Cow::Borrowed("memberName"), Cow::Borrowed(self.member)))
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl HttpJsonApi for GroupMessages {
    type Data = Vec<Message>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        build_group_path_segments(self.group_id, "messages")
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Option::<&()>::None
    }
}

impl<'a> HttpJsonApi for SendGroupMessage<'a> {
    type Data = Option<String>;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        build_group_path_segments(self.group_id, "send")
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        std::iter::empty()
    }

    fn request(&self) -> Option<&impl Serialize> {
        Some(self)
    }
}
