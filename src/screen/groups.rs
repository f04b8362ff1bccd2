use super::{required, AppContext, FetchState, Route, ScreenError};
use crate::api::{
    AddGroupMember, CreateGroup, Group, GroupDetails, GroupDetailsRequest, GroupMembers,
    ListFriends, ListGroups,
};
use crate::http_api::HttpCallSource;
use crate::utils::NonEmpty;

const FETCH_GROUPS_FAILED: &str = "Failed to fetch groups.";
const FETCH_DETAILS_FAILED: &str = "Failed to fetch group details.";
const FETCH_MEMBERS_FAILED: &str = "Failed to fetch group members.";
const FETCH_FRIENDS_FAILED: &str = "Failed to fetch friends.";
const ADD_MEMBER_FAILED: &str = "Failed to add member.";
const MEMBER_ADDED: &str = "Member added.";
const CREATE_GROUP_FAILED: &str = "Failed to create group.";
const GROUP_CREATED: &str = "Group created successfully!";
pub const ENTER_GROUP_NAME: &str = "Please enter a group name.";
pub const ADD_ONE_MEMBER: &str = "Please add at least one member to the group.";
pub const ENTER_MEMBER_NICKNAME: &str = "Please enter a nickname to add.";
pub const MISSING_GROUP_ID: &str = "Group ID is missing. Cannot fetch messages.";

pub struct GroupsScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
    pub groups: Vec<Group>,
    pub details_state: FetchState,
    /// Contents of the details modal while it is open.
    pub details: Option<GroupDetails>,
}

impl<CS: HttpCallSource> GroupsScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
            groups: Vec::new(),
            details_state: FetchState::Idle,
            details: None,
        }
    }

    pub async fn fetch(&mut self) -> Result<&[Group], ScreenError> {
        let ctx = &self.ctx;
        let groups = self
            .state
            .track(async {
                let session = ctx.session()?;
                ctx.client
                    .call(
                        Some(session.token()),
                        &ListGroups {
                            nickname: session.nickname(),
                        },
                    )
                    .await
                    .map_err(|e| ScreenError::from_api(e, FETCH_GROUPS_FAILED))
            })
            .await?;

        self.groups = groups;
        Ok(&self.groups)
    }

    /// Fetches details for the modal. Nothing is cached between openings.
    pub async fn open_details(&mut self, group_id: i64) -> Result<&GroupDetails, ScreenError> {
        self.details = None;
        let ctx = &self.ctx;
        let details = self
            .details_state
            .track(async {
                let session = ctx.session()?;
                ctx.client
                    .call(Some(session.token()), &GroupDetailsRequest { group_id })
                    .await
                    .map_err(|e| ScreenError::from_api(e, FETCH_DETAILS_FAILED))
            })
            .await?;

        Ok(self.details.insert(details))
    }

    pub fn close_details(&mut self) {
        self.details = None;
        self.details_state = FetchState::Idle;
    }

    pub async fn members(&self, group_id: i64) -> Result<Vec<String>, ScreenError> {
        let session = self.ctx.session()?;
        self.ctx
            .client
            .call(Some(session.token()), &GroupMembers { group_id })
            .await
            .map_err(|e| ScreenError::from_api(e, FETCH_MEMBERS_FAILED))
    }

    pub async fn add_member(&self, group_id: i64, nickname: &str) -> Result<String, ScreenError> {
        let member = required(nickname, ENTER_MEMBER_NICKNAME)?;
        let session = self.ctx.session()?;
        self.ctx
            .client
            .acknowledge(
                Some(session.token()),
                &AddGroupMember { group_id, member },
                MEMBER_ADDED,
            )
            .await
            .map_err(|e| ScreenError::from_api(e, ADD_MEMBER_FAILED))
    }

    pub fn create_group(&self) -> Route {
        Route::CreateGroup
    }

    pub fn open_group(&self, group: &Group) -> Result<Route, ScreenError> {
        let group_id = group
            .id
            .ok_or_else(|| ScreenError::validation(MISSING_GROUP_ID))?;
        Ok(Route::GroupMessages {
            group_id,
            group_name: group.name.clone(),
        })
    }
}

pub struct CreateGroupScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
    pub friends: Vec<String>,
    pub name: String,
    members: Vec<String>,
}

impl<CS: HttpCallSource> CreateGroupScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
            friends: Vec::new(),
            name: String::new(),
            members: Vec::new(),
        }
    }

    /// Friends the user can pick members from.
    pub async fn load_friends(&mut self) -> Result<&[String], ScreenError> {
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

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Adds `friend` to the selection. Members are picked from the loaded friend list;
    /// picking someone twice is reported, not ignored.
    pub fn add_member(&mut self, friend: &str) -> Result<(), ScreenError> {
        if !self.friends.iter().any(|f| f == friend) {
            return Err(ScreenError::Validation(format!(
                "{friend} is not in your friends list."
            )));
        }
        if self.members.iter().any(|m| m == friend) {
            return Err(ScreenError::Validation(format!(
                "{friend} is already in the group."
            )));
        }

        self.members.push(friend.to_string());
        Ok(())
    }

    pub fn remove_member(&mut self, friend: &str) {
        self.members.retain(|m| m != friend);
    }

    pub async fn submit(&mut self) -> Result<String, ScreenError> {
        let group_name = required(&self.name, ENTER_GROUP_NAME)?;
        let members = NonEmpty::from_vec(self.members.clone())
            .ok_or_else(|| ScreenError::validation(ADD_ONE_MEMBER))?;
        let session = self.ctx.session()?;

        let confirmation = self
            .ctx
            .client
            .acknowledge(
                Some(session.token()),
                &CreateGroup {
                    group_name,
                    members: &members,
                    creator_name: session.nickname(),
                },
                GROUP_CREATED,
            )
            .await
            .map_err(|e| ScreenError::from_api(e, CREATE_GROUP_FAILED))?;

        self.name.clear();
        self.members.clear();
        Ok(confirmation)
    }
}
