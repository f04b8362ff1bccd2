use serde::{Deserialize, Deserializer, Serialize};

/// A chat message. Direct messages carry a `receiver`; group messages are scoped by the
/// request path and may omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// The nickname on the other side of a direct message, or `None` when `me` took no part in it.
    pub fn other_party<'a>(&'a self, me: &str) -> Option<&'a str> {
        let receiver = self.receiver.as_deref()?;
        if self.sender == me {
            Some(receiver)
        } else if receiver == me {
            Some(self.sender.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub sender: String,
    pub receiver: String,
}

/// A group the user belongs to. Some server builds list groups by name only, in which case
/// `id` is absent and the group cannot be opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: Option<i64>,
    pub name: String,
}

impl<'de> Deserialize<'de> for Group {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Name(String),
            Record {
                #[serde(default)]
                id: Option<i64>,
                #[serde(alias = "groupName")]
                name: String,
            },
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Name(name) => Group { id: None, name },
            Wire::Record { id, name } => Group { id, name },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetails {
    pub id: i64,
    #[serde(alias = "groupName")]
    pub name: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
}
