use derive_more::{AsRef, Deref, Display, From};
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use super::AppSetting;

/// Opaque bearer token handed out by the login endpoint.
#[derive(Clone, PartialEq, Eq, Deref, AsRef, From)]
pub struct AuthToken(String);

/// The nickname the user logged in with.
#[derive(Debug, Clone, PartialEq, Eq, Deref, AsRef, Display, From)]
pub struct Nickname(String);

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

impl AppSetting for AuthToken {
    const NAME: &'static str = "token";
}

impl AppSetting for Nickname {
    const NAME: &'static str = "nickname";
}

macro_rules! impl_text_setting {
    ($ty:ident) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                Ok($ty(value.as_str()?.to_string()))
            }
        }

        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_text_setting!(AuthToken);
impl_text_setting!(Nickname);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_never_printed() {
        let token = AuthToken::from("secret".to_string());
        assert_eq!(format!("{token:?}"), "AuthToken(..)");
        assert_eq!(token.as_str(), "secret");
    }
}
