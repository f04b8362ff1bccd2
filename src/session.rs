use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use rusqlite::types::FromSql;
use rusqlite::ToSql;

use crate::app_setting::{AppSetting, AuthToken, Nickname};
use crate::db::app_setting::AppSettingRepositoryExt;
use crate::db::Repository;

/// Device-local key/value store holding the two session fields.
///
/// Both fields are written together and cleared together, so readers only ever see
/// a complete session or none at all.
pub struct IdentityStore {
    repo: Mutex<Repository>,
}

/// The `(token, nickname)` pair proving and naming the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub nickname: Nickname,
}

impl Session {
    pub fn new(token: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            token: AuthToken::from(token.into()),
            nickname: Nickname::from(nickname.into()),
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    pub fn nickname(&self) -> &str {
        self.nickname.as_str()
    }
}

impl IdentityStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating {}", parent.display()))?;
        }

        let conn_str = path
            .to_str()
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        Ok(Self::from_repository(Repository::new(conn_str)?))
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::from_repository(Repository::new(":memory:")?))
    }

    fn from_repository(repo: Repository) -> Self {
        Self {
            repo: Mutex::new(repo),
        }
    }

    fn repo(&self) -> MutexGuard<'_, Repository> {
        self.repo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set<T: AppSetting + ToSql>(&self, value: &T) -> anyhow::Result<()> {
        self.repo().save_setting(None, value)
    }

    pub fn get<T: AppSetting + FromSql>(&self) -> anyhow::Result<Option<T>> {
        self.repo().load_setting(None)
    }

    /// Removes both session fields in one transaction.
    pub fn clear(&self) -> anyhow::Result<()> {
        let repo = self.repo();
        let tx = repo.begin_transaction().context("Starting transaction")?;
        tx.remove_settings_by_name(AuthToken::NAME)?;
        tx.remove_settings_by_name(Nickname::NAME)?;
        tx.commit().context("Committing transaction")?;
        log::info!("Session cleared");
        Ok(())
    }

    pub fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        let repo = self.repo();
        let tx = repo.begin_transaction().context("Starting transaction")?;
        tx.save_setting(None, &session.token)?;
        tx.save_setting(None, &session.nickname)?;
        tx.commit().context("Committing transaction")?;
        log::info!("Session stored for {}", session.nickname);
        Ok(())
    }

    /// The current session, or `None` when either field is missing or blank.
    pub fn session(&self) -> anyhow::Result<Option<Session>> {
        let token = self.get::<AuthToken>()?;
        let nickname = self.get::<Nickname>()?;

        Ok(match (token, nickname) {
            (Some(token), Some(nickname))
                if !token.as_str().is_empty() && !nickname.as_str().is_empty() =>
            {
                Some(Session { token, nickname })
            }
            _ => None,
        })
    }
}
