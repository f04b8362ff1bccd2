use anyhow::Context;
use derive_more::Deref;
use rusqlite::Transaction;

#[derive(Deref)]
pub struct Repository {
    db: rusqlite::Connection,
}

impl Repository {
    pub fn new(conn_str: &str) -> anyhow::Result<Self> {
        let mut db = rusqlite::Connection::open(conn_str)
            .with_context(|| format!("Error connecting to {conn_str}"))?;

        super::migrations::create_migrations()
            .to_latest(&mut db)
            .context("Error running db migrations")?;

        Ok(Self { db })
    }

    pub fn begin_transaction(&self) -> rusqlite::Result<Transaction> {
        self.db.unchecked_transaction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_works() {
        let repo = Repository::new(":memory:").expect("To create repo");
        let count: i64 = repo
            .query_row("SELECT COUNT(*) FROM app_settings", [], |row| row.get(0))
            .expect("app_settings to exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn reopening_file_keeps_schema() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.sqlite3");
        let path = path.to_str().expect("utf8 path");

        Repository::new(path).expect("first open");
        Repository::new(path).expect("second open runs no new migrations");
    }
}
