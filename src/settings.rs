use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;

use crate::api::ApiClient;
use crate::screen::AppContext;
use crate::session::IdentityStore;
use crate::utils::HttpBaseUrl;
use crate::worker::PollSettings;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Base URL of the chat server
    #[arg(long, env = "HOWUDOIN_API_URL", default_value = "http://localhost:8080")]
    pub api_url: HttpBaseUrl,

    /// Where the session is kept. Defaults to the platform data directory
    #[arg(long, env = "HOWUDOIN_DB")]
    pub db: Option<PathBuf>,

    #[arg(long, env = "HOWUDOIN_POLL_INTERVAL", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_secs: u64,

    #[arg(long, env = "HOWUDOIN_MAX_POLL_BACKOFF", default_value_t = 60)]
    pub max_poll_backoff_secs: u64,

    #[arg(long, env = "HOWUDOIN_REQUEST_TIMEOUT", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        self.db
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("howudoin").join("session.sqlite3")))
            .context("No data directory on this platform, set HOWUDOIN_DB")
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_backoff: Duration::from_secs(self.max_poll_backoff_secs),
        }
    }

    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .context("Building HTTP client")
    }

    pub fn build_context(&self) -> anyhow::Result<AppContext<reqwest::Client>> {
        let db_path = self.db_path()?;
        log::debug!("Using session store at {}", db_path.display());
        let store = IdentityStore::open(&db_path)
            .with_context(|| format!("Opening session store {}", db_path.display()))?;

        Ok(AppContext::new(
            ApiClient::new(self.http_client()?, self.api_url.clone()),
            store,
            self.poll_settings(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn parses_flags() {
        let cli = TestCli::try_parse_from([
            "howudoin",
            "--api-url",
            "https://chat.example.com/api/",
            "--db",
            "/tmp/howudoin.sqlite3",
            "--poll-interval-secs",
            "2",
            "--max-poll-backoff-secs",
            "30",
            "--request-timeout-secs",
            "10",
        ])
        .expect("parse");

        let settings = cli.settings;
        assert_eq!(settings.api_url.as_str(), "https://chat.example.com/api/");
        assert_eq!(
            settings.db_path().expect("db path"),
            PathBuf::from("/tmp/howudoin.sqlite3")
        );
        assert_eq!(
            settings.poll_settings(),
            PollSettings {
                interval: Duration::from_secs(2),
                max_backoff: Duration::from_secs(30),
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(TestCli::try_parse_from(["howudoin", "--api-url", "ftp://chat.example.com"]).is_err());
        assert!(TestCli::try_parse_from(["howudoin", "--poll-interval-secs", "0"]).is_err());
    }
}
