use derive_more::{AsRef, Deref, Display};
use reqwest::IntoUrl;
use url::Url;

/// Root URL of the chat server; every endpoint path is appended to it.
#[derive(Debug, Clone, Deref, AsRef, Display)]
pub struct HttpBaseUrl(Url);

impl HttpBaseUrl {
    pub fn new(url: impl IntoUrl) -> Option<Self> {
        let url = url.into_url().ok()?;

        if (url.scheme().eq_ignore_ascii_case("http") || url.scheme().eq_ignore_ascii_case("https"))
            && url.has_host()
            && !url.cannot_be_a_base()
            && url.query().is_none()
            && url.fragment().is_none()
        {
            Some(Self(url))
        } else {
            None
        }
    }

    pub fn build_upon(&self) -> HttpUrlBuilder {
        HttpUrlBuilder(self.0.clone())
    }
}

impl std::str::FromStr for HttpBaseUrl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| format!("{s} is not a usable http(s) base url"))
    }
}

pub struct HttpUrlBuilder(Url);

impl HttpUrlBuilder {
    pub fn append_path(mut self, path_segment: &str) -> Self {
        if let Ok(mut segments) = self.0.path_segments_mut() {
            segments.pop_if_empty().push(path_segment);
        }
        self
    }

    pub fn append_query(mut self, query_name: &str, query_value: &str) -> Self {
        self.0
            .query_pairs_mut()
            .append_pair(query_name, query_value);
        self
    }

    pub fn build(self) -> Url {
        self.0
    }
}
