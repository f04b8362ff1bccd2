use crate::http_api::HttpJsonApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error while performing request: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Http(#[from] HttpJsonApiError),

    #[error("Server rejected request: {}", message.as_deref().unwrap_or("no reason given"))]
    Application { message: Option<String> },

    #[error("Unexpected response data: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
}

impl ApiError {
    /// Network failures, non-2xx responses and undecodable bodies. Anything that never
    /// produced an envelope the server meant us to read.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Http(_))
    }

    /// The reason the server gave in the envelope's `message`, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Application { message } => message.as_deref(),
            _ => None,
        }
    }
}
