use crate::http_api::HttpApi;
use anyhow::Context;
use bytes::{BufMut, BytesMut};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

const JSON_CONTENT_TYPE: &str = "application/json";

pub trait HttpJsonApi {
    /// Type of the envelope's `data` field when the call succeeds.
    type Data: DeserializeOwned;

    fn method(&self) -> Method;
    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>>;
    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)>;

    fn request(&self) -> Option<&impl Serialize>;
}

/// The `{status, message, data}` wrapper every response from the chat server comes in.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Envelope {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    pub const STATUS_SUCCESS: i64 = 1;

    pub fn is_success(&self) -> bool {
        self.status == Self::STATUS_SUCCESS
    }
}

impl<T: HttpJsonApi> HttpApi for T {
    type Response = Result<Envelope, HttpJsonApiError>;

    fn method(&self) -> Method {
        <Self as HttpJsonApi>::method(self)
    }

    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
        <Self as HttpJsonApi>::path_segments(self)
    }

    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        <Self as HttpJsonApi>::queries(self)
    }

    fn request_content_type(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(JSON_CONTENT_TYPE))
    }

    fn write_request_body(&self, buf: &mut BytesMut) -> anyhow::Result<()> {
        if let Some(body) = self.request() {
            serde_json::to_writer(buf.writer(), body).context("Serializing request to JSON")?;
        }

        Ok(())
    }

    fn expected_response_type(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(JSON_CONTENT_TYPE))
    }

    fn deserialize_response(
        &self,
        status_code: StatusCode,
        content_type: Option<&str>,
        buf: &[u8],
    ) -> Self::Response {
        match (status_code, content_type) {
            (code, Some(t)) if code.is_success() && t.starts_with(JSON_CONTENT_TYPE) => {
                Ok(serde_json::from_slice(buf)?)
            }

            (code, None) if code.is_success() => Ok(serde_json::from_slice(buf)?),

            (code, Some(t)) if code.is_success() => Err(HttpJsonApiError::InvalidContentType {
                actual: t.to_string(),
            }),

            (code, Some(t)) if t.starts_with("text/") => {
                let message = std::str::from_utf8(buf).ok().map(|s| s.to_string());
                Err(HttpJsonApiError::UnsuccessfulResponse {
                    status_code: code,
                    message,
                })
            }

            // The server also wraps auth failures in an envelope; keep its message for the logs.
            (code, _) => Err(HttpJsonApiError::UnsuccessfulResponse {
                status_code: code,
                message: serde_json::from_slice::<Envelope>(buf)
                    .ok()
                    .and_then(|e| e.message),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpJsonApiError {
    #[error("Error deserializing JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expecting a application/json content type but got: {actual}")]
    InvalidContentType { actual: String },

    #[error("HTTP request failed with status code: {status_code}, msg = {message:?}")]
    UnsuccessfulResponse {
        status_code: StatusCode,
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LoginRequest, SendFriendRequest};

    #[test]
    fn writes_json_body() {
        let api = SendFriendRequest {
            sender: "alice",
            receiver: "bob",
        };
        let body = api
            .request_body()
            .expect("body to serialize")
            .expect("body to be present");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("valid json");
        assert_eq!(value, serde_json::json!({"sender": "alice", "receiver": "bob"}));
    }

    #[test]
    fn decodes_envelope_with_charset() {
        let api = LoginRequest {
            email: "a@b.com",
            nickname: "alice",
            password: "x",
        };
        let envelope = api
            .deserialize_response(
                StatusCode::OK,
                Some("application/json;charset=UTF-8"),
                br#"{"status":1,"message":"ok","data":"tok123"}"#,
            )
            .expect("envelope");
        assert!(envelope.is_success());
        assert_eq!(envelope.data, serde_json::json!("tok123"));
    }

    #[test]
    fn non_success_status_is_transport_error() {
        let api = LoginRequest {
            email: "a@b.com",
            nickname: "alice",
            password: "x",
        };
        let err = api
            .deserialize_response(
                StatusCode::UNAUTHORIZED,
                Some("application/json"),
                br#"{"status":0,"message":"Invalid Token","data":null}"#,
            )
            .expect_err("401 must fail");
        match err {
            HttpJsonApiError::UnsuccessfulResponse {
                status_code,
                message,
            } => {
                assert_eq!(status_code, StatusCode::UNAUTHORIZED);
                assert_eq!(message.as_deref(), Some("Invalid Token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_message_and_data_default() {
        let envelope: Envelope = serde_json::from_str(r#"{"status":0}"#).expect("envelope");
        assert!(!envelope.is_success());
        assert_eq!(envelope.message, None);
        assert!(envelope.data.is_null());
    }
}
