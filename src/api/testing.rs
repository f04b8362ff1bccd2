//! In-process stand-in for the chat server used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use http::{Method, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

use super::ApiClient;
use crate::http_api::{HttpApi, HttpCallSource};
use crate::utils::HttpBaseUrl;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with the given JSON body.
    Envelope(Value),
    /// Bare status code with an empty text body.
    Status(StatusCode),
    /// Connection-level failure.
    Unreachable,
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn success(data: Value) -> Self {
        Reply::Envelope(json!({"status": 1, "message": "ok", "data": data}))
    }

    pub fn failure(message: &str) -> Self {
        Reply::Envelope(json!({"status": 0, "message": message, "data": null}))
    }

    pub fn envelope(body: Value) -> Self {
        Reply::Envelope(body)
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer_token: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Error)]
#[error("fake server unreachable")]
pub struct Unreachable;

#[derive(Default)]
pub struct FakeServer {
    defaults: Mutex<HashMap<(Method, String), Reply>>,
    queued: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeServer {
    pub fn client() -> ApiClient<FakeServer> {
        ApiClient::new(
            FakeServer::default(),
            HttpBaseUrl::new("http://chat.test").expect("valid base url"),
        )
    }

    /// Reply used for every call to `path` once the queue for it is empty.
    pub fn set_reply(&self, method: Method, path: &str, reply: Reply) {
        self.defaults
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    /// One-shot reply consumed by the next call to `path`.
    pub fn push_reply(&self, method: Method, path: &str, reply: Reply) {
        self.queued
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn next_reply(&self, method: &Method, path: &str) -> Reply {
        let key = (method.clone(), path.to_string());
        if let Some(reply) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }

        self.defaults
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(Reply::Status(StatusCode::NOT_FOUND))
    }
}

impl HttpCallSource for FakeServer {
    type Error = Unreachable;

    async fn invoke<Api: HttpApi + Sync>(
        &self,
        base: &HttpBaseUrl,
        bearer_token: Option<&str>,
        api: &Api,
    ) -> Result<Api::Response, Self::Error> {
        let url = api.full_url(base);
        let method = api.method();
        let path = url.path().to_string();

        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: url.query_pairs().into_owned().collect(),
            bearer_token: bearer_token.map(str::to_string),
            body: api
                .request_body()
                .ok()
                .flatten()
                .and_then(|b| serde_json::from_slice(&b).ok()),
        });

        let mut reply = self.next_reply(&method, &path);
        while let Reply::Delayed(delay, inner) = reply {
            tokio::time::sleep(delay).await;
            reply = *inner;
        }

        match reply {
            Reply::Envelope(body) => Ok(api.deserialize_response(
                StatusCode::OK,
                Some("application/json"),
                &serde_json::to_vec(&body).expect("serialize fake body"),
            )),
            Reply::Status(code) => Ok(api.deserialize_response(code, Some("text/plain"), b"")),
            Reply::Unreachable => Err(Unreachable),
            Reply::Delayed(..) => unreachable!(),
        }
    }
}
