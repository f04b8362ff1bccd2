use super::ApiError;
use crate::http_api::{Envelope, HttpCallSource, HttpJsonApi};
use crate::utils::HttpBaseUrl;

/// Issues envelope-wrapped JSON calls against the chat server.
pub struct ApiClient<CS> {
    source: CS,
    base_url: HttpBaseUrl,
}

impl<CS: HttpCallSource> ApiClient<CS> {
    pub fn new(source: CS, base_url: HttpBaseUrl) -> Self {
        Self { source, base_url }
    }

    #[cfg(test)]
    pub fn source(&self) -> &CS {
        &self.source
    }

    /// Performs `api` and unwraps the envelope: `status == 1` yields the decoded `data`,
    /// anything else becomes [`ApiError::Application`] carrying the envelope's `message`.
    pub async fn call<A>(&self, bearer_token: Option<&str>, api: &A) -> Result<A::Data, ApiError>
    where
        A: HttpJsonApi + Sync,
    {
        let envelope = self.invoke(bearer_token, api).await?;
        serde_json::from_value(envelope.data).map_err(ApiError::UnexpectedShape)
    }

    /// Performs a mutation and returns the server's confirmation text, or `fallback` when
    /// the envelope carries none.
    pub async fn acknowledge<A>(
        &self,
        bearer_token: Option<&str>,
        api: &A,
        fallback: &str,
    ) -> Result<String, ApiError>
    where
        A: HttpJsonApi + Sync,
    {
        let Envelope { message, data, .. } = self.invoke(bearer_token, api).await?;

        Ok(data
            .as_str()
            .map(str::to_string)
            .into_iter()
            .chain(message)
            .find(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()))
    }

    async fn invoke<A>(&self, bearer_token: Option<&str>, api: &A) -> Result<Envelope, ApiError>
    where
        A: HttpJsonApi + Sync,
    {
        let envelope = self
            .source
            .invoke(&self.base_url, bearer_token, api)
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))??;

        if !envelope.is_success() {
            log::debug!(
                "Envelope status {} from {}: {:?}",
                envelope.status,
                self.base_url,
                envelope.message
            );
            return Err(ApiError::Application {
                message: envelope.message.filter(|m| !m.trim().is_empty()),
            });
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeServer, Reply};
    use crate::api::{ListFriends, LoginRequest, Message, MessagesBetween, SendFriendRequest};
    use http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn success_envelope_yields_data() {
        let client = FakeServer::client();
        client
            .source()
            .set_reply(Method::POST, "/login", Reply::success(json!("tok123")));

        let token = client
            .call(
                None,
                &LoginRequest {
                    email: "a@b.com",
                    nickname: "alice",
                    password: "x",
                },
            )
            .await
            .expect("login");

        assert_eq!(token, "tok123");
        let requests = client.source().requests();
        assert_eq!(requests[0].bearer_token, None);
        assert_eq!(
            requests[0].body,
            Some(json!({"email": "a@b.com", "nickname": "alice", "password": "x"}))
        );
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_query() {
        let client = FakeServer::client();
        client
            .source()
            .set_reply(Method::GET, "/friends", Reply::success(json!(["bob"])));

        let friends = client
            .call(Some("tok"), &ListFriends { nickname: "alice" })
            .await
            .expect("friends");

        assert_eq!(friends, vec!["bob"]);
        let requests = client.source().requests();
        assert_eq!(requests[0].bearer_token.as_deref(), Some("tok"));
        assert_eq!(requests[0].query("nickname"), Some("alice"));
    }

    #[tokio::test]
    async fn failure_reads_message_not_data() {
        let client = FakeServer::client();
        client.source().set_reply(
            Method::POST,
            "/login",
            Reply::envelope(json!({"status": 0, "message": "Wrong password", "data": "ignored"})),
        );

        let err = client
            .call(
                None,
                &LoginRequest {
                    email: "a@b.com",
                    nickname: "alice",
                    password: "nope",
                },
            )
            .await
            .expect_err("failure");

        assert!(!err.is_transport());
        assert_eq!(err.server_message(), Some("Wrong password"));
    }

    #[tokio::test]
    async fn acknowledge_prefers_data_then_message() {
        let client = FakeServer::client();
        let api = SendFriendRequest {
            sender: "alice",
            receiver: "bob",
        };

        client.source().push_reply(
            Method::POST,
            "/friends/add",
            Reply::envelope(json!({"status": 1, "message": "Request saved.", "data": "Sent to bob"})),
        );
        client.source().push_reply(
            Method::POST,
            "/friends/add",
            Reply::envelope(json!({"status": 1, "message": "Request saved.", "data": null})),
        );
        client.source().push_reply(
            Method::POST,
            "/friends/add",
            Reply::envelope(json!({"status": 1, "message": "", "data": null})),
        );

        let mut texts = Vec::new();
        for _ in 0..3 {
            texts.push(
                client
                    .acknowledge(Some("tok"), &api, "Friend request sent!")
                    .await
                    .expect("ack"),
            );
        }

        assert_eq!(texts, vec!["Sent to bob", "Request saved.", "Friend request sent!"]);
    }

    #[tokio::test]
    async fn non_list_data_is_unexpected_shape() {
        let client = FakeServer::client();
        client.source().set_reply(
            Method::GET,
            "/messagesbetween",
            Reply::success(json!("not a list")),
        );

        let err = client
            .call(
                Some("tok"),
                &MessagesBetween {
                    nickname: "alice",
                    friend: "bob",
                },
            )
            .await
            .expect_err("shape");

        assert!(matches!(err, ApiError::UnexpectedShape(_)));
    }

    #[tokio::test]
    async fn http_errors_and_unreachable_are_transport() {
        let client = FakeServer::client();
        client.source().set_reply(
            Method::GET,
            "/messagesbetween",
            Reply::Status(StatusCode::INTERNAL_SERVER_ERROR),
        );
        let err = client
            .call(
                Some("tok"),
                &MessagesBetween {
                    nickname: "alice",
                    friend: "bob",
                },
            )
            .await
            .expect_err("500");
        assert!(err.is_transport());

        client
            .source()
            .set_reply(Method::GET, "/friends", Reply::Unreachable);
        let err = client
            .call(Some("tok"), &ListFriends { nickname: "alice" })
            .await
            .expect_err("unreachable");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn decodes_message_list() {
        let client = FakeServer::client();
        client.source().set_reply(
            Method::GET,
            "/messagesbetween",
            Reply::success(json!([{"id": 1, "sender": "alice", "receiver": "bob", "content": "hi"}])),
        );

        let messages = client
            .call(
                Some("tok"),
                &MessagesBetween {
                    nickname: "alice",
                    friend: "bob",
                },
            )
            .await
            .expect("messages");

        assert_eq!(
            messages,
            vec![Message {
                id: Some(1),
                sender: "alice".into(),
                receiver: Some("bob".into()),
                content: "hi".into(),
            }]
        );
    }
}
