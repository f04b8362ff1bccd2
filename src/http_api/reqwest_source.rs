use super::HttpApi;
use crate::utils::HttpBaseUrl;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReqwestCallError {
    #[error("Serializing request body: {0:#}")]
    RequestBody(anyhow::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl super::HttpCallSource for reqwest::Client {
    type Error = ReqwestCallError;

    async fn invoke<Api: HttpApi + Sync>(
        &self,
        base: &HttpBaseUrl,
        bearer_token: Option<&str>,
        api: &Api,
    ) -> Result<Api::Response, Self::Error> {
        let body = api.request_body().map_err(ReqwestCallError::RequestBody)?;

        let url = api.full_url(base);
        log::debug!("{} {}", api.method(), url.path());

        let mut request = self.request(api.method(), url);

        if let Some(token) = bearer_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(content_type) = api.request_content_type() {
            request = request.header(CONTENT_TYPE, content_type.as_ref());
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        if let Some(accept) = api.expected_response_type() {
            request = request.header(ACCEPT, accept.as_ref());
        }

        let resp = request.send().await?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| Some(v.to_str().ok()?.to_string()));

        Ok(api.deserialize_response(status, content_type.as_deref(), &resp.bytes().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_api::{HttpCallSource, HttpJsonApi};
    use http::Method;
    use serde::{ser, Serialize, Serializer};
    use std::borrow::Cow;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(ser::Error::custom("boom"))
        }
    }

    struct BrokenRequest;

    impl HttpJsonApi for BrokenRequest {
        type Data = serde_json::Value;

        fn method(&self) -> Method {
            Method::POST
        }

        fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
            std::iter::once(Cow::Borrowed("messages"))
        }

        fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
            std::iter::empty()
        }

        fn request(&self) -> Option<&impl Serialize> {
            Some(&Unserializable)
        }
    }

    #[tokio::test]
    async fn unserializable_body_fails_the_call() {
        let base = HttpBaseUrl::new("http://127.0.0.1:9").expect("valid base url");

        let result = reqwest::Client::new()
            .invoke(&base, None, &BrokenRequest)
            .await;

        assert!(
            matches!(result, Err(ReqwestCallError::RequestBody(_))),
            "got {result:?}"
        );
    }
}
