use anyhow::Context;
use bytes::{Bytes, BytesMut};
use http::Method;
use std::borrow::Cow;
use url::Url;

mod build;
mod call_source;
mod json;
mod reqwest_source;

pub use build::*;
pub use call_source::*;
pub use json::*;

use crate::utils::HttpBaseUrl;

pub trait HttpApi {
    type Response;

    fn method(&self) -> Method;
    fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>>;
    fn queries(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)>;

    fn request_content_type(&self) -> Option<Cow<'_, str>>;

    fn write_request_body(&self, buf: &mut BytesMut) -> anyhow::Result<()>;

    fn expected_response_type(&self) -> Option<Cow<'_, str>>;

    fn deserialize_response(
        &self,
        status_code: http::StatusCode,
        content_type: Option<&str>,
        buf: &[u8],
    ) -> Self::Response;

    fn request_body(&self) -> anyhow::Result<Option<Bytes>> {
        let mut buf = BytesMut::new();
        self.write_request_body(&mut buf)
            .context("Writing request body")?;
        Ok((!buf.is_empty()).then(|| buf.freeze()))
    }

    fn full_url(&self, base: &HttpBaseUrl) -> Url {
        build_http_url(self, base)
    }
}
