use std::future::Future;

use super::HttpApi;
use crate::utils::HttpBaseUrl;

/// Something that can carry an [`HttpApi`] request to a server and hand back its decoded response.
pub trait HttpCallSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn invoke<Api: HttpApi + Sync>(
        &self,
        base: &HttpBaseUrl,
        bearer_token: Option<&str>,
        api: &Api,
    ) -> impl Future<Output = Result<Api::Response, Self::Error>> + Send;
}
