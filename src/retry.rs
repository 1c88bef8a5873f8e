//! Refresh-and-retry on an expired access token
//!
//! A data request that answers 401 is retried exactly once after the
//! credential has been refreshed. There is no backoff and no second refresh:
//! a 401 on the retry, or any other failure status, is returned to the caller
//! as [`InsperityError::Http`](crate::InsperityError::Http).

use std::future::Future;

use crate::auth::{Credential, TokenRefresher};
use crate::error::Result;
use crate::transport::RawResponse;

/// Send a request, refreshing the credential and retrying once on 401.
///
/// `send` is called with the current access token and performs the HTTP
/// exchange. On a 401 the credential is refreshed through `refresher` and
/// updated in place, so later calls in the same session use the new tokens.
///
/// # Errors
///
/// - `Http` if the final response is not 2xx (including a second 401)
/// - `Authentication` if the refresh itself is rejected
/// - whatever `send` returns for transport failures
///
/// # Example
///
/// ```
/// use insperity_client::auth::{Credential, TokenPair, TokenRefresher};
/// use insperity_client::retry::send_with_refresh;
/// use insperity_client::transport::RawResponse;
/// use insperity_client::Result;
///
/// struct StaticRefresher;
///
/// #[async_trait::async_trait]
/// impl TokenRefresher for StaticRefresher {
///     async fn refresh(&self, _credential: &Credential) -> Result<TokenPair> {
///         Ok(TokenPair { access_token: "fresh".into(), refresh_token: Some("r2".into()) })
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut credential = Credential::new("stale", "r1", "VES");
/// let response = send_with_refresh(&mut credential, &StaticRefresher, |token| async move {
///     let status = if token == "fresh" { 200 } else { 401 };
///     Ok(RawResponse::new(status, "https://example/clients", "{}"))
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(response.status, 200);
/// assert_eq!(credential.access_token, "fresh");
/// # });
/// ```
pub async fn send_with_refresh<R, F, Fut>(
    credential: &mut Credential,
    refresher: &R,
    mut send: F,
) -> Result<RawResponse>
where
    R: TokenRefresher + ?Sized,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<RawResponse>>,
{
    let response = send(credential.access_token.clone()).await?;
    if !response.is_unauthorized() {
        return response.error_for_status();
    }

    tracing::warn!(url = %response.url, "Access token rejected, refreshing and retrying once");
    let pair = refresher.refresh(credential).await?;
    credential.apply(pair);
    tracing::info!(client_code = %credential.client_code, "Access token refreshed");

    let retried = send(credential.access_token.clone()).await?;
    if retried.is_unauthorized() {
        tracing::warn!(url = %retried.url, "Request still unauthorized after refresh");
    }
    retried.error_for_status()
}
