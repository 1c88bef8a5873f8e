//! Authentication for the Insperity REST API
//!
//! The API uses the OAuth 2.0 client-credentials grant:
//!
//! 1. Build the combined key, Base64 of `client_id:secret`
//! 2. POST `grant_type=client_credentials` and the client code to `/token`
//!    with `Authorization: Basic <combined key>`
//! 3. Send `Authorization: Bearer <access_token>` on every data request
//! 4. When a data request answers 401, POST `grant_type=refresh_token` and
//!    replace both tokens on the [`Credential`]
//!
//! # Example
//!
//! ```no_run
//! use insperity_client::auth::{ApiSecrets, TokenClient};
//! use insperity_client::transport::HttpTransport;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new(Duration::from_secs(30))?);
//! let tokens = TokenClient::new(
//!     transport,
//!     ApiSecrets::from_env()?,
//!     "https://insperity.myisolved.com/rest/api/token",
//! );
//!
//! let mut credential = tokens.acquire("VES").await?;
//! let pair = tokens.refresh_pair(&credential).await?;
//! credential.apply(pair);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! [`ApiSecrets::from_env`] reads `INSPERITY_CLIENT_ID` and `INSPERITY_SECRET`,
//! loading a `.env` file first if present. Token values never appear in
//! `Debug` output or log events.

mod oauth;
mod token;

pub use oauth::{TokenClient, TokenRefresher};
pub use token::{
    ApiSecrets, Credential, ENV_CLIENT_CODE, ENV_CLIENT_ID, ENV_SECRET, TokenPair, bearer_header,
    client_code_from_env, combined_key,
};
