//! # Insperity REST Client for Rust
//!
//! Async client for the Insperity (isolved) HR and payroll REST API.
//! OAuth client-credentials tokens, transparent refresh on expiry, automatic
//! pagination, and typed employee records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use insperity_client::{EmployeeQuery, InsperityClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads INSPERITY_CLIENT_ID and INSPERITY_SECRET (and a .env file)
//!     let client = InsperityClient::builder().build()?;
//!     let mut session = client.connect("VES", Some("Las Vegas")).await?;
//!
//!     let query = EmployeeQuery::builder().status_filter("Active").build();
//!     let employees = client
//!         .list_employees(&mut session.credential, &session.client_id, &session.legal_id, &query)
//!         .await?;
//!
//!     for employee in employees {
//!         println!("{} ({} days)", employee.full_name(), employee.tenure().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Features
//!
//! ### 1. Tokens
//!
//! [`InsperityClient::acquire_token`] runs the client-credentials grant and
//! returns a [`Credential`]. Every data call takes the credential by `&mut`;
//! when the server answers 401 the call refreshes it in place and retries
//! exactly once. See [`retry::send_with_refresh`].
//!
//! ### 2. Resolving identifiers
//!
//! Data endpoints are addressed by client id and legal entity id:
//!
//! ```no_run
//! # use insperity_client::{InsperityClient, select_legal_id};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = InsperityClient::builder().build()?;
//! let mut credential = client.acquire_token("VES").await?;
//! let (client_id, legals) = client.resolve_client_and_legal_ids(&mut credential).await?;
//! let legal_id = select_legal_id(&legals, Some("Newport"));
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Pagination
//!
//! Collection endpoints are followed through `nextPageUrl` until the last
//! page; results come back concatenated in server order. An error on any page
//! fails the whole listing. See [`pagination::PageAccumulator`].
//!
//! ### 4. Typed records
//!
//! [`Employee`] and [`MinimalEmployee`] are built from raw JSON with
//! [`Employee::from_record`]; a missing required field is reported as
//! [`InsperityError::MissingField`] naming the dotted path. The `*_raw`
//! methods return the untouched JSON instead.
//!
//! ## Architecture
//!
//! - [`types`]: Identifiers, records, options and query builders
//! - [`client`]: The API client and session setup
//! - [`auth`]: Token acquisition and refresh
//! - [`retry`]: Refresh-and-retry-once wrapper
//! - [`pagination`]: Page accumulation
//! - [`transport`]: HTTP layer
//! - [`utils`]: JSON field extraction helpers
//! - [`error`]: Error types and handling
//!
//! ## Configuration
//!
//! | Variable | Used by |
//! |----------|---------|
//! | `INSPERITY_CLIENT_ID` | [`auth::ApiSecrets::from_env`] |
//! | `INSPERITY_SECRET` | [`auth::ApiSecrets::from_env`] |
//! | `INSPERITY_CLIENT_CODE` | [`auth::client_code_from_env`] |
//!
//! Base URL, `essScope` header, timeout and page limit are set through
//! [`ClientOptions`].
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing) for structured logging.
//! Tracing events are always emitted but are zero-cost when no subscriber is attached.
//! Token values are never logged. To see logs, attach a tracing subscriber in your
//! application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, InsperityError>`](Result):
//!
//! ```no_run
//! # use insperity_client::{InsperityClient, InsperityError};
//! # async fn example(client: InsperityClient) {
//! match client.connect("VES", Some("Reno")).await {
//!     Ok(session) => { /* ... */ }
//!     Err(InsperityError::Authentication { status, .. }) => {
//!         eprintln!("Token request rejected with {status}");
//!     }
//!     Err(InsperityError::NotFound(msg)) => {
//!         eprintln!("{msg}");
//!     }
//!     Err(e) => {
//!         eprintln!("Error: {e}");
//!     }
//! }
//! # }
//! ```
//!
//! ## Requirements
//!
//! - Rust 1.85.0 or later

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod error;
pub mod pagination;
pub mod retry;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use auth::{ApiSecrets, Credential, TokenClient, TokenRefresher};
pub use client::{InsperityClient, InsperityClientBuilder, Session};
pub use error::{InsperityError, Result};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::{
    ChecksQuery, ClientId, ClientOptions, ClientOptionsBuilder, ClientQuery, ClientSummary,
    Compensation, Employee, EmployeeId, EmployeeQuery, EssScope, LegalEntity, LegalEntityId,
    ManagerRef, MinimalEmployee, select_legal_id,
};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
