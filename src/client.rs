//! `InsperityClient` for calling the REST API
//!
//! The client owns configuration, a transport, and a token client. It holds
//! no session state: every data call takes the session's [`Credential`] by
//! `&mut`, refreshing it in place when the server answers 401. The borrow
//! also means one credential cannot be shared by two in-flight calls; give
//! each concurrent caller its own session.
//!
//! # Example: one legal entity for every call
//!
//! ```no_run
//! use insperity_client::{EmployeeQuery, InsperityClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InsperityClient::builder().build()?;
//! let mut session = client.connect("VES", Some("Newport")).await?;
//!
//! let query = EmployeeQuery::builder().status_filter("Active").build();
//! let employees = client
//!     .list_employees(&mut session.credential, &session.client_id, &session.legal_id, &query)
//!     .await?;
//!
//! for employee in &employees {
//!     println!("{} <{}>", employee.full_name(), employee.email);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example: choosing the legal entity yourself
//!
//! ```no_run
//! use insperity_client::{InsperityClient, select_legal_id};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InsperityClient::builder().build()?;
//! let mut credential = client.acquire_token("VES").await?;
//! let (client_id, legals) = client.resolve_client_and_legal_ids(&mut credential).await?;
//!
//! let Some(legal_id) = select_legal_id(&legals, Some("Vegas")) else {
//!     eprintln!("no matching legal entity");
//!     return Ok(());
//! };
//! let roster = client
//!     .list_minimal_employees(&mut credential, &client_id, legal_id, None)
//!     .await?;
//! println!("{} employees", roster.len());
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use std::sync::Arc;

use crate::auth::{ApiSecrets, Credential, TokenClient, bearer_header};
use crate::error::{InsperityError, Result};
use crate::pagination::{Page, PageAccumulator, PageRequest};
use crate::retry::send_with_refresh;
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::types::{
    ChecksQuery, ClientId, ClientOptions, ClientQuery, ClientSummary, Employee, EmployeeId,
    EmployeeQuery, EssScope, LegalEntity, LegalEntityId, MinimalEmployee, select_legal_id,
};
use crate::types::options::push_opt;

/// Everything needed to call data endpoints for one legal entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Tokens, refreshed in place by data calls
    pub credential: Credential,
    /// The caller's client id
    pub client_id: ClientId,
    /// The selected legal entity
    pub legal_id: LegalEntityId,
    /// All legal entities visible to the caller
    pub legal_entities: Vec<LegalEntity>,
}

/// Client for the Insperity REST API
#[derive(Clone)]
pub struct InsperityClient {
    options: ClientOptions,
    transport: Arc<dyn Transport>,
    tokens: TokenClient,
}

impl std::fmt::Debug for InsperityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsperityClient")
            .field("options", &self.options)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl InsperityClient {
    /// Create a client over HTTP with the given options and secrets
    ///
    /// # Errors
    ///
    /// Returns `Network` if the HTTP client cannot be built.
    pub fn new(options: ClientOptions, secrets: ApiSecrets) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(options.timeout)?);
        Ok(Self::with_transport(options, secrets, transport))
    }

    /// Create a client over a custom transport
    #[must_use]
    pub fn with_transport(
        options: ClientOptions,
        secrets: ApiSecrets,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let tokens = TokenClient::new(transport.clone(), secrets, options.token_url());
        Self {
            options,
            transport,
            tokens,
        }
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> InsperityClientBuilder {
        InsperityClientBuilder::default()
    }

    /// Client configuration
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Token endpoint client
    #[must_use]
    pub fn token_client(&self) -> &TokenClient {
        &self.tokens
    }

    // ------------------------------------------------------------------------
    // Tokens and session setup
    // ------------------------------------------------------------------------

    /// Obtain a credential for `client_code` with the client-credentials grant
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if the token endpoint answers non-200.
    pub async fn acquire_token(&self, client_code: &str) -> Result<Credential> {
        self.tokens.acquire(client_code).await
    }

    /// Refresh the credential's tokens in place
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if the token endpoint answers non-200.
    pub async fn refresh_token(&self, credential: &mut Credential) -> Result<()> {
        let pair = self.tokens.refresh_pair(credential).await?;
        credential.apply(pair);
        Ok(())
    }

    /// Acquire a credential, resolve the client id, and select a legal entity.
    ///
    /// This is the simplest way to start when every call uses the same legal
    /// entity. See [`select_legal_id`] for the selection rules.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no legal entity matches `legal_name_substring`,
    /// plus any error from the token or lookup calls.
    pub async fn connect(
        &self,
        client_code: &str,
        legal_name_substring: Option<&str>,
    ) -> Result<Session> {
        let mut credential = self.acquire_token(client_code).await?;
        let (client_id, legal_entities) = self.resolve_client_and_legal_ids(&mut credential).await?;

        let legal_id = select_legal_id(&legal_entities, legal_name_substring)
            .cloned()
            .ok_or_else(|| match legal_name_substring {
                Some(name) => {
                    InsperityError::not_found(format!("no legal entity name contains {name:?}"))
                }
                None => InsperityError::not_found("no legal entities returned"),
            })?;

        tracing::info!(
            client_id = %client_id,
            legal_id = %legal_id,
            entities = legal_entities.len(),
            "Session ready"
        );

        Ok(Session {
            credential,
            client_id,
            legal_id,
            legal_entities,
        })
    }

    // ------------------------------------------------------------------------
    // Identifier resolvers
    // ------------------------------------------------------------------------

    /// Clients visible to the credential, optionally filtered
    ///
    /// # Errors
    ///
    /// Returns `Http` on a non-success status after at most one refresh.
    pub async fn client_info(
        &self,
        credential: &mut Credential,
        query: &ClientQuery,
    ) -> Result<Vec<ClientSummary>> {
        let records = self
            .single_page(credential, &self.options.clients_url(), &query.to_query())
            .await?;
        records.iter().map(ClientSummary::from_record).collect()
    }

    /// The caller's client id: the id of the first client returned
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the clients collection is empty.
    pub async fn client_id(&self, credential: &mut Credential) -> Result<ClientId> {
        self.client_info(credential, &ClientQuery::default())
            .await?
            .into_iter()
            .next()
            .map(|client| client.id)
            .ok_or_else(|| InsperityError::not_found("no clients returned"))
    }

    /// Legal entities visible to the credential
    ///
    /// # Errors
    ///
    /// Returns `Http` on a non-success status after at most one refresh.
    pub async fn legal_entities(&self, credential: &mut Credential) -> Result<Vec<LegalEntity>> {
        let records = self
            .single_page(credential, &self.options.legals_url(), &[])
            .await?;
        records.iter().map(LegalEntity::from_record).collect()
    }

    /// Client id and the full legal-entity list, for caller-side selection
    ///
    /// # Errors
    ///
    /// Returns `Http` if either lookup fails, `NotFound` if there is no client.
    pub async fn resolve_client_and_legal_ids(
        &self,
        credential: &mut Credential,
    ) -> Result<(ClientId, Vec<LegalEntity>)> {
        let client_id = self.client_id(credential).await?;
        let legal_entities = self.legal_entities(credential).await?;
        tracing::debug!(client_id = %client_id, entities = legal_entities.len(), "Resolved ids");
        Ok((client_id, legal_entities))
    }

    // ------------------------------------------------------------------------
    // Employee endpoints
    // ------------------------------------------------------------------------

    /// Raw minimal-employee records for a legal entity
    ///
    /// # Errors
    ///
    /// Returns `Http` if any page fails; no partial list is returned.
    #[tracing::instrument(
        skip_all,
        fields(client_id = %client_id, legal_id = %legal_id, status_filter = ?status_filter)
    )]
    pub async fn minimal_employees_raw(
        &self,
        credential: &mut Credential,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        status_filter: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut query = Vec::new();
        push_opt(&mut query, "employeeStatusFilter", status_filter);
        let first = PageRequest::first(self.options.minimal_employees_url(client_id, legal_id), query);
        self.paginate(credential, first).await
    }

    /// Minimal employee records for a legal entity
    ///
    /// # Errors
    ///
    /// Returns `Http` if any page fails, `MissingField` if a record lacks a
    /// required field.
    pub async fn list_minimal_employees(
        &self,
        credential: &mut Credential,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        status_filter: Option<&str>,
    ) -> Result<Vec<MinimalEmployee>> {
        let records = self
            .minimal_employees_raw(credential, client_id, legal_id, status_filter)
            .await?;
        let employees = records
            .iter()
            .map(MinimalEmployee::from_record)
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(count = employees.len(), "Fetched minimal employee list");
        Ok(employees)
    }

    /// Raw full employee records.
    ///
    /// The collection is client-wide; `legal_id` is recorded on the tracing
    /// span only. `query.with_ssn` selects the SSN-inclusive collection.
    ///
    /// # Errors
    ///
    /// Returns `Http` if any page fails; no partial list is returned.
    #[tracing::instrument(
        skip_all,
        fields(client_id = %client_id, legal_id = %legal_id, with_ssn = query.with_ssn)
    )]
    pub async fn employees_raw(
        &self,
        credential: &mut Credential,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        query: &EmployeeQuery,
    ) -> Result<Vec<Value>> {
        let first = PageRequest::first(
            self.options.employees_url(client_id, query.with_ssn),
            query.to_query(),
        );
        self.paginate(credential, first).await
    }

    /// Full employee records
    ///
    /// # Errors
    ///
    /// Returns `Http` if any page fails, `MissingField` if a record lacks a
    /// required field.
    pub async fn list_employees(
        &self,
        credential: &mut Credential,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        query: &EmployeeQuery,
    ) -> Result<Vec<Employee>> {
        let records = self
            .employees_raw(credential, client_id, legal_id, query)
            .await?;
        let employees = records
            .iter()
            .map(Employee::from_record)
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(count = employees.len(), "Fetched employee list");
        Ok(employees)
    }

    /// One employee's raw record
    ///
    /// # Errors
    ///
    /// Returns `Http` on a non-success status after at most one refresh.
    pub async fn employee_by_id(
        &self,
        credential: &mut Credential,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        employee_id: &EmployeeId,
    ) -> Result<Value> {
        let url = self.options.employee_url(client_id, legal_id, employee_id);
        self.get(credential, &url, &[]).await?.json()
    }

    /// An employee's raw check records
    ///
    /// # Errors
    ///
    /// Returns `Http` if any page fails; no partial list is returned.
    pub async fn employee_checks_raw(
        &self,
        credential: &mut Credential,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        employee_id: &EmployeeId,
        query: &ChecksQuery,
    ) -> Result<Vec<Value>> {
        let first = PageRequest::first(
            self.options.employee_checks_url(client_id, legal_id, employee_id),
            query.to_query(),
        );
        self.paginate(credential, first).await
    }

    // ------------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------------

    /// Authenticated GET, refreshing and retrying once on 401
    async fn get(
        &self,
        credential: &mut Credential,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse> {
        let transport = &self.transport;
        let scope = self.options.ess_scope;
        send_with_refresh(credential, &self.tokens, move |access_token| async move {
            let headers = data_headers(&access_token, scope);
            transport.get(url, &headers, query).await
        })
        .await
    }

    /// `results` of a collection endpoint that is read as a single page
    async fn single_page(
        &self,
        credential: &mut Credential,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Vec<Value>> {
        let page: Page<Value> = self.get(credential, url, query).await?.json()?;
        Ok(page.results)
    }

    /// Follow `nextPageUrl` from `first` until exhausted
    async fn paginate(&self, credential: &mut Credential, first: PageRequest) -> Result<Vec<Value>> {
        let mut pages = PageAccumulator::new(first, self.options.max_pages);
        while let Some(request) = pages.next_request()? {
            let response = self.get(credential, &request.url, &request.query).await?;
            pages.push(response)?;
        }
        tracing::debug!(pages = pages.pages_requested(), "Pagination complete");
        Ok(pages.finish())
    }
}

fn data_headers(access_token: &str, scope: EssScope) -> [(&'static str, String); 2] {
    [
        ("Authorization", bearer_header(access_token)),
        ("essScope", scope.as_str().to_string()),
    ]
}

/// Builder for [`InsperityClient`]
#[derive(Default)]
pub struct InsperityClientBuilder {
    options: Option<ClientOptions>,
    secrets: Option<ApiSecrets>,
    transport: Option<Arc<dyn Transport>>,
}

impl InsperityClientBuilder {
    /// Set client options (default: [`ClientOptions::default`])
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set API secrets (default: [`ApiSecrets::from_env`])
    #[must_use]
    pub fn secrets(mut self, secrets: ApiSecrets) -> Self {
        self.secrets = Some(secrets);
        self
    }

    /// Use a custom transport instead of HTTP
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if no secrets were set and the environment
    /// lacks them, or `Network` if the HTTP client cannot be built.
    pub fn build(self) -> Result<InsperityClient> {
        let options = self.options.unwrap_or_default();
        let secrets = match self.secrets {
            Some(secrets) => secrets,
            None => ApiSecrets::from_env()?,
        };
        match self.transport {
            Some(transport) => Ok(InsperityClient::with_transport(options, secrets, transport)),
            None => InsperityClient::new(options, secrets),
        }
    }
}
