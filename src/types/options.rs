//! Client configuration options and endpoint URL templates

use serde::{Deserialize, Serialize};
use std::time::Duration;
use typed_builder::TypedBuilder;

use super::identifiers::{ClientId, EmployeeId, LegalEntityId};

/// Production base path of the REST API
pub const DEFAULT_BASE_URL: &str = "https://insperity.myisolved.com/rest/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on pages followed by one paginated call
pub const DEFAULT_MAX_PAGES: usize = 1000;

// ============================================================================
// essScope header
// ============================================================================

/// Visibility scope sent in the `essScope` header of data requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EssScope {
    /// Employee self-service scope
    #[default]
    Employee,
    /// Manager scope
    Manager,
    /// Supervisor scope
    Supervisor,
    /// All records
    All,
}

impl EssScope {
    /// Header value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
            Self::Supervisor => "Supervisor",
            Self::All => "All",
        }
    }
}

impl std::fmt::Display for EssScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Client Options
// ============================================================================

/// Per-client configuration.
///
/// Endpoint URLs are derived from `base_url`, so pointing a client at a mock
/// server only needs a different base.
///
/// # Example
///
/// ```
/// use insperity_client::types::{ClientOptions, EssScope};
/// use std::time::Duration;
///
/// let options = ClientOptions::builder()
///     .base_url("http://localhost:8080/rest/api")
///     .ess_scope(EssScope::All)
///     .timeout(Duration::from_secs(10))
///     .build();
///
/// assert_eq!(options.token_url(), "http://localhost:8080/rest/api/token");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ClientOptions {
    /// Base path all endpoints are namespaced under (no trailing slash)
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,

    /// Scope header sent with data requests
    #[builder(default)]
    pub ess_scope: EssScope,

    /// Timeout applied to every HTTP request
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    /// Maximum number of pages one paginated call may follow (0 acts as 1)
    #[builder(default = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientOptions {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `POST {base}/token`
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/token", self.base())
    }

    /// `GET {base}/clients`
    #[must_use]
    pub fn clients_url(&self) -> String {
        format!("{}/clients", self.base())
    }

    /// `GET {base}/legals`
    #[must_use]
    pub fn legals_url(&self) -> String {
        format!("{}/legals", self.base())
    }

    /// `GET {base}/clients/{client}/legals/{legal}/employeesMinimal`
    #[must_use]
    pub fn minimal_employees_url(&self, client_id: &ClientId, legal_id: &LegalEntityId) -> String {
        format!(
            "{}/clients/{client_id}/legals/{legal_id}/employeesMinimal",
            self.base()
        )
    }

    /// `GET {base}/clients/{client}/employees`, or `employeesWithSSN`
    #[must_use]
    pub fn employees_url(&self, client_id: &ClientId, with_ssn: bool) -> String {
        let collection = if with_ssn {
            "employeesWithSSN"
        } else {
            "employees"
        };
        format!("{}/clients/{client_id}/{collection}", self.base())
    }

    /// `GET {base}/clients/{client}/legals/{legal}/employees/{employee}`
    #[must_use]
    pub fn employee_url(
        &self,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        employee_id: &EmployeeId,
    ) -> String {
        format!(
            "{}/clients/{client_id}/legals/{legal_id}/employees/{employee_id}",
            self.base()
        )
    }

    /// `GET {base}/clients/{client}/legals/{legal}/employees/{employee}/checks`
    #[must_use]
    pub fn employee_checks_url(
        &self,
        client_id: &ClientId,
        legal_id: &LegalEntityId,
        employee_id: &EmployeeId,
    ) -> String {
        format!(
            "{}/checks",
            self.employee_url(client_id, legal_id, employee_id)
        )
    }
}

// ============================================================================
// Query parameter sets
// ============================================================================

/// Filters for the `clients` collection
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ClientQuery {
    /// `clientCodeFilter`
    #[builder(default, setter(strip_option, into))]
    pub client_code_filter: Option<String>,
    /// `searchText`
    #[builder(default, setter(strip_option, into))]
    pub search_text: Option<String>,
}

impl ClientQuery {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "clientCodeFilter", self.client_code_filter.as_deref());
        push_opt(&mut query, "searchText", self.search_text.as_deref());
        query
    }
}

/// Options for the full employee collection
///
/// ```
/// use insperity_client::types::EmployeeQuery;
///
/// let query = EmployeeQuery::builder()
///     .status_filter("Active")
///     .with_ssn(true)
///     .build();
/// assert!(query.with_ssn);
/// assert_eq!(query.search_text, None);
/// ```
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct EmployeeQuery {
    /// `employeeStatusFilter` (e.g. "Active", "Terminated")
    #[builder(default, setter(strip_option, into))]
    pub status_filter: Option<String>,
    /// `searchText` free-text search (e.g. a last name)
    #[builder(default, setter(strip_option, into))]
    pub search_text: Option<String>,
    /// Use the SSN-inclusive collection
    #[builder(default)]
    pub with_ssn: bool,
}

impl EmployeeQuery {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "employeeStatusFilter", self.status_filter.as_deref());
        push_opt(&mut query, "searchText", self.search_text.as_deref());
        query
    }
}

/// Filters for an employee's checks
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ChecksQuery {
    /// `yearFilter`
    #[builder(default, setter(strip_option))]
    pub year_filter: Option<i32>,
    /// `includeDetails`
    #[builder(default, setter(strip_option))]
    pub include_details: Option<bool>,
}

impl ChecksQuery {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(year) = self.year_filter {
            query.push(("yearFilter".to_string(), year.to_string()));
        }
        if let Some(details) = self.include_details {
            query.push(("includeDetails".to_string(), details.to_string()));
        }
        query
    }
}

pub(crate) fn push_opt(query: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}
