//! Type definitions for the Insperity REST client
//!
//! Identifiers for type safety, employee and organization records with their
//! mappers, and client option types.

// Module declarations
pub mod employee;
pub mod identifiers;
pub mod options;
pub mod organization;

pub use employee::{Compensation, Employee, ManagerRef, MinimalEmployee};
pub use identifiers::{ClientId, EmployeeId, LegalEntityId};
pub use options::{
    ChecksQuery, ClientOptions, ClientOptionsBuilder, ClientQuery, DEFAULT_BASE_URL,
    DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT, EmployeeQuery, EssScope,
};
pub use organization::{ClientSummary, LegalEntity, select_legal_id};
