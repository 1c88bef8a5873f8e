//! Client and legal-entity records, and legal-entity selection

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::identifiers::{ClientId, LegalEntityId};
use crate::error::Result;
use crate::utils::{optional_str, required_str};

/// One entry of the `clients` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    /// Client identifier used in data endpoint URLs
    pub id: ClientId,
    /// Customer code (the value passed as `clientCode` when requesting tokens)
    pub client_code: Option<String>,
    /// Display name
    pub client_name: Option<String>,
}

impl ClientSummary {
    /// Build from a raw `clients` record
    ///
    /// # Errors
    /// `MissingField` if `id` is absent.
    pub fn from_record(record: &Value) -> Result<Self> {
        Ok(Self {
            id: ClientId::new(required_str(record, "id")?),
            client_code: optional_str(record, "clientCode"),
            client_name: optional_str(record, "clientName"),
        })
    }
}

/// A legal entity ("company" or location) under a client account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntity {
    /// Legal entity identifier used in data endpoint URLs
    pub id: LegalEntityId,
    /// Human-readable name, matched by [`select_legal_id`]
    pub legal_name: String,
    /// Legal code (e.g. "2502007-1")
    pub legal_code: Option<String>,
}

impl LegalEntity {
    /// Build from a raw `legals` record
    ///
    /// # Errors
    /// `MissingField` if `id` or `legalName` is absent.
    pub fn from_record(record: &Value) -> Result<Self> {
        Ok(Self {
            id: LegalEntityId::new(required_str(record, "id")?),
            legal_name: required_str(record, "legalName")?,
            legal_code: optional_str(record, "legalCode"),
        })
    }
}

/// Pick a legal entity id from the caller's legal entities.
///
/// With a single entity, or no `name_substring`, the first entity's id is
/// returned unconditionally. Otherwise the first entity (in list order) whose
/// name contains `name_substring` wins; the match is case-sensitive.
///
/// Returns `None` when nothing matches or the list is empty.
///
/// # Example
/// ```
/// use insperity_client::types::{LegalEntity, LegalEntityId, select_legal_id};
///
/// let entities = vec![
///     LegalEntity { id: "1".into(), legal_name: "Acme Las Vegas".into(), legal_code: None },
///     LegalEntity { id: "2".into(), legal_name: "Acme Newport".into(), legal_code: None },
/// ];
/// assert_eq!(select_legal_id(&entities, Some("Newport")), Some(&LegalEntityId::from("2")));
/// assert_eq!(select_legal_id(&entities, Some("Reno")), None);
/// ```
#[must_use]
pub fn select_legal_id<'a>(
    entities: &'a [LegalEntity],
    name_substring: Option<&str>,
) -> Option<&'a LegalEntityId> {
    match name_substring {
        Some(needle) if entities.len() > 1 => entities
            .iter()
            .find(|entity| entity.legal_name.contains(needle))
            .map(|entity| &entity.id),
        _ => entities.first().map(|entity| &entity.id),
    }
}
