//! Identifier and state types shared across the view layer

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Employee identifier. Never empty; the "all employees" choice is
/// [`EmployeeSelection::All`], not an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidEmployeeId { id });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmployeeId> for String {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction identifier, unique within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque continuation token handed back by the paginated source.
///
/// The terminal "no more pages" value is `Option::<PageToken>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the user picked in the employee filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeSelection {
    /// The synthetic "all employees" entry
    All,
    /// A concrete employee
    Employee(EmployeeId),
}

impl EmployeeSelection {
    /// Raw id of the synthetic "all employees" entry
    pub const ALL_ID: &'static str = "";

    /// Interpret a raw filter value; the empty string selects everyone.
    pub fn from_raw(raw: &str) -> Self {
        match EmployeeId::new(raw) {
            Ok(id) => EmployeeSelection::Employee(id),
            Err(_) => EmployeeSelection::All,
        }
    }
}

/// Which transaction consumer is authoritative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "employeeId", rename_all = "lowercase")]
pub enum ViewMode {
    /// Paginated list of every transaction
    All,
    /// Full list for one employee
    Filtered(EmployeeId),
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::All
    }
}

/// Consumer targeted by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerKind {
    Paginated,
    ByEmployee,
}

/// Fetch to issue once the invalidation has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommand {
    NextPage,
    ForEmployee(EmployeeId),
}

/// Outcome of a pure mode transition: invalidate one consumer, then fetch
/// from the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub mode: ViewMode,
    pub invalidate: ConsumerKind,
    pub fetch: FetchCommand,
}

impl ViewMode {
    /// Compute the next mode and the side effects needed to enter it
    pub fn transition(&self, selection: EmployeeSelection) -> Transition {
        match selection {
            EmployeeSelection::All => Transition {
                mode: ViewMode::All,
                invalidate: ConsumerKind::ByEmployee,
                fetch: FetchCommand::NextPage,
            },
            EmployeeSelection::Employee(id) => Transition {
                mode: ViewMode::Filtered(id.clone()),
                invalidate: ConsumerKind::Paginated,
                fetch: FetchCommand::ForEmployee(id),
            },
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ViewMode::All)
    }
}

/// Lifecycle of a consumer's most recent fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FetchStatus {
    /// Nothing requested yet, or data was invalidated
    Idle,
    Loading,
    Loaded,
    Failed { reason: String },
}

impl Default for FetchStatus {
    fn default() -> Self {
        FetchStatus::Idle
    }
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchStatus::Failed { .. })
    }
}

/// Result of asking a consumer to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was stored
    Applied,
    /// A fetch was already in flight
    AlreadyLoading,
    /// The paginated source has no more pages
    Exhausted,
    /// The consumer was invalidated or superseded while the request was in flight
    Discarded,
    /// The request does not apply to the current view, nothing was issued
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_id_rejects_empty() {
        assert!(EmployeeId::new("").is_err());
        assert!(EmployeeId::new("   ").is_err());
        assert_eq!(EmployeeId::new("7").unwrap().as_str(), "7");
    }

    #[test]
    fn test_selection_from_raw() {
        assert_eq!(EmployeeSelection::from_raw(EmployeeSelection::ALL_ID), EmployeeSelection::All);
        assert_eq!(
            EmployeeSelection::from_raw("1"),
            EmployeeSelection::Employee(EmployeeId::new("1").unwrap())
        );
    }

    #[test]
    fn test_transition_to_all_invalidates_filtered() {
        let filtered = ViewMode::Filtered(EmployeeId::new("1").unwrap());
        let step = filtered.transition(EmployeeSelection::All);
        assert_eq!(step.mode, ViewMode::All);
        assert_eq!(step.invalidate, ConsumerKind::ByEmployee);
        assert_eq!(step.fetch, FetchCommand::NextPage);
    }

    #[test]
    fn test_transition_to_employee_invalidates_paginated() {
        let id = EmployeeId::new("1").unwrap();
        let step = ViewMode::All.transition(EmployeeSelection::Employee(id.clone()));
        assert_eq!(step.mode, ViewMode::Filtered(id.clone()));
        assert_eq!(step.invalidate, ConsumerKind::Paginated);
        assert_eq!(step.fetch, FetchCommand::ForEmployee(id));
    }

    #[test]
    fn test_employee_id_deserialize_validates() {
        assert!(serde_json::from_str::<EmployeeId>("\"\"").is_err());
        let id: EmployeeId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_view_mode_serialization() {
        let json = serde_json::to_value(ViewMode::Filtered(EmployeeId::new("1").unwrap())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "filtered", "employeeId": "1"}));
        let json = serde_json::to_value(ViewMode::All).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "all"}));
    }
}
