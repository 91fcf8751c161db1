//! JSON fixture data source
//!
//! Serves employees and transactions from a single JSON file shaped as
//! `{ "employees": [...], "transactions": [...] }`. Implements all three
//! collaborator traits of `txview-core`.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use txview_core::{
    Employee, EmployeeId, EmployeeSource, EmployeeTransactionSource, FetchError, PageToken,
    Transaction, TransactionPage, TransactionPageSource,
};

pub mod error;

pub use error::SourceError;

/// Raw fixture contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureData {
    pub employees: Vec<Employee>,
    pub transactions: Vec<Transaction>,
}

impl FixtureData {
    fn validate(&self) -> Result<(), SourceError> {
        let mut seen = HashSet::new();
        for transaction in &self.transactions {
            if !seen.insert(&transaction.id) {
                return Err(SourceError::InvalidFormat {
                    message: format!("duplicate transaction id {}", transaction.id),
                });
            }
        }
        Ok(())
    }
}

/// Paging and latency knobs
#[derive(Debug, Clone, Copy)]
pub struct SourceOptions {
    pub page_size: usize,
    pub latency: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            page_size: 5,
            latency: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct FixtureSource {
    data: FixtureData,
    options: SourceOptions,
}

impl FixtureSource {
    pub fn new(data: FixtureData, options: SourceOptions) -> Result<Self, SourceError> {
        if options.page_size == 0 {
            return Err(SourceError::InvalidFormat {
                message: "page size must be greater than 0".to_string(),
            });
        }
        data.validate()?;
        Ok(Self { data, options })
    }

    pub fn from_json(content: &str, options: SourceOptions) -> Result<Self, SourceError> {
        let data: FixtureData = serde_json::from_str(content)?;
        Self::new(data, options)
    }

    /// Read and parse a fixture file
    pub async fn load(path: impl AsRef<Path>, options: SourceOptions) -> Result<Self, SourceError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let source = Self::from_json(&content, options)?;
        debug!(
            "Loaded fixture {} ({} employees, {} transactions)",
            path.as_ref().display(),
            source.data.employees.len(),
            source.data.transactions.len()
        );
        Ok(source)
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    async fn simulate_latency(&self) {
        if !self.options.latency.is_zero() {
            tokio::time::sleep(self.options.latency).await;
        }
    }

    /// Page `token` of all transactions; `None` is page 0.
    pub fn page(&self, token: Option<&PageToken>) -> Result<TransactionPage, SourceError> {
        let index = match token {
            None => 0,
            Some(token) => token
                .as_str()
                .parse::<usize>()
                .map_err(|_| SourceError::UnknownPageToken {
                    token: token.to_string(),
                })?,
        };

        let unknown = || SourceError::UnknownPageToken {
            token: index.to_string(),
        };
        let start = index.checked_mul(self.options.page_size).ok_or_else(unknown)?;
        let total = self.data.transactions.len();
        if start > total || (start == total && index > 0) {
            return Err(unknown());
        }

        let end = (start + self.options.page_size).min(total);
        let next_page = if end < total {
            Some(PageToken::new((index + 1).to_string()))
        } else {
            None
        };

        Ok(TransactionPage {
            items: self.data.transactions[start..end].to_vec(),
            next_page,
        })
    }

    pub fn transactions_for(&self, employee_id: &EmployeeId) -> Result<Vec<Transaction>, SourceError> {
        if !self.data.employees.iter().any(|e| &e.id == employee_id) {
            return Err(SourceError::UnknownEmployee {
                id: employee_id.to_string(),
            });
        }
        Ok(self
            .data
            .transactions
            .iter()
            .filter(|t| t.belongs_to(employee_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EmployeeSource for FixtureSource {
    async fn list(&self) -> Result<Vec<Employee>, FetchError> {
        self.simulate_latency().await;
        Ok(self.data.employees.clone())
    }
}

#[async_trait]
impl TransactionPageSource for FixtureSource {
    async fn next_page(&self, token: Option<PageToken>) -> Result<TransactionPage, FetchError> {
        self.simulate_latency().await;
        Ok(self.page(token.as_ref())?)
    }
}

#[async_trait]
impl EmployeeTransactionSource for FixtureSource {
    async fn list_for(&self, employee_id: &EmployeeId) -> Result<Vec<Transaction>, FetchError> {
        self.simulate_latency().await;
        Ok(self.transactions_for(employee_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use txview_core::{EmployeeSelection, FetchOutcome, ViewCoordinator};

    const FIXTURE: &str = r#"{
        "employees": [
            {"id": "e1", "firstName": "Ada", "lastName": "Lovelace"},
            {"id": "e2", "firstName": "Alan", "lastName": "Turing"}
        ],
        "transactions": [
            {"id": "t1", "amount": 12.50, "merchant": "Cafe", "date": "2024-01-02", "approved": false,
             "employee": {"id": "e1", "firstName": "Ada", "lastName": "Lovelace"}},
            {"id": "t2", "amount": 300, "merchant": "Airline", "date": "2024-01-03", "approved": true,
             "employee": {"id": "e2", "firstName": "Alan", "lastName": "Turing"}},
            {"id": "t3", "amount": "45.10", "merchant": "Books", "date": "2024-01-04", "approved": false,
             "employee": {"id": "e1", "firstName": "Ada", "lastName": "Lovelace"}}
        ]
    }"#;

    fn source(page_size: usize) -> FixtureSource {
        FixtureSource::from_json(
            FIXTURE,
            SourceOptions {
                page_size,
                latency: Duration::ZERO,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_pages_walk_to_terminal_token() {
        let source = source(2);

        let first = source.page(None).unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_page, Some(PageToken::new("1")));

        let second = source.page(first.next_page.as_ref()).unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id.as_str(), "t3");
        assert!(second.next_page.is_none());
    }

    #[test]
    fn test_exact_fit_has_no_empty_trailing_page() {
        let source = source(3);
        let page = source.page(None).unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_bad_tokens_rejected() {
        let source = source(2);
        assert!(matches!(
            source.page(Some(&PageToken::new("abc"))),
            Err(SourceError::UnknownPageToken { .. })
        ));
        assert!(matches!(
            source.page(Some(&PageToken::new("9"))),
            Err(SourceError::UnknownPageToken { .. })
        ));
    }

    #[test]
    fn test_oversized_token_rejected_without_overflow() {
        let source = source(2);
        let token = PageToken::new(usize::MAX.to_string());
        assert!(matches!(
            source.page(Some(&token)),
            Err(SourceError::UnknownPageToken { .. })
        ));
    }

    #[test]
    fn test_transactions_for_employee() {
        let source = source(2);
        let list = source.transactions_for(&EmployeeId::new("e1").unwrap()).unwrap();
        let ids: Vec<_> = list.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);

        let err = source
            .transactions_for(&EmployeeId::new("nobody").unwrap())
            .unwrap_err();
        assert!(matches!(
            FetchError::from(err),
            FetchError::InvalidRequest { .. }
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"employees": [], "transactions": [
            {"id": "t1", "amount": 1, "merchant": "A", "date": "2024-01-01", "approved": false,
             "employee": {"id": "e1", "firstName": "A", "lastName": "B"}},
            {"id": "t1", "amount": 2, "merchant": "B", "date": "2024-01-01", "approved": false,
             "employee": {"id": "e1", "firstName": "A", "lastName": "B"}}
        ]}"#;
        let err = FixtureSource::from_json(json, SourceOptions::default()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidFormat { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = FixtureSource::from_json("{", SourceOptions::default()).unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = FixtureSource::load("/nonexistent/fixture.json", SourceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_drives_coordinator_end_to_end() {
        let coordinator = ViewCoordinator::from_source(Arc::new(source(2)));
        coordinator.initialize().await;
        assert_eq!(coordinator.snapshot().transactions.unwrap().len(), 2);
        assert_eq!(coordinator.snapshot().employees.len(), 3);

        coordinator.load_more().await.unwrap();
        assert_eq!(coordinator.snapshot().transactions.unwrap().len(), 3);
        assert_eq!(coordinator.load_more().await.unwrap(), FetchOutcome::Exhausted);

        let e2 = EmployeeSelection::from_raw("e2");
        coordinator.select(e2).await.unwrap();
        let snapshot = coordinator.snapshot();
        let list = snapshot.transactions.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].resolved_approved);
        assert!(!snapshot.load_more.visible);
    }
}
