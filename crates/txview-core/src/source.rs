//! Data source collaborator traits
//!
//! Implementations own transport, timeouts and page sizing. The consumers
//! only sequence calls and store what comes back.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::FetchError;
use crate::models::{Employee, Transaction, TransactionPage};
use crate::types::{EmployeeId, PageToken};

/// Lists every employee
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, FetchError>;
}

/// Serves all transactions one page at a time
#[async_trait]
pub trait TransactionPageSource: Send + Sync {
    /// Fetch the page identified by `token`; `None` requests the first page.
    async fn next_page(&self, token: Option<PageToken>) -> Result<TransactionPage, FetchError>;
}

/// Serves the complete transaction list of one employee
#[async_trait]
pub trait EmployeeTransactionSource: Send + Sync {
    async fn list_for(&self, employee_id: &EmployeeId) -> Result<Vec<Transaction>, FetchError>;
}

pub type EmployeeSourceRef = Arc<dyn EmployeeSource>;
pub type TransactionPageSourceRef = Arc<dyn TransactionPageSource>;
pub type EmployeeTransactionSourceRef = Arc<dyn EmployeeTransactionSource>;
