//! Core data models for the transaction view

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{EmployeeId, PageToken, TransactionId};

/// Employee as listed by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    /// Label shown in the employee filter
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Transaction as last returned by a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,
    /// Signed amount in the account currency
    pub amount: Decimal,
    /// Employee who made the transaction
    pub employee: Employee,
    /// Merchant name
    pub merchant: String,
    /// Transaction date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Approval status as known by the source
    pub approved: bool,
}

impl Transaction {
    pub fn belongs_to(&self, employee_id: &EmployeeId) -> bool {
        &self.employee.id == employee_id
    }
}

/// One page from the paginated source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    /// `None` once the last page has been served
    pub next_page: Option<PageToken>,
}

/// Pages accumulated so far by the paginated consumer
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedData {
    pub items: Vec<Transaction>,
    pub next_page: Option<PageToken>,
}

impl PaginatedData {
    /// Append a freshly fetched page
    pub fn extend(&mut self, page: TransactionPage) {
        self.items.extend(page.items);
        self.next_page = page.next_page;
    }

    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Transaction annotated with its overlay-resolved approval
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Overlay value if one was set, otherwise the source status
    pub resolved_approved: bool,
}

/// Entry of the employee filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOption {
    /// Raw filter value; empty for "all employees"
    pub value: String,
    pub label: String,
}

impl EmployeeOption {
    /// Synthetic entry placed before the real employees
    pub fn all() -> Self {
        Self {
            value: super::types::EmployeeSelection::ALL_ID.to_string(),
            label: "All Employees".to_string(),
        }
    }
}

impl From<&Employee> for EmployeeOption {
    fn from(employee: &Employee) -> Self {
        Self {
            value: employee.id.to_string(),
            label: employee.display_name(),
        }
    }
}
