//! Core view logic for the transaction review board
//!
//! - [`overlay`]: session-local approval overrides
//! - [`consumers`]: stateful wrappers around the employee, paginated and
//!   per-employee data sources
//! - [`coordinator`]: decides which transaction consumer is authoritative and
//!   derives what the presentation layer shows

pub mod consumers;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod overlay;
pub mod source;
pub mod types;

pub use consumers::{EmployeeDirectory, EmployeeTransactions, PaginatedTransactions};
pub use coordinator::{LoadMore, ViewCoordinator, ViewSnapshot};
pub use error::{CoreError, CoreResult, FetchError};
pub use models::{
    Employee, EmployeeOption, PaginatedData, ResolvedTransaction, Transaction, TransactionPage,
};
pub use overlay::ApprovalOverlay;
pub use source::{
    EmployeeSource, EmployeeSourceRef, EmployeeTransactionSource, EmployeeTransactionSourceRef,
    TransactionPageSource, TransactionPageSourceRef,
};
pub use types::{
    EmployeeId, EmployeeSelection, FetchOutcome, FetchStatus, PageToken, TransactionId, ViewMode,
};
