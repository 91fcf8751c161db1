//! Transaction routes - Review board, load more, approvals
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_load_more, api_set_approved, htmx_transaction_approve, htmx_transactions_filter,
    htmx_transactions_list, htmx_transactions_more, ApprovalForm, ApprovalRequest,
};

pub use page::{page_index, render_board, render_row};
