//! Route modules for the API server
//!
//! - view: Snapshot of the review board and the employee filter
//! - employees: Employee filter options
//! - transactions: Review page, load more and approvals
//! - settings: Effective configuration
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints (and HTMX partials where the module has them)
//! - page.rs: HTMX page rendering

pub mod employees;
pub mod settings;
pub mod transactions;
pub mod view;
