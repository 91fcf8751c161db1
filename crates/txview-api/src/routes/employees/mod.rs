//! Employee routes - Filter options

pub mod api;

pub use api::api_employees;
