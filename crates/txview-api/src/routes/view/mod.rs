//! View routes - Snapshot and employee filter

pub mod api;

pub use api::{api_filter, api_view, FilterRequest};
pub(crate) use api::apply_filter;
