//! Settings routes - Effective configuration

pub mod api;

pub use api::api_settings;
