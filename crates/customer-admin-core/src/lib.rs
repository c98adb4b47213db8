//! Core library for customer-admin.
//!
//! Provides the API session client for the customer service together with
//! the pieces a front-end needs around it:
//!
//! - `api`: `ApiClient`, request descriptors and the normalized `ApiError`
//! - `auth`: the `Session` holding the bearer token
//! - `forms`: validators run before any request is built
//! - `notify`: the `Notifier` seam for success/failure messages
//! - `actions`: form submission handlers tying the above together
//! - `config`: base URL, timeout and auth policy settings

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod notify;

pub use api::{ApiClient, ApiError};
pub use auth::Session;
pub use config::Config;
