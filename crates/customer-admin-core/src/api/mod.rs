//! REST API client module for the customer service.
//!
//! This module provides the `ApiClient` for logging in and for listing,
//! creating, updating and deleting customers.
//!
//! The API uses JWT bearer token authentication. The token comes from the
//! login endpoint and is read from the caller's `Session` on every
//! authenticated request.

pub mod client;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::{AuthPolicy, CancelToken, RequestDescriptor};
