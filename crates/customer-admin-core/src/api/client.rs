//! API client for the customer service.
//!
//! Every operation builds a [`RequestDescriptor`], attaches the session's
//! bearer token when the descriptor requires it, dispatches once, and
//! normalizes any failure into an [`ApiError`]. Nothing is retried.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::Session;
use crate::config::Config;
use crate::forms;
use crate::models::{
    AuthenticationResponse, CreatedCustomer, Customer, CustomerId, CustomerRegistrationRequest,
    CustomerUpdateRequest, LoginRequest, PingPong,
};

use super::request::{AuthPolicy, CancelToken, RequestDescriptor};
use super::ApiError;

/// API client for the customer service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    policy: AuthPolicy,
}

impl ApiClient {
    /// Create a client for `base_url` with no request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::build(base_url.into(), None, AuthPolicy::default())
    }

    /// Create a client from the resolved configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::build(config.base_url(), config.request_timeout(), config.auth_policy())
    }

    fn build(base_url: String, timeout: Option<Duration>, policy: AuthPolicy) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> AuthPolicy {
        self.policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Dispatch a descriptor and return the successful response.
    ///
    /// An authenticated descriptor without a live token in `session` fails
    /// with `AuthError` before anything is sent.
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        session: Option<&Session>,
        cancel: Option<&CancelToken>,
    ) -> Result<Response, ApiError> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            debug!(method = %descriptor.method, path = %descriptor.path, "Request cancelled before dispatch");
            return Err(ApiError::Cancelled);
        }

        let mut request = self
            .client
            .request(descriptor.method.clone(), self.url(&descriptor.path))
            .header(header::ACCEPT, "application/json");

        if descriptor.requires_auth {
            let token = session.and_then(Session::token).ok_or_else(|| {
                warn!(path = %descriptor.path, "No valid session for authenticated request");
                ApiError::AuthError("Not logged in or session expired".to_string())
            })?;
            request = request.bearer_auth(token);
        }

        if let Some(ref body) = descriptor.body {
            request = request.json(body);
        }

        debug!(
            method = %descriptor.method,
            path = %descriptor.path,
            requires_auth = descriptor.requires_auth,
            "Dispatching request"
        );

        let response = request.send().await.map_err(|e| {
            warn!(method = %descriptor.method, path = %descriptor.path, error = %e, "Request failed");
            ApiError::NetworkError(e.to_string())
        })?;

        Self::check_response(response, descriptor).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response, descriptor: &RequestDescriptor) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        warn!(
            method = %descriptor.method,
            path = %descriptor.path,
            status = status.as_u16(),
            code = err.code(),
            "Request rejected"
        );
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    /// Decode the body if there is one; empty bodies yield `None`.
    async fn read_optional_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<Option<T>, ApiError> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map(Some).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    fn bearer_from_headers(response: &Response) -> Option<String> {
        let value = response.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        parse_bearer(value)
    }

    // ===== Operations =====

    /// Exchange credentials for a token. Does not touch any session; storing
    /// the result is the caller's job.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthenticationResponse, ApiError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(ApiError::ValidationError(
                "Username and password required".to_string(),
            ));
        }

        let descriptor = RequestDescriptor::login(credentials)?;
        let response = match self.execute(&descriptor, None, None).await {
            Ok(response) => response,
            // The server answers 404 for an unknown username
            Err(ApiError::NotFoundError(msg)) => return Err(ApiError::AuthError(msg)),
            Err(e) => return Err(e),
        };

        let header_token = Self::bearer_from_headers(&response);
        let mut auth: AuthenticationResponse = Self::read_json(response, &descriptor.path).await?;
        if auth.token.trim().is_empty() {
            auth.token = header_token.ok_or_else(|| {
                ApiError::InvalidResponse("Login response carried no token".to_string())
            })?;
        }
        debug!(customer_id = %auth.customer.id, "Login succeeded");
        Ok(auth)
    }

    /// Fetch all customers, in server order
    pub async fn list_customers(&self, session: &Session) -> Result<Vec<Customer>, ApiError> {
        let descriptor = RequestDescriptor::list_customers();
        let response = self.execute(&descriptor, Some(session), None).await?;
        let customers: Vec<Customer> = Self::read_json(response, &descriptor.path).await?;
        debug!(count = customers.len(), "Fetched customers");
        Ok(customers)
    }

    pub async fn get_customer(&self, session: &Session, id: &CustomerId) -> Result<Customer, ApiError> {
        let descriptor = RequestDescriptor::get_customer(id);
        let response = self.execute(&descriptor, Some(session), None).await?;
        Self::read_json(response, &descriptor.path).await
    }

    /// Register a customer. The registration form is validated first.
    pub async fn create_customer(
        &self,
        session: &Session,
        request: &CustomerRegistrationRequest,
    ) -> Result<CreatedCustomer, ApiError> {
        forms::validate_registration(request).into_result()?;

        let descriptor = RequestDescriptor::create_customer(request, self.policy)?;
        let response = self.execute(&descriptor, Some(session), None).await?;
        Ok(CreatedCustomer {
            token: Self::bearer_from_headers(&response),
        })
    }

    /// Apply a partial update. Returns the updated record when the server
    /// sends one back.
    pub async fn update_customer(
        &self,
        session: &Session,
        id: &CustomerId,
        update: &CustomerUpdateRequest,
    ) -> Result<Option<Customer>, ApiError> {
        forms::validate_update(update).into_result()?;

        let descriptor = RequestDescriptor::update_customer(id, update)?;
        let response = self.execute(&descriptor, Some(session), None).await?;
        Self::read_optional_json(response, &descriptor.path).await
    }

    pub async fn delete_customer(&self, session: &Session, id: &CustomerId) -> Result<(), ApiError> {
        let descriptor = RequestDescriptor::delete_customer(id);
        self.execute(&descriptor, Some(session), None).await?;
        debug!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    /// Unauthenticated connectivity check
    pub async fn ping(&self) -> Result<PingPong, ApiError> {
        let descriptor = RequestDescriptor::ping();
        let response = self.execute(&descriptor, None, None).await?;
        Self::read_json(response, &descriptor.path).await
    }
}

/// Token from an `Authorization` value. The scheme is matched
/// case-insensitively and a bare value is taken as the token itself.
fn parse_bearer(value: &str) -> Option<String> {
    let value = value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}
