//! Request descriptors: the fully specified intent for one outgoing call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use super::ApiError;
use crate::models::{CustomerId, CustomerRegistrationRequest, CustomerUpdateRequest, LoginRequest};

pub const CUSTOMERS_PATH: &str = "/api/customers";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const PING_PATH: &str = "/ping";

/// Which operations must carry a bearer token beyond the always-authenticated
/// customer reads and mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Customer registration is open on the server, so this defaults to false.
    pub create_requires_auth: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub requires_auth: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            requires_auth: false,
        }
    }

    pub fn authenticated(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn login(request: &LoginRequest) -> Result<Self, ApiError> {
        Self::new(Method::POST, LOGIN_PATH).with_body(request)
    }

    pub fn ping() -> Self {
        Self::new(Method::GET, PING_PATH)
    }

    pub fn list_customers() -> Self {
        Self::new(Method::GET, CUSTOMERS_PATH).authenticated(true)
    }

    pub fn get_customer(id: &CustomerId) -> Self {
        Self::new(Method::GET, customer_path(id)).authenticated(true)
    }

    pub fn create_customer(
        request: &CustomerRegistrationRequest,
        policy: AuthPolicy,
    ) -> Result<Self, ApiError> {
        Self::new(Method::POST, CUSTOMERS_PATH)
            .authenticated(policy.create_requires_auth)
            .with_body(request)
    }

    pub fn update_customer(id: &CustomerId, update: &CustomerUpdateRequest) -> Result<Self, ApiError> {
        Self::new(Method::PUT, customer_path(id))
            .authenticated(true)
            .with_body(update)
    }

    pub fn delete_customer(id: &CustomerId) -> Self {
        Self::new(Method::DELETE, customer_path(id)).authenticated(true)
    }
}

fn customer_path(id: &CustomerId) -> String {
    format!("{}/{}", CUSTOMERS_PATH, urlencoding::encode(&id.to_string()))
}

/// Caller-held cancellation flag. It is checked once before dispatch; a
/// request already on the wire runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn registration() -> CustomerRegistrationRequest {
        CustomerRegistrationRequest {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            password: "password".to_string(),
            age: 18,
            gender: Gender::Female,
        }
    }

    #[test]
    fn test_auth_requirements() {
        let login = RequestDescriptor::login(&LoginRequest::new("a@b.co", "pw")).unwrap();
        assert!(!login.requires_auth);
        assert!(!RequestDescriptor::ping().requires_auth);
        assert!(RequestDescriptor::list_customers().requires_auth);
        assert!(RequestDescriptor::get_customer(&CustomerId::Number(1)).requires_auth);
        assert!(RequestDescriptor::delete_customer(&CustomerId::Number(1)).requires_auth);
        let update = CustomerUpdateRequest {
            age: Some(20),
            ..Default::default()
        };
        assert!(RequestDescriptor::update_customer(&CustomerId::Number(1), &update).unwrap().requires_auth);
    }

    #[test]
    fn test_create_follows_policy() {
        let open = RequestDescriptor::create_customer(&registration(), AuthPolicy::default()).unwrap();
        assert!(!open.requires_auth);

        let strict = AuthPolicy {
            create_requires_auth: true,
        };
        let closed = RequestDescriptor::create_customer(&registration(), strict).unwrap();
        assert!(closed.requires_auth);
    }

    #[test]
    fn test_paths_and_methods() {
        let delete = RequestDescriptor::delete_customer(&CustomerId::Number(42));
        assert_eq!(delete.method, Method::DELETE);
        assert_eq!(delete.path, "/api/customers/42");
        assert!(delete.body.is_none());

        let odd = RequestDescriptor::get_customer(&CustomerId::from("a/b c"));
        assert_eq!(odd.path, "/api/customers/a%2Fb%20c");

        let create = RequestDescriptor::create_customer(&registration(), AuthPolicy::default()).unwrap();
        assert_eq!(create.method, Method::POST);
        assert_eq!(create.path, CUSTOMERS_PATH);
        let body = create.body.expect("create carries a body");
        assert_eq!(body["gender"], "FEMALE");
        assert_eq!(body["age"], 18);
    }

    #[test]
    fn test_cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
