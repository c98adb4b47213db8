use std::fmt;

use serde::{Deserialize, Serialize};

use super::Customer;

/// Body of `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthenticationResponse {
    /// May be blank when the server only sends the token as a header
    #[serde(default)]
    pub token: String,
    #[serde(rename = "customerDTO")]
    pub customer: Customer,
}

/// Body of `GET /ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingPong {
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authentication_response() {
        let json = r#"{"token":"abc.def.ghi","customerDTO":{"id":3,"name":"Jane","email":"jane@x.com","gender":"FEMALE","age":18,"roles":["ROLE_USER"],"username":"jane@x.com"}}"#;
        let resp: AuthenticationResponse =
            serde_json::from_str(json).expect("Failed to parse auth response JSON");
        assert_eq!(resp.token, "abc.def.ghi");
        assert_eq!(resp.customer.email, "jane@x.com");
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest::new("jane@x.com", "hunter2");
        let debug = format!("{:?}", req);
        assert!(debug.contains("jane@x.com"));
        assert!(!debug.contains("hunter2"));
    }
}
