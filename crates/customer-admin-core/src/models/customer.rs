use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned customer identifier. The client never interprets it; it
/// only echoes it back in request paths, in whatever JSON form it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum CustomerId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerId::Number(n) => write!(f, "{}", n),
            CustomerId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for CustomerId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<i64>()
            .map(CustomerId::Number)
            .unwrap_or_else(|_| CustomerId::Text(s.trim().to_string())))
    }
}

impl From<i64> for CustomerId {
    fn from(id: i64) -> Self {
        CustomerId::Number(id)
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        CustomerId::Text(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            other => Err(format!("Invalid gender: {}", other)),
        }
    }
}

/// A customer as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: u32,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Customer {
    /// True when this record carries the given submitted fields unchanged.
    pub fn matches(&self, request: &CustomerRegistrationRequest) -> bool {
        self.name == request.name
            && self.email == request.email
            && self.age == request.age
            && self.gender == request.gender
    }
}

/// Body of `POST /api/customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CustomerRegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: u32,
    pub gender: Gender,
}

/// Body of `PUT /api/customers/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CustomerUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl CustomerUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

/// Returned by a successful create. The server answers with an empty body
/// and puts a token for the new account in the `Authorization` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedCustomer {
    pub token: Option<String>,
}
