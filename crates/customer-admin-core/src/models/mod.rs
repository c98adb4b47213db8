//! Wire models for the customer API.
//!
//! - `Customer`, `Gender`: the customer record as the server returns it
//! - `CustomerRegistrationRequest`, `CustomerUpdateRequest`: request bodies
//! - `LoginRequest`, `AuthenticationResponse`: the login exchange

pub mod auth;
pub mod customer;

pub use auth::{AuthenticationResponse, LoginRequest, PingPong};
pub use customer::{
    CreatedCustomer, Customer, CustomerId, CustomerRegistrationRequest, CustomerUpdateRequest,
    Gender,
};
