//! API client core for the items service.
//!
//! # Overview
//! Covers user registration and login plus CRUD on items. Two layers:
//! `ItemsClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO), and `ApiClient` drives it
//! through a `Transport` to perform the round-trip itself.
//!
//! # Design
//! - `ItemsClient` is stateless; it holds only `base_url`. There is no
//!   session: the bearer token is passed into every item call.
//! - Any 2xx decodes into the operation's typed result. Anything else is an
//!   `ApiError::Server` carrying the backend's `error` message.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::ItemsClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{AuthToken, Credentials, Item, ItemName, LoginResponse, MessageResponse};
