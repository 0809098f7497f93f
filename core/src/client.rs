//! Stateless HTTP request builder and response parser for the items API.
//!
//! # Design
//! `ItemsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this layer
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AuthToken, Credentials, Item, ItemName, LoginResponse, MessageResponse};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the items API.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    base_url: String,
}

impl ItemsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_authenticate(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/users/login", None, credentials)
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/users/register", None, credentials)
    }

    pub fn build_list_items(&self, token: &AuthToken) -> HttpRequest {
        self.bare_request(HttpMethod::Get, "/items", token)
    }

    pub fn build_get_item(&self, id: i64, token: &AuthToken) -> HttpRequest {
        self.bare_request(HttpMethod::Get, &format!("/items/{id}"), token)
    }

    pub fn build_create_item(&self, name: &str, token: &AuthToken) -> Result<HttpRequest, ApiError> {
        let body = ItemName {
            name: name.to_string(),
        };
        self.json_request(HttpMethod::Post, "/items", Some(token), &body)
    }

    pub fn build_update_item(
        &self,
        id: i64,
        name: &str,
        token: &AuthToken,
    ) -> Result<HttpRequest, ApiError> {
        let body = ItemName {
            name: name.to_string(),
        };
        self.json_request(HttpMethod::Put, &format!("/items/{id}"), Some(token), &body)
    }

    pub fn build_delete_item(&self, id: i64, token: &AuthToken) -> HttpRequest {
        self.bare_request(HttpMethod::Delete, &format!("/items/{id}"), token)
    }

    pub fn parse_authenticate(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        decode(response)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<MessageResponse, ApiError> {
        decode_message(response)
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        decode(response)
    }

    pub fn parse_get_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        decode(response)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        decode(response)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        decode(response)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<MessageResponse, ApiError> {
        decode_message(response)
    }

    fn bare_request(&self, method: HttpMethod, route: &str, token: &AuthToken) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{route}", self.base_url),
            headers: vec![("authorization".to_string(), token.bearer())],
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        route: &str,
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = vec![("content-type".to_string(), JSON.to_string())];
        if let Some(token) = token {
            headers.push(("authorization".to_string(), token.bearer()));
        }
        Ok(HttpRequest {
            method,
            path: format!("{}{route}", self.base_url),
            headers,
            body: Some(body),
        })
    }
}

/// Map non-2xx responses to `ApiError::Server`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(response.status, &response.body))
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Like `decode`, but a 2xx with an empty body is an acknowledgement too.
fn decode_message(response: HttpResponse) -> Result<MessageResponse, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(MessageResponse::default());
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
