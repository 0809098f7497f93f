//! Network-bound facade over `ItemsClient`.
//!
//! Every call is `build_*`, one `Transport::execute`, then `parse_*`. Nothing
//! is retried, cached or remembered between calls.

use tracing::{debug, instrument, warn};

use crate::client::ItemsClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{AuthToken, Credentials, Item, LoginResponse, MessageResponse};

/// Items API client that performs its own I/O.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    client: ItemsClient,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: ItemsClient::new(base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip(self, password), level = "debug")]
    pub fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self.client.build_authenticate(&Credentials::new(username, password))?;
        let resp = self.send(req)?;
        self.client.parse_authenticate(resp).inspect_err(log_failure)
    }

    #[instrument(skip(self, password), level = "debug")]
    pub fn register(&self, username: &str, password: &str) -> Result<MessageResponse, ApiError> {
        let req = self.client.build_register(&Credentials::new(username, password))?;
        let resp = self.send(req)?;
        self.client.parse_register(resp).inspect_err(log_failure)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn list_items(&self, token: &AuthToken) -> Result<Vec<Item>, ApiError> {
        let resp = self.send(self.client.build_list_items(token))?;
        let items = self.client.parse_list_items(resp).inspect_err(log_failure)?;
        debug!(count = items.len(), "listed items");
        Ok(items)
    }

    #[instrument(skip(self, token), level = "debug")]
    pub fn get_item(&self, id: i64, token: &AuthToken) -> Result<Item, ApiError> {
        let resp = self.send(self.client.build_get_item(id, token))?;
        self.client.parse_get_item(resp).inspect_err(log_failure)
    }

    #[instrument(skip(self, token), level = "debug")]
    pub fn create_item(&self, name: &str, token: &AuthToken) -> Result<Item, ApiError> {
        let req = self.client.build_create_item(name, token)?;
        let resp = self.send(req)?;
        self.client.parse_create_item(resp).inspect_err(log_failure)
    }

    #[instrument(skip(self, token), level = "debug")]
    pub fn update_item(&self, id: i64, name: &str, token: &AuthToken) -> Result<Item, ApiError> {
        let req = self.client.build_update_item(id, name, token)?;
        let resp = self.send(req)?;
        self.client.parse_update_item(resp).inspect_err(log_failure)
    }

    #[instrument(skip(self, token), level = "debug")]
    pub fn delete_item(&self, id: i64, token: &AuthToken) -> Result<MessageResponse, ApiError> {
        let resp = self.send(self.client.build_delete_item(id, token))?;
        self.client.parse_delete_item(resp).inspect_err(log_failure)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request)
    }
}

fn log_failure(err: &ApiError) {
    warn!(status = err.status(), error = %err.message(), "request rejected");
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct Scripted {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(ApiError::Transport(message.to_string())));
            self
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.borrow().clone()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".into())))
        }
    }

    fn api(transport: Scripted) -> ApiClient<Scripted> {
        ApiClient::with_transport("http://localhost:3000", transport)
    }

    #[test]
    fn authenticate_sends_one_post() {
        let api = api(Scripted::default().reply(200, r#"{"token":"abc123"}"#));
        let login = api.authenticate("alice", "secret").unwrap();
        assert_eq!(login.token.as_str(), "abc123");

        let seen = api.transport().seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].path, "http://localhost:3000/users/login");
        let body: serde_json::Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "username": "alice", "password": "secret" }));
    }

    #[test]
    fn authenticate_wrong_password() {
        let api = api(Scripted::default().reply(401, r#"{"error":"invalid credentials"}"#));
        let err = api.authenticate("alice", "wrong").unwrap_err();
        assert_eq!(err.message(), "invalid credentials");
    }

    #[test]
    fn get_item_sends_bearer_once() {
        let api = api(Scripted::default().reply(200, r#"{"id":9,"name":"x"}"#));
        let token = AuthToken::new("t-9");
        let item = api.get_item(9, &token).unwrap();
        assert_eq!(item.id, 9);

        let seen = api.transport().seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "http://localhost:3000/items/9");
        assert_eq!(seen[0].header("authorization"), Some("Bearer t-9"));
    }

    #[test]
    fn every_operation_surfaces_server_message() {
        let token = AuthToken::new("t");
        let body = r#"{"error":"X"}"#;
        let api = api(
            Scripted::default()
                .reply(400, body)
                .reply(401, body)
                .reply(403, body)
                .reply(404, body)
                .reply(409, body)
                .reply(500, body)
                .reply(503, body),
        );
        let errors = [
            api.authenticate("u", "p").unwrap_err(),
            api.register("u", "p").unwrap_err(),
            api.list_items(&token).unwrap_err(),
            api.get_item(1, &token).unwrap_err(),
            api.create_item("n", &token).unwrap_err(),
            api.update_item(1, "n", &token).unwrap_err(),
            api.delete_item(1, &token).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, ApiError::Server { .. }));
            assert_eq!(err.message(), "X");
        }
    }

    #[test]
    fn transport_failure_passes_through() {
        let api = api(Scripted::default().fail("connection refused"));
        let err = api.list_items(&AuthToken::new("t")).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn delete_item_returns_message() {
        let api = api(Scripted::default().reply(200, r#"{"message":"item deleted"}"#));
        let resp = api.delete_item(4, &AuthToken::new("t")).unwrap();
        assert_eq!(resp.message.as_deref(), Some("item deleted"));
        assert_eq!(api.transport().seen()[0].method, HttpMethod::Delete);
    }
}
