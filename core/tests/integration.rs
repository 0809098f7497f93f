//! Full user and item lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every `ApiClient`
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building and response parsing agree with the actual server.

use items_core::{ApiClient, ApiError, AuthToken, ClientConfig};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn user_and_item_lifecycle() {
    let base_url = start_server();
    let api = ApiClient::from_config(&ClientConfig::new(base_url));

    // Step 1: register, then a duplicate registration fails with the server's message.
    let registered = api.register("alice", "secret").unwrap();
    assert_eq!(registered.message.as_deref(), Some("user registered"));
    let err = api.register("alice", "secret").unwrap_err();
    assert_eq!(err.message(), "username already taken");

    // Step 2: wrong password.
    let err = api.authenticate("alice", "wrong").unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 401, .. }));
    assert_eq!(err.message(), "invalid credentials");

    // Step 3: login.
    let token = api.authenticate("alice", "secret").unwrap().token;

    // Step 4: list is empty.
    assert!(api.list_items(&token).unwrap().is_empty());

    // Step 5: create, then get returns the same name.
    let created = api.create_item("Integration test", &token).unwrap();
    assert_eq!(created.name, "Integration test");
    let fetched = api.get_item(created.id, &token).unwrap();
    assert_eq!(fetched, created);

    // Step 6: update.
    let updated = api.update_item(created.id, "Renamed", &token).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Renamed");

    // Step 7: list has one item.
    let items = api.list_items(&token).unwrap();
    assert_eq!(items, vec![updated]);

    // Step 8: delete.
    let deleted = api.delete_item(created.id, &token).unwrap();
    assert_eq!(deleted.message.as_deref(), Some("item deleted"));

    // Step 9: get after delete is a server error carrying "item not found".
    let err = api.get_item(created.id, &token).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "item not found");

    // Step 10: list is empty again.
    assert!(api.list_items(&token).unwrap().is_empty());
}

#[test]
fn bogus_token_is_rejected() {
    let api = ApiClient::new(&start_server());
    let err = api.list_items(&AuthToken::new("forged")).unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "missing or invalid token");
}
