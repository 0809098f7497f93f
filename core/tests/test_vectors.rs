//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an operation and describes its inputs, the expected
//! request, a simulated response, and either the expected parse result or the
//! expected error. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use items_core::{ApiError, AuthToken, Credentials, HttpMethod, HttpRequest, HttpResponse, ItemsClient};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ItemsClient {
    ItemsClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn token(input: &Value) -> AuthToken {
    AuthToken::new(input["token"].as_str().unwrap())
}

fn id(input: &Value) -> i64 {
    input["id"].as_i64().unwrap()
}

fn build(c: &ItemsClient, operation: &str, input: &Value) -> HttpRequest {
    match operation {
        "authenticate" | "register" => {
            let creds: Credentials = serde_json::from_value(input.clone()).unwrap();
            if operation == "authenticate" {
                c.build_authenticate(&creds).unwrap()
            } else {
                c.build_register(&creds).unwrap()
            }
        }
        "list_items" => c.build_list_items(&token(input)),
        "get_item" => c.build_get_item(id(input), &token(input)),
        "create_item" => c
            .build_create_item(input["name"].as_str().unwrap(), &token(input))
            .unwrap(),
        "update_item" => c
            .build_update_item(id(input), input["name"].as_str().unwrap(), &token(input))
            .unwrap(),
        "delete_item" => c.build_delete_item(id(input), &token(input)),
        other => panic!("unknown operation: {other}"),
    }
}

fn parse(c: &ItemsClient, operation: &str, response: HttpResponse) -> Result<Value, ApiError> {
    let value = match operation {
        "authenticate" => serde_json::to_value(c.parse_authenticate(response)?),
        "register" => serde_json::to_value(c.parse_register(response)?),
        "list_items" => serde_json::to_value(c.parse_list_items(response)?),
        "get_item" => serde_json::to_value(c.parse_get_item(response)?),
        "create_item" => serde_json::to_value(c.parse_create_item(response)?),
        "update_item" => serde_json::to_value(c.parse_update_item(response)?),
        "delete_item" => serde_json::to_value(c.parse_delete_item(response)?),
        other => panic!("unknown operation: {other}"),
    };
    Ok(value.unwrap())
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = client();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&c, operation, &case["input"]);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match expected_req.get("body") {
            Some(expected_body) => {
                let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&req_body, expected_body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: unexpected body"),
        }

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let outcome = parse(&c, operation, response);

        if let Some(expected) = case.get("expected_result") {
            let value = outcome.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(&value, expected, "{name}: parsed result");
        } else {
            let expected = &case["expected_error"];
            let err = outcome.expect_err(name);
            assert_eq!(err.status().map(u64::from), expected["status"].as_u64(), "{name}: status");
            assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
        }
    }
}

#[test]
fn user_test_vectors() {
    run_vectors(include_str!("../../test-vectors/users.json"));
}

#[test]
fn item_test_vectors() {
    run_vectors(include_str!("../../test-vectors/items.json"));
}
