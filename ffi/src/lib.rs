//! C-ABI wrapper around `items-core`.
//!
//! # Overview
//! Exposes the items API (login, registration, item CRUD) through
//! `extern "C"` functions so a native mobile UI can build requests and parse
//! responses while executing the HTTP round-trip on its own networking stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiItemsResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `items_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use items_core::{ApiError, AuthToken, Credentials, HttpResponse, ItemsClient};

use types::*;

/// Copy a borrowed C string. `None` for null; invalid UTF-8 is replaced.
fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `ItemsClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `items_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn items_client_new(base_url: *const c_char) -> *mut FfiItemsClient {
    catch_unwind(|| match read_c_str(base_url) {
        Some(url) => Box::into_raw(Box::new(FfiItemsClient {
            inner: ItemsClient::new(&url),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `items_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn items_client_free(client: *mut FfiItemsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the login request.
///
/// Returns null if any argument is null.
/// The caller must free the returned pointer with `items_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_authenticate(
    client: *const FfiItemsClient,
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(username), Some(password)) = (read_c_str(username), read_c_str(password)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_authenticate(&Credentials::new(username, password)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the registration request.
///
/// Returns null if any argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_register(
    client: *const FfiItemsClient,
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(username), Some(password)) = (read_c_str(username), read_c_str(password)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_register(&Credentials::new(username, password)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request listing the caller's items.
///
/// Returns null if `client` or `token` is null.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_list_items(
    client: *const FfiItemsClient,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match read_c_str(token) {
            Some(token) => FfiHttpRequest::from_core(client.inner.build_list_items(&AuthToken::new(token))),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request fetching one item by id.
///
/// Returns null if `client` or `token` is null.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_get_item(
    client: *const FfiItemsClient,
    id: i64,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match read_c_str(token) {
            Some(token) => FfiHttpRequest::from_core(client.inner.build_get_item(id, &AuthToken::new(token))),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request creating an item named `name`.
///
/// Returns null if any pointer argument is null or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_create_item(
    client: *const FfiItemsClient,
    name: *const c_char,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(name), Some(token)) = (read_c_str(name), read_c_str(token)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_create_item(&name, &AuthToken::new(token)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request renaming item `id` to `name`.
///
/// Returns null if any pointer argument is null or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_update_item(
    client: *const FfiItemsClient,
    id: i64,
    name: *const c_char,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(name), Some(token)) = (read_c_str(name), read_c_str(token)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_update_item(id, &name, &AuthToken::new(token)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request deleting item `id`.
///
/// Returns null if `client` or `token` is null.
#[unsafe(no_mangle)]
pub extern "C" fn items_build_delete_item(
    client: *const FfiItemsClient,
    id: i64,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match read_c_str(token) {
            Some(token) => FfiHttpRequest::from_core(client.inner.build_delete_item(id, &AuthToken::new(token))),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: read_c_str(resp.body).unwrap_or_default(),
    }
}

/// Shared body of every `items_parse_*` function.
fn parse_with<T>(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
    op: &str,
    parse: fn(&ItemsClient, HttpResponse) -> Result<T, ApiError>,
    wrap: fn(T) -> *mut FfiItemsResult,
) -> *mut FfiItemsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiItemsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiItemsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match parse(&client.inner, ffi_response_to_core(resp)) {
            Ok(value) => wrap(value),
            Err(e) => FfiItemsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiItemsResult::panic(&format!("panic in items_parse_{op}")))
}

/// Parse a login response. `data_tag = Token` on success.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_authenticate(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "authenticate",
        ItemsClient::parse_authenticate,
        FfiItemsResult::ok_token,
    )
}

/// Parse a registration response. `data_tag = Message` on success; the
/// message text may be null.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_register(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "register",
        ItemsClient::parse_register,
        FfiItemsResult::ok_message,
    )
}

/// Parse a list-items response. `data_tag = ItemList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_list_items(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "list_items",
        ItemsClient::parse_list_items,
        FfiItemsResult::ok_item_list,
    )
}

/// Parse a get-item response. `data_tag = Item` on success.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_get_item(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "get_item",
        ItemsClient::parse_get_item,
        FfiItemsResult::ok_item,
    )
}

/// Parse a create-item response. `data_tag = Item` on success.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_create_item(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "create_item",
        ItemsClient::parse_create_item,
        FfiItemsResult::ok_item,
    )
}

/// Parse an update-item response. `data_tag = Item` on success.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_update_item(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "update_item",
        ItemsClient::parse_update_item,
        FfiItemsResult::ok_item,
    )
}

/// Parse a delete-item response. `data_tag = Message` on success.
#[unsafe(no_mangle)]
pub extern "C" fn items_parse_delete_item(
    client: *const FfiItemsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiItemsResult {
    parse_with(
        client,
        response,
        "delete_item",
        ItemsClient::parse_delete_item,
        FfiItemsResult::ok_message,
    )
}

/// Wrap a failure of the host's own HTTP call (no response received) in the
/// same envelope the parse functions return, with `error_code = Transport`.
///
/// `message` may be null. The caller must free the result with
/// `items_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn items_transport_error(message: *const c_char) -> *mut FfiItemsResult {
    catch_unwind(|| {
        let err = ApiError::Transport(read_c_str(message).unwrap_or_default());
        FfiItemsResult::transport(err.message())
    })
    .unwrap_or_else(|_| FfiItemsResult::panic("panic in items_transport_error"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `items_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn items_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiItemsResult` returned by any `items_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn items_free_result(result: *mut FfiItemsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Item => {
                let item = unsafe { Box::from_raw(result.data as *mut FfiItem) };
                free_c_string(item.name);
            }
            FfiDataTag::ItemList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiItemList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize))
                    };
                    for item in items.iter() {
                        free_c_string(item.name);
                    }
                }
            }
            FfiDataTag::Token | FfiDataTag::Message => {
                let text = unsafe { Box::from_raw(result.data as *mut FfiText) };
                free_c_string(text.text);
            }
            FfiDataTag::None => {}
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn items_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
