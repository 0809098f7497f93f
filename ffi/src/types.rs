//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use items_core::{ApiError, HttpMethod, Item, LoginResponse, MessageResponse};

/// Opaque handle to an `ItemsClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiItemsClient {
    pub(crate) inner: items_core::ItemsClient,
}

/// Move a Rust string onto the C heap.
///
/// Callers must reject interior NULs first (see `FfiItemsResult::nul_in`).
/// Request fields never contain one: they come from C strings or from
/// JSON encoding, which escapes NUL.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `items_build_*` functions. The host executes the request with its
/// own networking stack and passes the response back through `items_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: items_core::HttpRequest) -> *mut Self {
        let path = into_c_string(req.path);
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host fills this in after executing a request and passes a pointer to
/// an `items_parse_*` function. The FFI layer reads but never frees it.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiItemsResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Server = 1,
    /// The host's own HTTP call failed; see `items_transport_error`.
    Transport = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tag that tells `items_free_result` what `FfiItemsResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Item = 1,
    ItemList = 2,
    Token = 3,
    Message = 4,
}

/// A single item exposed to C.
#[repr(C)]
pub struct FfiItem {
    pub id: i64,
    pub name: *mut c_char,
}

/// A list of items exposed to C.
#[repr(C)]
pub struct FfiItemList {
    pub items: *mut FfiItem,
    pub len: u32,
}

/// A single, possibly null, string payload: the login token or a server
/// acknowledgement message.
#[repr(C)]
pub struct FfiText {
    pub text: *mut c_char,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is the
/// text to show the user, and `data` is null. For `Server` errors
/// `http_status` holds the response status.
#[repr(C)]
pub struct FfiItemsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

fn ffi_item(item: Item) -> FfiItem {
    FfiItem {
        id: item.id,
        name: into_c_string(item.name),
    }
}

impl FfiItemsResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiItemsResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiItemsResult {
            error_code,
            error_message: into_c_string(msg.replace('\0', "")),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// A decoded string that C cannot represent is a malformed response.
    fn nul_in<'a>(fields: impl IntoIterator<Item = &'a str>) -> Option<*mut Self> {
        fields.into_iter().any(|f| f.contains('\0')).then(|| {
            Self::err(
                FfiErrorCode::Deserialization,
                0,
                "response contains an interior NUL byte".to_string(),
            )
        })
    }

    pub(crate) fn ok_item(item: Item) -> *mut Self {
        if let Some(err) = Self::nul_in([item.name.as_str()]) {
            return err;
        }
        let data = Box::into_raw(Box::new(ffi_item(item)));
        Self::ok(FfiDataTag::Item, data as *mut c_void)
    }

    pub(crate) fn ok_item_list(items: Vec<Item>) -> *mut Self {
        if let Some(err) = Self::nul_in(items.iter().map(|i| i.name.as_str())) {
            return err;
        }
        let len = items.len() as u32;
        let items = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            let boxed: Box<[FfiItem]> = items.into_iter().map(ffi_item).collect();
            Box::into_raw(boxed) as *mut FfiItem
        };
        let data = Box::into_raw(Box::new(FfiItemList { items, len }));
        Self::ok(FfiDataTag::ItemList, data as *mut c_void)
    }

    pub(crate) fn ok_token(login: LoginResponse) -> *mut Self {
        if let Some(err) = Self::nul_in([login.token.as_str()]) {
            return err;
        }
        let text = into_c_string(login.token.as_str().to_string());
        let data = Box::into_raw(Box::new(FfiText { text }));
        Self::ok(FfiDataTag::Token, data as *mut c_void)
    }

    pub(crate) fn ok_message(resp: MessageResponse) -> *mut Self {
        if let Some(err) = Self::nul_in(resp.message.as_deref()) {
            return err;
        }
        let text = match resp.message {
            Some(m) => into_c_string(m),
            None => std::ptr::null_mut(),
        };
        let data = Box::into_raw(Box::new(FfiText { text }));
        Self::ok(FfiDataTag::Message, data as *mut c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Server { .. } => FfiErrorCode::Server,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
        };
        Self::err(code, err.status().unwrap_or(0), err.message())
    }

    pub(crate) fn transport(msg: String) -> *mut Self {
        Self::err(FfiErrorCode::Transport, 0, msg)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
