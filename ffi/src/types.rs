//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations: raw
//! pointers instead of `String`/`Vec`, and integer fields for the method and
//! connection so that out-of-range values coming from C stay representable
//! and can be coerced instead of being undefined behaviour. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use httpget_core::{ClientConfig, Connection, ExchangeError, Method, Protocol, Request, Response};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Values for `FfiRequest::method`. Anything else is sent as GET.
#[repr(C)]
pub enum FfiMethod {
    Get = 0,
    Post = 1,
}

/// Values for `FfiRequest::connection`. Anything else is sent as Close.
#[repr(C)]
pub enum FfiConnection {
    Close = 0,
    KeepAlive = 1,
}

pub(crate) fn coerce_method(raw: i32) -> Method {
    match raw {
        x if x == FfiMethod::Post as i32 => Method::Post,
        _ => Method::Get,
    }
}

pub(crate) fn coerce_connection(raw: i32) -> Connection {
    match raw {
        x if x == FfiConnection::KeepAlive as i32 => Connection::KeepAlive,
        _ => Connection::Close,
    }
}

/// A request described as C-compatible plain data.
///
/// The C caller owns every pointer in here. A zeroed value is a valid
/// default request apart from the missing host.
#[repr(C)]
pub struct FfiRequest {
    /// One of `FfiMethod`.
    pub method: i32,
    /// One of `FfiConnection`.
    pub connection: i32,
    /// Null or empty means `/`.
    pub url: *const c_char,
    pub host: *const c_char,
    /// Null or empty omits the header.
    pub user_agent: *const c_char,
    /// Null means `application/x-www-form-urlencoded`.
    pub content_type: *const c_char,
    pub content: *const u8,
    pub content_len: usize,
    /// Zero means 80.
    pub port: u16,
}

/// Copy a nullable C string. Invalid UTF-8 is replaced, not rejected.
unsafe fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

impl FfiRequest {
    /// Build the core request. Every non-null pointer must be valid.
    pub(crate) unsafe fn to_core(&self) -> Request {
        let defaults = Request::default();
        let content = if self.content.is_null() || self.content_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(self.content, self.content_len) }.to_vec()
        };
        unsafe {
            Request {
                method: coerce_method(self.method),
                connection: coerce_connection(self.connection),
                url: read_c_str(self.url).unwrap_or_default(),
                host: read_c_str(self.host).unwrap_or_default(),
                user_agent: read_c_str(self.user_agent),
                content_type: read_c_str(self.content_type).unwrap_or(defaults.content_type),
                content,
            }
        }
    }

    pub(crate) fn config(&self) -> ClientConfig {
        let config = ClientConfig::default();
        match self.port {
            0 => config,
            port => config.with_port(port),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A received response exposed to C. Freed with `httpget_free_response`.
///
/// `content` points to exactly `content_length` bytes and `content_type` to
/// exactly `content_type_len` bytes. Neither is NUL-terminated, and each is
/// null when empty.
#[repr(C)]
pub struct FfiResponse {
    pub protocol: *mut c_char,
    pub status: u32,
    pub content_type: *mut u8,
    pub content_type_len: usize,
    pub content_length: usize,
    pub content: *mut u8,
}

impl FfiResponse {
    pub(crate) fn from_core(response: Response) -> *mut Self {
        let content_type_len = response.content_type.len();
        let ffi = Box::new(FfiResponse {
            protocol: into_raw_c_string(response.protocol.as_str()),
            status: response.status,
            content_type: into_raw_bytes(response.content_type),
            content_type_len,
            content_length: response.content_length,
            content: into_raw_bytes(response.content),
        });
        Box::into_raw(ffi)
    }
}

/// Serialized request bytes exposed to C. Freed with `httpget_free_buffer`.
#[repr(C)]
pub struct FfiBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl FfiBuffer {
    pub(crate) fn from_vec(bytes: Vec<u8>) -> *mut Self {
        let len = bytes.len();
        Box::into_raw(Box::new(FfiBuffer {
            data: into_raw_bytes(bytes),
            len,
        }))
    }
}

fn into_raw_c_string(s: &str) -> *mut c_char {
    // interior NULs cannot cross the boundary; cut the value there
    let end = s.find('\0').unwrap_or(s.len());
    CString::new(&s[..end]).unwrap_or_default().into_raw()
}

fn into_raw_bytes(bytes: Vec<u8>) -> *mut u8 {
    if bytes.is_empty() {
        return std::ptr::null_mut();
    }
    Box::into_raw(bytes.into_boxed_slice()) as *mut u8
}

/// Release bytes from `into_raw_bytes`.
pub(crate) unsafe fn free_raw_bytes(data: *mut u8, len: usize) {
    if !data.is_null() && len > 0 {
        drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(data, len)) });
    }
}

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Return codes of the C API. `Ok` through `MissingContentType` match
/// `ExchangeError::code` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    EmptyHost = -1,
    Resolve = -2,
    Connect = -3,
    Send = -4,
    SendClosed = -5,
    RecvLength = -6,
    ContentLength = -7,
    HeaderSeparator = -8,
    RecvSeparator = -9,
    RecvBody = -10,
    BodyClosed = -11,
    StatusHttp11 = -12,
    StatusHttp10 = -13,
    UnsupportedProtocol = -14,
    MissingContentType = -15,
    NullArg = -100,
    Panic = -101,
}

impl From<&ExchangeError> for FfiErrorCode {
    fn from(err: &ExchangeError) -> Self {
        match err {
            ExchangeError::EmptyHost => FfiErrorCode::EmptyHost,
            ExchangeError::Resolve(_) => FfiErrorCode::Resolve,
            ExchangeError::Connect(_) => FfiErrorCode::Connect,
            ExchangeError::Send(_) => FfiErrorCode::Send,
            ExchangeError::SendClosed => FfiErrorCode::SendClosed,
            ExchangeError::RecvLength(_) => FfiErrorCode::RecvLength,
            ExchangeError::ContentLength => FfiErrorCode::ContentLength,
            ExchangeError::HeaderSeparator => FfiErrorCode::HeaderSeparator,
            ExchangeError::RecvSeparator(_) => FfiErrorCode::RecvSeparator,
            ExchangeError::RecvBody(_) => FfiErrorCode::RecvBody,
            ExchangeError::BodyClosed => FfiErrorCode::BodyClosed,
            ExchangeError::Status(Protocol::Http11) => FfiErrorCode::StatusHttp11,
            ExchangeError::Status(Protocol::Http10) => FfiErrorCode::StatusHttp10,
            ExchangeError::UnsupportedProtocol => FfiErrorCode::UnsupportedProtocol,
            ExchangeError::MissingContentType => FfiErrorCode::MissingContentType,
        }
    }
}

/// Static, NUL-terminated description of a return code.
pub(crate) fn message(code: i32) -> &'static CStr {
    match code {
        0 => c"success",
        -1 => c"host is empty",
        -2 => c"DNS resolution failed",
        -3 => c"socket connect failed",
        -4 => c"error while sending request",
        -5 => c"connection closed while sending request",
        -6 => c"error while receiving response headers",
        -7 => c"Content-Length missing or malformed",
        -8 => c"connection closed before the end of the response headers",
        -9 => c"error while receiving response header separator",
        -10 => c"error while receiving response body",
        -11 => c"connection closed before the response body was complete",
        -12 => c"failed to parse HTTP/1.1 status code",
        -13 => c"failed to parse HTTP/1.0 status code",
        -14 => c"unsupported protocol version in response",
        -15 => c"Content-Type header missing",
        -100 => c"null argument",
        -101 => c"internal panic",
        _ => c"unknown error code",
    }
}
