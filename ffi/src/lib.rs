//! C-ABI wrapper around `httpget-core`.
//!
//! # Overview
//! Exposes the blocking exchange to any language with a C FFI. The return
//! value of `httpget_send` is the integer code from the core error surface
//! (`0` success, `-1` through `-15` failures), so C callers can switch on it
//! directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests are caller-owned C structs; responses and buffers are
//!   heap-allocated here and released with the matching `httpget_free_*`.
//! - Method and connection arrive as raw integers and unknown values fall
//!   back to GET / Close.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use httpget_core::{encode_request, HttpClient};

use types::*;

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// A request with every field at its default: GET, Close, no host, port 80.
#[unsafe(no_mangle)]
pub extern "C" fn httpget_request_default() -> FfiRequest {
    FfiRequest {
        method: FfiMethod::Get as i32,
        connection: FfiConnection::Close as i32,
        url: std::ptr::null(),
        host: std::ptr::null(),
        user_agent: std::ptr::null(),
        content_type: std::ptr::null(),
        content: std::ptr::null(),
        content_len: 0,
        port: 0,
    }
}

/// Serialize `request` into the exact bytes `httpget_send` would write.
///
/// Returns null if `request` is null or its host is empty.
/// The caller must free the returned pointer with `httpget_free_buffer`.
#[unsafe(no_mangle)]
pub extern "C" fn httpget_build_request(request: *const FfiRequest) -> *mut FfiBuffer {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let req = unsafe { (*request).to_core() };
        if req.host.is_empty() {
            return std::ptr::null_mut();
        }
        FfiBuffer::from_vec(encode_request(&req))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Perform one blocking request/response exchange.
///
/// On `Ok`, `*response` receives a response the caller must free with
/// `httpget_free_response`. On any other code `*response` is set to null.
#[unsafe(no_mangle)]
pub extern "C" fn httpget_send(
    request: *const FfiRequest,
    response: *mut *mut FfiResponse,
) -> FfiErrorCode {
    if response.is_null() {
        return FfiErrorCode::NullArg;
    }
    unsafe { *response = std::ptr::null_mut() };
    if request.is_null() {
        return FfiErrorCode::NullArg;
    }

    catch_unwind(|| {
        let req = unsafe { &*request };
        let client = HttpClient::new(req.config());
        match client.send(&unsafe { req.to_core() }) {
            Ok(resp) => {
                unsafe { *response = FfiResponse::from_core(resp) };
                FfiErrorCode::Ok
            }
            Err(e) => FfiErrorCode::from(&e),
        }
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Static description of a return code. Never free the returned pointer.
#[unsafe(no_mangle)]
pub extern "C" fn httpget_error_message(code: i32) -> *const c_char {
    message(code).as_ptr()
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResponse` returned through `httpget_send`. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn httpget_free_response(response: *mut FfiResponse) {
    if response.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let response = unsafe { Box::from_raw(response) };
        if !response.protocol.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(response.protocol) });
        }
        unsafe { free_raw_bytes(response.content_type, response.content_type_len) };
        unsafe { free_raw_bytes(response.content, response.content_length) };
    });
}

/// Free an `FfiBuffer` returned by `httpget_build_request`. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn httpget_free_buffer(buffer: *mut FfiBuffer) {
    if buffer.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let buffer = unsafe { Box::from_raw(buffer) };
        unsafe { free_raw_bytes(buffer.data, buffer.len) };
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
