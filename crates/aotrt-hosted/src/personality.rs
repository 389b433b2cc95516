//! Unwinder compatibility hook.
//!
//! Code generators that emit landing pads need a personality routine to name.
//! Errors never unwind in this runtime, so the routine reports every phase as
//! handled and the unwinder never consults tables.

use std::ffi::{c_int, c_void};

/// `_URC_NO_REASON`.
pub const URC_NO_REASON: c_int = 0;

#[no_mangle]
pub extern "C" fn aotrt_personality(
    _version: c_int,
    _actions: c_int,
    _exception_class: u64,
    _exception_object: *mut c_void,
    _context: *mut c_void,
) -> c_int {
    URC_NO_REASON
}
