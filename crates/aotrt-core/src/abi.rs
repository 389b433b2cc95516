//! C ABI glue shared by every variant.
//!
//! The functions here hold the actual bodies of the `aotrt_*` exports,
//! generic over a [`Runtime`]. A variant crate implements `Runtime` for a
//! marker type and calls [`export_runtime_abi!`](crate::export_runtime_abi)
//! once; the macro emits thin `#[no_mangle]` wrappers around these bodies so
//! every variant exports the same symbol set.

use core::ffi::{c_char, CStr};
use core::ptr;

use crate::error_stack::Rethrow;
use crate::{fmt, io, utf8, Host, RtError, StackCell, Text, Variant, VariantCaps};

/// A complete variant: where its I/O goes and where its error frames live.
pub trait Runtime: StackCell {
    type Host: Host;

    const VARIANT: Variant;

    fn host() -> Self::Host;

    /// What this build can do right now.
    fn caps() -> VariantCaps {
        Self::VARIANT.caps()
    }

    /// Runs one export body. Variants with `std` catch panics here and
    /// return `fallback` instead of unwinding into foreign frames.
    fn guard<T>(fallback: T, body: impl FnOnce() -> T) -> T {
        let _ = fallback;
        body()
    }
}

pub const RETHROW_NOT_ERRORED: i32 = 0;
pub const RETHROW_PROPAGATED: i32 = 1;
pub const RETHROW_UNHANDLED: i32 = 2;

/// Bytes of a NUL-terminated string, without the terminator.
pub unsafe fn cstr_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_bytes())
}

/// `len` bytes at `ptr`. A null pointer is only accepted with `len == 0`.
pub unsafe fn raw_bytes<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return if len == 0 { Some(&[]) } else { None };
    }
    Some(core::slice::from_raw_parts(ptr, len))
}

/// Transfers ownership of a result to the caller; errors become null.
pub fn text_ptr(result: Result<Text, RtError>) -> *mut c_char {
    match result {
        Ok(text) => text.into_raw(),
        Err(RtError::NullInput) => ptr::null_mut(),
        Err(err) => {
            tracing::warn!(error = %err, "returning null text");
            ptr::null_mut()
        }
    }
}

pub unsafe fn print<R: Runtime>(message: *const c_char) {
    if let Some(message) = cstr_bytes(message) {
        io::print(&R::host(), message);
    }
}

pub unsafe fn println<R: Runtime>(message: *const c_char) {
    io::println(&R::host(), cstr_bytes(message));
}

pub unsafe fn eprintln<R: Runtime>(message: *const c_char) {
    io::eprintln(&R::host(), cstr_bytes(message));
}

pub fn read_line<R: Runtime>() -> *mut c_char {
    match io::read_line(&R::host()) {
        Some(line) => line.into_raw(),
        None => ptr::null_mut(),
    }
}

pub fn time_now_ms<R: Runtime>() -> i64 {
    io::now_ms(&R::host())
}

pub fn format_int(value: i64) -> *mut c_char {
    text_ptr(fmt::format_int(value))
}

pub fn format_float(value: f64) -> *mut c_char {
    text_ptr(fmt::format_float(value))
}

pub fn format_bool(value: bool) -> *mut c_char {
    text_ptr(fmt::format_bool(value))
}

pub unsafe fn str_concat(a: *const c_char, b: *const c_char) -> *mut c_char {
    let inputs = cstr_bytes(a).zip(cstr_bytes(b)).ok_or(RtError::NullInput);
    text_ptr(inputs.and_then(|(a, b)| fmt::concat(a, b)))
}

pub unsafe fn text_len(text: *const c_char) -> i64 {
    cstr_bytes(text).map_or(0, |b| i64::try_from(b.len()).unwrap_or(i64::MAX))
}

pub unsafe fn validate_utf8(text: *const c_char) -> bool {
    cstr_bytes(text).is_some_and(utf8::validate_strict)
}

pub unsafe fn is_valid_utf8(bytes: *const u8, len: usize) -> bool {
    raw_bytes(bytes, len).is_some_and(utf8::is_valid)
}

pub unsafe fn normalize_text(text: *const c_char) -> *mut c_char {
    let input = cstr_bytes(text).ok_or(RtError::NullInput);
    text_ptr(input.and_then(utf8::normalize))
}

pub unsafe fn free_text(text: *mut c_char) {
    if !text.is_null() {
        drop(Text::from_raw(text));
    }
}

pub fn error_push_context<R: Runtime>() -> bool {
    R::with_stack(|stack| stack.push_context()).is_ok()
}

pub fn error_pop_context<R: Runtime>() -> bool {
    R::with_stack(|stack| stack.pop_context())
}

/// Raising with no frame reports and aborts outside the stack borrow, so a
/// host abort that unwinds cannot leave the cell locked.
pub fn error_raise_slice<R: Runtime>(message: &[u8]) {
    if let Err(uncaught) = R::with_stack(|stack| stack.raise(message)) {
        io::abort_uncaught(&R::host(), &uncaught);
    }
}

pub unsafe fn error_raise<R: Runtime>(message: *const c_char) {
    error_raise_slice::<R>(cstr_bytes(message).unwrap_or_default());
}

pub unsafe fn error_raise_bytes<R: Runtime>(message: *const u8, len: usize) {
    error_raise_slice::<R>(raw_bytes(message, len).unwrap_or_default());
}

pub fn error_clear<R: Runtime>() -> bool {
    R::with_stack(|stack| stack.clear())
}

pub fn error_has_error<R: Runtime>() -> bool {
    R::with_stack(|stack| stack.has_error())
}

pub fn error_get_message<R: Runtime>() -> *mut c_char {
    text_ptr(R::with_stack(|stack| stack.message()))
}

pub fn error_rethrow<R: Runtime>() -> i32 {
    match R::with_stack(|stack| stack.rethrow()) {
        Rethrow::NotErrored => RETHROW_NOT_ERRORED,
        Rethrow::Propagated => RETHROW_PROPAGATED,
        Rethrow::Unhandled => RETHROW_UNHANDLED,
    }
}

pub fn variant<R: Runtime>() -> u32 {
    R::VARIANT.as_u32()
}

pub fn variant_caps<R: Runtime>() -> u32 {
    R::caps().to_bits()
}

/// Emits the `aotrt_*` C symbols for a [`Runtime`] implementation.
#[macro_export]
macro_rules! export_runtime_abi {
    ($rt:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn aotrt_print(message: *const ::core::ffi::c_char) {
            <$rt as $crate::abi::Runtime>::guard((), || $crate::abi::print::<$rt>(message))
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_println(message: *const ::core::ffi::c_char) {
            <$rt as $crate::abi::Runtime>::guard((), || $crate::abi::println::<$rt>(message))
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_eprintln(message: *const ::core::ffi::c_char) {
            <$rt as $crate::abi::Runtime>::guard((), || $crate::abi::eprintln::<$rt>(message))
        }

        #[no_mangle]
        pub extern "C" fn aotrt_read_line() -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::read_line::<$rt>()
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_time_now_ms() -> i64 {
            <$rt as $crate::abi::Runtime>::guard(0, || $crate::abi::time_now_ms::<$rt>())
        }

        #[no_mangle]
        pub extern "C" fn aotrt_format_int(value: i64) -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::format_int(value)
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_format_float(value: f64) -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::format_float(value)
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_format_bool(value: bool) -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::format_bool(value)
            })
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_str_concat(
            a: *const ::core::ffi::c_char,
            b: *const ::core::ffi::c_char,
        ) -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::str_concat(a, b)
            })
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_text_len(text: *const ::core::ffi::c_char) -> i64 {
            <$rt as $crate::abi::Runtime>::guard(0, || $crate::abi::text_len(text))
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_validate_utf8(text: *const ::core::ffi::c_char) -> bool {
            <$rt as $crate::abi::Runtime>::guard(false, || $crate::abi::validate_utf8(text))
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_is_valid_utf8(bytes: *const u8, len: usize) -> bool {
            <$rt as $crate::abi::Runtime>::guard(false, || $crate::abi::is_valid_utf8(bytes, len))
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_normalize_text(
            text: *const ::core::ffi::c_char,
        ) -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::normalize_text(text)
            })
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_free_text(text: *mut ::core::ffi::c_char) {
            <$rt as $crate::abi::Runtime>::guard((), || $crate::abi::free_text(text))
        }

        #[no_mangle]
        pub extern "C" fn aotrt_error_push_context() -> bool {
            <$rt as $crate::abi::Runtime>::guard(false, || {
                $crate::abi::error_push_context::<$rt>()
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_error_pop_context() -> bool {
            <$rt as $crate::abi::Runtime>::guard(false, || {
                $crate::abi::error_pop_context::<$rt>()
            })
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_error_raise(message: *const ::core::ffi::c_char) {
            <$rt as $crate::abi::Runtime>::guard((), || $crate::abi::error_raise::<$rt>(message))
        }

        #[no_mangle]
        pub unsafe extern "C" fn aotrt_error_raise_bytes(message: *const u8, len: usize) {
            <$rt as $crate::abi::Runtime>::guard((), || {
                $crate::abi::error_raise_bytes::<$rt>(message, len)
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_error_clear() -> bool {
            <$rt as $crate::abi::Runtime>::guard(false, || $crate::abi::error_clear::<$rt>())
        }

        #[no_mangle]
        pub extern "C" fn aotrt_error_has_error() -> bool {
            <$rt as $crate::abi::Runtime>::guard(false, || $crate::abi::error_has_error::<$rt>())
        }

        #[no_mangle]
        pub extern "C" fn aotrt_error_get_message() -> *mut ::core::ffi::c_char {
            <$rt as $crate::abi::Runtime>::guard(::core::ptr::null_mut(), || {
                $crate::abi::error_get_message::<$rt>()
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_error_rethrow() -> i32 {
            <$rt as $crate::abi::Runtime>::guard($crate::abi::RETHROW_NOT_ERRORED, || {
                $crate::abi::error_rethrow::<$rt>()
            })
        }

        #[no_mangle]
        pub extern "C" fn aotrt_variant() -> u32 {
            $crate::abi::variant::<$rt>()
        }

        #[no_mangle]
        pub extern "C" fn aotrt_variant_caps() -> u32 {
            <$rt as $crate::abi::Runtime>::guard(0, || $crate::abi::variant_caps::<$rt>())
        }
    };
}
