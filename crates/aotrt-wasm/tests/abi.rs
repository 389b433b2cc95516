use std::ffi::{c_char, CStr};

use aotrt_core::{Variant, VariantCaps};
use aotrt_wasm::*;

unsafe fn owned(ptr: *mut c_char) -> Vec<u8> {
    assert!(!ptr.is_null());
    let bytes = CStr::from_ptr(ptr).to_bytes().to_vec();
    aotrt_free_text(ptr);
    bytes
}

#[test]
fn reports_sandboxed_variant() {
    assert_eq!(Variant::from_u32(aotrt_variant()), Some(Variant::Sandboxed));
}

#[test]
fn float_precision_matches_other_variants() {
    unsafe {
        assert_eq!(owned(aotrt_format_float(1.0 / 3.0)), b"0.333333333");
        assert_eq!(owned(aotrt_format_float(2.5)), b"2.5");
        assert_eq!(owned(aotrt_format_float(1e300)), b"inf");
    }
}

#[test]
fn nested_frames_and_rethrow() {
    assert!(aotrt_error_push_context());
    assert!(aotrt_error_push_context());
    unsafe { aotrt_error_raise(c"deep".as_ptr()) };
    assert_eq!(aotrt_error_rethrow(), 1);
    assert!(aotrt_error_pop_context());
    unsafe { assert_eq!(owned(aotrt_error_get_message()), b"deep") };
    assert_eq!(aotrt_error_rethrow(), 2);
    assert!(aotrt_error_pop_context());
    assert!(!aotrt_error_has_error());
}

#[test]
fn clock_is_wall_time_on_native_builds() {
    assert!(aotrt_time_now_ms() > 1_577_836_800_000);
}

#[test]
fn worker_errors_stay_on_the_worker() {
    let worker = std::thread::spawn(|| {
        assert!(aotrt_error_push_context());
        unsafe { aotrt_error_raise(c"worker".as_ptr()) };
        let message = unsafe { owned(aotrt_error_get_message()) };
        // Left pushed on purpose: the frame dies with the thread.
        message
    })
    .join()
    .expect("thread");
    assert_eq!(worker, b"worker");

    assert!(!aotrt_error_has_error());
    assert!(!aotrt_error_pop_context());
    assert_eq!(
        VariantCaps::from_bits(aotrt_variant_caps()),
        Variant::Sandboxed.caps()
    );
}
