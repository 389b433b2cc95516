// With `entry` on, the library defines the C `main` and only the
// harness-less entry test can link against it.
#![cfg(not(feature = "entry"))]

use std::ffi::{c_char, CStr};

use aotrt_core::{Variant, VariantCaps};
use aotrt_hosted::*;

unsafe fn owned(ptr: *mut c_char) -> Vec<u8> {
    assert!(!ptr.is_null());
    let bytes = CStr::from_ptr(ptr).to_bytes().to_vec();
    aotrt_free_text(ptr);
    bytes
}

#[test]
fn reports_hosted_variant() {
    assert_eq!(Variant::from_u32(aotrt_variant()), Some(Variant::Hosted));
}

#[test]
fn init_is_idempotent() {
    aotrt_hosted_init();
    aotrt_hosted_init();
    assert!(!config().log_filter.is_empty());
}

#[test]
fn formatters() {
    unsafe {
        assert_eq!(owned(aotrt_format_int(0)), b"0");
        assert_eq!(owned(aotrt_format_int(-42)), b"-42");
        assert_eq!(owned(aotrt_format_float(3.0)), b"3");
        assert_eq!(owned(aotrt_format_float(-0.0001)), b"-0.0001");
        assert_eq!(owned(aotrt_format_float(f64::NEG_INFINITY)), b"-inf");
        assert_eq!(owned(aotrt_format_bool(true)), b"true");
    }
}

#[test]
fn text_helpers() {
    unsafe {
        assert_eq!(owned(aotrt_str_concat(c"foo".as_ptr(), c"bar".as_ptr())), b"foobar");
        assert!(aotrt_str_concat(c"foo".as_ptr(), std::ptr::null()).is_null());
        assert_eq!(owned(aotrt_normalize_text(c"ab\xFFcd".as_ptr())), b"ab\xEF\xBF\xBDcd");
        assert!(aotrt_normalize_text(std::ptr::null()).is_null());
        assert!(!aotrt_validate_utf8(c"\xE2\x82".as_ptr()));
        assert!(!aotrt_is_valid_utf8(b"\x80abc".as_ptr(), 4));
        assert_eq!(aotrt_text_len(c"h\xC3\xA9".as_ptr()), 3);
        aotrt_free_text(std::ptr::null_mut());
    }
}

#[test]
fn print_with_null_is_harmless() {
    unsafe {
        aotrt_print(std::ptr::null());
        aotrt_print(c"".as_ptr());
    }
}

#[test]
fn clock_is_wall_time() {
    let a = aotrt_time_now_ms();
    let b = aotrt_time_now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn error_sequence() {
    assert!(aotrt_error_push_context());
    unsafe { aotrt_error_raise(c"boom".as_ptr()) };
    assert!(aotrt_error_has_error());
    unsafe { assert_eq!(owned(aotrt_error_get_message()), b"boom") };
    assert!(aotrt_error_clear());
    assert!(!aotrt_error_has_error());
    assert!(aotrt_error_pop_context());
    assert!(!aotrt_error_pop_context());
}

#[test]
fn rethrow_reaches_outer_frame() {
    assert!(aotrt_error_push_context());
    assert!(aotrt_error_push_context());
    unsafe { aotrt_error_raise_bytes(b"x".as_ptr(), 1) };
    assert_eq!(aotrt_error_rethrow(), 1);
    assert!(aotrt_error_pop_context());
    assert!(aotrt_error_has_error());
    unsafe { assert_eq!(owned(aotrt_error_get_message()), b"x") };
    assert!(aotrt_error_pop_context());
}

#[test]
fn threads_do_not_share_frames() {
    assert!(aotrt_error_push_context());
    unsafe { aotrt_error_raise(c"main".as_ptr()) };

    let other = std::thread::spawn(|| {
        let saw_error = aotrt_error_has_error();
        let popped = aotrt_error_pop_context();
        assert!(aotrt_error_push_context());
        let clean = !aotrt_error_has_error();
        assert!(aotrt_error_pop_context());
        (saw_error, popped, clean)
    })
    .join()
    .expect("thread");
    assert_eq!(other, (false, false, true));

    assert!(aotrt_error_has_error());
    assert!(aotrt_error_pop_context());
}

#[cfg(feature = "unwind-personality")]
#[test]
fn personality_reports_handled() {
    let rc = aotrt_hosted::personality::aotrt_personality(
        1,
        1,
        0,
        std::ptr::null_mut(),
        std::ptr::null_mut(),
    );
    assert_eq!(rc, 0);
}

#[test]
fn caps_reflect_build_features() {
    let caps = VariantCaps::from_bits(aotrt_variant_caps());
    assert!(caps.can_write && caps.can_read && caps.has_clock);
    assert!(caps.thread_local_errors);
    assert_eq!(caps.unwind_personality, cfg!(feature = "unwind-personality"));
}
