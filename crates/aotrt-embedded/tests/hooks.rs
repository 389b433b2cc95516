use std::ffi::{c_char, CStr};
use std::sync::{Mutex, MutexGuard};

use aotrt_core::{Variant, VariantCaps};
use aotrt_embedded::*;
use aotrt_embedded::hooks::{aotrt_embedded_install_hooks, aotrt_embedded_reset_hooks};

// Hooks and the error stack are process globals.
static SERIAL: Mutex<()> = Mutex::new(());

static STDOUT: Mutex<Vec<u8>> = Mutex::new(Vec::new());
static STDERR: Mutex<Vec<u8>> = Mutex::new(Vec::new());
static STDIN: Mutex<Vec<u8>> = Mutex::new(Vec::new());

unsafe extern "C" fn capture_stdout(bytes: *const u8, len: usize) {
    STDOUT
        .lock()
        .unwrap()
        .extend_from_slice(std::slice::from_raw_parts(bytes, len));
}

unsafe extern "C" fn capture_stderr(bytes: *const u8, len: usize) {
    STDERR
        .lock()
        .unwrap()
        .extend_from_slice(std::slice::from_raw_parts(bytes, len));
}

unsafe extern "C" fn next_byte() -> i32 {
    let mut input = STDIN.lock().unwrap();
    if input.is_empty() {
        -1
    } else {
        i32::from(input.remove(0))
    }
}

unsafe extern "C" fn fixed_clock() -> i64 {
    123_456
}

fn fresh() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    aotrt_embedded_reset_hooks();
    aotrt_embedded_reset_errors();
    STDOUT.lock().unwrap().clear();
    STDERR.lock().unwrap().clear();
    STDIN.lock().unwrap().clear();
    guard
}

fn all_hooks() -> Hooks {
    Hooks {
        write_stdout: Some(capture_stdout),
        write_stderr: Some(capture_stderr),
        read_byte: Some(next_byte),
        now_ms: Some(fixed_clock),
        abort: None,
    }
}

unsafe fn owned(ptr: *mut c_char) -> Vec<u8> {
    assert!(!ptr.is_null());
    let bytes = CStr::from_ptr(ptr).to_bytes().to_vec();
    aotrt_free_text(ptr);
    bytes
}

#[test]
fn without_hooks_io_is_inert() {
    let _g = fresh();
    unsafe {
        aotrt_print(c"nobody listens".as_ptr());
        aotrt_println(c"still nobody".as_ptr());
    }
    assert!(aotrt_read_line().is_null());
    assert_eq!(aotrt_time_now_ms(), 0);
    assert!(STDOUT.lock().unwrap().is_empty());
}

#[test]
fn writes_reach_installed_hooks() {
    let _g = fresh();
    let hooks = all_hooks();
    assert!(unsafe { aotrt_embedded_install_hooks(&hooks) });
    unsafe {
        aotrt_print(c"a".as_ptr());
        aotrt_println(c"b\xFF".as_ptr());
        aotrt_eprintln(std::ptr::null());
    }
    assert_eq!(&*STDOUT.lock().unwrap(), b"ab\xEF\xBF\xBD\n");
    assert_eq!(&*STDERR.lock().unwrap(), b"\n");
    assert_eq!(aotrt_time_now_ms(), 123_456);
}

#[test]
fn null_hook_table_is_rejected() {
    let _g = fresh();
    assert!(!unsafe { aotrt_embedded_install_hooks(std::ptr::null()) });
    assert!(hooks::current().write_stdout.is_none());
}

#[test]
fn read_line_uses_byte_hook() {
    let _g = fresh();
    hooks::install(all_hooks());
    STDIN.lock().unwrap().extend_from_slice(b"cmd\r\n\nend");
    unsafe {
        assert_eq!(owned(aotrt_read_line()), b"cmd");
        assert_eq!(owned(aotrt_read_line()), b"");
        assert_eq!(owned(aotrt_read_line()), b"end");
    }
    assert!(aotrt_read_line().is_null());
}

#[test]
fn formatters_are_complete_on_bare_metal() {
    let _g = fresh();
    unsafe {
        assert_eq!(owned(aotrt_format_int(-17)), b"-17");
        assert_eq!(owned(aotrt_format_float(0.25)), b"0.25");
        assert_eq!(owned(aotrt_format_bool(false)), b"false");
        assert_eq!(owned(aotrt_normalize_text(c"\xC3".as_ptr())), b"\xEF\xBF\xBD");
    }
}

#[test]
fn single_global_stack() {
    let _g = fresh();
    assert!(aotrt_error_push_context());
    unsafe { aotrt_error_raise(c"fault".as_ptr()) };
    let seen_elsewhere = std::thread::spawn(|| aotrt_error_has_error())
        .join()
        .expect("thread");
    assert!(seen_elsewhere);
    assert!(aotrt_error_pop_context());
    assert!(!aotrt_error_pop_context());
}

#[test]
fn uncaught_raise_reports_on_stderr_hook() {
    let _g = fresh();
    hooks::install(all_hooks());
    // No abort hook, so this panics; stay out of the extern "C" wrapper.
    let res = std::panic::catch_unwind(|| aotrt_core::abi::error_raise_slice::<Embedded>(b"late"));
    assert!(res.is_err());
    assert_eq!(&*STDERR.lock().unwrap(), b"Uncaught exception: late\n");
    // The lock was released before aborting.
    assert!(!aotrt_error_has_error());
}

#[test]
fn reports_embedded_variant() {
    assert_eq!(Variant::from_u32(aotrt_variant()), Some(Variant::Embedded));
    assert!(!Variant::Embedded.caps().thread_local_errors);
}

#[test]
fn caps_follow_installed_hooks() {
    let _g = fresh();
    assert_eq!(aotrt_variant_caps(), 0);
    hooks::install(all_hooks());
    let caps = VariantCaps::from_bits(aotrt_variant_caps());
    assert!(caps.can_write && caps.can_read && caps.has_clock);
    assert!(!caps.thread_local_errors);
    assert!(!caps.unwind_personality);
    hooks::install(Hooks {
        now_ms: Some(fixed_clock),
        ..Hooks::EMPTY
    });
    assert_eq!(aotrt_variant_caps(), VariantCaps::HAS_CLOCK);
}

const ABORT_CHILD_ENV: &str = "AOTRT_EMBEDDED_ABORT_CHILD";

unsafe extern "C" fn stderr_passthrough(bytes: *const u8, len: usize) {
    use std::io::Write as _;
    let _ = std::io::stderr().write_all(std::slice::from_raw_parts(bytes, len));
}

unsafe extern "C" fn exit_three() -> ! {
    std::process::exit(3)
}

#[test]
fn uncaught_raise_calls_abort_hook() {
    if std::env::var_os(ABORT_CHILD_ENV).is_some() {
        let _g = fresh();
        hooks::install(Hooks {
            write_stderr: Some(stderr_passthrough),
            abort: Some(exit_three),
            ..Hooks::EMPTY
        });
        unsafe { aotrt_error_raise(c"halt".as_ptr()) };
        unreachable!("abort hook returned");
    }

    let exe = std::env::current_exe().expect("current exe");
    let out = std::process::Command::new(exe)
        .args(["--exact", "uncaught_raise_calls_abort_hook", "--nocapture"])
        .env(ABORT_CHILD_ENV, "1")
        .output()
        .expect("spawn child");
    assert_eq!(out.status.code(), Some(3), "{out:?}");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Uncaught exception: halt\n"), "{stderr}");
}
