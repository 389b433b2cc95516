//! Process entry point for generated programs.

use std::ffi::{c_char, c_int};

extern "C" {
    /// Emitted by the compiler for the program's top-level code.
    fn aotrt_entry();
}

/// Performs no argument processing: initializes the runtime and hands over.
#[no_mangle]
pub extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    crate::init();
    unsafe { aotrt_entry() };
    let _ = std::io::Write::flush(&mut std::io::stdout());
    0
}
