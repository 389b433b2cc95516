//! Sandboxed-module variant of the aotrt runtime.
//!
//! Built as a `cdylib` for WebAssembly. On `wasm32-unknown-unknown` all I/O
//! is imported from the embedder's `env` module:
//!
//! | import | signature |
//! |---|---|
//! | `env.aotrt_host_write_stdout` | `(ptr: i32, len: i32)` |
//! | `env.aotrt_host_write_stderr` | `(ptr: i32, len: i32)` |
//! | `env.aotrt_host_read_stdin` | `(ptr: i32, len: i32) -> i32` |
//! | `env.aotrt_host_now_ms` | `() -> i64` |
//!
//! WASI targets use the WASI streams and clock through std instead.

#![allow(clippy::missing_safety_doc)]

use std::cell::RefCell;

use aotrt_core::{ErrorStack, Runtime, StackCell, Variant};

pub mod host;
pub mod imports;

pub use host::ModuleHost;
pub use imports::{DefaultImports, Imports, Stream};

thread_local! {
    static ERROR_STACK: RefCell<ErrorStack> = const { RefCell::new(ErrorStack::new()) };
}

/// Marker type binding [`ModuleHost`] to the per-thread error stack.
pub struct Sandboxed;

impl StackCell for Sandboxed {
    fn with_stack<R>(f: impl FnOnce(&mut ErrorStack) -> R) -> R {
        ERROR_STACK.with(|stack| f(&mut stack.borrow_mut()))
    }
}

impl Runtime for Sandboxed {
    type Host = ModuleHost<DefaultImports>;

    const VARIANT: Variant = Variant::Sandboxed;

    fn host() -> Self::Host {
        ModuleHost::new(DefaultImports::default())
    }

    fn guard<T>(fallback: T, body: impl FnOnce() -> T) -> T {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(body)).unwrap_or_else(|_| {
            tracing::error!("panic inside runtime call");
            fallback
        })
    }
}

aotrt_core::export_runtime_abi!(Sandboxed);
