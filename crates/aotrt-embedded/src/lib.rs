//! Bare-metal variant of the aotrt runtime.
//!
//! `no_std` + `alloc`. There is a single execution context, so the error
//! stack is one global behind a spin lock, and all I/O goes through the
//! integrator's [`Hooks`].

#![cfg_attr(not(test), no_std)]
#![allow(clippy::missing_safety_doc)]

use aotrt_core::{ErrorStack, Runtime, StackCell, Variant, VariantCaps};
use spin::Mutex;

pub mod hooks;

pub use hooks::{HookHost, Hooks};

static ERROR_STACK: Mutex<ErrorStack> = Mutex::new(ErrorStack::new());

/// Marker type binding [`HookHost`] to the global error stack.
pub struct Embedded;

impl StackCell for Embedded {
    fn with_stack<R>(f: impl FnOnce(&mut ErrorStack) -> R) -> R {
        f(&mut ERROR_STACK.lock())
    }
}

impl Runtime for Embedded {
    type Host = HookHost;

    const VARIANT: Variant = Variant::Embedded;

    fn host() -> HookHost {
        HookHost
    }

    /// I/O exists only where the integrator installed a hook.
    fn caps() -> VariantCaps {
        let hooks = hooks::current();
        VariantCaps {
            can_write: hooks.write_stdout.is_some(),
            can_read: hooks.read_byte.is_some(),
            has_clock: hooks.now_ms.is_some(),
            ..Variant::Embedded.caps()
        }
    }
}

aotrt_core::export_runtime_abi!(Embedded);

/// Drops every error frame, e.g. before restarting the program after a
/// watchdog reset.
#[no_mangle]
pub extern "C" fn aotrt_embedded_reset_errors() {
    Embedded::with_stack(|stack| stack.unwind_to(0));
}
