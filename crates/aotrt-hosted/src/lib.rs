//! Hosted OS variant of the aotrt runtime.
//!
//! Stdio for text, the system clock for `now_ms`, one error stack per
//! thread. Linked into generated programs as a static library.

#![allow(clippy::missing_safety_doc)]

use std::cell::RefCell;

use aotrt_core::{ErrorStack, Runtime, StackCell, Variant, VariantCaps};
use once_cell::sync::OnceCell;

pub mod config;
// The C `main` would clash with the unit-test harness's own.
#[cfg(all(feature = "entry", not(test)))]
pub mod entry;
pub mod host;
pub mod logging;
#[cfg(feature = "unwind-personality")]
pub mod personality;

pub use config::{config, RuntimeConfig};
pub use host::StdHost;

thread_local! {
    static ERROR_STACK: RefCell<ErrorStack> = const { RefCell::new(ErrorStack::new()) };
}

/// Marker type binding [`StdHost`] to the per-thread error stack.
pub struct Hosted;

impl StackCell for Hosted {
    fn with_stack<R>(f: impl FnOnce(&mut ErrorStack) -> R) -> R {
        ERROR_STACK.with(|stack| f(&mut stack.borrow_mut()))
    }
}

impl Runtime for Hosted {
    type Host = StdHost;

    const VARIANT: Variant = Variant::Hosted;

    fn host() -> StdHost {
        StdHost
    }

    fn caps() -> VariantCaps {
        VariantCaps {
            unwind_personality: cfg!(feature = "unwind-personality"),
            ..Variant::Hosted.caps()
        }
    }

    fn guard<T>(fallback: T, body: impl FnOnce() -> T) -> T {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(body)).unwrap_or_else(|_| {
            tracing::error!("panic inside runtime call");
            fallback
        })
    }
}

aotrt_core::export_runtime_abi!(Hosted);

/// Reads configuration and installs logging. Safe to call more than once.
pub fn init() {
    static LOGGING: OnceCell<bool> = OnceCell::new();
    let cfg = config();
    LOGGING.get_or_init(|| {
        let installed = logging::init(&cfg.log_filter);
        tracing::debug!(
            variant = %Hosted::VARIANT,
            filter = %cfg.log_filter,
            flush = cfg.print_flush,
            installed,
            "runtime ready"
        );
        installed
    });
}

/// For embedders that drive generated code without the bundled `main`.
#[no_mangle]
pub extern "C" fn aotrt_hosted_init() {
    let _ = std::panic::catch_unwind(init);
}
