//! Integrator-supplied I/O.
//!
//! Bare-metal targets have no stdio. Firmware wires the runtime to a UART, a
//! JTAG adapter or whatever it has by installing a [`Hooks`] table; every hook
//! is optional and a missing one degrades to a no-op.

use aotrt_core::Host;
use spin::RwLock;

pub type WriteFn = unsafe extern "C" fn(bytes: *const u8, len: usize);
/// Returns the next byte (0..=255), or a negative value when none is available.
pub type ReadByteFn = unsafe extern "C" fn() -> i32;
pub type NowMsFn = unsafe extern "C" fn() -> i64;
pub type AbortFn = unsafe extern "C" fn() -> !;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct Hooks {
    pub write_stdout: Option<WriteFn>,
    pub write_stderr: Option<WriteFn>,
    pub read_byte: Option<ReadByteFn>,
    pub now_ms: Option<NowMsFn>,
    pub abort: Option<AbortFn>,
}

impl Hooks {
    pub const EMPTY: Hooks = Hooks {
        write_stdout: None,
        write_stderr: None,
        read_byte: None,
        now_ms: None,
        abort: None,
    };
}

impl Default for Hooks {
    fn default() -> Self {
        Hooks::EMPTY
    }
}

static HOOKS: RwLock<Hooks> = RwLock::new(Hooks::EMPTY);

pub fn install(hooks: Hooks) {
    *HOOKS.write() = hooks;
    tracing::debug!(
        write_stdout = hooks.write_stdout.is_some(),
        write_stderr = hooks.write_stderr.is_some(),
        read_byte = hooks.read_byte.is_some(),
        now_ms = hooks.now_ms.is_some(),
        abort = hooks.abort.is_some(),
        "installed embedded hooks"
    );
}

pub fn reset() {
    *HOOKS.write() = Hooks::EMPTY;
}

pub fn current() -> Hooks {
    *HOOKS.read()
}

/// Copies `*hooks` into the runtime. `false` for a null table.
#[no_mangle]
pub unsafe extern "C" fn aotrt_embedded_install_hooks(hooks: *const Hooks) -> bool {
    if hooks.is_null() {
        return false;
    }
    install(*hooks);
    true
}

#[no_mangle]
pub extern "C" fn aotrt_embedded_reset_hooks() {
    reset();
}

/// [`Host`] over the installed hook table. Each call copies the hook out
/// before invoking it, so a hook may itself reinstall hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookHost;

fn write_with(hook: Option<WriteFn>, bytes: &[u8]) {
    if let Some(write) = hook {
        if !bytes.is_empty() {
            unsafe { write(bytes.as_ptr(), bytes.len()) }
        }
    }
}

impl Host for HookHost {
    fn write_stdout(&self, bytes: &[u8]) {
        write_with(current().write_stdout, bytes);
    }

    fn write_stderr(&self, bytes: &[u8]) {
        write_with(current().write_stderr, bytes);
    }

    fn read_byte(&self) -> Option<u8> {
        let read = current().read_byte?;
        u8::try_from(unsafe { read() }).ok()
    }

    fn now_ms(&self) -> i64 {
        match current().now_ms {
            Some(now) => unsafe { now() },
            None => 0,
        }
    }

    /// Without an abort hook the integrator's panic handler takes over.
    fn abort(&self) -> ! {
        match current().abort {
            Some(abort) => unsafe { abort() },
            None => panic!("aotrt: abort"),
        }
    }
}
