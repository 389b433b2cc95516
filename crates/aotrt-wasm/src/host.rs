use aotrt_core::Host;

use crate::imports::{Imports, Stream};

/// Largest slice handed to one import call; lengths cross as `u32`.
const MAX_WRITE: usize = u32::MAX as usize;

/// [`Host`] for a sandboxed module over some set of [`Imports`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleHost<I> {
    imports: I,
}

impl<I: Imports> ModuleHost<I> {
    pub const fn new(imports: I) -> Self {
        ModuleHost { imports }
    }

    pub fn imports(&self) -> &I {
        &self.imports
    }

    fn write(&self, stream: Stream, bytes: &[u8]) {
        for chunk in bytes.chunks(MAX_WRITE) {
            self.imports.write(stream, chunk);
        }
    }
}

impl<I: Imports> Host for ModuleHost<I> {
    fn write_stdout(&self, bytes: &[u8]) {
        self.write(Stream::Stdout, bytes);
    }

    fn write_stderr(&self, bytes: &[u8]) {
        self.write(Stream::Stderr, bytes);
    }

    fn read_byte(&self) -> Option<u8> {
        let mut b = [0u8; 1];
        match self.imports.read(&mut b)? {
            0 => None,
            _ => Some(b[0]),
        }
    }

    fn now_ms(&self) -> i64 {
        self.imports.now_ms()
    }

    fn abort(&self) -> ! {
        #[cfg(target_arch = "wasm32")]
        {
            core::arch::wasm32::unreachable()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::process::abort()
        }
    }
}
