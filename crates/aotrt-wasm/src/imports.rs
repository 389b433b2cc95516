//! The module's only way out: write, read and clock calls into the embedder.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

pub trait Imports {
    fn write(&self, stream: Stream, bytes: &[u8]);

    /// Fills a prefix of `buf`; `None` or `Some(0)` means end of input.
    fn read(&self, buf: &mut [u8]) -> Option<usize>;

    fn now_ms(&self) -> i64;
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod env {
    #[link(wasm_import_module = "env")]
    extern "C" {
        pub fn aotrt_host_write_stdout(ptr: *const u8, len: u32);
        pub fn aotrt_host_write_stderr(ptr: *const u8, len: u32);
        /// Bytes read into `ptr`, `0` at end of input, negative on error.
        pub fn aotrt_host_read_stdin(ptr: *mut u8, len: u32) -> i32;
        pub fn aotrt_host_now_ms() -> i64;
    }
}

/// Functions imported from the `env` module of a bare wasm32 instance.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvImports;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
impl Imports for EnvImports {
    fn write(&self, stream: Stream, bytes: &[u8]) {
        // usize is 32 bits here, so the length always fits.
        let len = bytes.len() as u32;
        unsafe {
            match stream {
                Stream::Stdout => env::aotrt_host_write_stdout(bytes.as_ptr(), len),
                Stream::Stderr => env::aotrt_host_write_stderr(bytes.as_ptr(), len),
            }
        }
    }

    fn read(&self, buf: &mut [u8]) -> Option<usize> {
        let n = unsafe { env::aotrt_host_read_stdin(buf.as_mut_ptr(), buf.len() as u32) };
        usize::try_from(n).ok().map(|n| n.min(buf.len()))
    }

    fn now_ms(&self) -> i64 {
        unsafe { env::aotrt_host_now_ms() }
    }
}

/// WASI and native builds: std streams and the system clock.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdImports;

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
impl Imports for StdImports {
    fn write(&self, stream: Stream, bytes: &[u8]) {
        use std::io::Write as _;
        let _ = match stream {
            Stream::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(bytes).and_then(|()| out.flush())
            }
            Stream::Stderr => std::io::stderr().lock().write_all(bytes),
        };
    }

    fn read(&self, buf: &mut [u8]) -> Option<usize> {
        use std::io::Read as _;
        std::io::stdin().lock().read(buf).ok()
    }

    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub type DefaultImports = EnvImports;

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub type DefaultImports = StdImports;
