use alloc::vec::Vec;

/// The transport a variant offers to generated code.
///
/// Implementations only move bytes; validation, normalization and newline
/// handling live in [`crate::io`] and are shared by every variant.
pub trait Host {
    fn write_stdout(&self, bytes: &[u8]);

    fn write_stderr(&self, bytes: &[u8]);

    fn flush_stdout(&self) {}

    /// Next byte of standard input, `None` at end of input or when the
    /// variant cannot read.
    fn read_byte(&self) -> Option<u8>;

    /// One line without its terminator.
    ///
    /// The default reads byte by byte, skips `\r`, stops at `\n` or end of
    /// input, and returns `None` only if end of input came before any byte.
    fn read_line(&self) -> Option<Vec<u8>> {
        let mut line = Vec::new();
        let mut saw_any = false;
        while let Some(b) = self.read_byte() {
            saw_any = true;
            match b {
                b'\r' => continue,
                b'\n' => break,
                _ => {
                    if line.try_reserve(1).is_err() {
                        return None;
                    }
                    line.push(b);
                }
            }
        }
        if saw_any {
            Some(line)
        } else {
            None
        }
    }

    /// Wall-clock milliseconds since the Unix epoch, `0` if unknown.
    fn now_ms(&self) -> i64;

    /// Terminates after an uncaught error. Must not return.
    fn abort(&self) -> !;
}

impl<H: Host + ?Sized> Host for &H {
    fn write_stdout(&self, bytes: &[u8]) {
        (**self).write_stdout(bytes)
    }

    fn write_stderr(&self, bytes: &[u8]) {
        (**self).write_stderr(bytes)
    }

    fn flush_stdout(&self) {
        (**self).flush_stdout()
    }

    fn read_byte(&self) -> Option<u8> {
        (**self).read_byte()
    }

    fn read_line(&self) -> Option<Vec<u8>> {
        (**self).read_line()
    }

    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn abort(&self) -> ! {
        (**self).abort()
    }
}
