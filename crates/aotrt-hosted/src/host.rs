use std::io::{BufRead, Write};

use aotrt_core::Host;

use crate::config::{config, RuntimeConfig};

/// Process stdio and the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdHost;

/// Reads one line from `reader` without its `\n` (or `\r\n`) terminator.
///
/// `None` only when end of input comes before any byte; read errors are
/// treated as end of input.
pub fn read_line_from<R: BufRead>(reader: &mut R) -> Option<Vec<u8>> {
    let mut line = Vec::new();
    match reader.read_until(b'\n', &mut line) {
        Ok(0) => return None,
        Ok(_) => {}
        Err(err) => {
            tracing::debug!(error = %err, "stdin read failed");
            if line.is_empty() {
                return None;
            }
        }
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Some(line)
}

/// Flushes `out` after a `print` unless the configuration turned that off.
/// Returns whether a flush was issued.
pub fn flush_after_print<W: Write>(cfg: &RuntimeConfig, out: &mut W) -> bool {
    if !cfg.print_flush {
        return false;
    }
    let _ = out.flush();
    true
}

impl Host for StdHost {
    fn write_stdout(&self, bytes: &[u8]) {
        // Closed or broken stdout is not an error the program can act on.
        let _ = std::io::stdout().lock().write_all(bytes);
    }

    fn write_stderr(&self, bytes: &[u8]) {
        let _ = std::io::stderr().lock().write_all(bytes);
    }

    fn flush_stdout(&self) {
        flush_after_print(config(), &mut std::io::stdout().lock());
    }

    fn read_byte(&self) -> Option<u8> {
        let mut stdin = std::io::stdin().lock();
        let b = *stdin.fill_buf().ok()?.first()?;
        stdin.consume(1);
        Some(b)
    }

    fn read_line(&self) -> Option<Vec<u8>> {
        // Pending output such as a prompt must be visible before blocking.
        let _ = std::io::stdout().lock().flush();
        read_line_from(&mut std::io::stdin().lock())
    }

    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn abort(&self) -> ! {
        let _ = std::io::stdout().lock().flush();
        std::process::abort()
    }
}
