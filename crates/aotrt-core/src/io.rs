//! Print/read/clock surface shared by every variant.
//!
//! Output is always normalized before it reaches the host, so generated
//! strings with broken encoding still produce well-formed UTF-8.

use alloc::string::ToString;

use crate::error_stack::Uncaught;
use crate::{utf8, Host, Text};

/// Writes `message` to standard output and flushes.
pub fn print<H: Host + ?Sized>(host: &H, message: &[u8]) {
    let Ok(text) = utf8::normalize(message) else {
        return;
    };
    host.write_stdout(text.as_bytes());
    host.flush_stdout();
}

/// `None` prints just the newline.
pub fn println<H: Host + ?Sized>(host: &H, message: Option<&[u8]>) {
    if let Some(message) = message {
        let Ok(text) = utf8::normalize(message) else {
            return;
        };
        host.write_stdout(text.as_bytes());
    }
    host.write_stdout(b"\n");
}

/// Like [`println`], on the error stream.
pub fn eprintln<H: Host + ?Sized>(host: &H, message: Option<&[u8]>) {
    if let Some(message) = message {
        let Ok(text) = utf8::normalize(message) else {
            return;
        };
        host.write_stderr(text.as_bytes());
    }
    host.write_stderr(b"\n");
}

/// One line of input. A zero byte inside the line ends the returned text.
pub fn read_line<H: Host + ?Sized>(host: &H) -> Option<Text> {
    let line = host.read_line()?;
    Text::from_vec_until_nul(line).ok()
}

pub fn now_ms<H: Host + ?Sized>(host: &H) -> i64 {
    host.now_ms()
}

/// Best-effort diagnostic for a raise nobody can catch, then abort.
pub fn abort_uncaught<H: Host + ?Sized>(host: &H, uncaught: &Uncaught) -> ! {
    let line = uncaught.to_string();
    host.write_stderr(line.as_bytes());
    host.write_stderr(b"\n");
    host.abort()
}


#[cfg(test)]
mod tests {
    use super::testing::MemHost;
    use super::*;

    #[test]
    fn print_normalizes_and_flushes() {
        let host = MemHost::default();
        print(&host, b"ok\xFF");
        assert_eq!(&*host.stdout.borrow(), b"ok\xEF\xBF\xBD");
        assert_eq!(*host.flushes.borrow(), 1);
    }

    #[test]
    fn println_without_message_is_just_newline() {
        let host = MemHost::default();
        println(&host, None);
        println(&host, Some(b"hi"));
        assert_eq!(&*host.stdout.borrow(), b"\nhi\n");
    }

    #[test]
    fn eprintln_goes_to_stderr() {
        let host = MemHost::default();
        eprintln(&host, Some(b"warn"));
        assert!(host.stdout.borrow().is_empty());
        assert_eq!(&*host.stderr.borrow(), b"warn\n");
    }

    #[test]
    fn read_line_splits_on_newline_and_skips_cr() {
        let host = MemHost::with_input(b"first\r\nsecond\n\nlast");
        assert_eq!(read_line(&host).expect("line").as_bytes(), b"first");
        assert_eq!(read_line(&host).expect("line").as_bytes(), b"second");
        assert_eq!(read_line(&host).expect("line").as_bytes(), b"");
        assert_eq!(read_line(&host).expect("line").as_bytes(), b"last");
        assert!(read_line(&host).is_none());
    }

    #[test]
    fn uncaught_diagnostic_precedes_abort() {
        let host = MemHost::default();
        let mut stack = crate::ErrorStack::new();
        let uncaught = stack.raise(b"boom").expect_err("no frame");
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            abort_uncaught(&host, &uncaught)
        }));
        assert!(res.is_err());
        assert_eq!(&*host.stderr.borrow(), b"Uncaught exception: boom\n");
    }
}
