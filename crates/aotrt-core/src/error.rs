use core::fmt;

/// Failures surfaced as "no result" at the C ABI.
///
/// None of these go through the error stack: the stack itself allocates, so
/// resource exhaustion has to be reported out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtError {
    /// An allocation could not be satisfied.
    OutOfMemory,
    /// A text argument was absent (null at the ABI).
    NullInput,
}

impl RtError {
    pub fn as_str(self) -> &'static str {
        match self {
            RtError::OutOfMemory => "out of memory",
            RtError::NullInput => "null text argument",
        }
    }
}

impl fmt::Display for RtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::error::Error for RtError {}
