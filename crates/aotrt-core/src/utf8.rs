//! UTF-8 checking and repair.
//!
//! Sequences are classified purely by bit pattern: a lead byte announces a
//! length of 1 to 4 and each following byte must look like `10xxxxxx`.
//! Overlong forms and surrogate code points are not rejected; generated code
//! only relies on the output being self-synchronizing.

use crate::text::{self, until_nul, Text};
use crate::RtError;

/// U+FFFD, substituted for every byte that does not start a valid sequence.
pub const REPLACEMENT: [u8; 3] = [0xEF, 0xBF, 0xBD];

#[inline]
fn sequence_len(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Length of the well-formed sequence starting `bytes`, if there is one.
#[inline]
fn sequence_at(bytes: &[u8]) -> Option<usize> {
    let need = sequence_len(*bytes.first()?)?;
    let seq = bytes.get(..need)?;
    if seq[1..].iter().all(|&b| is_continuation(b)) {
        Some(need)
    } else {
        None
    }
}

/// Checks `bytes` up to the first zero byte, which ends the text.
pub fn is_valid(bytes: &[u8]) -> bool {
    validate_strict(until_nul(bytes))
}

/// Checks the whole slice. A zero byte is an ordinary one-byte character
/// here, so a sequence cut short by it is reported as invalid.
pub fn validate_strict(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    while !rest.is_empty() {
        match sequence_at(rest) {
            Some(n) => rest = &rest[n..],
            None => return false,
        }
    }
    true
}

/// Returns a well-formed copy of `bytes` (up to the first zero byte).
///
/// Valid input is copied verbatim. Otherwise well-formed runs are kept and
/// each offending byte becomes [`REPLACEMENT`], advancing one byte at a time
/// through damaged regions.
pub fn normalize(bytes: &[u8]) -> Result<Text, RtError> {
    let input = until_nul(bytes);
    if validate_strict(input) {
        return Text::from_bytes(input);
    }

    // Worst case every byte is replaced.
    let cap = input
        .len()
        .checked_mul(REPLACEMENT.len())
        .ok_or(RtError::OutOfMemory)?;
    let mut out = text::try_buffer(cap)?;
    let mut rest = input;
    let mut replaced = 0usize;
    while !rest.is_empty() {
        match sequence_at(rest) {
            Some(n) => {
                out.extend_from_slice(&rest[..n]);
                rest = &rest[n..];
            }
            None => {
                out.extend_from_slice(&REPLACEMENT);
                rest = &rest[1..];
                replaced += 1;
            }
        }
    }
    tracing::trace!(replaced, len = input.len(), "repaired malformed utf-8");
    Text::from_vec_until_nul(out)
}
