//! Owned NUL-terminated text.
//!
//! Every buffer the runtime hands to generated code is a [`Text`]. Inside Rust
//! it is an ordinary move-only value; at the C ABI it is turned into a raw
//! pointer with [`Text::into_raw`] and must come back exactly once through
//! [`Text::from_raw`] (that is all `aotrt_free_text` does).

use alloc::ffi::CString;
use alloc::vec::Vec;
use core::ffi::{c_char, CStr};
use core::fmt;

use crate::RtError;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Text(CString);

/// Returns `bytes` up to, not including, the first zero byte.
#[inline]
pub fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Empty buffer with room for `len` bytes plus the terminator, or
/// `OutOfMemory`. All runtime allocations go through here so that exhaustion
/// becomes a "no result" instead of an abort.
pub fn try_buffer(len: usize) -> Result<Vec<u8>, RtError> {
    let cap = len.checked_add(1).ok_or(RtError::OutOfMemory)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(cap).map_err(|_| RtError::OutOfMemory)?;
    Ok(buf)
}

impl Text {
    pub fn empty() -> Self {
        Text(CString::default())
    }

    /// Copies `bytes` up to the first zero byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RtError> {
        let bytes = until_nul(bytes);
        let mut buf = try_buffer(bytes.len())?;
        buf.extend_from_slice(bytes);
        Ok(Text::from_vec(buf))
    }

    /// Takes ownership of `bytes`, cutting it at the first zero byte.
    pub fn from_vec_until_nul(mut bytes: Vec<u8>) -> Result<Self, RtError> {
        let len = until_nul(&bytes).len();
        bytes.truncate(len);
        if bytes.capacity() == bytes.len() {
            bytes.try_reserve_exact(1).map_err(|_| RtError::OutOfMemory)?;
        }
        Ok(Text::from_vec(bytes))
    }

    /// `bytes` must not contain a zero byte.
    pub(crate) fn from_vec(bytes: Vec<u8>) -> Self {
        debug_assert!(!bytes.contains(&0));
        // SAFETY: every caller builds `bytes` from input already cut at the
        // first NUL, or from formatter output that never emits one.
        Text(unsafe { CString::from_vec_unchecked(bytes) })
    }

    /// Fallible copy, used wherever the runtime duplicates a message.
    pub fn try_clone(&self) -> Result<Self, RtError> {
        Text::from_bytes(self.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_c_str(&self) -> &CStr {
        self.0.as_c_str()
    }

    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Hands the buffer to foreign code.
    pub fn into_raw(self) -> *mut c_char {
        self.0.into_raw()
    }

    /// Takes back a buffer produced by [`Text::into_raw`].
    ///
    /// # Safety
    /// `ptr` must come from `Text::into_raw` and must not be used afterwards.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Self {
        Text(CString::from_raw(ptr))
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_c_str(), f)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Text {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
