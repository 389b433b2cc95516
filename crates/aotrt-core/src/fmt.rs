//! Locale-free scalar formatting.
//!
//! Integers and floats are rendered with integer arithmetic only, straight
//! from the value (or its IEEE-754 bit pattern for floats), so the output is
//! identical on every target regardless of libc.

use crate::text::{self, until_nul, Text};
use crate::RtError;

/// Fractional digits kept by [`format_float`] before trimming.
pub const FLOAT_FRAC_DIGITS: usize = 9;

const FRAC_SCALE: u64 = 1_000_000_000;

// u64::MAX has 20 decimal digits.
const DEC_BUF_LEN: usize = 20;

/// Writes `magnitude` right-aligned into `buf` and returns where it starts.
fn write_decimal(mut magnitude: u64, buf: &mut [u8; DEC_BUF_LEN]) -> usize {
    let mut pos = buf.len();
    loop {
        pos -= 1;
        buf[pos] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        if magnitude == 0 {
            return pos;
        }
    }
}

fn assemble(negative: bool, int_digits: &[u8], frac_digits: &[u8]) -> Result<Text, RtError> {
    let mut len = usize::from(negative) + int_digits.len();
    if !frac_digits.is_empty() {
        len += 1 + frac_digits.len();
    }
    let mut out = text::try_buffer(len)?;
    if negative {
        out.push(b'-');
    }
    out.extend_from_slice(int_digits);
    if !frac_digits.is_empty() {
        out.push(b'.');
        out.extend_from_slice(frac_digits);
    }
    Text::from_vec_until_nul(out)
}

fn literal(s: &str) -> Result<Text, RtError> {
    Text::from_bytes(s.as_bytes())
}

pub fn format_int(value: i64) -> Result<Text, RtError> {
    let mut digits = [0u8; DEC_BUF_LEN];
    // unsigned_abs promotes before negating, so i64::MIN does not overflow.
    let start = write_decimal(value.unsigned_abs(), &mut digits);
    assemble(value < 0, &digits[start..], &[])
}

pub fn format_bool(value: bool) -> Result<Text, RtError> {
    literal(if value { "true" } else { "false" })
}

/// Splits a non-negative finite float (given as bits, sign ignored) into
/// its integer part and its fraction scaled by `FRAC_SCALE`, rounded half up.
///
/// Returns `None` when the integer part, after any rounding carry, does not
/// fit in an `i64`.
fn fixed_point(bits: u64) -> Option<(u64, u64)> {
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };
    if mantissa == 0 {
        return Some((0, 0));
    }

    if exponent >= 0 {
        // mantissa >= 1, so anything shifted 64 or more is far out of range.
        if exponent >= 64 {
            return None;
        }
        let whole = u128::from(mantissa) << exponent;
        return if whole <= i64::MAX as u128 {
            Some((whole as u64, 0))
        } else {
            None
        };
    }

    let shift = exponent.unsigned_abs();
    // mantissa * FRAC_SCALE < 2^83, far below half an ulp at this shift.
    if shift >= 128 {
        return Some((0, 0));
    }
    let m = u128::from(mantissa);
    let mut whole = m >> shift;
    let rem = m - (whole << shift);
    let half = 1u128 << (shift - 1);
    let mut frac = (rem * u128::from(FRAC_SCALE) + half) >> shift;
    if frac >= u128::from(FRAC_SCALE) {
        frac -= u128::from(FRAC_SCALE);
        whole += 1;
    }
    if whole > i64::MAX as u128 {
        return None;
    }
    Some((whole as u64, frac as u64))
}

/// Fixed-point rendering with [`FLOAT_FRAC_DIGITS`] fractional digits,
/// trailing zeros and a trailing point trimmed.
///
/// `nan`, `inf` and `-inf` are spelled out; finite values whose integer part
/// leaves the `i64` range saturate to `inf`/`-inf`.
pub fn format_float(value: f64) -> Result<Text, RtError> {
    if value.is_nan() {
        return literal("nan");
    }
    let negative = value < 0.0;
    if value.is_infinite() {
        return literal(if negative { "-inf" } else { "inf" });
    }

    let Some((int_part, frac_part)) = fixed_point(value.to_bits() & !(1u64 << 63)) else {
        return literal(if negative { "-inf" } else { "inf" });
    };

    let mut int_digits = [0u8; DEC_BUF_LEN];
    let start = write_decimal(int_part, &mut int_digits);

    let mut frac_digits = [b'0'; FLOAT_FRAC_DIGITS];
    let mut rest = frac_part;
    for slot in frac_digits.iter_mut().rev() {
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    let frac_len = frac_digits
        .iter()
        .rposition(|&d| d != b'0')
        .map_or(0, |i| i + 1);

    assemble(negative, &int_digits[start..], &frac_digits[..frac_len])
}

/// Byte-exact concatenation; each side ends at its first zero byte.
pub fn concat(a: &[u8], b: &[u8]) -> Result<Text, RtError> {
    let (a, b) = (until_nul(a), until_nul(b));
    let len = a.len().checked_add(b.len()).ok_or(RtError::OutOfMemory)?;
    let mut out = text::try_buffer(len)?;
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    Text::from_vec_until_nul(out)
}
