#![no_main]

use aotrt_core::fmt;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bits: u64| {
    let v = f64::from_bits(bits);
    let Ok(out) = fmt::format_float(v) else {
        return;
    };
    let s = out.as_str().expect("ascii");
    if v.is_nan() || s.ends_with("inf") {
        return;
    }
    let frac = s.split_once('.').map_or("", |(_, f)| f);
    assert!(frac.len() <= fmt::FLOAT_FRAC_DIGITS, "{s}");
    assert!(!frac.ends_with('0'), "{s}");
    let back: f64 = s.parse().expect("decimal");
    assert!((back - v).abs() <= 0.5e-9 + v.abs() * f64::EPSILON, "{v} -> {s}");
});
