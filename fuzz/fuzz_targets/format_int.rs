#![no_main]

use aotrt_core::fmt;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|v: i64| {
    let out = fmt::format_int(v).expect("small allocation");
    let s = out.as_str().expect("ascii");
    assert_eq!(s.parse::<i64>().expect("decimal"), v, "{s}");
    assert_eq!(s, v.to_string());
});
