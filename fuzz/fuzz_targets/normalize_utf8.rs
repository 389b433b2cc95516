#![no_main]

use aotrt_core::{text, utf8};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };

    let Ok(once) = utf8::normalize(data) else {
        return;
    };
    assert!(utf8::is_valid(once.as_bytes()));
    if utf8::is_valid(data) {
        assert_eq!(once.as_bytes(), text::until_nul(data));
    }
    let twice = utf8::normalize(once.as_bytes()).expect("alloc");
    assert_eq!(once, twice);
});
