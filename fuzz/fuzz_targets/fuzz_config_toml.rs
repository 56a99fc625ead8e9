#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config loading reports errors and warnings; it must never panic
        let _ = scaffold::config::parse_with_warnings(content, Path::new("scaffold.toml"));
    }
});
