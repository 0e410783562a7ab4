#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes to the .desktop entry parser
    // Malformed entries must be rejected, never panic
    if let Ok(s) = std::str::from_utf8(data) {
        let _entry = applist::registry::parse_desktop_entry(s);
    }
});
