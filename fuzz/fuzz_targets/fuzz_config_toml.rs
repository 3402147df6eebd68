#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Parsing and rule validation must never panic
        if let Ok((config, _warnings)) =
            fsdeploy::config::parse_with_warnings(content, Path::new("fuzz.toml"))
        {
            let _ = config.rules();
        }
    }
});
