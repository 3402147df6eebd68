#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let (include, exclude) = content.split_once('\n').unwrap_or((content, ""));
        if let Ok(filter) = fsdeploy::GlobFilter::new(include, exclude) {
            let _ = filter.matches(Path::new("/ws/src/app.min.js"), Some(Path::new("app.min.js")));
        }
    }
});
