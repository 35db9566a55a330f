#![no_main]
#[macro_use]
extern crate libfuzzer_sys;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Errors are fine, panics are not
        let config = x86::Config { memory_size: 256, step_limit: Some(1000) };
        let _ = x86::run(source, &config);
    }
});
