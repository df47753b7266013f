#![no_main]
use libfuzzer_sys::fuzz_target;

// Input layout: format, then arguments, separated by NUL bytes.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.split('\0');
    let format = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.take(8).collect();

    let compiled = strfmt_core::compile(format);
    let rendered = strfmt::sprintf_compiled(&compiled, &args);
    assert!(rendered.len() >= compiled.min_output_size());
    let direct = strfmt::sprintf(format, &args);
    assert_eq!(rendered, direct);

    let mut out = Vec::new();
    let written = strfmt::fprintf(&mut out, format, &args).unwrap_or(0);
    assert_eq!(written, out.len());
    assert_eq!(out, rendered.as_bytes());
});
