#![no_main]
use libfuzzer_sys::fuzz_target;
use zenppm::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 << 20),
        ..Default::default()
    };

    // Every format and a spread of packing units — must never panic
    let formats = [
        PixelFormat::Rgb24,
        PixelFormat::Bgra32 { alpha: 0x7F },
        PixelFormat::Rgb565,
        PixelFormat::Gray(GrayscaleMode::Simple),
        PixelFormat::Gray(GrayscaleMode::Weighted),
    ];
    for format in formats {
        for unit in [0, 4, -4, i32::MIN, i32::MAX] {
            let _ = DecodeRequest::new(data)
                .with_limits(limits.clone())
                .with_row_alignment(unit)
                .decode(format, enough::Unstoppable);
        }
    }
});
