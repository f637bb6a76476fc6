#![no_main]
use libfuzzer_sys::fuzz_target;
use zenppm::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, wrapping the raw samples in a minimal header and
    // decoding again must produce identical pixels
    let limits = Limits {
        max_memory_bytes: Some(64 << 20),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(limits)
        .decode(PixelFormat::Rgb24, enough::Unstoppable)
    else {
        return;
    };

    let mut rewrapped = format!(
        "P6\n{} {}\n{}\n",
        decoded.width, decoded.height, decoded.header.maxval
    )
    .into_bytes();
    rewrapped.extend_from_slice(decoded.pixels());

    let Ok(decoded2) = load_rgb24(&rewrapped[..]) else {
        panic!("rewrapped data failed to decode");
    };
    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.header, decoded2.header);

    if !decoded.header.is_wide() {
        let bgra = load_bgra32(&rewrapped[..], -4, 255).expect("8-bit bgra");
        assert_eq!(bgra.stride, row_stride(decoded.width, 4, -4) as usize);
    }
});
