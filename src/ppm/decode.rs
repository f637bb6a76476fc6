//! P6 pixel body decoding into the supported output formats.
//!
//! Every loader reserves the output once, then walks the body one row at a
//! time, committing each row (padding zeroed) only after its bytes arrive.
//! Buffers are owned locally, so any early return drops both the scratch row
//! and the partial output.

use std::io::Read;

use enough::Stop;

use super::header::Header;
use super::tokenizer::ByteCursor;
use crate::error::PpmError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;
use crate::stride::checked_row_stride;

/// Decoded body plus the row stride it was laid out with.
pub(crate) struct DecodedBody {
    pub pixels: Vec<u8>,
    pub stride: usize,
}

/// Read the pixel body following `header` and convert it to `format`.
pub(crate) fn decode_body<R: Read>(
    cursor: &mut ByteCursor<R>,
    header: &Header,
    format: PixelFormat,
    unit: i32,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodedBody, PpmError> {
    if format != PixelFormat::Rgb24 && header.is_wide() {
        return Err(PpmError::UnsupportedMaxval(header.maxval));
    }
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }

    let too_large = || PpmError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let out_bpp = match format {
        PixelFormat::Rgb24 => header.bytes_per_pixel(),
        other => other.bytes_per_pixel(),
    };
    let stride = checked_row_stride(header.width, out_bpp, unit).ok_or_else(too_large)?;
    let total = stride
        .checked_mul(header.height as usize)
        .ok_or_else(too_large)?;
    let body_len = header.body_len().ok_or_else(too_large)?;
    if let Some(limits) = limits {
        limits.check_memory(total)?;
    }
    log::trace!(
        "ppm decode: {:?}, unit {unit}, stride {stride}, {total} output bytes",
        format
    );

    stop.check()?;

    // Only address space is reserved here; rows are committed as the body
    // supplies them.
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(total)
        .map_err(|_| PpmError::OutOfMemory { bytes: total })?;
    if total > 0 {
        match format {
            PixelFormat::Rgb24 => {
                read_passthrough(cursor, header, &mut pixels, stride, body_len, stop)?
            }
            _ => convert_rows(cursor, header, &mut pixels, stride, format, body_len, stop)?,
        }
    }

    log::debug!(
        "ppm decoded {}x{} as {:?} ({} bytes)",
        header.width,
        header.height,
        format,
        pixels.len()
    );
    Ok(DecodedBody { pixels, stride })
}

/// Largest slice of body bytes requested from the reader at once.
const READ_CHUNK: usize = 64 * 1024;

/// Append `len` body bytes to `out`, growing it only as data arrives.
///
/// `offset` is how much of the body was consumed before this call; short
/// reads are reported against the whole body.
fn append_body<R: Read>(
    cursor: &mut ByteCursor<R>,
    out: &mut Vec<u8>,
    len: usize,
    offset: usize,
    body_len: usize,
) -> Result<(), PpmError> {
    let mut copied = 0;
    while copied < len {
        let start = out.len();
        let chunk = (len - copied).min(READ_CHUNK);
        out.resize(start + chunk, 0);
        let n = cursor.read_fill(&mut out[start..])?;
        out.truncate(start + n);
        copied += n;
        if n < chunk {
            return Err(PpmError::ShortRead {
                expected: body_len,
                actual: offset + copied,
            });
        }
    }
    Ok(())
}

/// Copy raw samples unchanged, zero-padding each row out to `stride`.
fn read_passthrough<R: Read>(
    cursor: &mut ByteCursor<R>,
    header: &Header,
    out: &mut Vec<u8>,
    stride: usize,
    body_len: usize,
    stop: &dyn Stop,
) -> Result<(), PpmError> {
    let raw_row = header.width as usize * header.bytes_per_pixel();
    for y in 0..header.height as usize {
        if y % 16 == 0 {
            stop.check()?;
        }
        let start = out.len();
        append_body(cursor, out, raw_row, y * raw_row, body_len)?;
        out.resize(start + stride, 0);
    }
    Ok(())
}

fn convert_rows<R: Read>(
    cursor: &mut ByteCursor<R>,
    header: &Header,
    out: &mut Vec<u8>,
    stride: usize,
    format: PixelFormat,
    body_len: usize,
    stop: &dyn Stop,
) -> Result<(), PpmError> {
    let w = header.width as usize;
    let raw_row = w * 3;
    let out_row = w * format.bytes_per_pixel();
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(raw_row)
        .map_err(|_| PpmError::OutOfMemory { bytes: raw_row })?;

    for y in 0..header.height as usize {
        if y % 16 == 0 {
            stop.check()?;
        }
        scratch.clear();
        append_body(cursor, &mut scratch, raw_row, y * raw_row, body_len)?;
        let start = out.len();
        out.resize(start + stride, 0);
        convert_row(format, &scratch, &mut out[start..start + out_row]);
    }
    Ok(())
}

/// Convert one row of 8-bit RGB into `format`.
fn convert_row(format: PixelFormat, src: &[u8], dst: &mut [u8]) {
    match format {
        PixelFormat::Rgb24 => dst.copy_from_slice(src),
        PixelFormat::Bgra32 { alpha } => rgb_to_bgra_row(src, dst, alpha),
        PixelFormat::Rgb565 | PixelFormat::Gray(_) => {
            let bpp = format.bytes_per_pixel();
            for (px, out) in src.chunks_exact(3).zip(dst.chunks_exact_mut(bpp)) {
                format.convert_pixel(px, out);
            }
        }
    }
}

fn rgb_to_bgra_row(src: &[u8], dst: &mut [u8], alpha: u8) {
    #[cfg(feature = "simd")]
    if garb::bytes::rgb_to_bgra(src, dst).is_ok() {
        if alpha != 0xFF {
            for px in dst.chunks_exact_mut(4) {
                px[3] = alpha;
            }
        }
        return;
    }
    let format = PixelFormat::Bgra32 { alpha };
    for (px, out) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        format.convert_pixel(px, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::GrayscaleMode;
    use enough::Unstoppable;

    fn decode(
        data: &[u8],
        header: Header,
        format: PixelFormat,
        unit: i32,
    ) -> Result<DecodedBody, PpmError> {
        decode_body(
            &mut ByteCursor::new(data),
            &header,
            format,
            unit,
            None,
            &Unstoppable,
        )
    }

    const TWO_BY_ONE: Header = Header {
        width: 2,
        height: 1,
        maxval: 255,
    };

    #[test]
    fn bgra_rows_swap_channels() {
        let body = decode(
            &[10, 20, 30, 40, 50, 60],
            TWO_BY_ONE,
            PixelFormat::BGRA32,
            1,
        )
        .unwrap();
        assert_eq!(body.stride, 8);
        assert_eq!(body.pixels, [30, 20, 10, 255, 60, 50, 40, 255]);
    }

    #[test]
    fn padding_is_zeroed() {
        let header = Header {
            width: 1,
            height: 2,
            maxval: 255,
        };
        let body = decode(&[255, 255, 255, 1, 2, 3], header, PixelFormat::Rgb565, 4).unwrap();
        assert_eq!(body.stride, 4);
        let white = 0xFFFFu16.to_ne_bytes();
        let second = crate::pixel::rgb565(1, 2, 3).to_ne_bytes();
        assert_eq!(body.pixels, [white[0], white[1], 0, 0, second[0], second[1], 0, 0]);
    }

    #[test]
    fn short_row_reports_body_totals() {
        let header = Header {
            width: 2,
            height: 2,
            maxval: 255,
        };
        let err = decode(&[0; 8], header, PixelFormat::Gray(GrayscaleMode::Simple), 0)
            .err()
            .unwrap();
        match err {
            PpmError::ShortRead { expected, actual } => assert_eq!((expected, actual), (12, 8)),
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    fn wide_samples_refused_before_reading() {
        let header = Header {
            width: 1,
            height: 1,
            maxval: 1023,
        };
        let data = [0u8; 6];
        let mut cursor = ByteCursor::new(&data[..]);
        let err = decode_body(
            &mut cursor,
            &header,
            PixelFormat::Rgb565,
            0,
            None,
            &Unstoppable,
        )
        .err()
        .unwrap();
        assert!(matches!(err, PpmError::UnsupportedMaxval(1023)));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn wide_passthrough_doubles_row_bytes() {
        let header = Header {
            width: 1,
            height: 2,
            maxval: 65535,
        };
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let body = decode(&data, header, PixelFormat::Rgb24, -2).unwrap();
        assert_eq!(body.stride, 12);
        assert_eq!(
            body.pixels,
            [1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0, 0, 7, 8, 9, 10, 11, 12, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn empty_body_commits_no_rows() {
        let header = Header {
            width: 1,
            height: 1_000_000,
            maxval: 255,
        };
        let mut out = Vec::new();
        let err = convert_rows(
            &mut ByteCursor::new(&[][..]),
            &header,
            &mut out,
            4,
            PixelFormat::BGRA32,
            3_000_000,
            &Unstoppable,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PpmError::ShortRead {
                expected: 3_000_000,
                actual: 0
            }
        ));
        assert!(out.is_empty());

        let err = read_passthrough(
            &mut ByteCursor::new(&[][..]),
            &header,
            &mut out,
            3,
            3_000_000,
            &Unstoppable,
        )
        .unwrap_err();
        assert!(matches!(err, PpmError::ShortRead { actual: 0, .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn truncated_body_commits_only_complete_rows() {
        let header = Header {
            width: 2,
            height: 3,
            maxval: 255,
        };
        let mut out = Vec::new();
        let err = convert_rows(
            &mut ByteCursor::new(&[7u8; 13][..]),
            &header,
            &mut out,
            4,
            PixelFormat::Gray(GrayscaleMode::Simple),
            18,
            &Unstoppable,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PpmError::ShortRead {
                expected: 18,
                actual: 13
            }
        ));
        assert_eq!(out, [7, 7, 0, 0, 7, 7, 0, 0]);
    }

    #[test]
    fn rows_longer_than_one_read_chunk() {
        let width = READ_CHUNK as u32;
        let header = Header {
            width,
            height: 2,
            maxval: 255,
        };
        let data: Vec<u8> = (0..header.body_len().unwrap()).map(|i| i as u8).collect();
        let body = decode(&data, header, PixelFormat::Rgb24, -3).unwrap();
        let raw_row = width as usize * 3;
        assert_eq!(body.stride, (width as usize).div_ceil(3) * 9);
        assert_eq!(&body.pixels[..raw_row], &data[..raw_row]);
        assert_eq!(
            &body.pixels[body.stride..body.stride + raw_row],
            &data[raw_row..]
        );
        assert_eq!(body.pixels.len(), body.stride * 2);
    }

    #[test]
    fn empty_image_reads_nothing() {
        let header = Header {
            width: 0,
            height: 5,
            maxval: 255,
        };
        let body = decode(&[], header, PixelFormat::BGRA32, 4).unwrap();
        assert!(body.pixels.is_empty());
        assert_eq!(body.stride, 0);
    }

    #[test]
    fn memory_limit_checked_before_allocation() {
        let limits = Limits {
            max_memory_bytes: Some(7),
            ..Default::default()
        };
        let err = decode_body(
            &mut ByteCursor::new(&[0u8; 6][..]),
            &TWO_BY_ONE,
            PixelFormat::BGRA32,
            0,
            Some(&limits),
            &Unstoppable,
        )
        .err()
        .unwrap();
        assert!(matches!(err, PpmError::LimitExceeded(_)));
    }

    #[test]
    fn memory_limit_counts_row_padding() {
        // 2x1 gray is 2 bytes packed, 4 once padded to 4-byte rows
        let limits = Limits {
            max_memory_bytes: Some(3),
            ..Default::default()
        };
        let gray = PixelFormat::Gray(GrayscaleMode::Simple);
        let packed = decode_body(
            &mut ByteCursor::new(&[0u8; 6][..]),
            &TWO_BY_ONE,
            gray,
            0,
            Some(&limits),
            &Unstoppable,
        );
        assert!(packed.is_ok());
        let padded = decode_body(
            &mut ByteCursor::new(&[0u8; 6][..]),
            &TWO_BY_ONE,
            gray,
            4,
            Some(&limits),
            &Unstoppable,
        );
        assert!(matches!(padded, Err(PpmError::LimitExceeded(_))));
    }
}
