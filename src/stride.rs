//! Output row stride under a packing unit.
//!
//! The packing `unit` follows the DIB-style convention used throughout the
//! crate: a value greater than 1 pads each row to a multiple of that many
//! bytes, a value less than -1 pads each row to a multiple of `-unit` pixels,
//! and -1, 0 and 1 mean no padding.

/// Byte length of one output row.
///
/// Saturates at `u32::MAX` when the true stride does not fit.
///
/// ```
/// assert_eq!(zenppm::row_stride(5, 3, 0), 15);
/// assert_eq!(zenppm::row_stride(5, 3, -4), 24);
/// assert_eq!(zenppm::row_stride(5, 3, 4), 16);
/// ```
pub fn row_stride(width: u32, bytes_per_pixel: u32, unit: i32) -> u32 {
    u32::try_from(stride_u64(width, bytes_per_pixel, unit)).unwrap_or(u32::MAX)
}

/// Like [`row_stride`], but `None` when the stride does not fit in `usize`.
pub(crate) fn checked_row_stride(width: u32, bytes_per_pixel: usize, unit: i32) -> Option<usize> {
    let bpp = u32::try_from(bytes_per_pixel).ok()?;
    usize::try_from(stride_u64(width, bpp, unit)).ok()
}

fn stride_u64(width: u32, bytes_per_pixel: u32, unit: i32) -> u64 {
    let width = u64::from(width);
    let bpp = u64::from(bytes_per_pixel);
    if unit < -1 {
        let u = u64::from(unit.unsigned_abs());
        width.div_ceil(u).saturating_mul(u).saturating_mul(bpp)
    } else if unit > 1 {
        let u = unit as u64;
        width.saturating_mul(bpp).div_ceil(u).saturating_mul(u)
    } else {
        width.saturating_mul(bpp)
    }
}
