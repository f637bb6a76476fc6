use std::io::Read;

use super::tokenizer::{ByteCursor, is_ppm_whitespace, read_uint, skip_separators};
use crate::error::PpmError;

/// Largest maxval a P6 header may declare.
pub const MAX_MAXVAL: u32 = 65535;

/// Parsed P6 header.
///
/// Width and height are not checked for zero; loaders return an empty
/// buffer for an empty image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub maxval: u32,
}

impl Header {
    /// Whether samples are stored as two bytes (maxval >= 256).
    pub fn is_wide(&self) -> bool {
        self.maxval > 255
    }

    pub fn bytes_per_sample(&self) -> usize {
        if self.is_wide() { 2 } else { 1 }
    }

    /// Raw bytes per pixel in the file body.
    pub fn bytes_per_pixel(&self) -> usize {
        3 * self.bytes_per_sample()
    }

    /// Raw bytes of pixel data following the header, or `None` on overflow.
    pub fn body_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_pixel())
    }
}

/// Parse a P6 header, leaving `cursor` on the first pixel byte.
pub fn parse_header<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Header, PpmError> {
    if cursor.next_byte()? != Some(b'P') || cursor.next_byte()? != Some(b'6') {
        return Err(PpmError::BadSignature);
    }

    skip_separators(cursor)?;
    let width = read_uint(cursor)?.ok_or(PpmError::MissingWidth)?;

    skip_separators(cursor)?;
    let height = read_uint(cursor)?.ok_or(PpmError::MissingHeight)?;

    skip_separators(cursor)?;
    let maxval = read_uint(cursor)?.ok_or(PpmError::MissingMaxval)?;

    match cursor.next_byte()? {
        Some(b) if is_ppm_whitespace(b) => {}
        _ => return Err(PpmError::MissingSeparator),
    }

    if maxval > MAX_MAXVAL {
        return Err(PpmError::MaxvalTooLarge(maxval));
    }

    log::debug!(
        "ppm header: {width}x{height} maxval={maxval}, pixels at offset {}",
        cursor.position()
    );

    Ok(Header {
        width,
        height,
        maxval,
    })
}
