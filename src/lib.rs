//! # zenppm
//!
//! Binary PPM (P6) decoder with conversion to the raster formats renderers
//! usually want.
//!
//! ## Output formats
//!
//! - **RGB24**: the raw samples, untouched (6 bytes per pixel when maxval > 255)
//! - **BGRA32**: B, G, R, then a caller-chosen alpha byte
//! - **RGB565**: one native-endian `u16` per pixel, low bits truncated
//! - **Gray8**: truncated mean or BT.601 weighted luma
//!
//! Every format can pad rows to a multiple of N bytes or N pixels (see
//! [`row_stride`]); padding bytes are zero.
//!
//! ## Non-Goals
//!
//! - Encoding, and Netpbm variants other than P6
//! - Converting 16-bit samples (maxval > 255) to anything but raw RGB24
//! - Gamma or any other color management
//!
//! ## Usage
//!
//! ```
//! use zenppm::{GrayscaleMode, PixelFormat, PpmDecoder, Unstoppable};
//!
//! let data: &[u8] = b"P6\n# two pixels\n2 1\n255\n\x0a\x14\x1e\x28\x32\x3c";
//!
//! // Header only, no pixel decode
//! let header = zenppm::identify(data)?;
//! assert_eq!((header.width, header.height, header.maxval), (2, 1, 255));
//!
//! // One-shot conversion
//! let bgra = zenppm::load_bgra32(data, 1, 255)?;
//! assert_eq!(bgra.pixels(), &[30, 20, 10, 255, 60, 50, 40, 255]);
//!
//! // Identify first, then choose how to load
//! let decoder = PpmDecoder::new(data)?;
//! let format = if decoder.header().is_wide() {
//!     PixelFormat::Rgb24
//! } else {
//!     PixelFormat::Gray(GrayscaleMode::Weighted)
//! };
//! let gray = decoder.decode(format, -4, Unstoppable)?;
//! assert_eq!(gray.stride, 4);
//! # Ok::<(), zenppm::PpmError>(())
//! ```

#![forbid(unsafe_code)]

mod decode;
mod error;
mod limits;
mod pixel;
pub mod ppm;
mod stride;

use std::io::Read;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::{ERROR_MESSAGES, PpmError, message_for_code};
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::{GrayscaleMode, PixelFormat, gray, rgb565};
pub use ppm::{ByteCursor, Header, PpmDecoder};
pub use stride::row_stride;

/// Read only the header from `reader`.
pub fn identify<R: Read>(reader: R) -> Result<Header, PpmError> {
    DecodeRequest::new(reader).identify()
}

/// Load the raw samples: `width * height * 3` bytes for maxval < 256,
/// twice that (big-endian samples) otherwise.
pub fn load_rgb24<R: Read>(reader: R) -> Result<DecodeOutput, PpmError> {
    DecodeRequest::new(reader).decode(PixelFormat::Rgb24, Unstoppable)
}

/// Load as B, G, R, `alpha` with rows padded per `unit`.
pub fn load_bgra32<R: Read>(reader: R, unit: i32, alpha: u8) -> Result<DecodeOutput, PpmError> {
    DecodeRequest::new(reader)
        .with_row_alignment(unit)
        .decode(PixelFormat::Bgra32 { alpha }, Unstoppable)
}

/// Load as native-endian RGB565 words with rows padded per `unit`.
pub fn load_rgb565<R: Read>(reader: R, unit: i32) -> Result<DecodeOutput, PpmError> {
    DecodeRequest::new(reader)
        .with_row_alignment(unit)
        .decode(PixelFormat::Rgb565, Unstoppable)
}

/// Load as one gray byte per pixel with rows padded per `unit`.
pub fn load_grayscale<R: Read>(
    reader: R,
    unit: i32,
    mode: GrayscaleMode,
) -> Result<DecodeOutput, PpmError> {
    DecodeRequest::new(reader)
        .with_row_alignment(unit)
        .decode(PixelFormat::Gray(mode), Unstoppable)
}
