/// How RGB is reduced to one gray byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrayscaleMode {
    /// Truncated mean, `(R + G + B) / 3`.
    #[default]
    Simple,
    /// ITU-R BT.601 luma, `(299R + 587G + 114B + 500) / 1000`.
    Weighted,
}

/// Target in-memory raster format for a decode.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Raw samples as stored in the file: 3 bytes per pixel for maxval < 256,
    /// otherwise 6 bytes (big-endian 16-bit samples, untouched).
    Rgb24,
    /// 4 bytes per pixel in B, G, R, A order with a constant alpha.
    Bgra32 { alpha: u8 },
    /// One native-endian `u16` per pixel, `RRRRRGGGGGGBBBBB`.
    Rgb565,
    /// One byte per pixel.
    Gray(GrayscaleMode),
}

impl PixelFormat {
    /// Opaque BGRA (alpha = 255).
    pub const BGRA32: Self = Self::Bgra32 { alpha: 255 };

    /// Output bytes per pixel for 8-bit input.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb24 => 3,
            Self::Bgra32 { .. } => 4,
            Self::Rgb565 => 2,
            Self::Gray(_) => 1,
        }
    }

    /// Whether `other` has the same memory layout, ignoring the alpha constant
    /// and grayscale weighting.
    pub fn is_memory_compatible(&self, other: PixelFormat) -> bool {
        matches!(
            (*self, other),
            (Self::Rgb24, Self::Rgb24)
                | (Self::Bgra32 { .. }, Self::Bgra32 { .. })
                | (Self::Rgb565, Self::Rgb565)
                | (Self::Gray(_), Self::Gray(_))
        )
    }

    /// Convert one 8-bit RGB pixel into `out`, which is exactly
    /// `bytes_per_pixel()` long.
    #[inline]
    pub(crate) fn convert_pixel(&self, rgb: &[u8], out: &mut [u8]) {
        let (r, g, b) = (rgb[0], rgb[1], rgb[2]);
        match *self {
            Self::Rgb24 => out.copy_from_slice(&rgb[..3]),
            Self::Bgra32 { alpha } => {
                out[0] = b;
                out[1] = g;
                out[2] = r;
                out[3] = alpha;
            }
            Self::Rgb565 => out.copy_from_slice(&rgb565(r, g, b).to_ne_bytes()),
            Self::Gray(mode) => out[0] = gray(mode, r, g, b),
        }
    }
}

/// Pack 8-bit RGB into a 5-6-5 word by truncating the low bits.
#[inline]
pub fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Reduce 8-bit RGB to one gray byte.
#[inline]
pub fn gray(mode: GrayscaleMode, r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (u32::from(r), u32::from(g), u32::from(b));
    match mode {
        GrayscaleMode::Simple => ((r + g + b) / 3) as u8,
        GrayscaleMode::Weighted => ((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8,
    }
}

/// Pixel types that can view a decoded buffer.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    /// A format whose memory layout matches this pixel type.
    fn format() -> PixelFormat;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Rgb<u8> {
    fn format() -> PixelFormat {
        PixelFormat::Rgb24
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Bgra<u8> {
    fn format() -> PixelFormat {
        PixelFormat::BGRA32
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Gray<u8> {
    fn format() -> PixelFormat {
        PixelFormat::Gray(GrayscaleMode::Simple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb565_extremes() {
        assert_eq!(rgb565(255, 255, 255), 0xFFFF);
        assert_eq!(rgb565(0, 0, 0), 0x0000);
        assert_eq!(rgb565(255, 0, 0), 0xF800);
        assert_eq!(rgb565(0, 255, 0), 0x07E0);
        assert_eq!(rgb565(0, 0, 255), 0x001F);
        // low bits are dropped, not rounded
        assert_eq!(rgb565(7, 3, 7), 0x0000);
    }

    #[test]
    fn gray_modes() {
        assert_eq!(gray(GrayscaleMode::Simple, 10, 20, 31), 20);
        assert_eq!(gray(GrayscaleMode::Simple, 255, 255, 255), 255);
        assert_eq!(gray(GrayscaleMode::Weighted, 255, 255, 255), 255);
        assert_eq!(gray(GrayscaleMode::Weighted, 255, 0, 0), 76);
        assert_eq!(gray(GrayscaleMode::Weighted, 0, 255, 0), 150);
        assert_eq!(gray(GrayscaleMode::Weighted, 0, 0, 255), 29);
    }

    #[test]
    fn bgra_swaps_red_and_blue() {
        let mut out = [0u8; 4];
        PixelFormat::Bgra32 { alpha: 7 }.convert_pixel(&[1, 2, 3], &mut out);
        assert_eq!(out, [3, 2, 1, 7]);
    }

    #[test]
    fn alpha_and_mode_do_not_affect_layout() {
        assert!(PixelFormat::BGRA32.is_memory_compatible(PixelFormat::Bgra32 { alpha: 0 }));
        assert!(
            PixelFormat::Gray(GrayscaleMode::Simple)
                .is_memory_compatible(PixelFormat::Gray(GrayscaleMode::Weighted))
        );
        assert!(!PixelFormat::Rgb24.is_memory_compatible(PixelFormat::BGRA32));
    }
}
