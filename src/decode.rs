use std::io::Read;

use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::PpmError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;
use crate::ppm::{Header, PpmDecoder};

/// Decoded image. Rows are `stride` bytes apart; bytes past the pixel data
/// in each row are zero.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub header: Header,
    pub width: u32,
    pub height: u32,
    /// Bytes per output row, padding included.
    pub stride: usize,
    pub format: PixelFormat,
}

impl DecodeOutput {
    pub(crate) fn new(
        pixels: Vec<u8>,
        header: Header,
        stride: usize,
        format: PixelFormat,
    ) -> Self {
        Self {
            pixels,
            header,
            width: header.width,
            height: header.height,
            stride,
            format,
        }
    }

    /// Access the pixel data, padding included.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes per pixel actually stored (6 for wide-sample RGB24).
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            PixelFormat::Rgb24 => self.header.bytes_per_pixel(),
            other => other.bytes_per_pixel(),
        }
    }

    /// Whether rows are stored back to back with no padding.
    pub fn is_packed(&self) -> bool {
        self.stride == self.width as usize * self.bytes_per_pixel()
    }

    /// Pixel bytes of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        self.pixels
            .get(start..start + self.width as usize * self.bytes_per_pixel())
    }

    /// Iterate rows top to bottom, padding excluded.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// RGB565 words, rows concatenated, padding excluded.
    pub fn rgb565_words(&self) -> Result<Vec<u16>, PpmError> {
        if self.format != PixelFormat::Rgb565 {
            return Err(PpmError::LayoutMismatch {
                expected: PixelFormat::Rgb565,
                actual: self.format,
            });
        }
        Ok(self
            .rows()
            .flat_map(|row| row.chunks_exact(2))
            .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
            .collect())
    }

    #[cfg(feature = "rgb")]
    fn check_pixel_type<P: crate::DecodePixel>(&self) -> Result<(), PpmError> {
        if !self.format.is_memory_compatible(P::format()) {
            return Err(PpmError::LayoutMismatch {
                expected: P::format(),
                actual: self.format,
            });
        }
        if self.format == PixelFormat::Rgb24 && self.header.is_wide() {
            return Err(PpmError::UnsupportedMaxval(self.header.maxval));
        }
        Ok(())
    }

    /// Reinterpret unpadded pixel data as a typed pixel slice.
    ///
    /// Returns [`PpmError::LayoutMismatch`] if the format doesn't match `P`,
    /// or [`PpmError::UnalignedStride`] if rows carry padding (use
    /// `as_imgref` for those).
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], PpmError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_pixel_type::<P>()?;
        if !self.is_packed() {
            return Err(PpmError::UnalignedStride {
                stride: self.stride,
                bytes_per_pixel: self.bytes_per_pixel(),
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy strided view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// The stride must be a whole number of pixels, which holds for every
    /// pixel-unit packing and for byte units that are multiples of the pixel
    /// size.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, PpmError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_pixel_type::<P>()?;
        let bpp = self.bytes_per_pixel();
        if self.stride == 0 || self.height == 0 || self.stride % bpp != 0 {
            return Err(PpmError::UnalignedStride {
                stride: self.stride,
                bytes_per_pixel: bpp,
            });
        }
        let pixels: &[P] = self.pixels().as_pixels();
        Ok(imgref::ImgRef::new_stride(
            pixels,
            self.width as usize,
            self.height as usize,
            self.stride / bpp,
        ))
    }

    /// Copy into a tightly packed [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, PpmError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let img = self.as_imgref::<P>()?;
        let (buf, width, height) = img.to_contiguous_buf();
        Ok(imgref::ImgVec::new(buf.into_owned(), width, height))
    }
}

/// Builder for a decode with limits, row packing and cancellation.
///
/// ```no_run
/// use zenppm::{DecodeRequest, Limits, PixelFormat, Unstoppable};
///
/// let file = std::fs::File::open("image.ppm")?;
/// let decoded = DecodeRequest::new(std::io::BufReader::new(file))
///     .with_limits(Limits { max_pixels: Some(1 << 24), ..Default::default() })
///     .with_row_alignment(4)
///     .decode(PixelFormat::BGRA32, Unstoppable)?;
/// assert_eq!(decoded.stride % 4, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DecodeRequest<R> {
    reader: R,
    limits: Option<Limits>,
    unit: i32,
}

impl<R: Read> DecodeRequest<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            limits: None,
            unit: 0,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Row packing unit: `> 1` pads rows to that many bytes, `< -1` to that
    /// many pixels, anything else leaves rows unpadded.
    pub fn with_row_alignment(mut self, unit: i32) -> Self {
        self.unit = unit;
        self
    }

    /// Read only the header.
    pub fn identify(self) -> Result<Header, PpmError> {
        let decoder = PpmDecoder::new(self.reader)?;
        Ok(decoder.header())
    }

    /// Read the header and decode the body into `format`.
    pub fn decode(self, format: PixelFormat, stop: impl Stop) -> Result<DecodeOutput, PpmError> {
        let decoder = PpmDecoder::new(self.reader)?;
        decoder.decode_with(format, self.unit, self.limits.as_ref(), &stop)
    }
}
