//! Binary PPM (P6): header tokenizer, header parser, and pixel decoder.
//!
//! [`PpmDecoder`] splits identification from decoding so a caller can
//! inspect the [`Header`] before choosing an output format.

mod decode;
pub mod header;
pub mod tokenizer;

pub use header::{Header, MAX_MAXVAL, parse_header};
pub use tokenizer::ByteCursor;

use std::io::Read;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::PpmError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;

/// A P6 stream whose header has been read.
///
/// The underlying reader is positioned on the first pixel byte.
#[derive(Debug)]
pub struct PpmDecoder<R> {
    cursor: ByteCursor<R>,
    header: Header,
}

impl<R: Read> PpmDecoder<R> {
    /// Parse the header from `reader`. No pixel data is read.
    pub fn new(reader: R) -> Result<Self, PpmError> {
        let mut cursor = ByteCursor::new(reader);
        let header = parse_header(&mut cursor)?;
        Ok(Self { cursor, header })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Decode the pixel body into `format`, padding rows per `unit`
    /// (see [`row_stride`](crate::row_stride)).
    pub fn decode(
        self,
        format: PixelFormat,
        unit: i32,
        stop: impl Stop,
    ) -> Result<DecodeOutput, PpmError> {
        self.decode_with(format, unit, None, &stop)
    }

    pub(crate) fn decode_with(
        mut self,
        format: PixelFormat,
        unit: i32,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, PpmError> {
        let body =
            decode::decode_body(&mut self.cursor, &self.header, format, unit, limits, stop)?;
        Ok(DecodeOutput::new(body.pixels, self.header, body.stride, format))
    }

    /// Give back the reader, positioned on the first pixel byte.
    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }
}
