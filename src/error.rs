use enough::StopReason;

use crate::pixel::PixelFormat;

/// Errors from PPM identification and decoding.
///
/// Every variant maps to a stable negative [`code`](PpmError::code) and a
/// static message in [`ERROR_MESSAGES`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PpmError {
    #[error("wrong signature, expected P6")]
    BadSignature,

    #[error("image width absent")]
    MissingWidth,

    #[error("image height absent")]
    MissingHeight,

    #[error("image maxval absent")]
    MissingMaxval,

    #[error("no single whitespace after maxval")]
    MissingSeparator,

    #[error("maxval {0} larger than 65535")]
    MaxvalTooLarge(u32),

    #[error("no free memory for {bytes} bytes of pixels")]
    OutOfMemory { bytes: usize },

    #[error("too few image pixels: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("can't convert, maxval {0} > 255")]
    UnsupportedMaxval(u32),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[error("pixel format mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: PixelFormat,
        actual: PixelFormat,
    },

    #[error("row stride {stride} is not a whole number of {bytes_per_pixel}-byte pixels")]
    UnalignedStride { stride: usize, bytes_per_pixel: usize },
}

impl From<StopReason> for PpmError {
    fn from(r: StopReason) -> Self {
        PpmError::Cancelled(r)
    }
}

/// Human-readable messages indexed by `-code`. Index 0 is success.
pub const ERROR_MESSAGES: [&str; 16] = [
    "no error",
    "wrong signature",
    "image width absent",
    "image height absent",
    "image maxval absent",
    "no single whitespace after maxval",
    "maxval larger than 65535",
    "no free memory for image pixels",
    "too few image pixels",
    "can't convert, maxval > 255",
    "i/o error",
    "image dimensions too large",
    "resource limit exceeded",
    "operation cancelled",
    "pixel format mismatch",
    "row stride not a whole number of pixels",
];

/// Look up the static message for an error code (`0` or a negative value).
pub fn message_for_code(code: i32) -> Option<&'static str> {
    let idx = usize::try_from(code.checked_neg()?).ok()?;
    ERROR_MESSAGES.get(idx).copied()
}

impl PpmError {
    /// Stable negative status code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::BadSignature => -1,
            Self::MissingWidth => -2,
            Self::MissingHeight => -3,
            Self::MissingMaxval => -4,
            Self::MissingSeparator => -5,
            Self::MaxvalTooLarge(_) => -6,
            Self::OutOfMemory { .. } => -7,
            Self::ShortRead { .. } => -8,
            Self::UnsupportedMaxval(_) => -9,
            Self::Io(_) => -10,
            Self::DimensionsTooLarge { .. } => -11,
            Self::LimitExceeded(_) => -12,
            Self::Cancelled(_) => -13,
            Self::LayoutMismatch { .. } => -14,
            Self::UnalignedStride { .. } => -15,
        }
    }

    /// Static message for this error kind, without any detail fields.
    pub fn message(&self) -> &'static str {
        ERROR_MESSAGES[(-self.code()) as usize]
    }

    /// Whether the error came from malformed header metadata rather than the
    /// pixel body or the environment.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::BadSignature
                | Self::MissingWidth
                | Self::MissingHeight
                | Self::MissingMaxval
                | Self::MissingSeparator
                | Self::MaxvalTooLarge(_)
        )
    }
}
