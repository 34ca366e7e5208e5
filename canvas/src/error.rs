use std::io;

use imageproc_texel::BufferError;

/// Errors of decoding and encoding images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying file or stream could not be read or written.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The stream is not an image, or it is malformed, truncated, or too large to decode.
    #[error("format error: {0}")]
    Format(String),
    /// The pixel buffer could not be allocated.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl Error {
    pub(crate) fn not_an_image() -> Self {
        Error::Format("not a recognized image".into())
    }

    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Error::Format(reason.into())
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

impl From<png::DecodingError> for Error {
    fn from(err: png::DecodingError) -> Self {
        match err {
            // A stream that ends early is a corrupt image, not a failing device.
            png::DecodingError::IoError(err) if err.kind() != io::ErrorKind::UnexpectedEof => {
                Error::Io(err)
            }
            other => Error::Format(other.to_string()),
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        match err {
            png::EncodingError::IoError(err) => Error::Io(err),
            other => Error::Format(other.to_string()),
        }
    }
}
