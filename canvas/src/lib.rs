//! PNG codec for `imageproc` pixel buffers.
//!
//! Reading accepts the broad variety of the format: bit depths from 1 to 16, grayscale, color and
//! palette images, with or without alpha and transparency, interlaced or not. Writing is narrow and
//! always produces 8-bit grayscale. Round-tripping a color image is therefore lossy, only the first
//! channel survives.
//!
//! # Usage
//!
//! Decoding, transforming and encoding again:
//!
//! ```
//! use imageproc_canvas::{encode_to_vec, Decoder, EncodeOptions};
//! use imageproc_texel::ScalarBuffer;
//!
//! let mut image = ScalarBuffer::with_width_and_height(4, 4)?;
//! image.fill(64);
//! let stream = encode_to_vec(&image, &EncodeOptions::default())?;
//!
//! let mut decoded = Decoder::new(&stream[..]).decode::<i32>()?;
//! // … omitted: some filter over the samples
//! *decoded.pixel_mut(0, 0)? = 1000;
//!
//! let again = encode_to_vec(&decoded, &EncodeOptions::default())?;
//! let clamped = Decoder::new(&again[..]).decode::<u8>()?;
//! assert_eq!(*clamped.pixel(0, 0)?, 255);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod decode;
mod encode;
mod error;
mod file;
mod layout;

#[cfg(test)]
mod tests;

pub use self::decode::Decoder;
pub use self::encode::{encode_to_vec, Encoder};
pub use self::error::Error;
pub use self::file::{load, load_into, save};
pub use self::layout::{ColorMode, RasterInfo};
pub use png::{Compression, FilterType};

/// The signature every PNG stream starts with.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Configuration of a [`Decoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Upper bound on the bytes allocated while decoding.
    ///
    /// Applies both to the decoded samples and to the resulting buffer, whose size depends on the
    /// pixel type. Exceeding it is reported as a format error, before the allocation happens.
    pub limit_bytes: usize,
}

/// Configuration of an [`Encoder`].
#[derive(Clone, Copy, Debug)]
pub struct EncodeOptions {
    pub compression: Compression,
    /// The row filter applied before compression.
    pub filter: FilterType,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            limit_bytes: png::Limits::default().bytes,
        }
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            compression: Compression::Default,
            filter: FilterType::Sub,
        }
    }
}
