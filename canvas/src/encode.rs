//! Encoding of pixel buffers as 8-bit grayscale PNG.
use std::io::Write;

use imageproc_texel::{BufferError, Pixel, PixelBuffer};
use png::{BitDepth, ColorType};

use crate::{EncodeOptions, Error, SIGNATURE};

/// Writes a buffer as a single channel image.
///
/// Every sample is reduced to one byte with its [`Projection`]. The output is always 8-bit,
/// grayscale and not interlaced, regardless of what the buffer was decoded from.
///
/// The whole stream is assembled in memory and handed to the writer with a single `write_all`.
/// A writer that rejects the first write thus never receives a partial header. A writer that
/// fails midway may hold a truncated stream.
///
/// [`Projection`]: imageproc_texel::Projection
pub struct Encoder<W> {
    writer: W,
    options: EncodeOptions,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncodeOptions::default())
    }

    pub fn with_options(writer: W, options: EncodeOptions) -> Self {
        Encoder { writer, options }
    }

    pub fn encode<P: Pixel>(mut self, buffer: &PixelBuffer<P>) -> Result<(), Error> {
        let stream = encode_to_vec(buffer, &self.options)?;
        self.writer.write_all(&stream)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Encode a buffer into an in-memory stream.
///
/// A buffer without samples produces a header-only stream: the signature, a header declaring the
/// zero dimension and the end marker. Note that strict readers, including [`Decoder`], reject
/// such a stream since the format requires non-zero dimensions.
///
/// [`Decoder`]: crate::Decoder
pub fn encode_to_vec<P: Pixel>(
    buffer: &PixelBuffer<P>,
    options: &EncodeOptions,
) -> Result<Vec<u8>, Error> {
    let width = u32::try_from(buffer.width())
        .map_err(|_| Error::format(format!("width {} is too large", buffer.width())))?;
    let height = u32::try_from(buffer.height())
        .map_err(|_| Error::format(format!("height {} is too large", buffer.height())))?;

    if buffer.is_empty() {
        log::debug!("encoding empty {width}x{height} image as header only");
        return Ok(header_only(width, height));
    }

    let mut gray = Vec::new();
    gray.try_reserve_exact(buffer.len())
        .map_err(|_| BufferError::OutOfMemory {
            width: buffer.width(),
            height: buffer.height(),
        })?;
    gray.extend(buffer.as_slice().iter().map(P::project));

    let mut stream = Vec::new();
    let mut encoder = png::Encoder::new(&mut stream, width, height);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(options.compression);
    encoder.set_filter(options.filter);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&gray)?;
    writer.finish()?;

    Ok(stream)
}

fn header_only(width: u32, height: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(13);
    header.extend_from_slice(&width.to_be_bytes());
    header.extend_from_slice(&height.to_be_bytes());
    // Depth 8, grayscale, deflate, adaptive filtering, no interlace.
    header.extend_from_slice(&[8, 0, 0, 0, 0]);

    let mut stream = SIGNATURE.to_vec();
    write_chunk(&mut stream, *b"IHDR", &header);
    write_chunk(&mut stream, *b"IEND", &[]);
    stream
}

fn write_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) {
    let mut crc = crc32fast::Hasher::new();
    crc.update(&kind);
    crc.update(data);

    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
}
