//! Decoding of PNG streams into pixel buffers.
use std::io::{self, Cursor, Read};

use imageproc_texel::{Layout, Pixel, PixelBuffer};
use png::{BitDepth, Transformations};

use crate::layout::RasterInfo;
use crate::{DecodeOptions, Error, SIGNATURE};

type Stream<R> = io::Chain<Cursor<[u8; 8]>, R>;

/// Reads a single image from a byte stream.
///
/// Every supported variant of the format is normalized to 8-bit channels first: 16-bit samples
/// are truncated, palettes are expanded to color, sub-byte grayscale is scaled to the full byte
/// range and a transparency chunk becomes an explicit alpha channel. Only the first channel of
/// the normalized data is kept, so color images are read as their red channel.
///
/// The decoder holds no state besides its stream, it is consumed by decoding.
///
/// ```
/// use imageproc_canvas::Decoder;
///
/// let not_png: &[u8] = b"GIF89a";
/// let result = Decoder::new(not_png).decode::<i32>();
/// assert!(result.unwrap_err().is_format());
/// ```
pub struct Decoder<R> {
    reader: R,
    options: DecodeOptions,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Decoder { reader, options }
    }

    /// Only read and validate the header.
    pub fn read_info(self) -> Result<RasterInfo, Error> {
        let reader = self.start()?;
        Ok(RasterInfo::from_png(reader.info()))
    }

    /// Decode the image into a new buffer.
    pub fn decode<P: Pixel>(self) -> Result<PixelBuffer<P>, Error> {
        let limit = self.options.limit_bytes;
        let mut reader = self.start()?;
        let info = RasterInfo::from_png(reader.info());
        log::debug!("decoding {info}");

        let (color, depth) = reader.output_color_type();
        if depth != BitDepth::Eight {
            return Err(Error::format(format!(
                "unsupported {depth:?} sample depth after normalization"
            )));
        }

        let channels = color.samples();
        let scratch_len = reader.output_buffer_size();
        if scratch_len > limit {
            return Err(Error::format(format!(
                "image requires {scratch_len} bytes, more than the limit of {limit}"
            )));
        }

        let layout = Layout::<P>::width_and_height(info.width as usize, info.height as usize)
            .ok_or_else(|| Error::format("image dimensions do not fit into memory"))?;
        if layout.byte_len() > limit {
            return Err(Error::format(format!(
                "{info} requires a buffer of {} bytes, more than the limit of {limit}",
                layout.byte_len()
            )));
        }

        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(scratch_len)
            .map_err(|_| Error::format(format!("could not allocate {scratch_len} bytes")))?;
        scratch.resize(scratch_len, 0u8);

        let frame = reader.next_frame(&mut scratch)?;
        // Reads the trailing chunks, so a damaged end marker is still an error.
        reader.finish()?;

        if channels != 1 {
            log::warn!("image has {channels} channels, only reading the first");
        }

        let mut buffer = PixelBuffer::with_layout(layout)
            .map_err(|err| Error::format(format!("could not allocate image: {err}")))?;

        let lines = scratch.chunks_exact(frame.line_size);
        for (row, line) in buffer.rows_mut().zip(lines) {
            for (pixel, sample) in row.iter_mut().zip(line.chunks_exact(channels)) {
                *pixel = P::from_byte(sample[0]);
            }
        }

        Ok(buffer)
    }

    /// Decode the image, replacing the contents of `buffer` only on success.
    ///
    /// On failure the buffer is left exactly as it was.
    pub fn decode_into<P: Pixel>(self, buffer: &mut PixelBuffer<P>) -> Result<(), Error> {
        *buffer = self.decode()?;
        Ok(())
    }

    /// Validate the signature and parse everything up to the image data.
    fn start(mut self) -> Result<png::Reader<Stream<R>>, Error> {
        let mut signature = [0u8; 8];
        match self.reader.read_exact(&mut signature) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                log::error!("stream is shorter than a PNG signature");
                return Err(Error::not_an_image());
            }
            Err(err) => return Err(Error::Io(err)),
        }

        if signature != SIGNATURE {
            log::error!("stream is not a PNG");
            return Err(Error::not_an_image());
        }

        // The signature is validated, hand it back to the parser.
        let stream = Cursor::new(signature).chain(self.reader);
        let mut limits = png::Limits::default();
        limits.bytes = self.options.limit_bytes;

        let mut decoder = png::Decoder::new_with_limits(stream, limits);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let reader = decoder.read_info()?;

        let info = reader.info();
        if info.width == 0 || info.height == 0 {
            return Err(Error::format(format!(
                "image has zero dimensions {}x{}",
                info.width, info.height
            )));
        }

        Ok(reader)
    }
}
