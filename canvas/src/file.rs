//! Helpers working directly on files.
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use imageproc_texel::{Pixel, PixelBuffer};

use crate::{encode_to_vec, Decoder, EncodeOptions, Error};

/// Decode the image stored at `path` into a new buffer.
pub fn load<P: Pixel>(path: impl AsRef<Path>) -> Result<PixelBuffer<P>, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        log::error!("could not open {}: {err}", path.display());
        Error::Io(err)
    })?;

    log::debug!("loading {}", path.display());
    Decoder::new(BufReader::new(file)).decode()
}

/// Decode the image stored at `path`, replacing `buffer` only on success.
pub fn load_into<P: Pixel>(
    path: impl AsRef<Path>,
    buffer: &mut PixelBuffer<P>,
) -> Result<(), Error> {
    *buffer = load(path)?;
    Ok(())
}

/// Encode `buffer` as 8-bit grayscale and write it to `path`.
///
/// The stream is encoded before the file is created, so an encoding failure leaves an existing
/// file untouched.
pub fn save<P: Pixel>(path: impl AsRef<Path>, buffer: &PixelBuffer<P>) -> Result<(), Error> {
    let path = path.as_ref();
    let stream = encode_to_vec(buffer, &EncodeOptions::default())?;

    let mut file = File::create(path).map_err(|err| {
        log::error!("could not create {}: {err}", path.display());
        Error::Io(err)
    })?;

    log::debug!("saving {} bytes to {}", stream.len(), path.display());
    file.write_all(&stream)?;
    file.flush()?;
    Ok(())
}
