//! Describes the raster header of an encoded image.
use core::fmt;

/// The color model of the samples stored in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// A single intensity channel.
    Luma,
    /// Intensity with an alpha channel.
    LumaA,
    Rgb,
    RgbA,
    /// Indices into a palette of `Rgb` colors.
    Indexed,
}

/// The header information of an encoded image.
///
/// Describes the file as stored, before any normalization done by the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RasterInfo {
    /// The number of pixels along our width.
    pub width: u32,
    /// The number of pixels along our height.
    pub height: u32,
    /// Bits per channel, one of 1, 2, 4, 8 or 16.
    pub bit_depth: u8,
    pub color: ColorMode,
    pub interlaced: bool,
    /// The file declares a transparency side-channel (`tRNS`).
    pub transparency: bool,
}

impl ColorMode {
    /// The number of channels of a pixel as stored.
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Luma | ColorMode::Indexed => 1,
            ColorMode::LumaA => 2,
            ColorMode::Rgb => 3,
            ColorMode::RgbA => 4,
        }
    }
}

impl RasterInfo {
    pub(crate) fn from_png(info: &png::Info<'_>) -> Self {
        RasterInfo {
            width: info.width,
            height: info.height,
            bit_depth: info.bit_depth as u8,
            color: info.color_type.into(),
            interlaced: info.interlaced,
            transparency: info.trns.is_some(),
        }
    }

    /// The number of channels once palettes are expanded and transparency is an alpha channel.
    pub fn normalized_channels(&self) -> usize {
        let color = match self.color {
            ColorMode::Indexed => ColorMode::Rgb.channels(),
            other => other.channels(),
        };

        match self.color {
            ColorMode::Luma | ColorMode::Rgb | ColorMode::Indexed if self.transparency => color + 1,
            _ => color,
        }
    }
}

impl From<png::ColorType> for ColorMode {
    fn from(color: png::ColorType) -> Self {
        match color {
            png::ColorType::Grayscale => ColorMode::Luma,
            png::ColorType::GrayscaleAlpha => ColorMode::LumaA,
            png::ColorType::Rgb => ColorMode::Rgb,
            png::ColorType::Rgba => ColorMode::RgbA,
            png::ColorType::Indexed => ColorMode::Indexed,
        }
    }
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} {:?} at {} bit",
            self.width, self.height, self.color, self.bit_depth
        )?;

        if self.transparency {
            f.write_str(", with transparency")?;
        }

        if self.interlaced {
            f.write_str(", interlaced")?;
        }

        Ok(())
    }
}
