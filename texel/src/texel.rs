// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `imageproc` developers

/// Construct a sample from a raw decoded byte.
///
/// This is the only way a codec creates samples. The byte is the first channel of the decoded,
/// 8-bit normalized row data.
pub trait FromByte {
    fn from_byte(byte: u8) -> Self;
}

/// Reduce a sample to a single displayable byte.
///
/// Implementations must be total and deterministic: every representable value, including the
/// degenerate ones such as `NaN` components, has a defined projection. There is intentionally no
/// blanket implementation, each sample type decides how it is displayed.
pub trait Projection {
    fn project(&self) -> u8;
}

/// Describes a type which can be stored in a [`PixelBuffer`].
///
/// This is a pure alias for the combination of capabilities a buffer and its codec need. It is
/// implemented automatically, to add a new sample type implement [`FromByte`] and [`Projection`].
///
/// [`PixelBuffer`]: crate::PixelBuffer
pub trait Pixel: Copy + Default + FromByte + Projection {}

impl<P> Pixel for P where P: Copy + Default + FromByte + Projection {}

macro_rules! scalar_pixel {
    ($($type:ty),*) => {
        $(
            impl FromByte for $type {
                fn from_byte(byte: u8) -> Self {
                    <$type>::from(byte)
                }
            }

            impl Projection for $type {
                fn project(&self) -> u8 {
                    (*self).clamp(0 as $type, u8::MAX as $type) as u8
                }
            }
        )*
    };
}

scalar_pixel!(u8, i16, u16, i32, u32, i64, u64);

impl FromByte for i8 {
    /// Values above `i8::MAX` saturate, a decoded byte never wraps into the negative range.
    fn from_byte(byte: u8) -> Self {
        i8::try_from(byte).unwrap_or(i8::MAX)
    }
}

impl Projection for i8 {
    fn project(&self) -> u8 {
        (*self).max(0) as u8
    }
}
