// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `imageproc` developers
//! # Pixel buffers
//!
//! A two dimensional buffer generic over its sample type, meant for small experimental image
//! processing pipelines: a buffer is decoded, transformed by filters, and encoded again.
//!
//! This library is strictly `no_std`. Samples are plain `Copy` values bound by two capabilities:
//!
//! - [`FromByte`], constructing a sample from a decoded 8-bit channel value.
//! - [`Projection`], reducing a sample to a displayable byte for encoding.
//!
//! Scalar integers and [`Complex`] values implement both. The buffer itself never fails on an
//! out-of-range coordinate. Instead, coordinates are clamped to the border which gives filters a
//! well-defined boundary extension.
//!
//! ## Usage
//!
//! ```
//! use imageproc_texel::{Complex, PixelBuffer, Projection};
//!
//! let mut image = PixelBuffer::<i32>::with_width_and_height(4, 4)?;
//!
//! // Draw a bright diagonal.
//! for i in 0..4 {
//!     *image.pixel_mut(i, i)? = 255;
//! }
//!
//! // Move into the complex domain, e.g. for a frequency filter.
//! let spectrum = image.map(|p| Complex::from(f64::from(p)))?;
//! assert_eq!(spectrum.pixel(3, 3)?.project(), 255);
//! # Ok::<(), imageproc_texel::BufferError>(())
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
// The only module allowed to be `unsafe` is `complex`, for its derived `Pod` impl.
#![deny(unsafe_code)]
extern crate alloc;

mod complex;
mod matrix;
mod texel;

pub use self::complex::Complex;
pub use self::matrix::{BufferError, Layout, PixelBuffer};
pub use self::texel::{FromByte, Pixel, Projection};

/// A buffer of scalar integer intensities.
pub type ScalarBuffer = PixelBuffer<i32>;

/// A buffer of complex-valued samples.
pub type ComplexBuffer = PixelBuffer<Complex>;
