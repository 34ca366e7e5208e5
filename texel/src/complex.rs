// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `imageproc` developers
#![allow(unsafe_code)]

use core::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};

use crate::texel::{FromByte, Projection};

/// A complex-valued sample with `f64` components.
///
/// The layout is two consecutive `f64`, real part first, so a buffer of them can be viewed as
/// interleaved bytes with [`PixelBuffer::as_bytes`].
///
/// [`PixelBuffer::as_bytes`]: crate::PixelBuffer::as_bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Complex { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// The magnitude `|z|`, computed without intermediate overflow.
    pub fn norm(self) -> f64 {
        libm::hypot(self.re, self.im)
    }

    pub fn conj(self) -> Self {
        Complex {
            re: self.re,
            im: -self.im,
        }
    }

    /// Scale both components by a real factor.
    pub fn scale(self, factor: f64) -> Self {
        Complex {
            re: self.re * factor,
            im: self.im * factor,
        }
    }
}

impl FromByte for Complex {
    fn from_byte(byte: u8) -> Self {
        Complex::new(f64::from(byte), 0.0)
    }
}

impl Projection for Complex {
    /// Rounded magnitude, clamped into the byte range. `NaN` projects to black.
    fn project(&self) -> u8 {
        let magnitude = libm::round(self.norm());
        if magnitude.is_nan() {
            0
        } else {
            magnitude.clamp(0.0, 255.0) as u8
        }
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::new(re, 0.0)
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, other: Complex) -> Complex {
        Complex::new(self.re + other.re, self.im + other.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, other: Complex) -> Complex {
        Complex::new(self.re - other.re, self.im - other.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, other: Complex) -> Complex {
        Complex::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}
