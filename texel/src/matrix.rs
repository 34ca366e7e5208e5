// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `imageproc` developers
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::{cmp, fmt, mem};

use crate::texel::Pixel;

/// A 2d, row-major matrix of samples.
///
/// The buffer always stores exactly `width * height` samples without holes and exclusively owns
/// them. There are two ways of picking dimensions. The direct methods, `resize` and
/// `with_width_and_height`, validate the request themselves. Manually using the intermediate
/// [`Layout`] allows inspecting the eventual allocation size before any memory is reserved.
///
/// ## Resizing
///
/// Resizing is not a reshape. The current samples are released first and the new storage is
/// default-initialized, so no prior contents survive a resize. When a resize fails the buffer is
/// left empty, never with dimensions that disagree with its storage.
///
/// ## Access
///
/// Coordinates are signed and clamped. Reading one sample beyond the border, as convolution
/// kernels do, yields the nearest border sample. Every clamped access is reported with a warning
/// through the `log` facade. Only access into an empty buffer is an error.
///
/// ```
/// use imageproc_texel::{BufferError, PixelBuffer};
///
/// let mut buffer = PixelBuffer::<i32>::new();
/// buffer.resize(3, 2)?;
/// *buffer.pixel_mut(2, 1)? = 7;
///
/// // One beyond the bottom right corner is the corner itself.
/// assert_eq!(*buffer.pixel(3, 2)?, 7);
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct PixelBuffer<P> {
    data: Vec<P>,
    layout: Layout<P>,
}

/// The validated dimensions of a [`PixelBuffer`].
///
/// A layout can only be constructed when its sample count, and the byte size of that many
/// samples, are representable in `usize`. Construction does not allocate.
pub struct Layout<P> {
    width: usize,
    height: usize,
    pixel: PhantomData<P>,
}

/// Errors of buffer allocation and access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A negative width or height was requested.
    #[error("image dimensions ({width}, {height}) are invalid")]
    InvalidDimension { width: isize, height: isize },
    /// Sample access on a buffer with zero width or height.
    #[error("image is empty")]
    EmptyBuffer,
    /// Storage for a non-empty buffer could not be allocated.
    #[error("could not allocate memory for a {width}x{height} image")]
    OutOfMemory { width: usize, height: usize },
}

impl<P> PixelBuffer<P> {
    /// Create an empty buffer, without any allocation.
    pub const fn new() -> Self {
        PixelBuffer {
            data: Vec::new(),
            layout: Layout::empty(),
        }
    }

    /// Wrap existing samples, in row-major order.
    ///
    /// Returns `None` when the number of samples does not match the layout.
    pub fn from_pixels(layout: Layout<P>, data: Vec<P>) -> Option<Self> {
        if data.len() != layout.len() {
            return None;
        }

        Some(PixelBuffer { data, layout })
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn layout(&self) -> Layout<P> {
        self.layout
    }

    /// The number of samples, always `width * height`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no samples, i.e. one of its dimensions is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.data
    }

    /// Return the samples as a native endian byte slice.
    pub fn as_bytes(&self) -> &[u8]
    where
        P: bytemuck::Pod,
    {
        bytemuck::cast_slice(&self.data)
    }

    /// Iterate over the rows of the buffer, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[P]> + '_ {
        // An empty buffer has no samples, so a chunk size of one yields no rows at all.
        self.data.chunks_exact(self.width().max(1))
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [P]> + '_ {
        let width = self.width().max(1);
        self.data.chunks_exact_mut(width)
    }

    /// Unwrap the samples, in row-major order.
    pub fn into_pixels(self) -> Vec<P> {
        self.data
    }

    /// Map a signed coordinate to the index of its sample.
    ///
    /// Coordinates outside the buffer are clamped to the nearest border sample and a warning is
    /// logged. Fails only when the buffer is empty.
    pub fn clamp_index(&self, x: isize, y: isize) -> Result<usize, BufferError> {
        if self.is_empty() {
            log::error!("pixel ({x}, {y}) requested from an empty image");
            return Err(BufferError::EmptyBuffer);
        }

        if !self.layout.in_bounds(x, y) {
            log::warn!(
                "pixel coordinate ({x}, {y}) is outside of the {}x{} image, clamping",
                self.width(),
                self.height(),
            );
        }

        let x = clamp_axis(x, self.width());
        let y = clamp_axis(y, self.height());
        Ok(self.layout.index_of(x, y))
    }

    /// Get the sample at a clamped coordinate.
    pub fn pixel(&self, x: isize, y: isize) -> Result<&P, BufferError> {
        let index = self.clamp_index(x, y)?;
        Ok(&self.data[index])
    }

    /// Get the sample at a clamped coordinate for modification.
    ///
    /// Note that an out-of-range write lands on the border sample it was clamped to.
    pub fn pixel_mut(&mut self, x: isize, y: isize) -> Result<&mut P, BufferError> {
        let index = self.clamp_index(x, y)?;
        Ok(&mut self.data[index])
    }

    /// Release the storage, leaving an empty 0x0 buffer.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.layout = Layout::empty();
    }
}

impl<P: Pixel> PixelBuffer<P> {
    /// Allocate a default-initialized buffer.
    pub fn with_width_and_height(width: usize, height: usize) -> Result<Self, BufferError> {
        let layout = Layout::width_and_height(width, height)
            .ok_or(BufferError::OutOfMemory { width, height })?;
        Self::with_layout(layout)
    }

    /// Allocate a default-initialized buffer for a validated layout.
    pub fn with_layout(layout: Layout<P>) -> Result<Self, BufferError> {
        let data = allocate(layout)?;
        Ok(PixelBuffer { data, layout })
    }

    /// Destroy the contents and recreate the buffer with new dimensions.
    ///
    /// Negative dimensions fail with [`BufferError::InvalidDimension`]. In every failure case the
    /// buffer is empty afterwards.
    pub fn resize(&mut self, width: isize, height: isize) -> Result<(), BufferError> {
        self.clear();

        let (width, height) = match (usize::try_from(width), usize::try_from(height)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                log::error!("new image dimensions ({width}, {height}) are invalid");
                return Err(BufferError::InvalidDimension { width, height });
            }
        };

        let layout = Layout::width_and_height(width, height)
            .ok_or(BufferError::OutOfMemory { width, height })?;
        self.resize_to(layout)
    }

    /// Destroy the contents and recreate the buffer for a validated layout.
    pub fn resize_to(&mut self, layout: Layout<P>) -> Result<(), BufferError> {
        self.clear();
        log::trace!("allocating {}x{} image", layout.width, layout.height);
        self.data = allocate(layout)?;
        self.layout = layout;
        Ok(())
    }

    /// Make this buffer a deep copy of `other`.
    ///
    /// The buffer is resized to the dimensions of `other`, then every sample is copied. The two
    /// buffers share nothing afterwards.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), BufferError> {
        self.resize_to(other.layout)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Assign the same value to every sample.
    pub fn fill(&mut self, value: P) {
        self.data.fill(value);
    }

    /// Apply a function to all samples, creating a buffer of the same dimensions.
    ///
    /// Unlike `resize` this keeps the contents, converted sample by sample.
    pub fn map<Q, F>(&self, mut map: F) -> Result<PixelBuffer<Q>, BufferError>
    where
        F: FnMut(P) -> Q,
        Q: Pixel,
    {
        let layout = self.layout.map::<Q>().ok_or(BufferError::OutOfMemory {
            width: self.width(),
            height: self.height(),
        })?;

        let mut data = Vec::new();
        data.try_reserve_exact(layout.len())
            .map_err(|_| BufferError::OutOfMemory {
                width: layout.width,
                height: layout.height,
            })?;
        data.extend(self.data.iter().map(|&pixel| map(pixel)));

        Ok(PixelBuffer { data, layout })
    }
}

fn allocate<P: Pixel>(layout: Layout<P>) -> Result<Vec<P>, BufferError> {
    let mut data = Vec::new();
    if data.try_reserve_exact(layout.len()).is_err() {
        log::error!(
            "could not allocate memory for a {}x{} image",
            layout.width,
            layout.height
        );
        return Err(BufferError::OutOfMemory {
            width: layout.width,
            height: layout.height,
        });
    }

    data.resize(layout.len(), P::default());
    Ok(data)
}

fn clamp_axis(coord: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    match usize::try_from(coord) {
        Ok(coord) => coord.min(len - 1),
        Err(_) => 0,
    }
}

impl<P> Layout<P> {
    /// Check that `width * height` samples of `P` can be addressed.
    pub fn width_and_height(width: usize, height: usize) -> Option<Self> {
        let max_index = width.checked_mul(height)?;
        let bytes = max_index.checked_mul(mem::size_of::<P>())?;
        // Same bound as the allocator places on a single allocation.
        if bytes > isize::MAX as usize {
            return None;
        }

        Some(Layout {
            width,
            height,
            pixel: PhantomData,
        })
    }

    pub const fn empty() -> Self {
        Layout {
            width: 0,
            height: 0,
            pixel: PhantomData,
        }
    }

    pub fn width(self) -> usize {
        self.width
    }

    pub fn height(self) -> usize {
        self.height
    }

    /// The number of samples in this layout.
    pub fn len(self) -> usize {
        // Can't overflow, checked on construction.
        self.width * self.height
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Get the required bytes for this layout.
    pub fn byte_len(self) -> usize {
        self.len() * mem::size_of::<P>()
    }

    /// Utility method to change the sample type without changing the dimensions.
    pub fn map<Q>(self) -> Option<Layout<Q>> {
        Layout::width_and_height(self.width, self.height)
    }

    pub(crate) fn index_of(self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub(crate) fn in_bounds(self, x: isize, y: isize) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => x < self.width && y < self.height,
            _ => false,
        }
    }
}

impl<P> Default for Layout<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> Clone for Layout<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Layout<P> {}

impl<P> cmp::PartialEq for Layout<P> {
    fn eq(&self, other: &Self) -> bool {
        (self.width, self.height) == (other.width, other.height)
    }
}

impl<P> cmp::Eq for Layout<P> {}

impl<P> fmt::Debug for Layout<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Layout")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl<P> Default for PixelBuffer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug> fmt::Debug for PixelBuffer<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("layout", &self.layout)
            .field("content", &self.data)
            .finish()
    }
}
