//! Containers for RGBA frames.
use crate::FrameBufferError;

#[cfg(feature = "image")]
mod image_crate;

/// Count of components in every pixel: three color channels and alpha.
pub const COMPONENTS: usize = 4;

/// Width and height of a frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the pixel buffer of a frame with these dimensions, in bytes.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * COMPONENTS
    }

    /// Returns `true` if both sides are not less than `kernel_dim`.
    #[inline]
    pub fn fits_kernel(&self, kernel_dim: usize) -> bool {
        self.width as usize >= kernel_dim && self.height as usize >= kernel_dim
    }
}

#[derive(Debug)]
enum BufferContainer<'a> {
    Borrowed(&'a mut [u8]),
    Owned(Vec<u8>),
}

impl<'a> BufferContainer<'a> {
    fn as_vec(&self) -> Vec<u8> {
        match self {
            Self::Borrowed(slice) => slice.to_vec(),
            Self::Owned(vec) => vec.clone(),
        }
    }
}

/// Frame with interleaved RGBA components (`u8` each).
///
/// Length of buffer is always equal to `width * height * 4`.
#[derive(Debug)]
pub struct Frame<'a> {
    dimensions: FrameDimensions,
    buffer: BufferContainer<'a>,
}

impl Frame<'static> {
    /// Create a frame with all components equal to zero.
    pub fn new(width: u32, height: u32) -> Self {
        let dimensions = FrameDimensions::new(width, height);
        let buffer = BufferContainer::Owned(vec![0; dimensions.buffer_len()]);
        Self { dimensions, buffer }
    }

    /// Create a frame with all pixels equal to the given RGBA value.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let dimensions = FrameDimensions::new(width, height);
        let buffer: Vec<u8> = pixel
            .iter()
            .copied()
            .cycle()
            .take(dimensions.buffer_len())
            .collect();
        Self {
            dimensions,
            buffer: BufferContainer::Owned(buffer),
        }
    }

    /// Create a frame from vector with pixels data.
    pub fn from_vec(width: u32, height: u32, buffer: Vec<u8>) -> Result<Self, FrameBufferError> {
        let dimensions = FrameDimensions::new(width, height);
        if buffer.len() != dimensions.buffer_len() {
            return Err(FrameBufferError::InvalidBufferSize);
        }
        Ok(Self {
            dimensions,
            buffer: BufferContainer::Owned(buffer),
        })
    }
}

impl<'a> Frame<'a> {
    /// Create a frame from slice with pixels data.
    pub fn from_slice(
        width: u32,
        height: u32,
        buffer: &'a mut [u8],
    ) -> Result<Self, FrameBufferError> {
        let dimensions = FrameDimensions::new(width, height);
        if buffer.len() != dimensions.buffer_len() {
            return Err(FrameBufferError::InvalidBufferSize);
        }
        Ok(Self {
            dimensions,
            buffer: BufferContainer::Borrowed(buffer),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    #[inline]
    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    /// Buffer with pixels data.
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        match &self.buffer {
            BufferContainer::Borrowed(p) => p,
            BufferContainer::Owned(v) => v,
        }
    }

    /// Mutable buffer with pixels data.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        match &mut self.buffer {
            BufferContainer::Borrowed(p) => p,
            BufferContainer::Owned(ref mut v) => v.as_mut_slice(),
        }
    }

    /// RGBA components of the pixel at the given position.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = (y as usize * self.width() as usize + x as usize) * COMPONENTS;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.buffer()[offset..offset + COMPONENTS]);
        Some(pixel)
    }

    /// Iterator over rows of the frame, from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        let row_len = self.width() as usize * COMPONENTS;
        self.buffer().chunks_exact(row_len.max(1))
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        match self.buffer {
            BufferContainer::Borrowed(p) => p.into(),
            BufferContainer::Owned(v) => v,
        }
    }

    /// Creates a copy of the frame.
    pub fn copy(&self) -> Frame<'static> {
        Frame {
            dimensions: self.dimensions,
            buffer: BufferContainer::Owned(self.buffer.as_vec()),
        }
    }
}
