use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    #[error("Kernel must have at least one row")]
    Empty,
    #[error("Count of items in every row of kernel must be equal to count of rows")]
    NotSquare,
    #[error("Dimension of kernel must be odd, got {0}")]
    EvenDimension(usize),
    #[error("Dimension of kernel must not be greater than 255, got {0}")]
    TooLarge(usize),
    #[error("Divisor of kernel must not be zero")]
    ZeroDivisor,
    #[error("Dimension of kernel ({actual}) doesn't match to the reserved kernel region ({expected})")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBufferError {
    #[error("Size of buffer is not equal to width * height * 4")]
    InvalidBufferSize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Frame {width}x{height} is smaller than kernel with dimension {kernel_dim}")]
pub struct FrameSizeError {
    pub width: u32,
    pub height: u32,
    pub kernel_dim: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Growing of shared memory up to {pages} pages exceeds the limit of {max_pages} pages")]
    ExceedsMaxPages { pages: usize, max_pages: usize },
    #[error("Failed to allocate {0} bytes of shared memory")]
    AllocationFailed(usize),
    #[error("Frame of {len} bytes doesn't fit into frame region of {capacity} bytes")]
    FrameDoesNotFit { len: usize, capacity: usize },
    #[error("Size of frame overflows the address space")]
    Overflow,
}

/// Error of setting up the accelerated runtime.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    #[error(transparent)]
    Buffer(#[from] FrameBufferError),
    #[error("Failed to initialize accelerated runtime")]
    Init(#[from] InitError),
    #[error(transparent)]
    FrameSize(#[from] FrameSizeError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("Kernel was not uploaded into the accelerated runtime")]
    KernelNotUploaded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Frame source is temporarily unavailable: {0}")]
    Unavailable(String),
    #[error("Frame source has no more frames")]
    Exhausted,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RenderError(pub String);

#[derive(Error, Debug)]
pub enum TickError {
    #[error("Failed to filter frame")]
    Filter(#[from] FilterError),
    #[error("Frame source has no more frames")]
    SourceExhausted,
    #[error("Failed to render frame")]
    Render(#[from] RenderError),
}
