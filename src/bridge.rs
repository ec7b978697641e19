use std::num::NonZeroI32;

use crate::accelerator::{Accelerator, Region};
use crate::frame::FrameDimensions;
use crate::{CapacityError, FilterError, FrameBufferError, Kernel, KernelError};

/// Moves kernels and frames into the shared memory of [Accelerator]
/// and reads filtered frames back.
///
/// The bridge keeps only offsets of regions. Views into the memory
/// are created for every call and borrow the bridge, so a view can't
/// be used after the memory was grown for a bigger frame.
#[derive(Debug)]
pub struct MemoryBridge {
    runtime: Accelerator,
    kernel_region: Region,
    data_offset: usize,
    kernel_uploaded: bool,
}

impl MemoryBridge {
    pub fn new(runtime: Accelerator) -> Self {
        let kernel_region = Region::new(runtime.kernel_offset(), runtime.kernel_capacity());
        let data_offset = runtime.data_offset();
        Self {
            runtime,
            kernel_region,
            data_offset,
            kernel_uploaded: false,
        }
    }

    #[inline(always)]
    pub fn runtime(&self) -> &Accelerator {
        &self.runtime
    }

    #[inline(always)]
    pub fn runtime_mut(&mut self) -> &mut Accelerator {
        &mut self.runtime
    }

    #[inline(always)]
    pub fn kernel_offset(&self) -> usize {
        self.kernel_region.offset
    }

    #[inline(always)]
    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    pub fn is_kernel_uploaded(&self) -> bool {
        self.kernel_uploaded
    }

    /// Copies row-major weights of kernel into the kernel region.
    pub fn upload_kernel(&mut self, kernel: &Kernel) -> Result<(), KernelError> {
        let expected = self.runtime.kernel_dim();
        if kernel.dim() != expected {
            return Err(KernelError::DimensionMismatch {
                expected,
                actual: kernel.dim(),
            });
        }
        let region = self.kernel_region;
        match self.runtime.memory_mut().region_i8_mut(region) {
            Some(kernel_view) => kernel_view.copy_from_slice(kernel.flat()),
            None => unreachable!("kernel region is allocated with the runtime"),
        }
        self.kernel_uploaded = true;
        log::debug!(
            "Kernel {}x{} is uploaded at offset {}",
            kernel.dim(),
            kernel.dim(),
            region.offset
        );
        Ok(())
    }

    /// Row-major weights stored in the kernel region.
    pub fn kernel_view(&self) -> &[i8] {
        self.runtime
            .memory()
            .region_i8(self.kernel_region)
            .unwrap_or_default()
    }

    /// Filters RGBA frame by the accelerated runtime.
    ///
    /// Returns view of exactly `width * height * 4` bytes from the frame
    /// region. Memory is grown if the frame is bigger than any previous one.
    /// The kernel must be uploaded by [MemoryBridge::upload_kernel] before.
    pub fn filter(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        divisor: NonZeroI32,
    ) -> Result<&[u8], FilterError> {
        if !self.kernel_uploaded {
            return Err(FilterError::KernelNotUploaded);
        }
        let len = FrameDimensions::new(width, height).buffer_len();
        if pixels.len() != len {
            return Err(FrameBufferError::InvalidBufferSize.into());
        }
        self.runtime.ensure_frame_capacity(len)?;

        let frame_region = Region::new(self.data_offset, len);
        let capacity = self.runtime.frame_capacity();
        let frame_view = self
            .runtime
            .memory_mut()
            .region_mut(frame_region)
            .ok_or(CapacityError::FrameDoesNotFit { len, capacity })?;
        frame_view.copy_from_slice(pixels);

        self.runtime.compute_convolution(width, height, divisor)?;

        let result = self
            .runtime
            .memory()
            .region(frame_region)
            .ok_or(CapacityError::FrameDoesNotFit { len, capacity })?;
        Ok(result)
    }
}
