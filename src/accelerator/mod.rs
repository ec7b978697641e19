//! Accelerated runtime that filters frames inside its own linear memory.
//!
//! The runtime exposes the same boundary as a sandboxed compute module:
//! offsets of the kernel and frame regions, raw memory views and
//! [Accelerator::compute_convolution] that filters the frame region in place.
use std::num::NonZeroI32;

pub use memory::{LinearMemory, Region, PAGE_SIZE};

use crate::frame::{FrameDimensions, COMPONENTS};
use crate::kernel::MAX_KERNEL_DIM;
use crate::{CapacityError, CpuExtensions, InitError, KernelError};

mod memory;
mod native;
cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        mod sse4;

        fn sse4_row(window: &RowWindow, dst_row: &mut [u8], kernel: &[i8], divisor: i32) {
            // SAFETY: Sse4_1 can be selected only if it is supported by CPU
            // or by an unsafe call of `set_cpu_extensions()`.
            unsafe { sse4::convolve_row(window, dst_row, kernel, divisor) }
        }
    }
}

/// Offset of the kernel region. The first kilobyte of memory is reserved.
pub const KERNEL_OFFSET: usize = 1024;
const DATA_ALIGN: usize = 64;
/// Default limit of memory, 1 GiB.
pub const DEFAULT_MAX_PAGES: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceleratorOptions {
    /// Maximal count of pages of linear memory.
    pub max_pages: usize,
    pub cpu_extensions: CpuExtensions,
}

impl Default for AcceleratorOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            cpu_extensions: CpuExtensions::default(),
        }
    }
}

impl AcceleratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// # Safety
    /// This is unsafe because this method allows you to set a CPU-extensions
    /// that is not actually supported by your CPU.
    pub unsafe fn cpu_extensions(mut self, extensions: CpuExtensions) -> Self {
        self.cpu_extensions = extensions;
        self
    }
}

#[derive(Debug)]
pub struct Accelerator {
    memory: LinearMemory,
    kernel_dim: usize,
    data_offset: usize,
    cpu_extensions: CpuExtensions,
    // Copies of source rows that are still needed after
    // the rows were overwritten in memory.
    saved_rows: Vec<u8>,
}

impl Accelerator {
    /// Creates runtime with kernel region for a square kernel
    /// with dimension `kernel_dim`.
    pub fn new(kernel_dim: usize, options: AcceleratorOptions) -> Result<Self, InitError> {
        if kernel_dim == 0 {
            return Err(KernelError::Empty.into());
        }
        if kernel_dim % 2 == 0 {
            return Err(KernelError::EvenDimension(kernel_dim).into());
        }
        if kernel_dim > MAX_KERNEL_DIM {
            return Err(KernelError::TooLarge(kernel_dim).into());
        }
        let kernel_end = KERNEL_OFFSET + kernel_dim * kernel_dim;
        let data_offset = kernel_end.next_multiple_of(DATA_ALIGN);
        let initial_pages = data_offset.div_ceil(PAGE_SIZE);
        let memory = LinearMemory::new(initial_pages, options.max_pages)?;
        log::debug!(
            "Accelerator is initialized: kernel offset {}, data offset {}, {} pages",
            KERNEL_OFFSET,
            data_offset,
            initial_pages
        );
        Ok(Self {
            memory,
            kernel_dim,
            data_offset,
            cpu_extensions: options.cpu_extensions,
            saved_rows: Vec::new(),
        })
    }

    #[inline(always)]
    pub fn cpu_extensions(&self) -> CpuExtensions {
        self.cpu_extensions
    }

    /// # Safety
    /// This is unsafe because this method allows you to set a CPU-extensions
    /// that is not actually supported by your CPU.
    pub unsafe fn set_cpu_extensions(&mut self, extensions: CpuExtensions) {
        self.cpu_extensions = extensions;
    }

    /// Byte offset of the kernel region.
    #[inline(always)]
    pub fn kernel_offset(&self) -> usize {
        KERNEL_OFFSET
    }

    /// Byte offset of the frame region.
    #[inline(always)]
    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    #[inline(always)]
    pub fn kernel_dim(&self) -> usize {
        self.kernel_dim
    }

    /// Size of the kernel region in bytes.
    #[inline(always)]
    pub fn kernel_capacity(&self) -> usize {
        self.kernel_dim * self.kernel_dim
    }

    /// Count of bytes available for frame data with current size of memory.
    pub fn frame_capacity(&self) -> usize {
        self.memory.len().saturating_sub(self.data_offset)
    }

    #[inline(always)]
    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    #[inline(always)]
    pub fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut self.memory
    }

    /// Grows memory so that the frame region can hold `len` bytes.
    pub fn ensure_frame_capacity(&mut self, len: usize) -> Result<(), CapacityError> {
        let required = self
            .data_offset
            .checked_add(len)
            .ok_or(CapacityError::Overflow)?;
        let required_pages = required.div_ceil(PAGE_SIZE);
        let pages = self.memory.pages();
        if required_pages > pages {
            self.memory.grow(required_pages - pages)?;
            log::debug!(
                "Shared memory has grown from {} to {} pages for frame of {} bytes",
                pages,
                required_pages,
                len
            );
            #[cfg(feature = "for_testing")]
            crate::testing::record("memory.grow");
        }
        Ok(())
    }

    /// Filters frame with given dimensions that is stored in the frame region.
    ///
    /// The kernel is read from the kernel region as row-major `i8` values.
    /// Pixels closer than `kernel_dim / 2` to any edge and alpha channel
    /// are not changed.
    pub fn compute_convolution(
        &mut self,
        width: u32,
        height: u32,
        divisor: NonZeroI32,
    ) -> Result<(), CapacityError> {
        let dimensions = FrameDimensions::new(width, height);
        let len = dimensions.buffer_len();
        let capacity = self.frame_capacity();
        if len > capacity {
            return Err(CapacityError::FrameDoesNotFit { len, capacity });
        }
        let dim = self.kernel_dim;
        if !dimensions.fits_kernel(dim) {
            return Ok(());
        }

        let (head, data) = self.memory.bytes_mut().split_at_mut(self.data_offset);
        let kernel: &[i8] =
            bytemuck::cast_slice(&head[KERNEL_OFFSET..KERNEL_OFFSET + dim * dim]);
        let frame = &mut data[..len];

        let width = width as usize;
        let height = height as usize;
        let row_len = width * COMPONENTS;
        let half = dim / 2;

        self.saved_rows.clear();
        self.saved_rows.extend_from_slice(&frame[..dim * row_len]);

        let row_fn = match self.cpu_extensions {
            #[cfg(target_arch = "x86_64")]
            CpuExtensions::Sse4_1 => {
                #[cfg(feature = "for_testing")]
                crate::testing::record("convolution.sse4.1");
                sse4_row as RowFn
            }
            _ => {
                #[cfg(feature = "for_testing")]
                crate::testing::record("convolution.native");
                native::convolve_row as RowFn
            }
        };

        for y in half..height - half {
            let window = RowWindow {
                saved: &self.saved_rows,
                row_len,
                dim,
                top_slot: (y - half) % dim,
            };
            let dst_row = &mut frame[y * row_len..(y + 1) * row_len];
            row_fn(&window, dst_row, kernel, divisor.get());

            // Source row that is needed by the next output row replaces
            // the row that is not needed anymore.
            let next = y + half + 1;
            if next < height {
                let slot = next % dim;
                self.saved_rows[slot * row_len..(slot + 1) * row_len]
                    .copy_from_slice(&frame[next * row_len..(next + 1) * row_len]);
            }
        }
        Ok(())
    }
}

type RowFn = fn(&RowWindow, &mut [u8], &[i8], i32);

/// Ring of `dim` saved source rows around the current output row.
pub(crate) struct RowWindow<'a> {
    saved: &'a [u8],
    row_len: usize,
    dim: usize,
    top_slot: usize,
}

impl<'a> RowWindow<'a> {
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Source row with index `cy` inside of the kernel window (0 is the top).
    #[inline(always)]
    pub fn row(&self, cy: usize) -> &'a [u8] {
        let slot = (self.top_slot + cy) % self.dim;
        &self.saved[slot * self.row_len..(slot + 1) * self.row_len]
    }
}

/// Clamped quotient; equals truncation of the exact quotient
/// clamped to `[0, 255]`.
#[inline(always)]
pub(crate) fn normalize(acc: i32, divisor: i32) -> u8 {
    (acc / divisor).clamp(0, 255) as u8
}
