use crate::accelerator::{Accelerator, AcceleratorOptions};
use crate::bridge::MemoryBridge;
use crate::convolution::{check_dimensions, convolve_interior};
use crate::{CpuExtensions, FilterError, FilterMode, Frame, InitError, Kernel};

/// Methods of this structure used to filter frames by a convolution kernel.
///
/// By default, the accelerated runtime uses the best CPU-extensions provided
/// by your CPU. You can change this by use method [Convolver::set_cpu_extensions].
///
/// The accelerated runtime is created by the first call of
/// [Convolver::filter] in [FilterMode::Accelerated] mode
/// or by [Convolver::init_accelerator].
///
/// # Examples
///
/// ```
/// use frame_convolve::{Convolver, FilterMode, Frame, Kernel};
///
/// let mut frame = Frame::filled(8, 6, [100, 100, 100, 255]);
/// let mut convolver = Convolver::new(Kernel::sharpen());
/// convolver.filter(&mut frame, FilterMode::Accelerated).unwrap();
/// assert_eq!(frame.pixel(3, 3), Some([250, 250, 250, 255]));
/// assert_eq!(frame.pixel(0, 0), Some([100, 100, 100, 255]));
/// ```
#[derive(Debug)]
pub struct Convolver {
    kernel: Kernel,
    options: AcceleratorOptions,
    bridge: Option<MemoryBridge>,
    source_buffer: Vec<u8>,
}

impl Convolver {
    pub fn new(kernel: Kernel) -> Self {
        Self::with_options(kernel, AcceleratorOptions::default())
    }

    pub fn with_options(kernel: Kernel, options: AcceleratorOptions) -> Self {
        Self {
            kernel,
            options,
            bridge: None,
            source_buffer: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    #[inline(always)]
    pub fn cpu_extensions(&self) -> CpuExtensions {
        self.options.cpu_extensions
    }

    /// # Safety
    /// This is unsafe because this method allows you to set a CPU-extensions
    /// that is not actually supported by your CPU.
    pub unsafe fn set_cpu_extensions(&mut self, extensions: CpuExtensions) {
        self.options.cpu_extensions = extensions;
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.runtime_mut().set_cpu_extensions(extensions);
        }
    }

    /// Bridge to the accelerated runtime, if it was initialized.
    pub fn bridge(&self) -> Option<&MemoryBridge> {
        self.bridge.as_ref()
    }

    /// Creates the accelerated runtime and uploads the kernel into it.
    /// Does nothing if the runtime already exists.
    pub fn init_accelerator(&mut self) -> Result<&mut MemoryBridge, InitError> {
        match self.bridge {
            Some(ref mut bridge) => Ok(bridge),
            None => {
                let runtime = Accelerator::new(self.kernel.dim(), self.options)?;
                let mut bridge = MemoryBridge::new(runtime);
                bridge.upload_kernel(&self.kernel)?;
                Ok(self.bridge.insert(bridge))
            }
        }
    }

    /// Filters frame in place.
    pub fn filter(&mut self, frame: &mut Frame, mode: FilterMode) -> Result<(), FilterError> {
        let dimensions = frame.dimensions();
        match mode {
            FilterMode::Passthrough => return Ok(()),
            FilterMode::Software => {
                check_dimensions(dimensions, &self.kernel)?;
                self.source_buffer.clear();
                self.source_buffer.extend_from_slice(frame.buffer());
                convolve_interior(
                    &self.source_buffer,
                    frame.buffer_mut(),
                    dimensions,
                    &self.kernel,
                );
            }
            FilterMode::Accelerated => {
                check_dimensions(dimensions, &self.kernel)?;
                let divisor = self.kernel.non_zero_divisor();
                let bridge = self.init_accelerator()?;
                let result = bridge.filter(
                    frame.buffer(),
                    dimensions.width,
                    dimensions.height,
                    divisor,
                )?;
                frame.buffer_mut().copy_from_slice(result);
            }
        }
        log::trace!(
            "Frame {}x{} is filtered in {:?} mode",
            dimensions.width,
            dimensions.height,
            mode
        );
        Ok(())
    }
}
