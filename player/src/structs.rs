use std::str::FromStr;

use frame_convolve as fc;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum Mode {
    /// Frames are rendered without changes.
    Passthrough,
    /// Per-pixel loop.
    Software,
    /// Frames are filtered inside the shared memory of accelerated runtime.
    Accelerated,
}

impl From<Mode> for fc::FilterMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Passthrough => fc::FilterMode::Passthrough,
            Mode::Software => fc::FilterMode::Software,
            Mode::Accelerated => fc::FilterMode::Accelerated,
        }
    }
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum Cpu {
    /// Plain Rust code.
    Native,
    /// SSE4.1 instructions (x86_64 only).
    Sse41,
}

impl Cpu {
    pub fn into_extensions(self) -> Option<fc::CpuExtensions> {
        match self {
            Cpu::Native => Some(fc::CpuExtensions::None),
            #[cfg(target_arch = "x86_64")]
            Cpu::Sse41 => Some(fc::CpuExtensions::Sse4_1),
            #[cfg(not(target_arch = "x86_64"))]
            Cpu::Sse41 => None,
        }
    }
}

/// Weights of kernel: name of a predefined kernel or
/// comma-separated row-major weights.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelWeights {
    Sharpen,
    Identity,
    Custom(Vec<i8>),
}

impl FromStr for KernelWeights {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sharpen" => Ok(Self::Sharpen),
            "identity" => Ok(Self::Identity),
            _ => s
                .split(',')
                .map(|w| {
                    w.trim()
                        .parse::<i8>()
                        .map_err(|e| format!("Invalid weight {:?}: {}", w, e))
                })
                .collect::<Result<Vec<i8>, String>>()
                .map(Self::Custom),
        }
    }
}

impl KernelWeights {
    /// Creates kernel; `divisor` replaces the default divisor of predefined kernels.
    pub fn kernel(&self, divisor: Option<i32>) -> Result<fc::Kernel, String> {
        let (dim, weights, default_divisor) = match self {
            Self::Sharpen => from_kernel(fc::Kernel::sharpen()),
            Self::Identity => from_kernel(fc::Kernel::identity(3).map_err(|e| e.to_string())?),
            Self::Custom(weights) => {
                let dim = (weights.len() as f64).sqrt() as usize;
                if dim * dim != weights.len() {
                    return Err(format!(
                        "Count of weights ({}) is not a square of integer",
                        weights.len()
                    ));
                }
                (dim, weights.clone(), 1)
            }
        };
        fc::Kernel::from_flat(dim, weights, divisor.unwrap_or(default_divisor))
            .map_err(|e| e.to_string())
    }
}

fn from_kernel(kernel: fc::Kernel) -> (usize, Vec<i8>, i32) {
    (kernel.dim(), kernel.flat().to_vec(), kernel.divisor())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kernel_weights() {
        assert_eq!("sharpen".parse(), Ok(KernelWeights::Sharpen));
        assert_eq!(
            "0, -1, 0, -1, 5, -1, 0, -1, 0".parse(),
            Ok(KernelWeights::Custom(vec![0, -1, 0, -1, 5, -1, 0, -1, 0]))
        );
        assert!("1,2,x".parse::<KernelWeights>().is_err());
        assert!("1,300".parse::<KernelWeights>().is_err());
    }

    #[test]
    fn build_kernel() {
        let kernel = KernelWeights::Sharpen.kernel(None).unwrap();
        assert_eq!(kernel, fc::Kernel::sharpen());
        assert_eq!(KernelWeights::Sharpen.kernel(Some(2)).unwrap().divisor(), 2);
        assert!(KernelWeights::Custom(vec![1, 2, 3]).kernel(None).is_err());
        assert!(KernelWeights::Custom(vec![1, 2, 3, 4]).kernel(None).is_err());
        assert!(KernelWeights::Identity.kernel(Some(0)).is_err());
        assert_eq!(
            KernelWeights::Identity.kernel(None).unwrap(),
            fc::Kernel::identity(3).unwrap()
        );
        assert_eq!(KernelWeights::Identity.kernel(Some(3)).unwrap().divisor(), 3);
    }
}
