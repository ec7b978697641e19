#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use accelerator::{Accelerator, AcceleratorOptions};
pub use bridge::MemoryBridge;
pub use convolution::{convolve, FilterMode};
pub use convolver::Convolver;
pub use cpu_extensions::CpuExtensions;
pub use errors::*;
pub use fps::{FpsEstimator, FpsReading};
pub use frame::{Frame, FrameDimensions};
pub use kernel::Kernel;
pub use session::{FrameSource, RenderSink, RunSummary, Session, TickOutcome};

pub mod accelerator;
mod bridge;
mod convolution;
mod convolver;
mod cpu_extensions;
mod errors;
pub mod fps;
pub mod frame;
pub mod kernel;
mod session;
#[cfg(feature = "for_testing")]
pub mod testing;
