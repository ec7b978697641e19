use crate::frame::{FrameDimensions, COMPONENTS};
use crate::{Frame, FrameSizeError, Kernel};

/// How a frame is processed by [Convolver](crate::Convolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Frame is returned without changes.
    Passthrough,
    /// Per-pixel loop running in the calling code.
    #[default]
    Software,
    /// Accelerated runtime working over its own shared memory.
    Accelerated,
}

impl FilterMode {
    pub fn is_filtering(&self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}

/// Applies kernel to a copy of the source frame.
///
/// Pixels closer than `kernel.half()` to any edge of frame are copied
/// from the source without changes.
///
/// # Examples
///
/// ```
/// use frame_convolve::{convolve, Frame, Kernel};
///
/// let src = Frame::filled(5, 5, [100, 100, 100, 255]);
/// let dst = convolve(&src, &Kernel::sharpen()).unwrap();
/// // Weights of the kernel sum up to 10, the divisor is 4.
/// assert_eq!(dst.pixel(2, 2), Some([250, 250, 250, 255]));
/// assert_eq!(dst.pixel(0, 4), Some([100, 100, 100, 255]));
/// ```
pub fn convolve(src: &Frame, kernel: &Kernel) -> Result<Frame<'static>, FrameSizeError> {
    check_dimensions(src.dimensions(), kernel)?;
    let mut dst = src.copy();
    convolve_interior(src.buffer(), dst.buffer_mut(), src.dimensions(), kernel);
    Ok(dst)
}

pub(crate) fn check_dimensions(
    dimensions: FrameDimensions,
    kernel: &Kernel,
) -> Result<(), FrameSizeError> {
    if dimensions.fits_kernel(kernel.dim()) {
        Ok(())
    } else {
        Err(FrameSizeError {
            width: dimensions.width,
            height: dimensions.height,
            kernel_dim: kernel.dim(),
        })
    }
}

/// Writes filtered color components of interior pixels into `dst`.
///
/// Components are always read from `src`, so `dst` must contain the same
/// data as `src` on input to have unchanged border and alpha channel.
/// Both buffers must have size `dimensions.buffer_len()` and dimensions
/// must fit the kernel.
pub(crate) fn convolve_interior(
    src: &[u8],
    dst: &mut [u8],
    dimensions: FrameDimensions,
    kernel: &Kernel,
) {
    let width = dimensions.width as usize;
    let height = dimensions.height as usize;
    let half = kernel.half();
    let divisor = kernel.divisor() as f64;
    let row_len = width * COMPONENTS;

    for y in half..height - half {
        for x in half..width - half {
            let mut acc = [0i32; 3];
            for (cy, weights) in kernel.rows().enumerate() {
                let row_start = (y + cy - half) * row_len;
                for (cx, &weight) in weights.iter().enumerate() {
                    let px = row_start + (x + cx - half) * COMPONENTS;
                    for (a, &c) in acc.iter_mut().zip(&src[px..px + 3]) {
                        *a += c as i32 * weight as i32;
                    }
                }
            }
            let px = (y * width + x) * COMPONENTS;
            for (d, a) in dst[px..px + 3].iter_mut().zip(acc) {
                *d = clamp_component(a as f64 / divisor);
            }
        }
    }
}

/// Float to u8 conversion with saturation; fractional part is truncated.
#[inline(always)]
fn clamp_component(v: f64) -> u8 {
    v.clamp(0., 255.) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_truncates_fraction() {
        assert_eq!(clamp_component(-3.5), 0);
        assert_eq!(clamp_component(12.99), 12);
        assert_eq!(clamp_component(255.5), 255);
        assert_eq!(clamp_component(1e9), 255);
    }

    #[test]
    fn single_interior_pixel() {
        // 3x3 frame, only the center pixel is filtered.
        let mut buffer = Vec::new();
        for i in 0..9u8 {
            buffer.extend([i * 10, i, 200, 7]);
        }
        let src = Frame::from_vec(3, 3, buffer).unwrap();
        let dst = convolve(&src, &Kernel::sharpen()).unwrap();
        // Sum of weights is 9, center weight 14 -> (14 * c - sum of others) / 4
        let r: i32 = [-1, -1, 1, -1, 14, -1, 1, -1, -1]
            .iter()
            .zip(0..9)
            .map(|(&w, i)| w * i * 10)
            .sum();
        let g: i32 = [-1, -1, 1, -1, 14, -1, 1, -1, -1]
            .iter()
            .zip(0..9)
            .map(|(&w, i)| w * i)
            .sum();
        assert_eq!(
            dst.pixel(1, 1),
            Some([(r / 4).clamp(0, 255) as u8, (g / 4) as u8, 255, 7])
        );
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(dst.pixel(x, y), src.pixel(x, y));
        }
    }

    #[test]
    fn frame_smaller_than_kernel() {
        let src = Frame::new(2, 10);
        assert_eq!(
            convolve(&src, &Kernel::sharpen()).unwrap_err(),
            FrameSizeError {
                width: 2,
                height: 10,
                kernel_dim: 3
            }
        );
    }
}
