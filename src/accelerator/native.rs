use super::{normalize, RowWindow};
use crate::frame::COMPONENTS;

pub(crate) fn convolve_row(window: &RowWindow, dst_row: &mut [u8], kernel: &[i8], divisor: i32) {
    let dim = window.dim();
    let half = dim / 2;
    let width = dst_row.len() / COMPONENTS;

    for x in half..width - half {
        let first_x_src = (x - half) * COMPONENTS;
        let mut ss = [0i32; 3];
        for (cy, weights) in kernel.chunks_exact(dim).enumerate() {
            let src_pixels = window.row(cy)[first_x_src..].chunks_exact(COMPONENTS);
            for (&k, src_pixel) in weights.iter().zip(src_pixels) {
                for (s, &c) in ss.iter_mut().zip(src_pixel) {
                    *s += c as i32 * k as i32;
                }
            }
        }
        let dst_pixel = &mut dst_row[x * COMPONENTS..x * COMPONENTS + 3];
        for (d, s) in dst_pixel.iter_mut().zip(ss) {
            *d = normalize(s, divisor);
        }
    }
}
