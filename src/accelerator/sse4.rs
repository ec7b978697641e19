use std::arch::x86_64::*;

use super::{normalize, RowWindow};
use crate::frame::COMPONENTS;

#[inline(always)]
unsafe fn load_pixel_epi32(row: &[u8], offset: usize) -> __m128i {
    let pixel = row.get_unchecked(offset..offset + COMPONENTS);
    let v = i32::from_le_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
    // [32] a b g r
    _mm_cvtepu8_epi32(_mm_cvtsi32_si128(v))
}

/// For safety, it is necessary to ensure the following conditions:
/// - all rows of `window` have the same length as `dst_row`
/// - `kernel.len() == window.dim() * window.dim()`
/// - `dst_row.len() >= window.dim() * 4`
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn convolve_row(
    window: &RowWindow,
    dst_row: &mut [u8],
    kernel: &[i8],
    divisor: i32,
) {
    let dim = window.dim();
    let half = dim / 2;
    let width = dst_row.len() / COMPONENTS;

    for x in half..width - half {
        let first_x_src = (x - half) * COMPONENTS;
        let mut sss = _mm_setzero_si128();
        for (cy, weights) in kernel.chunks_exact(dim).enumerate() {
            let src_row = window.row(cy);
            let mut offset = first_x_src;
            for &k in weights {
                let mmk = _mm_set1_epi32(k as i32);
                let pix = load_pixel_epi32(src_row, offset);
                sss = _mm_add_epi32(sss, _mm_mullo_epi32(pix, mmk));
                offset += COMPONENTS;
            }
        }
        let mut ss = [0i32; 4];
        _mm_storeu_si128(ss.as_mut_ptr() as *mut __m128i, sss);

        // Alpha channel stays untouched.
        let dst_pixel = dst_row.get_unchecked_mut(x * COMPONENTS..x * COMPONENTS + 3);
        for (d, &s) in dst_pixel.iter_mut().zip(&ss) {
            *d = normalize(s, divisor);
        }
    }
}
