#![allow(dead_code)]
use frame_convolve::{CpuExtensions, Frame, Kernel};

/// Frame filled by deterministic pseudo-random components.
pub fn noise_frame(width: u32, height: u32, seed: u32) -> Frame<'static> {
    let mut state = seed.wrapping_mul(0x9E37_79B9) | 1;
    let len = width as usize * height as usize * 4;
    let buffer = (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    Frame::from_vec(width, height, buffer).unwrap()
}

/// Frame with horizontal gradient in red, vertical in green
/// and constant blue and alpha.
pub fn gradient_frame(width: u32, height: u32) -> Frame<'static> {
    let mut buffer = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            buffer.extend_from_slice(&[
                (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8,
                (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8,
                128,
                200,
            ]);
        }
    }
    Frame::from_vec(width, height, buffer).unwrap()
}

pub fn frame_checksum(frame: &Frame) -> [u64; 4] {
    let mut res = [0u64; 4];
    for pixel in frame.buffer().chunks_exact(4) {
        res.iter_mut().zip(pixel).for_each(|(d, &s)| *d += s as u64);
    }
    res
}

/// Kernels that are used to compare software and accelerated filtering.
pub fn kernels() -> Vec<(&'static str, Kernel)> {
    let mut weights_5x5: Vec<i8> = (0..25).map(|i| (i % 7) as i8 - 3).collect();
    weights_5x5[12] = 24;
    vec![
        ("sharpen", Kernel::sharpen()),
        ("identity", Kernel::identity(3).unwrap()),
        ("blur", Kernel::from_flat(3, vec![1; 9], 9).unwrap()),
        (
            "extreme",
            Kernel::new(&[[127, -128, 127], [-128, 127, -128], [127, -128, 127]], 3).unwrap(),
        ),
        (
            "negative_divisor",
            Kernel::new(&[[0, 1, 0], [1, -4, 1], [0, 1, 0]], -2).unwrap(),
        ),
        ("5x5", Kernel::from_flat(5, weights_5x5, 7).unwrap()),
        ("1x1", Kernel::from_flat(1, vec![3], 2).unwrap()),
    ]
}

pub fn cpu_extensions() -> Vec<CpuExtensions> {
    let mut cpu_extensions_vec = vec![CpuExtensions::None];
    #[cfg(target_arch = "x86_64")]
    {
        cpu_extensions_vec.push(CpuExtensions::Sse4_1);
    }
    cpu_extensions_vec
        .into_iter()
        .filter(|e| e.is_supported())
        .collect()
}

pub const fn cpu_ext_into_str(cpu_extensions: CpuExtensions) -> &'static str {
    match cpu_extensions {
        CpuExtensions::None => "rust",
        #[cfg(target_arch = "x86_64")]
        CpuExtensions::Sse4_1 => "sse4.1",
    }
}
