use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use frame_convolve::{Convolver, CpuExtensions, FilterMode, Frame, Kernel};

const SIZES: [(u32, u32); 3] = [(320, 240), (640, 480), (1280, 720)];

fn source_frame(width: u32, height: u32) -> Frame<'static> {
    let buffer = (0..width as usize * height as usize * 4)
        .map(|i| (i * 7 % 251) as u8)
        .collect();
    Frame::from_vec(width, height, buffer).unwrap()
}

fn cpu_extensions() -> Vec<CpuExtensions> {
    let mut res = vec![CpuExtensions::None];
    #[cfg(target_arch = "x86_64")]
    res.push(CpuExtensions::Sse4_1);
    res.into_iter().filter(|e| e.is_supported()).collect()
}

fn filter_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filter sharpen 3x3");
    group.sample_size(20);
    for (width, height) in SIZES {
        let src = source_frame(width, height);
        let parameter = format!("{}x{}", width, height);
        group.throughput(Throughput::Elements(width as u64 * height as u64));

        let mut frame = src.copy();
        let mut convolver = Convolver::new(Kernel::sharpen());
        group.bench_with_input(
            BenchmarkId::new("software", &parameter),
            &src,
            |b, src| {
                b.iter(|| {
                    frame.buffer_mut().copy_from_slice(src.buffer());
                    convolver
                        .filter(black_box(&mut frame), FilterMode::Software)
                        .unwrap();
                })
            },
        );

        for cpu_extensions in cpu_extensions() {
            let mut convolver = Convolver::new(Kernel::sharpen());
            unsafe { convolver.set_cpu_extensions(cpu_extensions) };
            group.bench_with_input(
                BenchmarkId::new(format!("accelerated {}", cpu_extensions.name()), &parameter),
                &src,
                |b, src| {
                    b.iter(|| {
                        frame.buffer_mut().copy_from_slice(src.buffer());
                        convolver
                            .filter(black_box(&mut frame), FilterMode::Accelerated)
                            .unwrap();
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, filter_bench);
criterion_main!(benches);
