use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seamless_texture as st;
use st::image::{Rgb, RgbImage};

struct Passthrough;

impl st::Inpainter for Passthrough {
    fn inpaint(&self, request: &st::InpaintRequest<'_>) -> Result<RgbImage, st::InpaintError> {
        Ok(request.image.clone())
    }
}

fn texture(dim: u32) -> RgbImage {
    RgbImage::from_fn(dim, dim, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]))
}

fn offset(c: &mut Criterion) {
    static DIM: u32 = 128;

    let mut group = c.benchmark_group("offset");

    for dim in [DIM, 2 * DIM, 4 * DIM, 8 * DIM].iter() {
        let img = texture(*dim);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &img, |b, img| {
            b.iter(|| black_box(st::offset_by_half(img)));
        });
    }
    group.finish();
}

fn cross_mask(c: &mut Criterion) {
    static DIM: u32 = 128;

    let mut group = c.benchmark_group("cross_mask");

    for dim in [DIM, 2 * DIM, 4 * DIM, 8 * DIM].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(dim), dim, |b, &dim| {
            b.iter(|| black_box(st::cross_mask(st::Dims::square(dim), st::DEFAULT_BAND_WIDTH)));
        });
    }
    group.finish();
}

fn full_pipeline(c: &mut Criterion) {
    static DIM: u32 = 128;

    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(10);

    for dim in [DIM, 2 * DIM, 4 * DIM, 8 * DIM].iter() {
        // Generate the texture once to reduce variation between runs,
        // though we still do a memcpy each run
        let img = texture(*dim);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &img, |b, img| {
            b.iter(|| {
                let session = st::Session::builder()
                    .load_texture(img.clone())
                    .build()
                    .unwrap();

                black_box(session.run(&Passthrough, None).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, offset, cross_mask, full_pipeline);
criterion_main!(benches);
