use seamless_texture as st;
use st::image::{Rgb, RgbImage};
use std::cell::Cell;

/// Returns the image it was given, counting how often it was called
#[derive(Default)]
struct Passthrough {
    calls: Cell<usize>,
}

impl st::Inpainter for Passthrough {
    fn inpaint(&self, request: &st::InpaintRequest<'_>) -> Result<RgbImage, st::InpaintError> {
        self.calls.set(self.calls.get() + 1);
        Ok(request.image.clone())
    }
}

/// Paints every masked pixel with a flat color
struct PaintMasked(Rgb<u8>);

impl st::Inpainter for PaintMasked {
    fn inpaint(&self, request: &st::InpaintRequest<'_>) -> Result<RgbImage, st::InpaintError> {
        let mut img = request.image.clone();
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            if request.mask.get_pixel(x, y)[0] == st::MASKED {
                *pixel = self.0;
            }
        }
        Ok(img)
    }
}

struct Failing;

impl st::Inpainter for Failing {
    fn inpaint(&self, _: &st::InpaintRequest<'_>) -> Result<RgbImage, st::InpaintError> {
        Err(st::InpaintError::Status {
            code: 500,
            body: "internal error".to_owned(),
        })
    }
}

/// Returns an image half the size it was given
struct Shrinking;

impl st::Inpainter for Shrinking {
    fn inpaint(&self, request: &st::InpaintRequest<'_>) -> Result<RgbImage, st::InpaintError> {
        let (w, h) = request.image.dimensions();
        Ok(RgbImage::new(w / 2, h / 2))
    }
}

fn noise(size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        let v = x.wrapping_mul(31) ^ y.wrapping_mul(17);
        Rgb([v as u8, (v >> 3) as u8, (x + y) as u8])
    })
}

#[test]
fn solid_color_round_trips() {
    let texture = RgbImage::from_pixel(256, 256, Rgb([90, 120, 30]));
    let inpainter = Passthrough::default();

    let seamless = st::make_seamless(&texture, "grass", 0.4, &inpainter).unwrap();

    assert_eq!(seamless, texture);
    assert_eq!(inpainter.calls.get(), 1);
}

#[test]
fn noop_inpaint_round_trips() {
    let texture = noise(256);
    let seamless = st::make_seamless(&texture, "noise", 0.4, &Passthrough::default()).unwrap();

    assert_eq!(seamless, texture);
}

#[test]
fn far_pixel_untouched() {
    let mut texture = RgbImage::from_pixel(256, 256, Rgb([0, 0, 0]));
    texture.put_pixel(10, 10, Rgb([255, 0, 0]));

    let seamless = st::make_seamless(&texture, "", 0.4, &Passthrough::default()).unwrap();

    assert_eq!(*seamless.get_pixel(10, 10), Rgb([255, 0, 0]));
}

#[test]
fn inpainted_band_lands_on_tile_edges() {
    let texture = noise(256);
    let paint = Rgb([1, 2, 3]);

    let seamless = st::Session::builder()
        .load_texture(texture.clone())
        .band_width(64)
        .build()
        .unwrap()
        .run(&PaintMasked(paint), None)
        .unwrap()
        .into_image();

    let on_edge = |v: u32| v < 32 || v >= 224;

    for (x, y, pixel) in seamless.enumerate_pixels() {
        if on_edge(x) || on_edge(y) {
            assert_eq!(*pixel, paint, "edge pixel ({}, {}) wasn't inpainted", x, y);
        } else {
            assert_eq!(
                pixel,
                texture.get_pixel(x, y),
                "interior pixel ({}, {}) was changed",
                x,
                y
            );
        }
    }
}

#[test]
fn inpainter_gets_offset_texture_and_cross() {
    struct Inspect;

    impl st::Inpainter for Inspect {
        fn inpaint(
            &self,
            request: &st::InpaintRequest<'_>,
        ) -> Result<RgbImage, st::InpaintError> {
            assert_eq!(request.prompt, "bricks");
            assert!((request.denoising_strength - 0.75).abs() < f32::EPSILON);
            assert_eq!(request.mask.dimensions(), request.image.dimensions());
            assert_eq!(
                *request.mask,
                st::cross_mask(st::Dims::square(128), 32),
            );
            Ok(request.image.clone())
        }
    }

    let texture = noise(128);
    let session = st::Session::builder()
        .load_texture(texture.clone())
        .prompt("bricks")
        .denoising_strength(0.75)
        .band_width(32)
        .build()
        .unwrap();

    let prepared = session.prepare();
    assert_eq!(prepared.image, st::offset_by_half(&texture));
    assert_eq!(*prepared.image.get_pixel(64, 64), *texture.get_pixel(0, 0));

    let seamless = session.run(&Inspect, None).unwrap();
    assert_eq!(*seamless.mask(), prepared.mask);
    assert_eq!(*seamless.as_ref(), texture);
}

#[test]
fn non_square_fails_without_inpainting() {
    let texture = RgbImage::new(100, 50);
    let inpainter = Passthrough::default();

    let err = st::make_seamless(&texture, "", 0.4, &inpainter).unwrap_err();

    assert!(matches!(err, st::Error::NotSquare(st::Dims { width: 100, height: 50 })));
    assert_eq!(inpainter.calls.get(), 0);
}

#[test]
fn odd_size_is_rejected() {
    let err = st::Session::builder()
        .load_texture(RgbImage::new(255, 255))
        .build()
        .err()
        .unwrap();

    assert!(matches!(err, st::Error::OddDimensions(_)));
}

#[test]
fn small_textures_round_trip() {
    for &side in &[2, 32, 48, 62] {
        let texture = noise(side);
        let inpainter = Passthrough::default();

        let seamless = st::make_seamless(&texture, "x", 0.4, &inpainter).unwrap();

        assert_eq!(seamless, texture, "{}px texture changed", side);
        assert_eq!(inpainter.calls.get(), 1);
    }
}

#[test]
fn oversized_band_masks_everything() {
    let texture = noise(64);

    let seamless = st::Session::builder()
        .load_texture(texture.clone())
        .band_width(128)
        .build()
        .unwrap()
        .run(&Passthrough::default(), None)
        .unwrap();

    assert!(seamless.mask().pixels().all(|p| p[0] == st::MASKED));
    assert_eq!(*seamless.as_ref(), texture);
}

#[test]
fn invalid_parameters_are_rejected() {
    let err = st::Session::builder()
        .load_texture(noise(64))
        .denoising_strength(1.5)
        .build()
        .err()
        .unwrap();
    match err {
        st::Error::InvalidRange(ir) => {
            assert_eq!(ir.name(), "denoising-strength");
            assert_eq!(ir.value(), 1.5);
            assert_eq!((ir.min(), ir.max()), (0.0, 1.0));
        }
        other => panic!("unexpected error: {}", other),
    }

    let err = st::Session::builder()
        .load_texture(noise(64))
        .band_width(0)
        .build()
        .err()
        .unwrap();
    match err {
        st::Error::InvalidRange(ir) => assert_eq!(ir.name(), "band-width"),
        other => panic!("unexpected error: {}", other),
    }

    let err = st::Session::builder().build().err().unwrap();
    assert!(matches!(err, st::Error::NoTexture));
}

#[test]
fn inpaint_failure_aborts() {
    let (tx, rx) = std::sync::mpsc::channel();

    let err = st::Session::builder()
        .load_texture(noise(64))
        .build()
        .unwrap()
        .run(&Failing, Some(Box::new(move |stage: st::Stage| {
            let _ = tx.send(stage);
        })))
        .err()
        .unwrap();

    assert!(matches!(
        err,
        st::Error::Inpaint(st::InpaintError::Status { code: 500, .. })
    ));

    let stages: Vec<_> = rx.try_iter().collect();
    assert_eq!(stages, vec![st::Stage::Offset, st::Stage::Inpaint]);
}

#[test]
fn progress_reports_every_stage() {
    let (tx, rx) = std::sync::mpsc::channel();

    st::Session::builder()
        .load_texture(noise(64))
        .build()
        .unwrap()
        .run(&Passthrough::default(), Some(Box::new(move |stage: st::Stage| {
            let _ = tx.send(stage);
        })))
        .unwrap();

    let stages: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        stages,
        vec![st::Stage::Offset, st::Stage::Inpaint, st::Stage::Restore]
    );
}

#[test]
fn wrong_size_result_is_rejected() {
    let err = st::make_seamless(&noise(64), "", 0.4, &Shrinking).unwrap_err();

    match err {
        st::Error::SizeMismatch(sm) => {
            assert_eq!(sm.input(), st::Dims::square(64));
            assert_eq!(sm.output(), st::Dims::square(32));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn loads_from_memory_and_saves() {
    let texture = noise(32);
    let mut png = std::io::Cursor::new(Vec::new());
    texture
        .write_to(&mut png, st::image::ImageFormat::Png)
        .unwrap();
    let png = png.into_inner();

    let seamless = st::Session::builder()
        .load_texture(st::ImageSource::Memory(&png))
        .band_width(8)
        .build()
        .unwrap()
        .run(&Passthrough::default(), None)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("seamless.png");
    seamless.save(&out).unwrap();
    seamless.save_debug(dir.path().join("debug")).unwrap();

    let reloaded = st::image::open(&out).unwrap().to_rgb8();
    assert_eq!(reloaded, texture);

    for name in &["offset.png", "mask.png", "inpainted.png"] {
        assert!(dir.path().join("debug").join(name).exists());
    }
}
