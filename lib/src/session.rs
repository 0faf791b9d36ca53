use crate::*;

/// Seamless texture session.
///
/// Calling `run()` offsets the texture, sends the seam cross to an
/// `Inpainter`, and offsets the result back, consuming the session in the
/// process. You can provide a `PipelineProgress` implementation to get
/// updates as the pipeline moves through its stages.
///
/// # Example
/// ```no_run
/// let session = seamless_texture::Session::builder()
///     .load_texture(&"imgs/cobblestones.png")
///     .prompt("mossy cobblestones")
///     .build().expect("failed to build session");
///
/// let inpainter = seamless_texture::StabilityInpainter::new("my-api-key");
/// let seamless = session.run(&inpainter, None).expect("failed to inpaint");
/// seamless.save("seamless.png").expect("failed to save image");
/// ```
pub struct Session {
    texture: image::RgbImage,
    params: Parameters,
}

/// The texture offset by half its size, and the mask covering the seams that
/// were moved to its center
pub struct OffsetTexture {
    pub image: image::RgbImage,
    pub mask: image::GrayImage,
}

impl Session {
    /// Creates a new session with default parameters.
    pub fn builder<'a>() -> SessionBuilder<'a> {
        SessionBuilder::default()
    }

    /// The dimensions of the loaded texture
    pub fn dims(&self) -> Dims {
        utils::dims_of(&self.texture)
    }

    /// Offsets the texture and builds its seam mask, without inpainting.
    ///
    /// This is the exact input `run` gives to the inpainter, which is useful
    /// for inpainting by hand in another tool.
    pub fn prepare(&self) -> OffsetTexture {
        OffsetTexture {
            image: offset_by_half(&self.texture),
            mask: cross_mask(self.dims(), self.params.band_width),
        }
    }

    /// Runs the pipeline, making exactly one call to the inpainter.
    ///
    /// If the inpainter fails, its error is returned and nothing else is
    /// done, the un-inpainted offset texture is never returned in its place.
    pub fn run<I>(
        self,
        inpainter: &I,
        progress: Option<Box<dyn PipelineProgress>>,
    ) -> Result<SeamlessImage, Error>
    where
        I: Inpainter + ?Sized,
    {
        let mut progress = progress;
        let mut report = |stage: Stage| {
            log::debug!("{}", stage);
            if let Some(progress) = progress.as_mut() {
                progress.update(stage);
            }
        };

        let size = self.dims();

        report(Stage::Offset);
        let OffsetTexture { image, mask } = self.prepare();

        report(Stage::Inpaint);
        let inpainted = inpainter.inpaint(&InpaintRequest {
            image: &image,
            mask: &mask,
            prompt: &self.params.prompt,
            denoising_strength: self.params.denoising_strength,
        })?;

        let inpainted_size = utils::dims_of(&inpainted);
        if inpainted_size != size {
            return Err(Error::SizeMismatch(errors::SizeMismatch {
                input: size,
                output: inpainted_size,
            }));
        }

        report(Stage::Restore);
        let restored = offset_by_half(&inpainted);

        Ok(SeamlessImage {
            image: restored,
            offset: image,
            mask,
            inpainted,
        })
    }
}

/// Builds a session by setting parameters and loading the texture, calling
/// `build` will check all of the provided inputs, so that nothing invalid
/// is ever sent to an inpainter
#[derive(Default)]
pub struct SessionBuilder<'a> {
    texture: Option<ImageSource<'a>>,
    params: Parameters,
}

impl<'a> SessionBuilder<'a> {
    /// Creates a new `SessionBuilder`, can also be created via
    /// `Session::builder()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the texture to make seamless. It must be square, with an even
    /// side length.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let session = seamless_texture::Session::builder()
    ///     .load_texture(&"imgs/bricks.png")
    ///     .build().expect("failed to build session");
    /// ```
    pub fn load_texture<I: Into<ImageSource<'a>>>(mut self, texture: I) -> Self {
        self.texture = Some(texture.into());
        self
    }

    /// Text describing the content the seams should be filled with. Ideally
    /// similar to the prompt the texture was generated with.
    ///
    /// Default: "detailed seamless texture pattern"
    pub fn prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.params.prompt = prompt.into();
        self
    }

    /// How far the inpainter may depart from the pixels under the mask.
    /// Range (0.0, 1.0).
    ///
    /// Default: 0.4
    pub fn denoising_strength(mut self, value: f32) -> Self {
        self.params.denoising_strength = value;
        self
    }

    /// Thickness in pixels of each bar of the mask cross. This also decides
    /// how far from each tile edge the output is regenerated, which is half
    /// the band width.
    ///
    /// Default: 64
    pub fn band_width(mut self, pixels: u32) -> Self {
        self.params.band_width = pixels;
        self
    }

    /// Creates a `Session`, or returns an error if invalid parameters or an
    /// invalid texture were specified.
    pub fn build(self) -> Result<Session, Error> {
        self.check_parameters_validity()?;

        let texture = match self.texture {
            Some(src) => load_image(src)?,
            None => return Err(Error::NoTexture),
        };

        check_texture_validity(&texture)?;

        let mut params = self.params;
        let side = texture.width();
        if params.band_width > side {
            log::debug!(
                "band width {} exceeds the {}px texture, masking all of it",
                params.band_width,
                side
            );
            params.band_width = side;
        }

        Ok(Session { texture, params })
    }

    fn check_parameters_validity(&self) -> Result<(), Error> {
        // Also catches NaN
        if !(0.0..=1.0).contains(&self.params.denoising_strength) {
            return Err(Error::InvalidRange(errors::InvalidRange {
                min: 0.0,
                max: 1.0,
                value: self.params.denoising_strength,
                name: "denoising-strength",
            }));
        }

        // Narrower bands leave the mask empty, the upper end is clamped to
        // the texture once it is loaded
        if self.params.band_width < 2 {
            return Err(Error::InvalidRange(errors::InvalidRange {
                min: 2.0,
                max: f32::INFINITY,
                value: self.params.band_width as f32,
                name: "band-width",
            }));
        }

        Ok(())
    }
}

fn check_texture_validity(texture: &image::RgbImage) -> Result<(), Error> {
    let dims = utils::dims_of(texture);

    if dims.width != dims.height {
        return Err(Error::NotSquare(dims));
    }

    if dims.width % 2 != 0 {
        return Err(Error::OddDimensions(dims));
    }

    Ok(())
}

/// The stages of a pipeline run, in order
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Swapping the quadrants to move the seams to the center, and building
    /// the mask
    Offset,
    /// Waiting on the inpainter
    Inpaint,
    /// Swapping the quadrants back
    Restore,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Offset => "offsetting texture",
            Self::Inpaint => "inpainting seams",
            Self::Restore => "restoring texture",
        })
    }
}

/// Allows the pipeline to update external callers with the stage it is in
pub trait PipelineProgress {
    fn update(&mut self, stage: Stage);
}

impl<G> PipelineProgress for G
where
    G: FnMut(Stage) + Send,
{
    fn update(&mut self, stage: Stage) {
        self(stage)
    }
}
