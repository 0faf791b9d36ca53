use crate::{inpaint::InpaintError, Dims};
use std::fmt;

#[derive(Debug)]
pub struct InvalidRange {
    pub(crate) min: f32,
    pub(crate) max: f32,
    pub(crate) value: f32,
    pub(crate) name: &'static str,
}

impl InvalidRange {
    /// The smallest accepted value
    pub fn min(&self) -> f32 {
        self.min
    }

    /// The largest accepted value
    pub fn max(&self) -> f32 {
        self.max
    }

    /// The value that was rejected
    pub fn value(&self) -> f32 {
        self.value
    }

    /// The name of the parameter, as spelled on the command line
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter '{}' - value '{}' is outside the range of {}-{}",
            self.name, self.value, self.min, self.max
        )
    }
}

#[derive(Debug)]
pub struct SizeMismatch {
    pub(crate) input: Dims,
    pub(crate) output: Dims,
}

impl SizeMismatch {
    /// The size of the texture sent for inpainting
    pub fn input(&self) -> Dims {
        self.input
    }

    /// The size of the image the inpainter returned
    pub fn output(&self) -> Dims {
        self.output
    }
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the inpainted image ({}x{}) must be the same size as the texture ({}x{})",
            self.output.width, self.output.height, self.input.width, self.input.height
        )
    }
}

#[derive(Debug)]
pub enum Error {
    /// An error in the image library occurred, eg failed to load/save
    Image(image::ImageError),
    /// An input parameter had an invalid range specified
    InvalidRange(InvalidRange),
    /// The texture is not square, so its quadrants can't be swapped back
    /// onto the same tile grid
    NotSquare(Dims),
    /// The texture has an odd side length, so the two halves of each axis
    /// differ by one pixel and the offset isn't reversible
    OddDimensions(Dims),
    /// No texture was loaded into the session builder
    NoTexture,
    /// The inpainting backend failed, nothing was produced
    Inpaint(InpaintError),
    /// The inpainting backend returned an image of a different size than
    /// the one it was given
    SizeMismatch(SizeMismatch),
    /// Io is notoriously error free with no problems, but we cover it just in case!
    Io(std::io::Error),
    /// The user specified an image format we don't support as the output
    UnsupportedOutputFormat(String),
    /// No API key was available for the inpainting service
    MissingApiKey,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Inpaint(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(ie) => write!(f, "{}", ie),
            Self::InvalidRange(ir) => write!(f, "{}", ir),
            Self::NotSquare(dims) => write!(
                f,
                "the texture must be square, but it is {}x{}",
                dims.width, dims.height
            ),
            Self::OddDimensions(dims) => write!(
                f,
                "the texture must have an even side length, but it is {}x{}",
                dims.width, dims.height
            ),
            Self::NoTexture => write!(f, "a texture must be loaded before building a session"),
            Self::Inpaint(ie) => write!(f, "inpainting failed: {}", ie),
            Self::SizeMismatch(sm) => write!(f, "{}", sm),
            Self::Io(io) => write!(f, "{}", io),
            Self::UnsupportedOutputFormat(fmt) => {
                write!(f, "the output format '{}' is not supported", fmt)
            }
            Self::MissingApiKey => write!(
                f,
                "an API key must be given with --api-key or the STABILITY_API_KEY environment variable"
            ),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(ie: image::ImageError) -> Self {
        Self::Image(ie)
    }
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Self {
        Self::Io(io)
    }
}

impl From<InpaintError> for Error {
    fn from(ie: InpaintError) -> Self {
        Self::Inpaint(ie)
    }
}
