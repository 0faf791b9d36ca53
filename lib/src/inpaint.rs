use std::fmt;

/// Everything an inpainting backend is given for a single call
pub struct InpaintRequest<'a> {
    /// The image whose masked pixels are to be regenerated
    pub image: &'a image::RgbImage,
    /// Same size as `image`, `MASKED` pixels may be rewritten
    pub mask: &'a image::GrayImage,
    /// Free text describing the desired content, passed through as is
    pub prompt: &'a str,
    /// How far the backend may depart from the masked source pixels, in the
    /// range 0.0-1.0
    pub denoising_strength: f32,
}

/// A content-aware fill capability, usually a generative model behind a
/// network service.
///
/// Implementations must return an image of the same dimensions as the
/// request image, with the masked region regenerated. They should not retry
/// on their own, failures are surfaced to the caller of the pipeline.
pub trait Inpainter {
    fn inpaint(&self, request: &InpaintRequest<'_>) -> Result<image::RgbImage, InpaintError>;
}

impl<T: Inpainter + ?Sized> Inpainter for &T {
    fn inpaint(&self, request: &InpaintRequest<'_>) -> Result<image::RgbImage, InpaintError> {
        (**self).inpaint(request)
    }
}

impl<T: Inpainter + ?Sized> Inpainter for Box<T> {
    fn inpaint(&self, request: &InpaintRequest<'_>) -> Result<image::RgbImage, InpaintError> {
        (**self).inpaint(request)
    }
}

#[derive(Debug)]
pub enum InpaintError {
    /// The service answered with a non-success status
    Status { code: u16, body: String },
    /// The service couldn't be reached, or the connection failed midway
    Transport(String),
    /// The service answered, but the response couldn't be turned into an image
    Response(String),
    /// Any other failure from a custom backend
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl std::error::Error for InpaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for InpaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { code, body } => {
                if body.is_empty() {
                    write!(f, "request failed with status {}", code)
                } else {
                    write!(f, "request failed with status {}: {}", code, body)
                }
            }
            Self::Transport(msg) => write!(f, "request failed: {}", msg),
            Self::Response(msg) => write!(f, "invalid response: {}", msg),
            Self::Backend(err) => write!(f, "{}", err),
        }
    }
}
