//! An `Inpainter` backed by the Stability AI v1 REST API, using the
//! `image-to-image/masking` endpoint with a white-is-masked mask image.

use crate::inpaint::{InpaintError, InpaintRequest, Inpainter};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use std::{io::Read, time::Duration};

pub const DEFAULT_HOST: &str = "https://api.stability.ai";
pub const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Responses larger than this are rejected rather than buffered
const MAX_RESPONSE_BYTES: u64 = 256 * 1024 * 1024;

/// Generation settings sent along with every request
#[derive(Clone, Debug)]
pub struct GenerationParams {
    /// How strictly the diffusion process adheres to the prompt
    pub cfg_scale: f32,
    pub clip_guidance_preset: String,
    pub steps: u32,
    pub seed: u32,
    /// Passed as is, `None` lets the service pick
    pub style_preset: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            cfg_scale: 7.0,
            clip_guidance_preset: "FAST_BLUE".to_owned(),
            steps: 30,
            seed: 42,
            style_preset: Some("photographic".to_owned()),
        }
    }
}

#[derive(Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct MaskingRequest<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    init_image: String,
    mask_image: String,
    mask_source: &'static str,
    cfg_scale: f32,
    clip_guidance_preset: &'a str,
    samples: u32,
    steps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    style_preset: Option<&'a str>,
    seed: u32,
    strength: f32,
}

#[derive(Deserialize)]
struct GenerationResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Deserialize)]
struct Artifact {
    base64: String,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

/// Client for the Stability AI masking endpoint.
///
/// The API key is always provided explicitly, this type never reads the
/// environment.
pub struct StabilityInpainter {
    agent: ureq::Agent,
    api_key: String,
    host: String,
    engine: String,
    params: GenerationParams,
}

impl StabilityInpainter {
    /// Creates a client with the default host, engine, generation settings
    /// and a 120 second request timeout
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            agent: Self::build_agent(Duration::from_secs(120)),
            api_key: api_key.into(),
            host: DEFAULT_HOST.to_owned(),
            engine: DEFAULT_ENGINE.to_owned(),
            params: GenerationParams::default(),
        }
    }

    fn build_agent(timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new().timeout(timeout).build()
    }

    /// Overrides the base URL of the service, eg. for a proxy
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// The engine (model) id used for generation.
    ///
    /// Default: `stable-diffusion-xl-1024-v1-0`
    pub fn engine<S: Into<String>>(mut self, engine: S) -> Self {
        self.engine = engine.into();
        self
    }

    /// Replaces the generation settings
    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// The overall timeout for a single request, including reading the
    /// response.
    ///
    /// Default: 120 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = Self::build_agent(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/generation/{}/image-to-image/masking",
            self.host.trim_end_matches('/'),
            self.engine
        )
    }

    fn request_body<'a>(
        &'a self,
        request: &InpaintRequest<'a>,
    ) -> Result<MaskingRequest<'a>, InpaintError> {
        let image = request.image;
        let mask = request.mask;

        let init_image = encode_png(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )?;
        let mask_image = encode_png(
            mask.as_raw(),
            mask.width(),
            mask.height(),
            ExtendedColorType::L8,
        )?;

        Ok(MaskingRequest {
            text_prompts: vec![TextPrompt {
                text: request.prompt,
            }],
            init_image,
            mask_image,
            mask_source: "MASK_IMAGE_WHITE",
            cfg_scale: self.params.cfg_scale,
            clip_guidance_preset: &self.params.clip_guidance_preset,
            samples: 1,
            steps: self.params.steps,
            style_preset: self.params.style_preset.as_deref(),
            seed: self.params.seed,
            strength: request.denoising_strength,
        })
    }
}

impl Inpainter for StabilityInpainter {
    fn inpaint(&self, request: &InpaintRequest<'_>) -> Result<image::RgbImage, InpaintError> {
        let body = self.request_body(request)?;
        let url = self.endpoint();

        log::info!(
            "requesting inpainting of a {}x{} image from {}",
            request.image.width(),
            request.image.height(),
            url
        );

        let response = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(convert_error)?;

        // `into_string` caps the body at 10MB, which large artifacts exceed
        let body = read_body(response.into_reader(), MAX_RESPONSE_BYTES)?;

        decode_response(&body)
    }
}

fn convert_error(e: ureq::Error) -> InpaintError {
    match e {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            InpaintError::Status { code, body }
        }
        ureq::Error::Transport(transport) => InpaintError::Transport(transport.to_string()),
    }
}

/// Reads a response body of at most `limit` bytes
fn read_body<R: Read>(reader: R, limit: u64) -> Result<String, InpaintError> {
    let mut body = String::new();
    let read = reader
        .take(limit + 1)
        .read_to_string(&mut body)
        .map_err(|e| InpaintError::Transport(e.to_string()))?;

    if read as u64 > limit {
        return Err(InpaintError::Response(format!(
            "the response exceeded {} bytes",
            limit
        )));
    }

    Ok(body)
}

fn encode_png(
    raw: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
) -> Result<String, InpaintError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(raw, width, height, color)
        .map_err(|e| InpaintError::Backend(Box::new(e)))?;

    Ok(STANDARD.encode(&png))
}

/// Decodes the first artifact of a generation response
fn decode_response(body: &str) -> Result<image::RgbImage, InpaintError> {
    let response: GenerationResponse = serde_json::from_str(body)
        .map_err(|e| InpaintError::Response(format!("malformed json: {}", e)))?;

    let artifact = response
        .artifacts
        .into_iter()
        .next()
        .ok_or_else(|| InpaintError::Response("no artifacts were returned".to_owned()))?;

    match artifact.finish_reason.as_deref() {
        Some("ERROR") => {
            return Err(InpaintError::Response(
                "the artifact finished with an error".to_owned(),
            ))
        }
        Some("CONTENT_FILTERED") => {
            log::warn!("the inpainted artifact was altered by the content filter");
        }
        _ => {}
    }

    let png = STANDARD
        .decode(artifact.base64.as_bytes())
        .map_err(|e| InpaintError::Response(format!("invalid base64: {}", e)))?;

    let img = image::load_from_memory(&png)
        .map_err(|e| InpaintError::Response(format!("invalid image: {}", e)))?;

    Ok(img.to_rgb8())
}
