mod offset;
mod progress;

use structopt::StructOpt;

use progress::ProgressSpinner;
use seamless_texture::{
    image::ImageFormat as ImgFmt, stability, Error, GenerationParams, Session,
    StabilityInpainter,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

fn parse_img_fmt(input: &str) -> Result<ImgFmt, String> {
    let fmt = match input {
        "png" => ImgFmt::Png,
        "bmp" => ImgFmt::Bmp,
        other => {
            return Err(format!(
                "image format `{}` not one of: 'png', 'bmp'",
                other
            ))
        }
    };

    Ok(fmt)
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct StabilityTweaks {
    /// The Stability AI API key
    #[structopt(long, env = "STABILITY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Base URL of the Stability AI REST API
    #[structopt(long, default_value = stability::DEFAULT_HOST)]
    host: String,
    /// The engine (model) used for inpainting
    #[structopt(long, default_value = stability::DEFAULT_ENGINE)]
    engine: String,
    /// How strictly the diffusion process adheres to the prompt
    #[structopt(long, default_value = "7")]
    cfg_scale: f32,
    /// The number of diffusion steps to run
    #[structopt(long, default_value = "30")]
    steps: u32,
    /// Seed for the diffusion noise, the same seed and inputs give similar results
    #[structopt(long, default_value = "42")]
    seed: u32,
    /// Style preset guiding the model, or `none` to let the service decide
    #[structopt(long, default_value = "photographic")]
    style_preset: String,
    /// CLIP guidance preset
    #[structopt(long, default_value = "FAST_BLUE")]
    clip_guidance: String,
    /// Request timeout, in seconds
    #[structopt(long, default_value = "120")]
    timeout: u64,
}

impl StabilityTweaks {
    fn to_inpainter(&self) -> Result<StabilityInpainter, Error> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(Error::MissingApiKey),
        };

        let style_preset = match self.style_preset.as_str() {
            "none" => None,
            preset => Some(preset.to_owned()),
        };

        Ok(StabilityInpainter::new(api_key)
            .host(self.host.as_str())
            .engine(self.engine.as_str())
            .timeout(Duration::from_secs(self.timeout))
            .params(GenerationParams {
                cfg_scale: self.cfg_scale,
                clip_guidance_preset: self.clip_guidance.clone(),
                steps: self.steps,
                seed: self.seed,
                style_preset,
            }))
    }
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct Inpaint {
    /// Text describing the content to fill the seams with, ideally close to
    /// the prompt the texture was generated with
    #[structopt(long, default_value = "detailed seamless texture pattern")]
    prompt: String,
    /// How far the inpainted seams may depart from the original pixels. Range (0.0 - 1.0)
    #[structopt(long = "strength", default_value = "0.4")]
    denoising_strength: f32,
    /// A directory into which debug images are also saved.
    ///
    /// * `offset.png` - The texture with its seams moved to the center
    /// * `mask.png` - The mask of the seams sent for inpainting
    /// * `inpainted.png` - The image returned by the inpainting service
    #[structopt(long, parse(from_os_str))]
    debug_out_dir: Option<PathBuf>,
    /// Don't show a progress spinner
    #[structopt(long)]
    no_progress: bool,
    #[structopt(flatten)]
    stability: StabilityTweaks,
    /// Path to the square texture to make seamless
    #[structopt(parse(from_os_str))]
    texture: PathBuf,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Makes a texture seamless by inpainting its seams with Stability AI
    #[structopt(name = "inpaint")]
    Inpaint(Inpaint),
    /// Offsets a texture by half its size so its seams can be inpainted by hand
    #[structopt(name = "offset")]
    Offset(offset::Args),
}

#[derive(StructOpt)]
#[structopt(
    name = "seamless-texture",
    about = "Makes square tiling textures seamless",
    rename_all = "kebab-case"
)]
pub(crate) struct Opt {
    /// Thickness in pixels of the band masked around each seam
    #[structopt(long, default_value = "64")]
    band_width: u32,
    /// The format to save the image as.
    ///
    /// NOTE: this will only apply when stdout is specified via `-o -`, otherwise the image
    /// format is determined by the file extension of the path provided to `-o`
    #[structopt(
        long,
        default_value = "png",
        parse(try_from_str = parse_img_fmt)
    )]
    out_fmt: ImgFmt,
    /// The path to save the image to, the file extensions of the path determines
    /// the image format used. You may use `-` for stdout.
    #[structopt(long = "out", short, parse(from_os_str))]
    output_path: PathBuf,
    #[structopt(subcommand)]
    cmd: Subcommand,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = real_main() {
        if atty::is(atty::Stream::Stderr) {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
        } else {
            eprintln!("error: {}", e);
        }

        std::process::exit(1);
    }
}

fn real_main() -> Result<(), Error> {
    let args = Opt::from_args();

    check_output_extension(&args.output_path)?;

    match &args.cmd {
        Subcommand::Inpaint(inpaint) => inpaint_cmd(inpaint, &args),
        Subcommand::Offset(offset) => offset::cmd(offset, &args),
    }
}

fn inpaint_cmd(inpaint: &Inpaint, args: &Opt) -> Result<(), Error> {
    let inpainter = inpaint.stability.to_inpainter()?;

    let session = Session::builder()
        .load_texture(&inpaint.texture)
        .prompt(inpaint.prompt.as_str())
        .denoising_strength(inpaint.denoising_strength)
        .band_width(args.band_width)
        .build()?;

    let progress: Option<Box<dyn seamless_texture::PipelineProgress>> = if !inpaint.no_progress {
        Some(Box::new(ProgressSpinner::new()))
    } else {
        None
    };

    let generated = session.run(&inpainter, progress)?;

    if let Some(ref dir) = inpaint.debug_out_dir {
        generated.save_debug(dir)?;
    }

    if args.output_path.to_str() == Some("-") {
        let mut encoded = std::io::Cursor::new(Vec::new());
        generated.write(&mut encoded, args.out_fmt)?;

        write_stdout(encoded.get_ref())?;
    } else {
        // This won't respect the output format specified by the user,
        // only the extension on the path they specify
        generated.save(&args.output_path)?;
        log::info!("saved seamless texture to '{}'", args.output_path.display());
    }

    Ok(())
}

/// Checks that the extension of a path supplied by the user is one of the
/// lossless formats we support
pub(crate) fn check_output_extension(path: &Path) -> Result<(), Error> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") | Some("bmp") | None => Ok(()),
        Some(other) => Err(Error::UnsupportedOutputFormat(other.to_owned())),
    }
}

pub(crate) fn write_stdout(encoded: &[u8]) -> Result<(), Error> {
    let out = std::io::stdout();
    let mut out = out.lock();
    out.write_all(encoded)?;
    out.flush()?;
    Ok(())
}
