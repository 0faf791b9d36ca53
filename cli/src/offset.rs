use seamless_texture::{self as st, Error};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub(crate) struct Args {
    /// Path to save the seam mask to, white pixels mark the seams that need
    /// to be inpainted
    #[structopt(long, parse(from_os_str))]
    mask: Option<PathBuf>,
    /// Path to the square texture to offset
    #[structopt(parse(from_os_str))]
    texture: PathBuf,
}

/// Writes the texture offset by half its size, and optionally its seam mask,
/// without contacting any inpainting service
pub(crate) fn cmd(args: &Args, global_opts: &crate::Opt) -> Result<(), Error> {
    if let Some(ref mask_path) = args.mask {
        crate::check_output_extension(mask_path)?;
    }

    let session = st::Session::builder()
        .load_texture(&args.texture)
        .band_width(global_opts.band_width)
        .build()?;

    let prepared = session.prepare();

    if let Some(ref mask_path) = args.mask {
        if let Some(parent) = mask_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        prepared.mask.save(mask_path)?;
        log::info!("saved seam mask to '{}'", mask_path.display());
    }

    if global_opts.output_path.to_str() == Some("-") {
        let mut encoded = std::io::Cursor::new(Vec::new());
        prepared.image.write_to(&mut encoded, global_opts.out_fmt)?;

        crate::write_stdout(encoded.get_ref())?;
    } else {
        if let Some(parent) = global_opts.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        prepared.image.save(&global_opts.output_path)?;
    }

    Ok(())
}
