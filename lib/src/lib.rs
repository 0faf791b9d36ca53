// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4

//! `seamless-texture` removes the visible seams of square tiling textures.
//!
//! A texture that doesn't tile cleanly has its discontinuities along its
//! edges. Swapping the four quadrants of the texture diagonally offsets it by
//! half its size, which moves those edges to a cross through the center. The
//! cross is masked and handed to an `Inpainter`, usually a generative model
//! behind a web service, which fills it with content consistent with both
//! sides. Swapping the quadrants back moves the repaired band out to the tile
//! edges again.
//!
//! First, you build a `Session` via a `SessionBuilder`, which follows the
//! builder pattern. Calling `build` on the `SessionBuilder` loads the texture
//! and checks it, and the parameters, for errors, before anything is sent
//! to an inpainter.
//!
//! `Session` has a `run()` method that does the offset, the single inpaint
//! call, and the restore, returning a `SeamlessImage`.
//!
//! ## Usage
//!
//! ```no_run
//! let session = seamless_texture::Session::builder()
//!     .load_texture(&"imgs/cobblestones.png")
//!     .prompt("mossy cobblestones, top down")
//!     .denoising_strength(0.4)
//!     .band_width(64)
//!     .build().expect("failed to build session");
//!
//! let inpainter = seamless_texture::StabilityInpainter::new("my-api-key");
//! let seamless = session.run(&inpainter, None).expect("failed to inpaint");
//!
//! seamless.save("seamless.png").expect("failed to save image");
//! ```
mod errors;
mod inpaint;
mod mask;
mod quadrants;
pub mod session;
#[cfg(feature = "stability")]
pub mod stability;
mod utils;

pub use image;
use std::path::Path;

pub use errors::{Error, InvalidRange, SizeMismatch};
pub use inpaint::{InpaintError, InpaintRequest, Inpainter};
pub use mask::{cross_mask, is_in_cross, DEFAULT_BAND_WIDTH, MASKED, UNMASKED};
pub use quadrants::{offset_by_half, Quadrant, QuadrantSet};
pub use session::{OffsetTexture, PipelineProgress, Session, SessionBuilder, Stage};
#[cfg(feature = "stability")]
pub use stability::{GenerationParams, StabilityInpainter};
pub use utils::{load_dynamic_image, ImageSource};

use utils::load_image;

/// An owned image buffer of the specified pixel type
pub type Buffer<P> = image::ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>;

/// The denoising strength used when none is specified
pub const DEFAULT_DENOISING_STRENGTH: f32 = 0.4;

/// Simple dimensions struct
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

struct Parameters {
    prompt: String,
    denoising_strength: f32,
    band_width: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            prompt: "detailed seamless texture pattern".to_owned(),
            denoising_strength: DEFAULT_DENOISING_STRENGTH,
            band_width: DEFAULT_BAND_WIDTH,
        }
    }
}

/// Makes a texture seamless, see `Session` for more control.
///
/// The caller's image is left untouched, a new image of the same size is
/// returned.
pub fn make_seamless<I>(
    texture: &image::RgbImage,
    prompt: &str,
    denoising_strength: f32,
    inpainter: &I,
) -> Result<image::RgbImage, Error>
where
    I: Inpainter + ?Sized,
{
    let session = Session::builder()
        .load_texture(texture.clone())
        .prompt(prompt)
        .denoising_strength(denoising_strength)
        .build()?;

    Ok(session.run(inpainter, None)?.into_image())
}

/// A texture produced by `Session::run()`
pub struct SeamlessImage {
    image: image::RgbImage,
    offset: image::RgbImage,
    mask: image::GrayImage,
    inpainted: image::RgbImage,
}

impl SeamlessImage {
    /// Saves the seamless texture to the specified path, the format is
    /// inferred from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent_path) = path.parent() {
            std::fs::create_dir_all(&parent_path)?;
        }

        self.image.save(&path)?;
        Ok(())
    }

    /// Writes the seamless texture to the specified stream
    pub fn write<W: std::io::Write + std::io::Seek>(
        &self,
        writer: &mut W,
        fmt: image::ImageFormat,
    ) -> Result<(), Error> {
        Ok(self.image.write_to(writer, fmt)?)
    }

    /// Saves the intermediate images of the pipeline, the offset texture
    /// that was sent to the inpainter, the mask it was given, and the image
    /// it returned.
    pub fn save_debug<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(&dir)?;

        self.offset.save(&dir.join("offset.png"))?;
        self.mask.save(&dir.join("mask.png"))?;
        self.inpainted.save(&dir.join("inpainted.png"))?;

        Ok(())
    }

    /// The mask the inpainter was given
    pub fn mask(&self) -> &image::GrayImage {
        &self.mask
    }

    /// Returns the seamless texture
    pub fn into_image(self) -> image::RgbImage {
        self.image
    }
}

impl AsRef<image::RgbImage> for SeamlessImage {
    fn as_ref(&self) -> &image::RgbImage {
        &self.image
    }
}
