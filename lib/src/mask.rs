use crate::Dims;

/// The band width used when none is specified
pub const DEFAULT_BAND_WIDTH: u32 = 64;

/// Mask value for pixels the inpainter may rewrite
pub const MASKED: u8 = 255;
/// Mask value for pixels that must be preserved
pub const UNMASKED: u8 = 0;

/// Half-open range of `band_width` pixels centered on the middle of `len`,
/// clamped to `[0, len)`
fn band(len: u32, band_width: u32) -> std::ops::Range<u32> {
    let center = len / 2;
    let half_band = band_width / 2;

    center.saturating_sub(half_band)..center.saturating_add(half_band).min(len)
}

/// Checks if the pixel at `(x, y)` falls within the cross produced by
/// `cross_mask` for the same size and band width
pub fn is_in_cross(size: Dims, band_width: u32, x: u32, y: u32) -> bool {
    band(size.height, band_width).contains(&y) || band(size.width, band_width).contains(&x)
}

/// Builds a mask shaped like a plus sign, a horizontal band spanning the
/// full width and a vertical band spanning the full height, both
/// `band_width` pixels thick and centered on the image midlines.
///
/// Pixels in the cross are `MASKED`, all others are `UNMASKED`.
pub fn cross_mask(size: Dims, band_width: u32) -> image::GrayImage {
    let rows = band(size.height, band_width);
    let cols = band(size.width, band_width);

    image::GrayImage::from_fn(size.width, size.height, |x, y| {
        if rows.contains(&y) || cols.contains(&x) {
            image::Luma([MASKED])
        } else {
            image::Luma([UNMASKED])
        }
    })
}
