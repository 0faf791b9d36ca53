//! Splitting an image along its midlines, swapping the pieces across the
//! diagonals, and pasting them back together.
//!
//! Swapping the quadrants diagonally and recombining them offsets the image
//! by half its size in both directions, which moves the tile edges to the
//! center of the image.

use crate::{utils::dims_of, Buffer, Dims};
use image::{imageops, Pixel};
use std::fmt;

/// The position of a quadrant within its parent image
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants, in the order they are stored in a `QuadrantSet`
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// The quadrant in the diagonally opposite corner
    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// The pixel offset of this quadrant's top left corner in an image of
    /// the specified size
    pub fn origin(self, size: Dims) -> (u32, u32) {
        let (half_width, half_height) = (size.width / 2, size.height / 2);

        match self {
            Self::TopLeft => (0, 0),
            Self::TopRight => (half_width, 0),
            Self::BottomLeft => (0, half_height),
            Self::BottomRight => (half_width, half_height),
        }
    }

    /// The extent of this quadrant when splitting an image of the specified
    /// size. With an odd dimension the right and bottom halves get the extra
    /// pixel.
    pub fn extent(self, size: Dims) -> Dims {
        let (x, y) = self.origin(size);
        let (half_width, half_height) = (size.width / 2, size.height / 2);

        let width = if x == 0 { half_width } else { size.width - x };
        let height = if y == 0 { half_height } else { size.height - y };

        Dims::new(width, height)
    }
}

/// The four quadrants of an image, each tagged by the position it occupies.
///
/// The positions are fixed, `swap_diagonal` only changes which image sits in
/// which position.
#[derive(Clone, PartialEq)]
pub struct QuadrantSet<P: Pixel> {
    pub top_left: Buffer<P>,
    pub top_right: Buffer<P>,
    pub bottom_left: Buffer<P>,
    pub bottom_right: Buffer<P>,
}

impl<P: Pixel> fmt::Debug for QuadrantSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadrantSet")
            .field("top_left", &self.top_left.dimensions())
            .field("top_right", &self.top_right.dimensions())
            .field("bottom_left", &self.bottom_left.dimensions())
            .field("bottom_right", &self.bottom_right.dimensions())
            .finish()
    }
}

impl<P> QuadrantSet<P>
where
    P: Pixel + 'static,
{
    /// Crops the four non-overlapping quadrants of an image. Pasting them
    /// back at their origins with `combine` reconstructs the image exactly,
    /// odd dimensions included.
    pub fn split(image: &Buffer<P>) -> Self {
        let size = dims_of(image);

        let crop = |quadrant: Quadrant| {
            let (x, y) = quadrant.origin(size);
            let extent = quadrant.extent(size);
            imageops::crop_imm(image, x, y, extent.width, extent.height).to_image()
        };

        Self {
            top_left: crop(Quadrant::TopLeft),
            top_right: crop(Quadrant::TopRight),
            bottom_left: crop(Quadrant::BottomLeft),
            bottom_right: crop(Quadrant::BottomRight),
        }
    }

    /// Replaces every quadrant with the one in the opposite corner. Applying
    /// this twice restores the original arrangement.
    pub fn swap_diagonal(self) -> Self {
        Self {
            top_left: self.bottom_right,
            top_right: self.bottom_left,
            bottom_left: self.top_right,
            bottom_right: self.top_left,
        }
    }

    /// Pastes the quadrants into a new blank image of `size`, each at the
    /// origin of its position. Nothing is resized, so quadrants that don't
    /// fit are clipped and uncovered pixels are left blank.
    pub fn combine(&self, size: Dims) -> Buffer<P> {
        let mut combined = Buffer::<P>::new(size.width, size.height);

        for quadrant in Quadrant::ALL.iter().copied() {
            let (x, y) = quadrant.origin(size);
            imageops::replace(&mut combined, self.get(quadrant), i64::from(x), i64::from(y));
        }

        combined
    }

    /// Gets the image occupying the specified position
    pub fn get(&self, quadrant: Quadrant) -> &Buffer<P> {
        match quadrant {
            Quadrant::TopLeft => &self.top_left,
            Quadrant::TopRight => &self.top_right,
            Quadrant::BottomLeft => &self.bottom_left,
            Quadrant::BottomRight => &self.bottom_right,
        }
    }
}

/// Offsets an image by half its size on both axes by swapping its quadrants
/// diagonally. For even dimensions this is its own inverse.
pub fn offset_by_half<P>(image: &Buffer<P>) -> Buffer<P>
where
    P: Pixel + 'static,
{
    QuadrantSet::split(image)
        .swap_diagonal()
        .combine(dims_of(image))
}
