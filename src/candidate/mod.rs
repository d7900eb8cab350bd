//! Candidate regions produced by upstream segmentation.
//!
//! The engine never detects regions itself. It walks a [`Snapshot`] down
//! through its [`Band`]s and [`Plate`]s to the [`Character`]s, and only calls
//! the operations declared here. Segmentation crates implement these traits.
//!
//! Ownership carries the mutation contract: `bands()`, `plates()` and
//! `chars()` hand out owned values, so a plate or character normalized in
//! place by the pipeline is never observed by anyone else. A diagnostics copy
//! of pre-normalized state is an explicit `clone()`.

pub mod stats;

use image::RgbImage;

use crate::skew::SkewEstimate;

pub use stats::PlateAverages;

/// Horizontal extent of a character inside its plate, in plate pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionInPlate {
    /// Left edge.
    pub x1: u32,
    /// Right edge.
    pub x2: u32,
}

/// Colour statistics of one character piece, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharStatistics {
    pub contrast: f32,
    pub brightness: f32,
    pub hue: f32,
    pub saturation: f32,
}

/// A sub-region believed to hold a single glyph.
pub trait Character {
    /// Resizes the glyph to the classifier's sampling grid and recomputes the
    /// piece dimensions. Mutates in place.
    fn normalize(&mut self);

    /// Width of the glyph piece, after normalization when it has run.
    fn piece_width(&self) -> u32;

    /// Height of the glyph piece, after normalization when it has run.
    fn piece_height(&self) -> u32;

    /// Width of the whole segment before normalization.
    fn full_width(&self) -> u32;

    /// Height of the whole segment before normalization.
    fn full_height(&self) -> u32;

    fn position_in_plate(&self) -> PositionInPlate;

    fn statistics(&self) -> CharStatistics;

    /// Feature vector consumed by the character classifiers.
    fn features(&self) -> Vec<f32>;

    fn image(&self) -> &RgbImage;
}

/// A rectangular region believed to hold a whole registration plate.
pub trait Plate: Clone {
    type Char: Character;

    /// Wraps a raw buffer, e.g. the output of skew correction.
    fn from_image(image: RgbImage) -> Self;

    fn image(&self) -> &RgbImage;

    fn width(&self) -> u32 {
        self.image().width()
    }

    fn height(&self) -> u32 {
        self.image().height()
    }

    /// Crops and rescales the plate to its content. Mutates in place.
    fn normalize(&mut self);

    /// Replaces the buffer with one that emphasizes horizontal edges.
    fn horizontal_edge_detector(&mut self);

    /// Dominant line of the plate's directional (Hough) transform.
    fn skew_transformation(&self) -> SkewEstimate;

    /// Visualization of the directional transform, for reports.
    fn render_skew_transformation(&self) -> Option<RgbImage> {
        None
    }

    /// Projection graph of the plate, for reports.
    fn render_graph(&self) -> Option<RgbImage> {
        None
    }

    /// Segments the plate into characters, ordered left to right.
    fn chars(&self) -> Vec<Self::Char>;

    fn chars_width_dispersion(&self, chars: &[Self::Char]) -> f32 {
        stats::width_dispersion(chars)
    }

    fn average_piece_height(&self, chars: &[Self::Char]) -> f32 {
        stats::average(chars, |c| c.piece_height() as f32)
    }

    fn average_piece_contrast(&self, chars: &[Self::Char]) -> f32 {
        stats::average(chars, |c| c.statistics().contrast)
    }

    fn average_piece_brightness(&self, chars: &[Self::Char]) -> f32 {
        stats::average(chars, |c| c.statistics().brightness)
    }

    fn average_piece_hue(&self, chars: &[Self::Char]) -> f32 {
        stats::average(chars, |c| c.statistics().hue)
    }

    fn average_piece_saturation(&self, chars: &[Self::Char]) -> f32 {
        stats::average(chars, |c| c.statistics().saturation)
    }
}

/// A horizontal strip believed to contain a plate.
pub trait Band {
    type Plate: Plate;

    /// Plate candidates, most promising first.
    fn plates(&self) -> Vec<Self::Plate>;

    fn image(&self) -> &RgbImage;

    fn width(&self) -> u32 {
        self.image().width()
    }

    fn height(&self) -> u32 {
        self.image().height()
    }

    /// Projection graph of the band, for reports.
    fn render_graph(&self) -> Option<RgbImage> {
        None
    }
}

/// An image region believed to show a vehicle.
pub trait Snapshot {
    type Band: Band;

    /// Band candidates, most promising first.
    fn bands(&self) -> Vec<Self::Band>;

    fn image(&self) -> &RgbImage;

    fn width(&self) -> u32 {
        self.image().width()
    }

    fn height(&self) -> u32 {
        self.image().height()
    }

    /// Vertical and horizontal projection graph, for reports.
    fn render_graph(&self) -> Option<RgbImage> {
        None
    }
}
