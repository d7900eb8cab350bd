//! Skew estimation and shear correction of plate candidates.
//!
//! The estimate comes from the plate's own directional transform, run on an
//! edge-filtered copy so the working plate keeps its pixels. Correction is a
//! vertical shear that straightens the dominant line, rendered onto a black
//! canvas of the same size.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp};

use crate::candidate::Plate;

/// Dominant line of a plate's directional transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkewEstimate {
    /// Vertical component of the line direction.
    pub dy: f32,
    /// Horizontal component of the line direction.
    pub dx: f32,
    /// Line angle in degrees.
    pub angle: f32,
}

impl SkewEstimate {
    /// Shear factor `-dy/dx` that levels the line, or `None` when the
    /// direction is vertical or degenerate and the plate must stay as it is.
    pub fn shear_factor(&self) -> Option<f32> {
        if self.dx == 0.0 {
            return None;
        }
        let factor = -self.dy / self.dx;
        factor.is_finite().then_some(factor)
    }
}

/// Estimate together with the images a report shows for it.
pub struct SkewAnalysis {
    pub estimate: SkewEstimate,
    /// The edge-filtered copy the estimate was computed on.
    pub edge_image: RgbImage,
    /// Rendering of the directional transform, when the plate offers one.
    pub transform_image: Option<RgbImage>,
}

/// Estimates the skew of `plate` without touching it.
pub fn estimate_skew<P: Plate>(plate: &P) -> SkewAnalysis {
    let mut edges = plate.clone();
    edges.horizontal_edge_detector();
    let estimate = edges.skew_transformation();

    SkewAnalysis {
        estimate,
        transform_image: edges.render_skew_transformation(),
        edge_image: edges.image().clone(),
    }
}

/// Applies the vertical shear `y' = y + factor·x`.
///
/// The result has the size of `image`; pixels sheared in from outside the
/// source are black.
pub fn shear(image: &RgbImage, factor: f32) -> RgbImage {
    #[rustfmt::skip]
    let matrix = [
        1.0,    0.0, 0.0,
        factor, 1.0, 0.0,
        0.0,    0.0, 1.0,
    ];
    match Projection::from_matrix(matrix) {
        Some(projection) => warp(image, &projection, Interpolation::Nearest, Rgb([0, 0, 0])),
        // A shear always has an inverse; keep the buffer if it somehow does not
        None => image.clone(),
    }
}

/// Returns the plate straightened according to `estimate`.
///
/// A degenerate estimate leaves the plate unchanged.
pub fn correct_skew<P: Plate>(plate: P, estimate: &SkewEstimate) -> P {
    match estimate.shear_factor() {
        Some(factor) => P::from_image(shear(plate.image(), factor)),
        None => {
            log::debug!(
                "Skipping skew correction for degenerate direction dy={} dx={}",
                estimate.dy,
                estimate.dx
            );
            plate
        }
    }
}
