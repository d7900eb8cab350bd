//! Plate-wide statistics over a character sequence.
//!
//! Per-character heuristics compare each glyph with the average of its plate,
//! so these are computed once per plate after the characters are normalized.

use super::{Character, Plate};

/// Per-plate averages the character gate measures deviations against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlateAverages {
    pub height: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub hue: f32,
    pub saturation: f32,
}

impl PlateAverages {
    /// Collects the plate's averages over `chars`.
    pub fn of<P: Plate>(plate: &P, chars: &[P::Char]) -> Self {
        Self {
            height: plate.average_piece_height(chars),
            contrast: plate.average_piece_contrast(chars),
            brightness: plate.average_piece_brightness(chars),
            hue: plate.average_piece_hue(chars),
            saturation: plate.average_piece_saturation(chars),
        }
    }
}

/// Arithmetic mean of `value` over `chars`; zero for an empty slice.
pub fn average<C: Character>(chars: &[C], value: impl Fn(&C) -> f32) -> f32 {
    if chars.is_empty() {
        return 0.0;
    }
    let sum: f32 = chars.iter().map(value).sum();
    sum / chars.len() as f32
}

/// Mean absolute deviation of the full segment widths from the average piece
/// width, relative to that average.
///
/// Zero when there are no characters or their average piece width is zero.
pub fn width_dispersion<C: Character>(chars: &[C]) -> f32 {
    let average_width = average(chars, |c| c.piece_width() as f32);
    if average_width <= 0.0 {
        return 0.0;
    }

    let deviation = average(chars, |c| (average_width - c.full_width() as f32).abs());
    deviation / average_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CharStatistics, PositionInPlate};
    use image::RgbImage;

    struct Piece {
        width: u32,
        full_width: u32,
        height: u32,
        image: RgbImage,
    }

    impl Piece {
        fn new(width: u32, full_width: u32, height: u32) -> Self {
            Self {
                width,
                full_width,
                height,
                image: RgbImage::new(1, 1),
            }
        }
    }

    impl Character for Piece {
        fn normalize(&mut self) {}
        fn piece_width(&self) -> u32 {
            self.width
        }
        fn piece_height(&self) -> u32 {
            self.height
        }
        fn full_width(&self) -> u32 {
            self.full_width
        }
        fn full_height(&self) -> u32 {
            self.height
        }
        fn position_in_plate(&self) -> PositionInPlate {
            PositionInPlate::default()
        }
        fn statistics(&self) -> CharStatistics {
            CharStatistics::default()
        }
        fn features(&self) -> Vec<f32> {
            Vec::new()
        }
        fn image(&self) -> &RgbImage {
            &self.image
        }
    }

    #[test]
    fn test_average_empty_is_zero() {
        let chars: Vec<Piece> = Vec::new();
        assert_eq!(average(&chars, |c| c.piece_height() as f32), 0.0);
    }

    #[test]
    fn test_average_height() {
        let chars = vec![Piece::new(10, 10, 20), Piece::new(10, 10, 40)];
        assert_eq!(average(&chars, |c| c.piece_height() as f32), 30.0);
    }

    #[test]
    fn test_width_dispersion_uniform() {
        let chars = vec![Piece::new(10, 10, 20), Piece::new(10, 10, 20)];
        assert_eq!(width_dispersion(&chars), 0.0);
    }

    #[test]
    fn test_width_dispersion_uneven() {
        // Average piece width 10; full widths deviate by 5 and 15 → mean 10 → 1.0
        let chars = vec![Piece::new(10, 5, 20), Piece::new(10, 25, 20)];
        assert!((width_dispersion(&chars) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_width_dispersion_zero_width() {
        let chars = vec![Piece::new(0, 5, 20)];
        assert_eq!(width_dispersion(&chars), 0.0);
    }
}
