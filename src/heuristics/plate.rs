//! Plate-level acceptance gate.

use std::fmt;

use crate::candidate::Plate;
use crate::config::IntelligenceConfig;

/// Why a normalized plate candidate was dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlateRejection {
    /// Width/height ratio outside the configured bounds.
    AspectRatio(f32),
    /// Number of segmented characters outside the configured bounds.
    CharCount(usize),
    /// Character widths are too uneven.
    WidthDispersion(f32),
}

impl fmt::Display for PlateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AspectRatio(ratio) => write!(f, "width/height ratio {ratio:.3}"),
            Self::CharCount(count) => write!(f, "{count} characters"),
            Self::WidthDispersion(dispersion) => {
                write!(f, "character width dispersion {dispersion:.3}")
            }
        }
    }
}

/// Checks the shape of a normalized plate before it is segmented.
pub fn check_aspect_ratio<P: Plate>(
    plate: &P,
    config: &IntelligenceConfig,
) -> Result<(), PlateRejection> {
    let ratio = plate.width() as f32 / plate.height() as f32;
    // NaN (0/0) fails both comparisons, so reject non-finite ratios explicitly
    if !ratio.is_finite()
        || ratio < config.min_plate_width_height_ratio
        || ratio > config.max_plate_width_height_ratio
    {
        return Err(PlateRejection::AspectRatio(ratio));
    }
    Ok(())
}

/// Checks the count and width uniformity of a plate's segmented characters.
pub fn check_chars<P: Plate>(
    plate: &P,
    chars: &[P::Char],
    config: &IntelligenceConfig,
) -> Result<(), PlateRejection> {
    let count = chars.len();
    if count < config.minimum_chars || count > config.maximum_chars {
        return Err(PlateRejection::CharCount(count));
    }

    let dispersion = plate.chars_width_dispersion(chars);
    if dispersion > config.max_char_width_dispersion {
        return Err(PlateRejection::WidthDispersion(dispersion));
    }

    Ok(())
}

/// Checks a normalized plate and its segmented characters.
///
/// Conditions are tested in order (ratio, count, dispersion) and the first
/// failure is returned.
pub fn check_plate<P: Plate>(
    plate: &P,
    chars: &[P::Char],
    config: &IntelligenceConfig,
) -> Result<(), PlateRejection> {
    check_aspect_ratio(plate, config)?;
    check_chars(plate, chars, config)
}
