//! Character-level acceptance gate.
//!
//! Each glyph is measured against the averages of its own plate. All checks
//! run on every character so a report can show every reason a glyph was
//! dropped, not just the first.

use std::fmt;

use crate::candidate::{Character, PlateAverages};
use crate::config::IntelligenceConfig;

/// Shape ratio below which a glyph touching the plate border is taken for
/// the border itself.
const EDGE_SLIVER_RATIO: f32 = 0.12;

/// Reason a character was excluded from the recognized plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicFlag {
    /// Width/height ratio out of bounds.
    WidthHeightRatio,
    /// Thin sliver touching the left or right plate edge.
    Position,
    Contrast,
    Brightness,
    Hue,
    Saturation,
    /// Noticeably shorter than the plate's average glyph.
    Height,
    /// Best classifier match too costly.
    Similarity,
}

impl HeuristicFlag {
    /// Short code shown in reports.
    pub fn code(self) -> &'static str {
        match self {
            Self::WidthHeightRatio => "WHR",
            Self::Position => "POS",
            Self::Contrast => "CON",
            Self::Brightness => "BRI",
            Self::Hue => "HUE",
            Self::Saturation => "SAT",
            Self::Height => "HEI",
            Self::Similarity => "NEU",
        }
    }
}

impl fmt::Display for HeuristicFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Measurements the gate computed for one character.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharCosts {
    pub width_height_ratio: f32,
    /// Signed relative deviation from the average height.
    pub height: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub hue: f32,
    pub saturation: f32,
    /// Cost of the best classifier match, once the character was classified.
    pub similarity: Option<f32>,
}

/// Outcome of the character gate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharVerdict {
    pub flags: Vec<HeuristicFlag>,
    pub costs: CharCosts,
}

impl CharVerdict {
    pub fn is_accepted(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flags as space-separated codes, e.g. `"WHR HEI"`.
    pub fn flag_codes(&self) -> String {
        self.flags
            .iter()
            .map(|flag| flag.code())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Evaluates every shape and statistical check for a normalized character.
pub fn check_char(
    chr: &dyn Character,
    plate_width: u32,
    averages: &PlateAverages,
    config: &IntelligenceConfig,
) -> CharVerdict {
    let mut flags = Vec::new();

    let ratio = chr.piece_width() as f32 / chr.piece_height() as f32;
    if !ratio.is_finite()
        || ratio < config.min_char_width_height_ratio
        || ratio > config.max_char_width_height_ratio
    {
        flags.push(HeuristicFlag::WidthHeightRatio);
    }

    let position = chr.position_in_plate();
    let touches_edge = position.x1 < 2 || i64::from(position.x2) > i64::from(plate_width) - 1;
    if touches_edge && ratio < EDGE_SLIVER_RATIO {
        flags.push(HeuristicFlag::Position);
    }

    let stats = chr.statistics();
    let contrast = (stats.contrast - averages.contrast).abs();
    let brightness = (stats.brightness - averages.brightness).abs();
    let hue = (stats.hue - averages.hue).abs();
    let saturation = (stats.saturation - averages.saturation).abs();
    let height = if averages.height > 0.0 {
        (chr.piece_height() as f32 - averages.height) / averages.height
    } else {
        0.0
    };

    if contrast > config.max_contrast_cost_dispersion {
        flags.push(HeuristicFlag::Contrast);
    }
    if brightness > config.max_brightness_cost_dispersion {
        flags.push(HeuristicFlag::Brightness);
    }
    if hue > config.max_hue_cost_dispersion {
        flags.push(HeuristicFlag::Hue);
    }
    if saturation > config.max_saturation_cost_dispersion {
        flags.push(HeuristicFlag::Saturation);
    }
    // Taller than average is fine; only a shortfall counts
    if height < -config.max_height_cost_dispersion {
        flags.push(HeuristicFlag::Height);
    }

    CharVerdict {
        flags,
        costs: CharCosts {
            width_height_ratio: ratio,
            height,
            contrast,
            brightness,
            hue,
            saturation,
            similarity: None,
        },
    }
}

/// Records the best-match cost on `verdict`, flagging it when too costly.
pub fn check_similarity(verdict: &mut CharVerdict, best_cost: f32, config: &IntelligenceConfig) {
    verdict.costs.similarity = Some(best_cost);
    if best_cost.is_nan() || best_cost > config.max_similarity_cost_dispersion {
        verdict.flags.push(HeuristicFlag::Similarity);
    }
}
