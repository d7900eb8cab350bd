//! Configuration for the recognition engine.
//!
//! Thresholds live in a flat property map keyed by name. The map starts out
//! filled with defaults and can be overridden from a JSON file. The engine
//! reads every threshold it needs once, at construction, into an
//! [`IntelligenceConfig`]; a missing or mistyped key fails there instead of in
//! the middle of a run.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Flat map of named configuration properties.
#[derive(Clone, Debug)]
pub struct Configurator {
    properties: Map<String, Value>,
}

/// Built-in property values.
fn default_properties() -> Map<String, Value> {
    let defaults = json!({
        "intelligence_skewdetection": 0,
        "intelligence_syntaxanalysis": 2,
        "intelligence_classification_method": 0,
        "intelligence_minimumChars": 5,
        "intelligence_maximumChars": 15,
        "intelligence_maxCharWidthDispersion": 0.5,
        "intelligence_minPlateWidthHeightRatio": 0.5,
        "intelligence_maxPlateWidthHeightRatio": 15.0,
        "intelligence_minCharWidthHeightRatio": 0.1,
        "intelligence_maxCharWidthHeightRatio": 0.92,
        "intelligence_maxBrightnessCostDispersion": 0.161,
        "intelligence_maxContrastCostDispersion": 0.1,
        "intelligence_maxHueCostDispersion": 0.145,
        "intelligence_maxSaturationCostDispersion": 0.24,
        "intelligence_maxHeightCostDispersion": 0.2,
        "intelligence_maxSimilarityCostDispersion": 100.0,
        "char_learnAlphabetPath": "resources/alphabets/alphabet_8x13.json",
        "char_neuralNetworkPath": "resources/neuralnetworks/network_avgres_813_avgdist.json",
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self {
            properties: default_properties(),
        }
    }
}

impl Configurator {
    /// A configurator with no properties at all, not even defaults.
    pub fn empty() -> Self {
        Self {
            properties: Map::new(),
        }
    }

    /// Loads defaults, then overrides them with the properties in `path`.
    ///
    /// The file must contain a single JSON object. Keys it does not mention
    /// keep their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse configuration {}", path.display()))?;
        let Value::Object(overrides) = value else {
            return Err(ConfigError::NotAnObject)
                .with_context(|| format!("Invalid configuration {}", path.display()));
        };

        let mut configurator = Self::default();
        for (key, value) in overrides {
            configurator.properties.insert(key, value);
        }
        log::info!(
            "Configuration loaded from {} ({} properties)",
            path.display(),
            configurator.properties.len()
        );
        Ok(configurator)
    }

    /// Sets or replaces a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Removes a property, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.properties.get(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_string(),
        })
    }

    /// Reads an integer property.
    pub fn get_int(&self, key: &str) -> Result<i64, ConfigError> {
        let value = self.get(key)?;
        value.as_i64().ok_or_else(|| ConfigError::WrongType {
            key: key.to_string(),
            expected: "an integer",
            found: value.to_string(),
        })
    }

    /// Reads a floating-point property. Integers are accepted.
    pub fn get_double(&self, key: &str) -> Result<f64, ConfigError> {
        let value = self.get(key)?;
        value.as_f64().ok_or_else(|| ConfigError::WrongType {
            key: key.to_string(),
            expected: "a number",
            found: value.to_string(),
        })
    }

    /// Reads a string property.
    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| ConfigError::WrongType {
            key: key.to_string(),
            expected: "a string",
            found: value.to_string(),
        })
    }
}

/// Which character classifier the engine builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassificationMethod {
    /// Nearest-neighbour match against a reference alphabet.
    Knn,
    /// Feed-forward neural network.
    Neural,
}

impl ClassificationMethod {
    fn from_property(value: i64) -> Self {
        if value == 0 { Self::Knn } else { Self::Neural }
    }
}

/// Mode handed to the syntax parser together with the recognized characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxAnalysis {
    /// Return the raw best-match string.
    Disabled,
    /// Apply a syntax only when its length matches the recognized plate.
    EqualLength,
    /// Always pick the best-fitting syntax.
    Full,
}

impl SyntaxAnalysis {
    fn from_property(value: i64) -> Self {
        match value {
            0 => Self::Disabled,
            1 => Self::EqualLength,
            _ => Self::Full,
        }
    }
}

/// Every threshold one recognition run consults.
#[derive(Clone, Debug, PartialEq)]
pub struct IntelligenceConfig {
    /// Shear-correct each plate before normalization.
    pub skew_detection: bool,
    pub syntax_analysis: SyntaxAnalysis,
    pub classification_method: ClassificationMethod,
    /// Inclusive bounds on the number of segmented (and accepted) characters.
    pub minimum_chars: usize,
    pub maximum_chars: usize,
    pub max_char_width_dispersion: f32,
    pub min_plate_width_height_ratio: f32,
    pub max_plate_width_height_ratio: f32,
    pub min_char_width_height_ratio: f32,
    pub max_char_width_height_ratio: f32,
    pub max_brightness_cost_dispersion: f32,
    pub max_contrast_cost_dispersion: f32,
    pub max_hue_cost_dispersion: f32,
    pub max_saturation_cost_dispersion: f32,
    /// Relative shortfall below the average character height that is tolerated.
    pub max_height_cost_dispersion: f32,
    /// Largest classifier cost accepted for the best match.
    pub max_similarity_cost_dispersion: f32,
}

/// Same values as the built-in property table.
impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self {
            skew_detection: false,
            syntax_analysis: SyntaxAnalysis::Full,
            classification_method: ClassificationMethod::Knn,
            minimum_chars: 5,
            maximum_chars: 15,
            max_char_width_dispersion: 0.5,
            min_plate_width_height_ratio: 0.5,
            max_plate_width_height_ratio: 15.0,
            min_char_width_height_ratio: 0.1,
            max_char_width_height_ratio: 0.92,
            max_brightness_cost_dispersion: 0.161,
            max_contrast_cost_dispersion: 0.1,
            max_hue_cost_dispersion: 0.145,
            max_saturation_cost_dispersion: 0.24,
            max_height_cost_dispersion: 0.2,
            max_similarity_cost_dispersion: 100.0,
        }
    }
}

fn count(configurator: &Configurator, key: &str) -> Result<usize, ConfigError> {
    let value = configurator.get_int(key)?;
    usize::try_from(value).map_err(|_| ConfigError::WrongType {
        key: key.to_string(),
        expected: "a non-negative integer",
        found: value.to_string(),
    })
}

impl IntelligenceConfig {
    /// Reads every threshold from `configurator`, failing on the first
    /// missing or mistyped key.
    pub fn from_configurator(configurator: &Configurator) -> Result<Self, ConfigError> {
        let threshold = |key: &str| configurator.get_double(key).map(|v| v as f32);

        Ok(Self {
            skew_detection: configurator.get_int("intelligence_skewdetection")? != 0,
            syntax_analysis: SyntaxAnalysis::from_property(
                configurator.get_int("intelligence_syntaxanalysis")?,
            ),
            classification_method: ClassificationMethod::from_property(
                configurator.get_int("intelligence_classification_method")?,
            ),
            minimum_chars: count(configurator, "intelligence_minimumChars")?,
            maximum_chars: count(configurator, "intelligence_maximumChars")?,
            max_char_width_dispersion: threshold("intelligence_maxCharWidthDispersion")?,
            min_plate_width_height_ratio: threshold("intelligence_minPlateWidthHeightRatio")?,
            max_plate_width_height_ratio: threshold("intelligence_maxPlateWidthHeightRatio")?,
            min_char_width_height_ratio: threshold("intelligence_minCharWidthHeightRatio")?,
            max_char_width_height_ratio: threshold("intelligence_maxCharWidthHeightRatio")?,
            max_brightness_cost_dispersion: threshold("intelligence_maxBrightnessCostDispersion")?,
            max_contrast_cost_dispersion: threshold("intelligence_maxContrastCostDispersion")?,
            max_hue_cost_dispersion: threshold("intelligence_maxHueCostDispersion")?,
            max_saturation_cost_dispersion: threshold("intelligence_maxSaturationCostDispersion")?,
            max_height_cost_dispersion: threshold("intelligence_maxHeightCostDispersion")?,
            max_similarity_cost_dispersion: threshold(
                "intelligence_maxSimilarityCostDispersion",
            )?,
        })
    }
}
