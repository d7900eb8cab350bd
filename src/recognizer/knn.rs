//! Nearest-neighbour classifier over a reference alphabet.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{CharacterRecognizer, RecognizedChar, RecognizedPattern, cheapest_per_label};
use crate::candidate::Character;
use crate::error::RecognizeError;

const NAME: &str = "knn";

/// Feature vector of one reference glyph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlphabetPattern {
    pub label: char,
    pub features: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct AlphabetFile {
    patterns: Vec<AlphabetPattern>,
}

/// Ranks every label of the alphabet by the Euclidean distance between its
/// closest reference pattern and the character's features.
#[derive(Clone, Debug, Default)]
pub struct KnnPatternClassifier {
    patterns: Vec<AlphabetPattern>,
}

impl KnnPatternClassifier {
    pub fn new(patterns: Vec<AlphabetPattern>) -> Self {
        Self { patterns }
    }

    /// Loads an alphabet from a JSON file of the form
    /// `{ "patterns": [ { "label": "A", "features": [..] }, .. ] }`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read alphabet {}", path.display()))?;
        let file: AlphabetFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse alphabet {}", path.display()))?;

        if file.patterns.is_empty() {
            return Err(anyhow!("Alphabet {} has no patterns", path.display()));
        }
        log::info!(
            "Loaded {} alphabet patterns from {}",
            file.patterns.len(),
            path.display()
        );
        Ok(Self::new(file.patterns))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

impl CharacterRecognizer for KnnPatternClassifier {
    fn recognize(&self, chr: &dyn Character) -> Result<RecognizedChar, RecognizeError> {
        let features = chr.features();

        let mut matches = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            if pattern.features.len() != features.len() {
                return Err(RecognizeError::FeatureMismatch {
                    classifier: NAME,
                    expected: pattern.features.len(),
                    actual: features.len(),
                });
            }
            matches.push(RecognizedPattern::new(
                pattern.label,
                distance(&pattern.features, &features),
            ));
        }

        RecognizedChar::new(cheapest_per_label(matches))
            .ok_or(RecognizeError::Uninitialized { classifier: NAME })
    }
}
