//! Character classifiers.
//!
//! A [`CharacterRecognizer`] maps a normalized character to a ranked list of
//! label/cost matches, cheapest first. Two implementations ship with the
//! crate and are picked once, when the engine is built:
//!
//! - [`KnnPatternClassifier`]: distance to the patterns of a reference alphabet.
//! - [`NeuralPatternClassifier`]: a small feed-forward network.

pub mod knn;
pub mod neural;

use anyhow::Result;
use std::cmp::Ordering;
use std::path::Path;

use crate::candidate::Character;
use crate::config::{ClassificationMethod, Configurator};
use crate::error::RecognizeError;

pub use knn::{AlphabetPattern, KnnPatternClassifier};
pub use neural::{NeuralLayer, NeuralNetwork, NeuralPatternClassifier};

/// One candidate label for a character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecognizedPattern {
    pub label: char,
    /// Lower is a better match.
    pub cost: f32,
}

impl RecognizedPattern {
    pub fn new(label: char, cost: f32) -> Self {
        Self { label, cost }
    }
}

/// Classifier output for one character: every label ranked by cost.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognizedChar {
    patterns: Vec<RecognizedPattern>,
}

impl RecognizedChar {
    /// Ranks `patterns` by ascending cost. `None` when there are no patterns.
    pub fn new(mut patterns: Vec<RecognizedPattern>) -> Option<Self> {
        if patterns.is_empty() {
            return None;
        }
        patterns.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        Some(Self { patterns })
    }

    /// Cheapest match.
    pub fn best(&self) -> &RecognizedPattern {
        &self.patterns[0]
    }

    /// All matches, cheapest first.
    pub fn patterns(&self) -> &[RecognizedPattern] {
        &self.patterns
    }
}

/// Maps a normalized character to ranked label/cost matches.
///
/// Fails only when the classifier itself cannot be used. A glyph that
/// resembles nothing still gets a ranking, with a high best cost.
pub trait CharacterRecognizer: Send + Sync {
    fn recognize(&self, chr: &dyn Character) -> Result<RecognizedChar, RecognizeError>;
}

/// Builds the classifier selected by `method`, loading its model from the
/// path configured for it.
pub fn from_configurator(
    method: ClassificationMethod,
    configurator: &Configurator,
) -> Result<Box<dyn CharacterRecognizer>> {
    let recognizer: Box<dyn CharacterRecognizer> = match method {
        ClassificationMethod::Knn => {
            let path = configurator.get_str("char_learnAlphabetPath")?;
            Box::new(KnnPatternClassifier::load(Path::new(path))?)
        }
        ClassificationMethod::Neural => {
            let path = configurator.get_str("char_neuralNetworkPath")?;
            Box::new(NeuralPatternClassifier::load(Path::new(path))?)
        }
    };
    Ok(recognizer)
}

/// Keeps the cheapest cost per label, preserving first-seen label order.
fn cheapest_per_label(matches: impl IntoIterator<Item = RecognizedPattern>) -> Vec<RecognizedPattern> {
    let mut best: Vec<RecognizedPattern> = Vec::new();
    for candidate in matches {
        match best.iter_mut().find(|p| p.label == candidate.label) {
            Some(existing) => {
                if candidate.cost.partial_cmp(&existing.cost) == Some(Ordering::Less) {
                    existing.cost = candidate.cost;
                }
            }
            None => best.push(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_char_ranks_ascending() {
        let rc = RecognizedChar::new(vec![
            RecognizedPattern::new('B', 3.0),
            RecognizedPattern::new('A', 1.0),
            RecognizedPattern::new('8', 2.0),
        ])
        .unwrap();

        assert_eq!(rc.best().label, 'A');
        let labels: Vec<char> = rc.patterns().iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!['A', '8', 'B']);
    }

    #[test]
    fn test_recognized_char_empty() {
        assert!(RecognizedChar::new(Vec::new()).is_none());
    }

    #[test]
    fn test_cheapest_per_label() {
        let best = cheapest_per_label(vec![
            RecognizedPattern::new('A', 4.0),
            RecognizedPattern::new('B', 2.0),
            RecognizedPattern::new('A', 1.0),
        ]);
        assert_eq!(
            best,
            vec![RecognizedPattern::new('A', 1.0), RecognizedPattern::new('B', 2.0)]
        );
    }

    #[test]
    fn test_from_configurator_missing_model() {
        let mut configurator = Configurator::default();
        configurator.set("char_learnAlphabetPath", "/nonexistent/alphabet.json");
        assert!(from_configurator(ClassificationMethod::Knn, &configurator).is_err());
    }
}
