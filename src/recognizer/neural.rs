//! Feed-forward neural network classifier.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{CharacterRecognizer, RecognizedChar, RecognizedPattern};
use crate::candidate::Character;
use crate::error::RecognizeError;

const NAME: &str = "neural";

/// One fully connected layer with sigmoid activation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NeuralLayer {
    /// One row of input weights per neuron.
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

impl NeuralLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                sigmoid(sum + bias)
            })
            .collect()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Trained network plus the label of each output neuron.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NeuralNetwork {
    pub layers: Vec<NeuralLayer>,
    pub alphabet: Vec<char>,
}

impl NeuralNetwork {
    /// Checks that consecutive layers and the alphabet fit together.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.layers.first() else {
            return Err(anyhow!("Network has no layers"));
        };

        let mut expected_inputs = first.inputs();
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.weights.len() != layer.biases.len() {
                return Err(anyhow!(
                    "Layer {}: {} weight rows but {} biases",
                    idx,
                    layer.weights.len(),
                    layer.biases.len()
                ));
            }
            if layer.weights.iter().any(|row| row.len() != expected_inputs) {
                return Err(anyhow!(
                    "Layer {}: weight rows must all have {} inputs",
                    idx,
                    expected_inputs
                ));
            }
            expected_inputs = layer.weights.len();
        }

        if expected_inputs != self.alphabet.len() {
            return Err(anyhow!(
                "Network has {} outputs but alphabet has {} labels",
                expected_inputs,
                self.alphabet.len()
            ));
        }
        Ok(())
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.layers
            .iter()
            .fold(input.to_vec(), |activations, layer| layer.forward(&activations))
    }
}

/// Ranks labels by `1 - activation` of their output neuron.
#[derive(Clone, Debug, Default)]
pub struct NeuralPatternClassifier {
    network: NeuralNetwork,
}

impl NeuralPatternClassifier {
    /// Wraps `network` after checking that its layers and alphabet fit.
    pub fn new(network: NeuralNetwork) -> Result<Self> {
        network.validate()?;
        Ok(Self { network })
    }

    /// Loads and validates a network from JSON:
    /// `{ "layers": [ { "weights": [[..]], "biases": [..] } ], "alphabet": [..] }`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read neural network {}", path.display()))?;
        let network: NeuralNetwork = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse neural network {}", path.display()))?;
        let layers = network.layers.len();
        let labels = network.alphabet.len();
        let classifier = Self::new(network)
            .with_context(|| format!("Invalid neural network {}", path.display()))?;

        log::info!(
            "Loaded neural network with {} layers and {} labels from {}",
            layers,
            labels,
            path.display()
        );
        Ok(classifier)
    }
}

impl CharacterRecognizer for NeuralPatternClassifier {
    fn recognize(&self, chr: &dyn Character) -> Result<RecognizedChar, RecognizeError> {
        let Some(first) = self.network.layers.first() else {
            return Err(RecognizeError::Uninitialized { classifier: NAME });
        };

        let features = chr.features();
        if features.len() != first.inputs() {
            return Err(RecognizeError::FeatureMismatch {
                classifier: NAME,
                expected: first.inputs(),
                actual: features.len(),
            });
        }

        let outputs = self.network.forward(&features);
        if outputs.len() != self.network.alphabet.len() {
            return Err(RecognizeError::FeatureMismatch {
                classifier: NAME,
                expected: self.network.alphabet.len(),
                actual: outputs.len(),
            });
        }
        let patterns = self
            .network
            .alphabet
            .iter()
            .zip(outputs)
            .map(|(&label, activation)| RecognizedPattern::new(label, 1.0 - activation))
            .collect();

        RecognizedChar::new(patterns).ok_or(RecognizeError::Uninitialized { classifier: NAME })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CharStatistics, PositionInPlate};
    use image::RgbImage;
    use tempfile::tempdir;

    struct Sample {
        features: Vec<f32>,
        image: RgbImage,
    }

    impl Character for Sample {
        fn normalize(&mut self) {}
        fn piece_width(&self) -> u32 {
            1
        }
        fn piece_height(&self) -> u32 {
            1
        }
        fn full_width(&self) -> u32 {
            1
        }
        fn full_height(&self) -> u32 {
            1
        }
        fn position_in_plate(&self) -> PositionInPlate {
            PositionInPlate::default()
        }
        fn statistics(&self) -> CharStatistics {
            CharStatistics::default()
        }
        fn features(&self) -> Vec<f32> {
            self.features.clone()
        }
        fn image(&self) -> &RgbImage {
            &self.image
        }
    }

    fn sample(features: &[f32]) -> Sample {
        Sample {
            features: features.to_vec(),
            image: RgbImage::new(1, 1),
        }
    }

    /// Two inputs wired straight to two outputs: output i fires on input i.
    fn identity_network() -> NeuralNetwork {
        NeuralNetwork {
            layers: vec![NeuralLayer {
                weights: vec![vec![10.0, 0.0], vec![0.0, 10.0]],
                biases: vec![-5.0, -5.0],
            }],
            alphabet: vec!['X', 'Y'],
        }
    }

    #[test]
    fn test_strongest_output_ranks_first() {
        let classifier = NeuralPatternClassifier::new(identity_network()).unwrap();

        let rc = classifier.recognize(&sample(&[0.0, 1.0])).unwrap();
        assert_eq!(rc.best().label, 'Y');
        assert!(rc.best().cost < 0.01);
        assert!(rc.patterns()[1].cost > 0.99);
    }

    #[test]
    fn test_untrained_network_is_unavailable() {
        let classifier = NeuralPatternClassifier::default();
        let result = classifier.recognize(&sample(&[1.0]));
        assert!(matches!(result, Err(RecognizeError::Uninitialized { .. })));
    }

    #[test]
    fn test_input_size_mismatch() {
        let classifier = NeuralPatternClassifier::new(identity_network()).unwrap();
        let result = classifier.recognize(&sample(&[1.0]));
        assert!(matches!(result, Err(RecognizeError::FeatureMismatch { .. })));
    }

    #[test]
    fn test_validate_rejects_alphabet_mismatch() {
        let mut network = identity_network();
        network.alphabet.push('Z');
        assert!(network.validate().is_err());
        assert!(identity_network().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_layer_mismatch() {
        let mut network = identity_network();
        network.layers.push(NeuralLayer {
            weights: vec![vec![1.0, 1.0, 1.0]],
            biases: vec![0.0],
        });
        assert!(network.validate().is_err());
    }

    #[test]
    fn test_new_rejects_mismatched_layers() {
        // 2-wide hidden layer feeding an output layer that expects 3 inputs
        let network = NeuralNetwork {
            layers: vec![
                NeuralLayer {
                    weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                    biases: vec![0.0, 0.0],
                },
                NeuralLayer {
                    weights: vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]],
                    biases: vec![0.0, 0.0],
                },
            ],
            alphabet: vec!['Q'],
        };

        assert!(NeuralPatternClassifier::new(network).is_err());
    }

    #[test]
    fn test_new_rejects_short_alphabet() {
        let mut network = identity_network();
        network.alphabet.pop();
        assert!(NeuralPatternClassifier::new(network).is_err());
    }

    #[test]
    fn test_load_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("network.json");
        std::fs::write(&path, serde_json::to_string(&identity_network()).unwrap()).unwrap();

        let classifier = NeuralPatternClassifier::load(&path).unwrap();
        let rc = classifier.recognize(&sample(&[1.0, 0.0])).unwrap();
        assert_eq!(rc.best().label, 'X');
    }
}
