//! Error types for the recognition engine.
//!
//! Candidate rejection is not an error: a plate or character that fails a
//! heuristic is skipped silently. The types here cover the faults a caller
//! must be able to tell apart from "no plate recognized".

use thiserror::Error;

/// Configuration could not supply a required threshold.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The property map has no entry for this key.
    #[error("missing configuration property '{key}'")]
    Missing { key: String },

    /// The entry exists but holds the wrong JSON type.
    #[error("configuration property '{key}' is not {expected}: {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// The configuration file exists but is not a JSON object.
    #[error("configuration file is not a JSON object of properties")]
    NotAnObject,
}

/// The character classifier cannot be used.
///
/// A poor match is never reported here; it shows up as a high cost on the
/// best pattern instead.
#[derive(Error, Debug)]
pub enum RecognizeError {
    /// The model holds no patterns or layers.
    #[error("{classifier} classifier has no model loaded")]
    Uninitialized { classifier: &'static str },

    /// The character's feature vector does not fit the model.
    #[error("{classifier} classifier expects {expected} features, got {actual}")]
    FeatureMismatch {
        classifier: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// A diagnostics sink failed to record a fragment or an image.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("report io")]
    Io(#[from] std::io::Error),

    #[error("report image encoding")]
    Image(#[from] image::ImageError),
}

/// A recognition run failed for an operational reason.
#[derive(Error, Debug)]
pub enum IntelligenceError {
    #[error("character classifier unavailable")]
    Recognizer(#[from] RecognizeError),
}
