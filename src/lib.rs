//! Plate Intelligence
//!
//! The decision stage of an automatic number plate recognition pipeline.
//! Upstream segmentation hands over a snapshot split into bands, plates and
//! characters; this crate searches those candidates, straightens and gates
//! them, classifies the surviving characters and returns the plate text.
//!
//! ## Modules
//!
//! * [`candidate`] - Traits the segmentation layer implements
//! * [`config`] - Property map and the thresholds read from it
//! * [`heuristics`] - Plate and character acceptance gates
//! * [`recognizer`] - KNN and neural character classifiers
//! * [`skew`] - Skew estimation and shear correction
//! * [`intelligence`] - The recognition pipeline
//! * [`report`] - Optional HTML diagnostics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use plate_intelligence::{Configurator, Intelligence, Snapshot};
//!
//! fn read_plate<S: Snapshot>(snapshot: &S) -> anyhow::Result<Option<String>> {
//!     let engine = Intelligence::from_configurator(&Configurator::default())?;
//!     Ok(engine.recognize(snapshot)?)
//! }
//! ```

pub mod candidate;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod intelligence;
pub mod recognizer;
pub mod report;
pub mod skew;

pub use candidate::{Band, CharStatistics, Character, Plate, PositionInPlate, Snapshot};
pub use config::{ClassificationMethod, Configurator, IntelligenceConfig, SyntaxAnalysis};
pub use error::{ConfigError, IntelligenceError, RecognizeError, ReportError};
pub use intelligence::{Intelligence, PassThroughParser, PlateParser, RecognizedPlate};
pub use recognizer::{
    CharacterRecognizer, KnnPatternClassifier, NeuralPatternClassifier, RecognizedChar,
    RecognizedPattern,
};
pub use report::{HtmlReport, NoopReport, ReportSink};
pub use skew::SkewEstimate;
