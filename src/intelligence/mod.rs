//! Recognition pipeline.
//!
//! [`Intelligence`] walks a snapshot's bands and plates in order and returns
//! the text of the first plate that survives every gate:
//!
//! 1. Skew estimation and, when enabled, shear correction
//! 2. Plate normalization and the aspect-ratio gate
//! 3. Character segmentation with the count and width gates
//! 4. Per-character gate, classification and the similarity gate
//! 5. Aggregation and the minimum accepted-character threshold
//!
//! Rejections are silent and move the search on. Only an unusable classifier
//! ends a run with an error.

pub mod parser;
mod recognized;

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::candidate::{Band, Character, Plate, PlateAverages, Snapshot};
use crate::config::{Configurator, IntelligenceConfig};
use crate::error::IntelligenceError;
use crate::heuristics::{check_aspect_ratio, check_char, check_chars, check_similarity};
use crate::recognizer::{self, CharacterRecognizer};
use crate::report::{NoopReport, ReportSink, Reporter};
use crate::skew::{correct_skew, estimate_skew};

pub use parser::{PassThroughParser, PlateParser};
pub use recognized::RecognizedPlate;

/// The decision engine: configuration, classifier and parser for any number
/// of runs.
///
/// Runs take `&self`, so one instance can serve concurrent callers as long as
/// each brings its own snapshot.
pub struct Intelligence {
    config: IntelligenceConfig,
    recognizer: Box<dyn CharacterRecognizer>,
    parser: Box<dyn PlateParser>,
    last_process_duration_nanos: AtomicU64,
}

impl Intelligence {
    /// Reads thresholds from `configurator` and loads the configured
    /// classifier model. Fails when a threshold is missing or a model cannot
    /// be loaded.
    pub fn from_configurator(configurator: &Configurator) -> Result<Self> {
        let config = IntelligenceConfig::from_configurator(configurator)?;
        let recognizer = recognizer::from_configurator(config.classification_method, configurator)?;
        log::info!(
            "Recognition engine ready ({:?} classifier, skew correction {})",
            config.classification_method,
            if config.skew_detection { "on" } else { "off" }
        );
        Ok(Self::new(config, recognizer))
    }

    /// Builds an engine around an existing classifier, with the
    /// [`PassThroughParser`].
    pub fn new(config: IntelligenceConfig, recognizer: Box<dyn CharacterRecognizer>) -> Self {
        Self {
            config,
            recognizer,
            parser: Box::new(PassThroughParser),
            last_process_duration_nanos: AtomicU64::new(0),
        }
    }

    /// Replaces the plate parser.
    pub fn with_parser(mut self, parser: Box<dyn PlateParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &IntelligenceConfig {
        &self.config
    }

    /// Recognizes the plate in `snapshot` without producing a report.
    ///
    /// Returns `Ok(None)` when no candidate passes every gate.
    pub fn recognize<S: Snapshot>(&self, snapshot: &S) -> Result<Option<String>, IntelligenceError> {
        self.recognize_with_report(snapshot, &mut NoopReport)
    }

    /// Same as [`recognize`](Self::recognize), sending every stage to
    /// `report`. A failing report never changes the result.
    pub fn recognize_with_report<S: Snapshot>(
        &self,
        snapshot: &S,
        report: &mut dyn ReportSink,
    ) -> Result<Option<String>, IntelligenceError> {
        let started = Instant::now();
        let mut reporter = Reporter::new(report);

        let result = self.search(snapshot, &mut reporter);

        let elapsed = started.elapsed();
        self.last_process_duration_nanos
            .store(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX), Ordering::Relaxed);
        if reporter.failures() > 0 {
            log::debug!("Report sink dropped {} fragments", reporter.failures());
        }
        log::debug!("Recognition finished in {:?}", elapsed);

        result
    }

    /// Wall-clock duration of the most recent run, whatever its outcome.
    pub fn last_process_duration(&self) -> Duration {
        Duration::from_nanos(self.last_process_duration_nanos.load(Ordering::Relaxed))
    }

    pub fn last_process_duration_millis(&self) -> u64 {
        u64::try_from(self.last_process_duration().as_millis()).unwrap_or(u64::MAX)
    }

    fn search<S: Snapshot>(
        &self,
        snapshot: &S,
        reporter: &mut Reporter<'_>,
    ) -> Result<Option<String>, IntelligenceError> {
        reporter.snapshot(snapshot);

        for (band_idx, band) in snapshot.bands().into_iter().enumerate() {
            reporter.band_candidate(&band);

            for (plate_idx, plate) in band.plates().into_iter().enumerate() {
                reporter.plate_candidate(&plate);

                if let Some(text) = self.evaluate_plate(&band, plate, reporter)? {
                    log::info!(
                        "Recognized plate '{}' (band {}, plate {})",
                        text,
                        band_idx,
                        plate_idx
                    );
                    return Ok(Some(text));
                }
            }
        }

        log::debug!("No plate candidate passed every gate");
        Ok(None)
    }

    /// Runs one plate candidate through every stage. `Ok(None)` means the
    /// candidate was rejected.
    fn evaluate_plate<B: Band>(
        &self,
        band: &B,
        plate: B::Plate,
        reporter: &mut Reporter<'_>,
    ) -> Result<Option<String>, IntelligenceError> {
        let config = &self.config;

        // The estimate is only worth computing when it is used
        let skew = (config.skew_detection || reporter.is_enabled()).then(|| estimate_skew(&plate));
        let mut plate = match (&skew, config.skew_detection) {
            (Some(analysis), true) => correct_skew(plate, &analysis.estimate),
            _ => plate,
        };

        plate.normalize();

        if let Err(rejection) = check_aspect_ratio(&plate, config) {
            log::debug!("Plate rejected: {}", rejection);
            reporter.plate_rejected(&rejection);
            return Ok(None);
        }

        let mut chars = plate.chars();
        if let Err(rejection) = check_chars(&plate, &chars, config) {
            log::debug!("Plate rejected: {}", rejection);
            reporter.plate_rejected(&rejection);
            return Ok(None);
        }

        reporter.detected_plate(band, &plate);
        reporter.skew(skew.as_ref());
        reporter.segmentation(&chars);

        for chr in &mut chars {
            chr.normalize();
        }
        let averages = PlateAverages::of(&plate, &chars);

        let mut recognized = RecognizedPlate::new();
        for chr in &chars {
            let mut verdict = check_char(chr, plate.width(), &averages, config);

            if verdict.is_accepted() {
                let matches = self.recognizer.recognize(chr)?;
                check_similarity(&mut verdict, matches.best().cost, config);
                if verdict.is_accepted() {
                    recognized.add_char(matches);
                }
            }

            if !verdict.is_accepted() {
                log::debug!("Character rejected: {}", verdict.flag_codes());
            }
            reporter.char_heuristics(chr, &verdict);
        }

        if recognized.len() < config.minimum_chars {
            log::debug!(
                "Plate rejected: {} of {} characters accepted",
                recognized.len(),
                chars.len()
            );
            return Ok(None);
        }

        let text = self.parser.parse(&recognized, config.syntax_analysis);
        reporter.recognized(&text);
        Ok(Some(text))
    }
}
