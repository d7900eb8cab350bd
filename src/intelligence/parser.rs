//! Hand-off from recognized characters to the final plate text.
//!
//! Grammar-aware formatting belongs to a [`PlateParser`] supplied by the
//! caller. The crate only ships [`PassThroughParser`].

use super::RecognizedPlate;
use crate::config::SyntaxAnalysis;

/// Turns recognized characters into the final plate string.
pub trait PlateParser: Send + Sync {
    fn parse(&self, plate: &RecognizedPlate, mode: SyntaxAnalysis) -> String;
}

/// Joins the best label of every character, whatever the mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughParser;

impl PlateParser for PassThroughParser {
    fn parse(&self, plate: &RecognizedPlate, _mode: SyntaxAnalysis) -> String {
        plate.best_string()
    }
}
