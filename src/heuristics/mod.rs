//! Heuristic acceptance gates.
//!
//! - [`plate`]: rejects a whole plate by aspect ratio, character count and
//!   width uniformity.
//! - [`character`]: flags a single glyph that looks unlike its neighbours.

pub mod character;
pub mod plate;

pub use character::{CharCosts, CharVerdict, HeuristicFlag, check_char, check_similarity};
pub use plate::{PlateRejection, check_aspect_ratio, check_chars, check_plate};
