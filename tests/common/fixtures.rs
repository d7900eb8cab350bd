//! Synthetic candidates standing in for the segmentation layer.

use image::{Rgb, RgbImage};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use plate_intelligence::recognizer::AlphabetPattern;
use plate_intelligence::{
    Band, CharStatistics, Character, KnnPatternClassifier, Plate, PositionInPlate, SkewEstimate,
    Snapshot,
};

pub const GLYPH_WIDTH: u32 = 10;
pub const GLYPH_HEIGHT: u32 = 20;
pub const PLATE_FILL: Rgb<u8> = Rgb([240, 240, 240]);

/// One-feature glyph whose feature is its own label code.
#[derive(Clone, Debug)]
pub struct TestChar {
    pub label: char,
    pub piece_width: u32,
    pub piece_height: u32,
    pub position: PositionInPlate,
    pub stats: CharStatistics,
    pub image: RgbImage,
}

impl TestChar {
    pub fn new(label: char, index: u32) -> Self {
        let x1 = 5 + index * (GLYPH_WIDTH + 2);
        Self {
            label,
            piece_width: GLYPH_WIDTH,
            piece_height: GLYPH_HEIGHT,
            position: PositionInPlate {
                x1,
                x2: x1 + GLYPH_WIDTH,
            },
            stats: CharStatistics {
                contrast: 0.6,
                brightness: 0.4,
                hue: 0.1,
                saturation: 0.2,
            },
            image: RgbImage::from_pixel(GLYPH_WIDTH, GLYPH_HEIGHT, Rgb([200, 200, 200])),
        }
    }
}

impl Character for TestChar {
    fn normalize(&mut self) {}

    fn piece_width(&self) -> u32 {
        self.piece_width
    }

    fn piece_height(&self) -> u32 {
        self.piece_height
    }

    fn full_width(&self) -> u32 {
        GLYPH_WIDTH
    }

    fn full_height(&self) -> u32 {
        GLYPH_HEIGHT
    }

    fn position_in_plate(&self) -> PositionInPlate {
        self.position
    }

    fn statistics(&self) -> CharStatistics {
        self.stats
    }

    fn features(&self) -> Vec<f32> {
        vec![self.label as u32 as f32]
    }

    fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Plate candidate that counts how often it is normalized and remembers the
/// top-left pixel of the buffer it was last normalized with.
#[derive(Clone, Debug)]
pub struct TestPlate {
    pub image: RgbImage,
    pub chars: Vec<TestChar>,
    pub skew: SkewEstimate,
    pub normalized: Arc<AtomicUsize>,
    pub normalized_pixel: Arc<Mutex<Option<Rgb<u8>>>>,
}

impl TestPlate {
    /// A 100x20 plate holding one glyph per character of `text`.
    pub fn with_text(text: &str, normalized: &Arc<AtomicUsize>) -> Self {
        Self {
            image: RgbImage::from_pixel(100, 20, PLATE_FILL),
            chars: text
                .chars()
                .enumerate()
                .map(|(i, label)| TestChar::new(label, i as u32))
                .collect(),
            skew: SkewEstimate::default(),
            normalized: Arc::clone(normalized),
            normalized_pixel: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the buffer, keeping the glyphs.
    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.image = RgbImage::from_pixel(width, height, PLATE_FILL);
        self
    }
}

impl Plate for TestPlate {
    type Char = TestChar;

    fn from_image(image: RgbImage) -> Self {
        // A rebuilt plate is segmented again and the fixture has no segmenter
        Self {
            image,
            chars: Vec::new(),
            skew: SkewEstimate::default(),
            normalized: Arc::new(AtomicUsize::new(0)),
            normalized_pixel: Arc::new(Mutex::new(None)),
        }
    }

    fn image(&self) -> &RgbImage {
        &self.image
    }

    fn normalize(&mut self) {
        self.normalized.fetch_add(1, Ordering::SeqCst);
        let pixel = self.image.get_pixel_checked(0, 0).copied();
        *self.normalized_pixel.lock().unwrap() = pixel;
    }

    fn horizontal_edge_detector(&mut self) {
        image::imageops::invert(&mut self.image);
    }

    fn skew_transformation(&self) -> SkewEstimate {
        self.skew
    }

    fn chars(&self) -> Vec<TestChar> {
        self.chars.clone()
    }
}

pub struct TestBand {
    pub image: RgbImage,
    pub plates: Vec<TestPlate>,
}

impl TestBand {
    pub fn new(plates: Vec<TestPlate>) -> Self {
        Self {
            image: RgbImage::from_pixel(200, 40, Rgb([128, 128, 128])),
            plates,
        }
    }
}

impl Band for TestBand {
    type Plate = TestPlate;

    fn plates(&self) -> Vec<TestPlate> {
        self.plates.clone()
    }

    fn image(&self) -> &RgbImage {
        &self.image
    }
}

pub struct TestSnapshot {
    pub image: RgbImage,
    pub bands: Vec<Vec<TestPlate>>,
    /// Pause before handing out bands, to make run time measurable.
    pub delay: Option<Duration>,
}

impl TestSnapshot {
    pub fn new(bands: Vec<Vec<TestPlate>>) -> Self {
        Self {
            image: RgbImage::from_pixel(320, 240, Rgb([90, 90, 90])),
            bands,
            delay: None,
        }
    }
}

impl Snapshot for TestSnapshot {
    type Band = TestBand;

    fn bands(&self) -> Vec<TestBand> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.bands
            .iter()
            .map(|plates| TestBand::new(plates.clone()))
            .collect()
    }

    fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Classifier that knows upper-case letters and digits by their label code.
pub fn alphabet_classifier() -> KnnPatternClassifier {
    KnnPatternClassifier::new(alphabet_patterns())
}

pub fn alphabet_patterns() -> Vec<AlphabetPattern> {
    ('A'..='Z')
        .chain('0'..='9')
        .map(|label| AlphabetPattern {
            label,
            features: vec![label as u32 as f32],
        })
        .collect()
}
