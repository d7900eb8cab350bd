//! Report content for each pipeline stage.
//!
//! Every method returns immediately for a disabled sink, before any image is
//! resized or any string formatted.

use image::RgbImage;
use image::imageops::{self, FilterType};

use super::Reporter;
use crate::candidate::{Band, Character, Plate, Snapshot};
use crate::heuristics::{CharVerdict, PlateRejection};
use crate::skew::SkewAnalysis;

/// Resized copy of `image`, or `None` for an empty buffer.
fn resized(image: &RgbImage, width: u32, height: u32) -> Option<RgbImage> {
    if image.width() == 0 || image.height() == 0 || width == 0 || height == 0 {
        return None;
    }
    Some(imageops::resize(image, width, height, FilterType::Triangle))
}

impl Reporter<'_> {
    pub(crate) fn snapshot<S: Snapshot>(&mut self, snapshot: &S) {
        if !self.is_enabled() {
            return;
        }
        self.text("<h1>Automatic Number Plate Recognition Report</h1>");
        self.text(&format!("<span>Image width: {} px</span>", snapshot.width()));
        self.text(&format!("<span>Image height: {} px</span>", snapshot.height()));
        self.text("<h2>Vertical and Horizontal plate projection</h2>");
        if let Some(graph) = snapshot.render_graph() {
            self.image(&graph, "snapshotgraph", 0, 0);
        }
        self.image(snapshot.image(), "snapshot", 0, 0);
    }

    pub(crate) fn band_candidate<B: Band>(&mut self, band: &B) {
        if !self.is_enabled() {
            return;
        }
        self.text("<div class='bandtxt'><h4>Band<br></h4>");
        self.image(band.image(), "bandsmall", 250, 30);
        self.text(&format!("<span>Band width : {} px</span>", band.width()));
        self.text(&format!("<span>Band height : {} px</span>", band.height()));
        self.text("</div>");
    }

    pub(crate) fn plate_candidate<P: Plate>(&mut self, plate: &P) {
        if !self.is_enabled() {
            return;
        }
        self.text("<div class='platetxt'><h4>Plate<br></h4>");
        self.image(plate.image(), "platesmall", 120, 30);
        self.text(&format!("<span>Plate width : {} px</span>", plate.width()));
        self.text(&format!("<span>Plate height : {} px</span>", plate.height()));
        self.text("</div>");
    }

    pub(crate) fn plate_rejected(&mut self, rejection: &PlateRejection) {
        if !self.is_enabled() {
            return;
        }
        self.text(&format!("<span class='rejected'>Plate rejected: {}</span>", rejection));
    }

    pub(crate) fn detected_plate<B: Band>(&mut self, band: &B, plate: &B::Plate) {
        if !self.is_enabled() {
            return;
        }
        self.text("<h2>Detected band</h2>");
        self.image(band.image(), "band", 0, 0);
        if let Some(graph) = band.render_graph() {
            self.image(&graph, "bandgraph", 0, 0);
        }

        self.text("<h2>Detected plate</h2>");
        if let Some(enlarged) = resized(plate.image(), 450, 90) {
            self.image(&enlarged, "plate", 0, 0);
        }
        if let Some(graph) = plate.render_graph() {
            self.image(&graph, "plategraph", 0, 0);
        }
    }

    pub(crate) fn skew(&mut self, analysis: Option<&SkewAnalysis>) {
        if !self.is_enabled() {
            return;
        }
        let Some(analysis) = analysis else {
            return;
        };
        self.text("<h2>Skew detection</h2>");
        self.image(&analysis.edge_image, "skewimage", 0, 0);
        if let Some(transform) = &analysis.transform_image {
            self.image(transform, "skewtransform", 0, 0);
        }
        self.text(&format!(
            "Detected skew angle : <b>{}</b>",
            analysis.estimate.angle
        ));
    }

    pub(crate) fn segmentation<C: Character>(&mut self, chars: &[C]) {
        if !self.is_enabled() {
            return;
        }
        self.text("<h2>Character segmentation</h2>");
        self.text("<div class='charsegment'>");
        for chr in chars {
            if let Some(glyph) = resized(chr.image(), 70, 100) {
                self.image(&glyph, "", 0, 0);
            }
        }
        self.text("</div>");
    }

    pub(crate) fn char_heuristics(&mut self, chr: &dyn Character, verdict: &CharVerdict) {
        if !self.is_enabled() {
            return;
        }
        let costs = &verdict.costs;
        let image = chr.image();

        self.text("<div class='heuristictable'>");
        if let Some(skeleton) = resized(
            image,
            image.width().saturating_mul(2),
            image.height().saturating_mul(2),
        ) {
            self.image(&skeleton, "skeleton", 0, 0);
        }
        let rows = [
            ("WHR", costs.width_height_ratio),
            ("HEI", costs.height),
            ("NEU", costs.similarity.unwrap_or(0.0)),
            ("CON", costs.contrast),
            ("BRI", costs.brightness),
            ("HUE", costs.hue),
            ("SAT", costs.saturation),
        ];
        for (name, value) in rows {
            self.text(&format!(
                "<span class='name'>{}</span><span class='value'>{}</span>",
                name, value
            ));
        }
        if !verdict.is_accepted() {
            self.text(&format!(
                "<span class='errflags'>{}</span>",
                verdict.flag_codes()
            ));
        }
        self.text("</div>");
    }

    pub(crate) fn recognized(&mut self, text: &str) {
        if !self.is_enabled() {
            return;
        }
        self.text("<span class='recognized'>");
        self.text(&format!("Recognized plate : {}", text));
        self.text("</span>");
    }
}
