//! File-backed HTML report.

use chrono::{DateTime, Local};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use super::ReportSink;
use crate::error::ReportError;

const REPORT_FILE: &str = "report.html";

const STYLE: &str = "body { font-family: sans-serif; } \
    span { display: block; } \
    .bandtxt, .platetxt, .heuristictable { display: inline-block; margin: 4px; } \
    .errflags { color: #c00; font-weight: bold; } \
    .recognized { font-size: 1.5em; }";

/// Collects fragments in memory and saves every image as a PNG next to the
/// final `report.html`.
pub struct HtmlReport {
    dir: PathBuf,
    body: String,
    image_count: usize,
    started: DateTime<Local>,
}

impl HtmlReport {
    /// Creates `dir` if needed and starts an empty report in it.
    pub fn new(dir: &Path) -> Result<Self, ReportError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            body: String::new(),
            image_count: 0,
            started: Local::now(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `report.html` and returns its path.
    pub fn finish(self) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(REPORT_FILE);
        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Plate recognition report</title>\n<style>{}</style>\n</head>\n<body>\n\
             <p class=\"generated\">Generated {}</p>\n{}</body>\n</html>\n",
            STYLE,
            self.started.format("%Y-%m-%d %H:%M:%S"),
            self.body
        );
        fs::write(&path, html)?;
        Ok(path)
    }
}

fn file_stem(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

impl ReportSink for HtmlReport {
    fn insert_text(&mut self, fragment: &str) -> Result<(), ReportError> {
        self.body.push_str(fragment);
        self.body.push('\n');
        Ok(())
    }

    fn insert_image(
        &mut self,
        image: &RgbImage,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<(), ReportError> {
        self.image_count += 1;
        let stem = file_stem(label);
        let name = format!("{:04}_{}.png", self.image_count, stem);
        image.save(self.dir.join(&name))?;

        let size = if width > 0 && height > 0 {
            format!(" width=\"{}\" height=\"{}\"", width, height)
        } else {
            String::new()
        };
        self.body
            .push_str(&format!("<img src=\"{}\" class=\"{}\"{}>\n", name, stem, size));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_report_written_with_images() {
        let dir = tempdir().unwrap();
        let mut report = HtmlReport::new(&dir.path().join("run")).unwrap();

        report.insert_text("<h1>Report</h1>").unwrap();
        report
            .insert_image(&RgbImage::new(4, 2), "platesmall", 120, 30)
            .unwrap();
        report.insert_image(&RgbImage::new(4, 2), "", 0, 0).unwrap();

        let path = report.finish().unwrap();
        let html = std::fs::read_to_string(&path).unwrap();

        assert!(html.contains("<h1>Report</h1>"));
        assert!(html.contains("src=\"0001_platesmall.png\""));
        assert!(html.contains("width=\"120\" height=\"30\""));
        assert!(html.contains("src=\"0002_image.png\""));
        assert!(dir.path().join("run").join("0001_platesmall.png").exists());
    }

    #[test]
    fn test_image_class_is_sanitized() {
        let dir = tempdir().unwrap();
        let mut report = HtmlReport::new(dir.path()).unwrap();

        report
            .insert_image(&RgbImage::new(2, 2), "plate\" onload=\"x", 0, 0)
            .unwrap();

        let html = std::fs::read_to_string(report.finish().unwrap()).unwrap();
        assert!(html.contains("class=\"plateonloadx\""));
        assert!(!html.contains("onload=\""));
    }

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem("../plate small"), "platesmall");
        assert_eq!(file_stem("char_1"), "char_1");
    }
}
