//! Diagnostic reports.
//!
//! A [`ReportSink`] receives HTML fragments and images while a run is in
//! progress. Sinks are fire-and-forget: the pipeline logs a failing sink and
//! carries on, so a broken report can never change a recognition result.
//!
//! - [`NoopReport`]: the silent default.
//! - [`HtmlReport`]: writes `report.html` and PNG images into a directory.

pub mod html;
mod stages;

use image::RgbImage;

use crate::error::ReportError;

pub use html::HtmlReport;

/// Destination for diagnostic fragments.
pub trait ReportSink {
    /// Whether the sink wants content at all. Disabled sinks cost nothing:
    /// the pipeline skips rendering and formatting for them.
    fn is_enabled(&self) -> bool {
        true
    }

    fn insert_text(&mut self, fragment: &str) -> Result<(), ReportError>;

    /// Adds an image. A zero `width` or `height` keeps the natural size.
    fn insert_image(
        &mut self,
        image: &RgbImage,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<(), ReportError>;
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReport;

impl ReportSink for NoopReport {
    fn is_enabled(&self) -> bool {
        false
    }

    fn insert_text(&mut self, _fragment: &str) -> Result<(), ReportError> {
        Ok(())
    }

    fn insert_image(
        &mut self,
        _image: &RgbImage,
        _label: &str,
        _width: u32,
        _height: u32,
    ) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Pipeline-side handle on a sink that swallows its failures.
pub(crate) struct Reporter<'a> {
    sink: &'a mut dyn ReportSink,
    failures: usize,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(sink: &'a mut dyn ReportSink) -> Self {
        Self { sink, failures: 0 }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.sink.is_enabled()
    }

    /// Number of fragments the sink failed to record.
    pub(crate) fn failures(&self) -> usize {
        self.failures
    }

    pub(crate) fn text(&mut self, fragment: &str) {
        if let Err(e) = self.sink.insert_text(fragment) {
            self.failed(&e);
        }
    }

    pub(crate) fn image(&mut self, image: &RgbImage, label: &str, width: u32, height: u32) {
        if let Err(e) = self.sink.insert_image(image, label, width, height) {
            self.failed(&e);
        }
    }

    fn failed(&mut self, e: &ReportError) {
        self.failures += 1;
        // Log the first failure only; a broken sink usually stays broken
        if self.failures == 1 {
            log::warn!("Report sink failed, continuing without it: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSink;

    impl ReportSink for BrokenSink {
        fn insert_text(&mut self, _fragment: &str) -> Result<(), ReportError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn insert_image(
            &mut self,
            _image: &RgbImage,
            _label: &str,
            _width: u32,
            _height: u32,
        ) -> Result<(), ReportError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn test_noop_is_disabled() {
        let mut sink = NoopReport;
        let reporter = Reporter::new(&mut sink);
        assert!(!reporter.is_enabled());
    }

    #[test]
    fn test_reporter_swallows_failures() {
        let mut sink = BrokenSink;
        let mut reporter = Reporter::new(&mut sink);

        reporter.text("<h1>x</h1>");
        reporter.image(&RgbImage::new(2, 2), "plate", 0, 0);

        assert!(reporter.is_enabled());
        assert_eq!(reporter.failures(), 2);
    }
}
