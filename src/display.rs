//! 显示输出 (Display output)
//!
//! Operator-feedback seam. The capture and inspection loops hand every frame
//! to a [`FrameSink`]; nothing is consumed back. A GUI window is a provided
//! capability, not implemented here; the shipped sinks are headless.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};

/// Display collaborator: `show(image)`, no return value consumed.
pub trait FrameSink {
    fn show(&mut self, image: &RgbImage) -> Result<()>;
}

/// Discards every frame.
pub struct NullSink;

impl FrameSink for NullSink {
    fn show(&mut self, _image: &RgbImage) -> Result<()> {
        Ok(())
    }
}

/// Continuously overwrites a single PNG with the latest frame, so the
/// operator can watch the run with any image viewer. Writes go through a
/// temp file and a rename, so a viewer never reads a torn frame.
pub struct PreviewSink {
    path: PathBuf,
    tmp: PathBuf,
}

impl PreviewSink {
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create preview directory {}", parent.display())
                })?;
            }
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        Ok(Self {
            path: path.to_path_buf(),
            tmp: PathBuf::from(tmp),
        })
    }
}

impl FrameSink for PreviewSink {
    fn show(&mut self, image: &RgbImage) -> Result<()> {
        image
            .save_with_format(&self.tmp, ImageFormat::Png)
            .with_context(|| format!("failed to write preview {}", self.tmp.display()))?;
        std::fs::rename(&self.tmp, &self.path)
            .with_context(|| format!("failed to publish preview {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_frames() {
        assert!(NullSink.show(&RgbImage::new(2, 2)).is_ok());
    }

    #[test]
    fn test_preview_sink_overwrites_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let mut sink = PreviewSink::new(&path).unwrap();

        sink.show(&RgbImage::new(2, 2)).unwrap();
        sink.show(&RgbImage::new(4, 4)).unwrap();

        let latest = image::open(&path).unwrap().to_rgb8();
        assert_eq!(latest.width(), 4);
        // no temp file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_preview_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/live/preview.png");
        let mut sink = PreviewSink::new(&path).unwrap();
        sink.show(&RgbImage::new(2, 2)).unwrap();
        assert!(path.is_file());
    }
}
