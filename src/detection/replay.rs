//! Replay adapter for the inference seam.
//!
//! The detector is an external capability; this adapter replays its recorded
//! per-frame output from a JSON file so the inspection loop can run without
//! the model runtime. Recording format:
//!
//! ```json
//! {
//!   "frames": [
//!     {
//!       "index": 0,
//!       "detections": [
//!         { "bbox": { "xmin": 10.0, "ymin": 20.0, "width": 64.0, "height": 32.0 },
//!           "label": "rail_crack", "confidence": 0.91 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::types::Detection;
use super::Inference;

#[derive(Debug, Serialize, Deserialize)]
struct Recording {
    frames: Vec<RecordedFrame>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordedFrame {
    index: u64,
    detections: Vec<Detection>,
}

/// Inference capability backed by a recorded detection file. Each `infer`
/// call advances an internal frame cursor; frames without a recorded entry
/// yield no detections.
pub struct ReplayDetector {
    by_frame: HashMap<u64, Vec<Detection>>,
    cursor: u64,
}

impl ReplayDetector {
    /// Detector that never reports anything.
    pub fn empty() -> Self {
        Self {
            by_frame: HashMap::new(),
            cursor: 0,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read detections file {}", path.display()))?;
        let recording: Recording = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse detections file {}", path.display()))?;

        let by_frame = recording
            .frames
            .into_iter()
            .map(|f| (f.index, f.detections))
            .collect();
        Ok(Self {
            by_frame,
            cursor: 0,
        })
    }
}

impl Inference for ReplayDetector {
    fn infer(&mut self, _image: &RgbImage) -> Result<Vec<Detection>> {
        let detections = self.by_frame.get(&self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Bbox;

    const RECORDING: &str = r#"{
        "frames": [
            { "index": 0, "detections": [
                { "bbox": { "xmin": 1.0, "ymin": 2.0, "width": 3.0, "height": 4.0 },
                  "label": "rail_crack", "confidence": 0.9 }
            ] },
            { "index": 2, "detections": [
                { "bbox": { "xmin": 5.0, "ymin": 6.0, "width": 7.0, "height": 8.0 },
                  "label": "loose_bolt", "confidence": 0.6 }
            ] }
        ]
    }"#;

    #[test]
    fn test_replays_per_frame_in_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detections.json");
        std::fs::write(&path, RECORDING).unwrap();

        let mut detector = ReplayDetector::from_file(&path).unwrap();
        let frame = RgbImage::new(4, 4);

        let first = detector.infer(&frame).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].label, "rail_crack");
        assert_eq!(first[0].bbox, Bbox::new(1.0, 2.0, 3.0, 4.0));

        // frame 1 has no recorded entry
        assert!(detector.infer(&frame).unwrap().is_empty());

        let third = detector.infer(&frame).unwrap();
        assert_eq!(third[0].label, "loose_bolt");
    }

    #[test]
    fn test_empty_detector() {
        let mut detector = ReplayDetector::empty();
        assert!(detector.infer(&RgbImage::new(2, 2)).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ReplayDetector::from_file(&path).is_err());
    }
}
