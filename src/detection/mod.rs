/// 检测系统 (Detection System)
///
/// The detector itself is an external capability; this module is the seam.
/// - Inference:      the capability contract
/// - ReplayDetector: recorded-output adapter
/// - Overlay:        annotation rendering
pub mod overlay;
pub mod replay;
pub mod types;

pub use overlay::Overlay;
pub use replay::ReplayDetector;
pub use types::{Bbox, Detection};

use anyhow::Result;
use image::RgbImage;

/// Inference capability: one image in, detections out.
pub trait Inference {
    fn infer(&mut self, image: &RgbImage) -> Result<Vec<Detection>>;
}
