//! 相机输入系统 (Camera Input System)
//!
//! The stereo rig is an external collaborator; this module is the seam.
//! - [`FrameSource`] / [`StereoSource`]: the acquisition contracts
//! - [`ReplayCamera`]: file-backed source standing in for the SDK binding
//! - [`DepthMap`]: per-pixel metric depth
pub mod depth;
pub mod replay;

pub use depth::DepthMap;
pub use replay::ReplayCamera;

use anyhow::Result;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Sensor resolution modes of the stereo rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Vga,
    Hd720,
    Hd1080,
    Hd2k,
}

impl Resolution {
    /// Pixel dimensions (width, height) per side.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Resolution::Vga => (672, 376),
            Resolution::Hd720 => (1280, 720),
            Resolution::Hd1080 => (1920, 1080),
            Resolution::Hd2k => (2208, 1242),
        }
    }
}

/// Settings requested from the device at open time. The device may not honor
/// them exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub resolution: Resolution,
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::Hd720,
            fps: 30,
        }
    }
}

/// Outcome of one acquisition cycle.
///
/// `Missed` is a transient failure: the cycle is skipped, no frame index is
/// consumed, capture continues. `EndOfStream` ends the loop (replay sources
/// are finite; a live rig never returns it).
#[derive(Debug, Clone, PartialEq)]
pub enum Grab<T = RgbImage> {
    Frame(T),
    Missed,
    EndOfStream,
}

/// One stereo acquisition: the left image and its aligned depth map.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoFrame {
    pub image: RgbImage,
    pub depth: DepthMap,
}

/// A device handle able to produce sequential image frames on demand.
///
/// Opening is the implementor's constructor and must fail fast; the handle is
/// released when the value is dropped, on every exit path.
pub trait FrameSource {
    fn acquire_frame(&mut self) -> Result<Grab>;
}

/// A device handle producing image + depth pairs.
pub trait StereoSource {
    fn acquire_stereo(&mut self) -> Result<Grab<StereoFrame>>;
}
