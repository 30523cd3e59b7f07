/// 检测数据结构定义
/// Data structures for the detection seam
use serde::{Deserialize, Serialize};

/// A bounding box around a detected object, in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bbox {
    xmin: f32,
    ymin: f32,
    width: f32,
    height: f32,
}

impl Bbox {
    pub fn new(xmin: f32, ymin: f32, width: f32, height: f32) -> Self {
        Self {
            xmin,
            ymin,
            width,
            height,
        }
    }

    pub fn xmin(&self) -> f32 {
        self.xmin
    }

    pub fn ymin(&self) -> f32 {
        self.ymin
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn xmax(&self) -> f32 {
        self.xmin + self.width
    }

    pub fn ymax(&self) -> f32 {
        self.ymin + self.height
    }

    /// Box centre, the pixel the depth reading is taken at.
    pub fn cxcy(&self) -> (f32, f32) {
        (self.xmin + self.width / 2., self.ymin + self.height / 2.)
    }
}

/// One detector output: box, class label, confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: Bbox,
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: Bbox, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }
}
