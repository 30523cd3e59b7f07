//! 检测结果叠加渲染 (Detection overlay rendering)
//!
//! Draws boxes, class captions and depth readings onto a frame for operator
//! feedback. Boxes always draw; captions need a font file, supplied by the
//! operator at startup.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::camera::DepthMap;
use crate::detection::Detection;

// Box colors, one per class, reused cyclically.
const PALETTE: [(u8, u8, u8); 12] = [
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (255, 128, 0),
    (255, 0, 128),
    (128, 255, 0),
    (0, 128, 255),
    (255, 255, 255),
    (128, 0, 255),
];

const CAPTION_SCALE: f32 = 16.0;
const CAPTION_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Annotates frames with detections and depth readings.
pub struct Overlay {
    font: Option<FontVec>,
}

impl Overlay {
    /// Overlay without captions (boxes only).
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Overlay with captions rendered in the given TTF/OTF font.
    pub fn with_font_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read font file {}", path.display()))?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| anyhow::anyhow!("invalid font file {}", path.display()))?;
        Ok(Self { font: Some(font) })
    }

    /// Draw every detection onto `image`; depth readings are captioned at the
    /// box centre when a measurement exists there.
    pub fn draw(&self, image: &mut RgbImage, detections: &[Detection], depth: Option<&DepthMap>) {
        for det in detections {
            let color = label_color(&det.label);
            if let Some(rect) = clamp_rect(image, det) {
                draw_hollow_rect_mut(image, rect, color);

                if let Some(font) = &self.font {
                    let caption = format!("{} {:.0}%", det.label, det.confidence * 100.0);
                    let y = (rect.top() - CAPTION_SCALE as i32 - 2).max(0);
                    draw_text_mut(
                        image,
                        CAPTION_COLOR,
                        rect.left(),
                        y,
                        PxScale::from(CAPTION_SCALE),
                        font,
                        &caption,
                    );

                    let (cx, cy) = det.bbox.cxcy();
                    if let Some(metres) =
                        depth.and_then(|d| d.measure_at(cx.max(0.0) as u32, cy.max(0.0) as u32))
                    {
                        draw_text_mut(
                            image,
                            CAPTION_COLOR,
                            cx as i32,
                            (cy as i32 - 10).max(0),
                            PxScale::from(CAPTION_SCALE),
                            font,
                            &format!("{:.2} m", metres),
                        );
                    }
                }
            }
        }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable palette color per class label.
fn label_color(label: &str) -> Rgb<u8> {
    let index = label.bytes().map(usize::from).sum::<usize>() % PALETTE.len();
    let (r, g, b) = PALETTE[index];
    Rgb([r, g, b])
}

// Intersect the box with the image bounds; None when nothing is visible.
fn clamp_rect(image: &RgbImage, det: &Detection) -> Option<Rect> {
    let (img_w, img_h) = (image.width() as f32, image.height() as f32);
    let x0 = det.bbox.xmin().max(0.0);
    let y0 = det.bbox.ymin().max(0.0);
    let x1 = det.bbox.xmax().min(img_w - 1.0);
    let y1 = det.bbox.ymax().min(img_h - 1.0);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let w = ((x1 - x0) as u32).max(1);
    let h = ((y1 - y0) as u32).max(1);
    Some(Rect::at(x0 as i32, y0 as i32).of_size(w, h))
}
