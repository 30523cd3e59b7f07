/// Overlay 演示
///
/// Renders canned detections and a synthetic depth map onto a generated
/// frame and saves the result: cargo run --example overlay_demo
use anyhow::Result;
use image::{Rgb, RgbImage};

use railtrack_rs::camera::DepthMap;
use railtrack_rs::detection::{Bbox, Detection, Overlay};

fn main() -> Result<()> {
    // grey gradient stand-in for a rail frame
    let mut frame = RgbImage::from_fn(320, 240, |x, y| {
        let shade = ((x + y) % 256) as u8;
        Rgb([shade, shade, shade])
    });

    let detections = vec![
        Detection::new(Bbox::new(40.0, 60.0, 90.0, 70.0), "rail_crack", 0.91),
        Detection::new(Bbox::new(180.0, 120.0, 60.0, 60.0), "loose_bolt", 0.64),
    ];

    let depth = DepthMap::from_raw(320, 240, vec![3.2; 320 * 240])?;

    let overlay = Overlay::new();
    overlay.draw(&mut frame, &detections, Some(&depth));

    let out = "overlay_demo.png";
    frame.save(out)?;
    println!("✅ Annotated frame written to {}", out);
    for det in &detections {
        let (cx, cy) = det.bbox.cxcy();
        println!(
            "[{}] at ({:.0},{:.0}) -> Depth: {:.2} m",
            det.label,
            cx,
            cy,
            depth.depth_at(cx as u32, cy as u32)
        );
    }

    Ok(())
}
