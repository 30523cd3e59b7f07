/// 轨道巡检预览 (Rail Inspection Preview)
///
/// Replays a stereo recording through the detection seam: for every frame,
/// run inference, read the depth at each box centre, report the findings on
/// the console and publish the annotated frame. Type `q` + Enter to stop.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use railtrack_rs::camera::{CameraSettings, Grab, ReplayCamera, StereoSource};
use railtrack_rs::control::StopSignal;
use railtrack_rs::detection::{Inference, Overlay, ReplayDetector};
use railtrack_rs::display::{FrameSink, NullSink, PreviewSink};

/// 巡检预览参数
#[derive(Parser, Debug)]
#[command(author, version, about = "轨道巡检预览 - Rail inspection preview", long_about = None)]
struct Args {
    /// Frame source directory, replayed in filename order
    #[arg(short, long)]
    source: PathBuf,

    /// Recorded detector output (JSON); omit to run without detections
    #[arg(short, long)]
    detections: Option<PathBuf>,

    /// TTF/OTF font for captions; boxes draw without one
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Annotated preview PNG, continuously overwritten
    #[arg(short, long)]
    preview: Option<PathBuf>,

    /// Replay frame rate
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = CameraSettings {
        fps: args.fps,
        ..CameraSettings::default()
    };
    let mut camera = ReplayCamera::open(&args.source, settings)?;

    let mut detector = match &args.detections {
        Some(path) => ReplayDetector::from_file(path)?,
        None => {
            println!("⚠️ No detections file given, running without inference");
            ReplayDetector::empty()
        }
    };

    let overlay = match &args.font {
        Some(path) => Overlay::with_font_file(path)?,
        None => Overlay::new(),
    };

    let mut sink: Box<dyn FrameSink> = match &args.preview {
        Some(path) => Box::new(PreviewSink::new(path)?),
        None => Box::new(NullSink),
    };

    println!("🔍 Inspection preview started. Type 'q' + Enter to stop.");
    let mut stop = StopSignal::from_stdin();

    loop {
        if stop.requested() {
            println!("🛑 Stop requested");
            break;
        }

        let stereo = match camera.acquire_stereo() {
            Ok(Grab::Frame(stereo)) => stereo,
            Ok(Grab::Missed) => continue,
            Ok(Grab::EndOfStream) => {
                println!("🛑 Frame source ended");
                break;
            }
            Err(e) => {
                eprintln!("⚠️ frame acquisition failed: {}", e);
                continue;
            }
        };

        let detections = detector.infer(&stereo.image)?;

        for det in &detections {
            let (cx, cy) = det.bbox.cxcy();
            let (cx, cy) = (cx.max(0.0) as u32, cy.max(0.0) as u32);
            match stereo.depth.measure_at(cx, cy) {
                Some(metres) => println!(
                    "[{}] at ({},{}) -> Depth: {:.2} m",
                    det.label, cx, cy, metres
                ),
                None => println!("[{}] at ({},{}) -> Depth: n/a", det.label, cx, cy),
            }
        }

        let mut annotated = stereo.image;
        overlay.draw(&mut annotated, &detections, Some(&stereo.depth));
        if let Err(e) = sink.show(&annotated) {
            eprintln!("⚠️ display failed: {}", e);
        }
    }

    Ok(())
}
