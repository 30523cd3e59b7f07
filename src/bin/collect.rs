/// 数据集采集器 (Dataset Collector)
///
/// Captures frames into a timestamped session under `<root>/raw/`, then
/// splits the session into train/val/test subsets ready for annotation
/// upload. Type `q` + Enter to stop recording.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use railtrack_rs::camera::{CameraSettings, ReplayCamera};
use railtrack_rs::config::CollectorConfig;
use railtrack_rs::control::StopSignal;
use railtrack_rs::dataset::{run_capture, split_session, Session};
use railtrack_rs::display::{FrameSink, NullSink, PreviewSink};

/// 数据集采集参数
#[derive(Parser, Debug)]
#[command(author, version, about = "轨道数据集采集 - Rail dataset collector", long_about = None)]
struct Args {
    /// Frame source directory, replayed in filename order
    #[arg(short, long)]
    source: PathBuf,

    /// Collector config file (created with defaults when missing)
    #[arg(short, long, default_value = "collector.json")]
    config: String,

    /// Fix the shuffle seed for a reproducible split
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames (unattended runs)
    #[arg(long)]
    max_frames: Option<u64>,

    /// Keep the raw session as-is, skip the train/val/test split
    #[arg(long, default_value_t = false)]
    no_split: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = CollectorConfig::load(&args.config);
    config.print_summary();

    let settings = CameraSettings {
        resolution: config.resolution,
        fps: config.fps,
    };

    // Open the source first: an open failure must leave no session behind.
    let mut camera = ReplayCamera::open(&args.source, settings)?;

    let session = Session::create(&config.dataset_root)?;
    println!(
        "📷 Dataset recording started. Saving images to: {}",
        session.dir().display()
    );
    println!("Type 'q' + Enter to stop recording.");

    let mut sink: Box<dyn FrameSink> = match &config.preview {
        Some(path) => Box::new(PreviewSink::new(path)?),
        None => Box::new(NullSink),
    };
    let mut stop = StopSignal::from_stdin();

    let report = run_capture(
        &mut camera,
        sink.as_mut(),
        &mut stop,
        &session,
        args.max_frames,
    )?;
    drop(camera); // release the device before touching the session again

    println!(
        "💾 Recording stopped. {} frames saved in: {}",
        report.frames_written,
        session.dir().display()
    );

    if args.no_split {
        println!("⏭️  Split skipped (--no-split)");
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let summary = split_session(session.dir(), &config.split, &mut rng)?;

    println!("✅ Dataset split completed:");
    println!("  Train: {} images", summary.train);
    println!("  Val  : {} images", summary.val);
    println!("  Test : {} images", summary.test);
    println!("Split folder created: {}", summary.split_dir.display());

    Ok(())
}
