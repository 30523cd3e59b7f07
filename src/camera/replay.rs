//! File-backed frame source.
//!
//! Replays a directory of image files in filename order at the configured
//! frame rate, through the same traits a real stereo-SDK binding would
//! implement. A `frame_000000.depth` sibling (see [`DepthMap::load`]) supplies
//! the depth channel; frames without one get an all-NaN map.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use image::RgbImage;

use super::{CameraSettings, DepthMap, FrameSource, Grab, StereoFrame, StereoSource};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Frame source replaying image files from a directory.
pub struct ReplayCamera {
    frames: Vec<PathBuf>,
    cursor: usize,
    delivered: usize,
    interval: Duration,
    last_grab: Option<Instant>,
}

impl ReplayCamera {
    /// Open a replay source. Fails when the directory cannot be read or holds
    /// no image files, before any downstream state is created.
    pub fn open(dir: &Path, settings: CameraSettings) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to open frame source {}", dir.display()))?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        let ext = ext.to_ascii_lowercase();
                        IMAGE_EXTENSIONS.iter().any(|e| *e == ext)
                    })
                    .unwrap_or(false)
            })
            .collect();
        frames.sort();

        if frames.is_empty() {
            bail!("no image files in {}", dir.display());
        }

        let fps = settings.fps.max(1);
        println!(
            "📷 Replay source opened: {} frames in {} ({}fps)",
            frames.len(),
            dir.display(),
            fps
        );

        Ok(Self {
            frames,
            cursor: 0,
            delivered: 0,
            interval: Duration::from_secs_f64(1.0 / fps as f64),
            last_grab: None,
        })
    }

    /// Total frames available for replay.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    // Block until the next frame slot, emulating the device's native rate.
    fn pace(&mut self) {
        if let Some(last) = self.last_grab {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last_grab = Some(Instant::now());
    }

    fn next_image(&mut self) -> Result<Grab<(PathBuf, RgbImage)>> {
        if self.cursor >= self.frames.len() {
            return Ok(Grab::EndOfStream);
        }
        self.pace();

        let path = self.frames[self.cursor].clone();
        self.cursor += 1;

        match image::open(&path) {
            Ok(img) => {
                self.delivered += 1;
                Ok(Grab::Frame((path, img.to_rgb8())))
            }
            Err(e) => {
                eprintln!("⚠️ skipping unreadable frame {}: {}", path.display(), e);
                Ok(Grab::Missed)
            }
        }
    }
}

impl FrameSource for ReplayCamera {
    fn acquire_frame(&mut self) -> Result<Grab> {
        Ok(match self.next_image()? {
            Grab::Frame((_, image)) => Grab::Frame(image),
            Grab::Missed => Grab::Missed,
            Grab::EndOfStream => Grab::EndOfStream,
        })
    }
}

impl StereoSource for ReplayCamera {
    fn acquire_stereo(&mut self) -> Result<Grab<StereoFrame>> {
        Ok(match self.next_image()? {
            Grab::Frame((path, image)) => {
                let depth_path = path.with_extension("depth");
                let depth = if depth_path.is_file() {
                    match DepthMap::load(&depth_path) {
                        Ok(depth) => depth,
                        Err(e) => {
                            eprintln!("⚠️ unreadable depth sidecar, using NaN map: {}", e);
                            DepthMap::filled_nan(image.width(), image.height())
                        }
                    }
                } else {
                    DepthMap::filled_nan(image.width(), image.height())
                };
                Grab::Frame(StereoFrame { image, depth })
            }
            Grab::Missed => Grab::Missed,
            Grab::EndOfStream => Grab::EndOfStream,
        })
    }
}

impl Drop for ReplayCamera {
    fn drop(&mut self) {
        println!(
            "📷 Frame source released ({} of {} frames delivered)",
            self.delivered,
            self.frames.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frame(dir: &Path, name: &str) {
        RgbImage::new(4, 4).save(dir.join(name)).unwrap();
    }

    fn fast_settings() -> CameraSettings {
        CameraSettings {
            fps: 1000,
            ..CameraSettings::default()
        }
    }

    #[test]
    fn test_open_fails_on_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ReplayCamera::open(dir.path(), fast_settings()).is_err());
    }

    #[test]
    fn test_open_fails_on_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(ReplayCamera::open(&missing, fast_settings()).is_err());
    }

    #[test]
    fn test_replays_in_name_order_then_ends() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "b.png");
        write_frame(dir.path(), "a.png");

        let mut camera = ReplayCamera::open(dir.path(), fast_settings()).unwrap();
        assert_eq!(camera.len(), 2);
        assert!(matches!(camera.acquire_frame().unwrap(), Grab::Frame(_)));
        assert!(matches!(camera.acquire_frame().unwrap(), Grab::Frame(_)));
        assert!(matches!(
            camera.acquire_frame().unwrap(),
            Grab::EndOfStream
        ));
        assert!(matches!(
            camera.acquire_frame().unwrap(),
            Grab::EndOfStream
        ));
    }

    #[test]
    fn test_corrupt_frame_is_a_missed_cycle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"not a png").unwrap();
        write_frame(dir.path(), "b.png");

        let mut camera = ReplayCamera::open(dir.path(), fast_settings()).unwrap();
        assert!(matches!(camera.acquire_frame().unwrap(), Grab::Missed));
        assert!(matches!(camera.acquire_frame().unwrap(), Grab::Frame(_)));
        assert!(matches!(
            camera.acquire_frame().unwrap(),
            Grab::EndOfStream
        ));
    }

    #[test]
    fn test_stereo_without_depth_sidecar_is_nan() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "frame_000000.png");

        let mut camera = ReplayCamera::open(dir.path(), fast_settings()).unwrap();
        match camera.acquire_stereo().unwrap() {
            Grab::Frame(stereo) => {
                assert_eq!(stereo.depth.width(), 4);
                assert!(stereo.depth.depth_at(0, 0).is_nan());
            }
            other => panic!("expected frame, got {:?}", std::mem::discriminant(&other)),
        }
    }

    #[test]
    fn test_stereo_reads_depth_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "frame_000000.png");
        DepthMap::from_raw(4, 4, vec![2.5; 16])
            .unwrap()
            .save(&dir.path().join("frame_000000.depth"))
            .unwrap();

        let mut camera = ReplayCamera::open(dir.path(), fast_settings()).unwrap();
        match camera.acquire_stereo().unwrap() {
            Grab::Frame(stereo) => assert_eq!(stereo.depth.measure_at(1, 1), Some(2.5)),
            _ => panic!("expected frame"),
        }
    }
}
