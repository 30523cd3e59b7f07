//! 数据集划分 (Dataset split)
//!
//! Partitions a completed session's frames into disjoint train/val/test
//! subsets and relocates the files into a `_split` sibling.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Filename pattern of eligible frames. Anything else in the session
/// directory is left untouched.
const FRAME_PATTERN: &str = r"^frame_\d{6}\.png$";

const SUBSETS: [&str; 3] = ["train", "val", "test"];

/// Three-way fractional allocation. Train and val counts truncate (floor);
/// test absorbs the remainder, so no frame is ever lost to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatio {
    train: f64,
    val: f64,
    test: f64,
}

impl SplitRatio {
    pub fn new(train: f64, val: f64, test: f64) -> Result<Self> {
        let ratio = Self { train, val, test };
        ratio.validate()?;
        Ok(ratio)
    }

    /// Re-checked before any file moves: deserialized configs bypass `new`.
    pub fn validate(&self) -> Result<()> {
        for (name, frac) in [("train", self.train), ("val", self.val), ("test", self.test)] {
            if !(0.0..=1.0).contains(&frac) {
                bail!("{} fraction {} is outside [0, 1]", name, frac);
            }
        }
        if self.train + self.val > 1.0 {
            bail!(
                "train + val fractions sum to {}, leaving no room for test",
                self.train + self.val
            );
        }
        Ok(())
    }

    pub fn train(&self) -> f64 {
        self.train
    }

    pub fn val(&self) -> f64 {
        self.val
    }

    pub fn test(&self) -> f64 {
        self.test
    }

    /// Subset sizes for `total` frames:
    /// `floor(N·train)`, `floor(N·val)`, and whatever remains.
    pub fn counts(&self, total: usize) -> (usize, usize, usize) {
        let n_train = (total as f64 * self.train).floor() as usize;
        let n_val = (total as f64 * self.val).floor() as usize;
        (n_train, n_val, total - n_train - n_val)
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self {
            train: 0.7,
            val: 0.15,
            test: 0.15,
        }
    }
}

/// Outcome of one split run.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    pub train: usize,
    pub val: usize,
    pub test: usize,
    pub split_dir: PathBuf,
}

impl SplitSummary {
    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

/// Split the frames of `session_dir` into `<session_dir>_split/{train,val,test}`.
///
/// Frames are enumerated, sorted by name (enumeration order is
/// filesystem-dependent), shuffled with the caller's entropy source (seed it
/// for a reproducible partition) and relocated as three contiguous slices.
/// An empty session is a valid zero-count outcome; the three subdirectories
/// are still created.
///
/// Not idempotent: a second run on the now-emptied session reports all-zero
/// counts into the same `_split` sibling.
pub fn split_session<R>(session_dir: &Path, ratio: &SplitRatio, rng: &mut R) -> Result<SplitSummary>
where
    R: Rng + ?Sized,
{
    ratio.validate()?;

    let split_dir = split_dir_for(session_dir)?;
    for subset in SUBSETS {
        let dir = split_dir.join(subset);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create split directory {}", dir.display()))?;
    }

    let mut frames = enumerate_frames(session_dir)?;
    frames.sort();
    frames.shuffle(rng);

    let (n_train, n_val, _) = ratio.counts(frames.len());
    let (train_files, rest) = frames.split_at(n_train);
    let (val_files, test_files) = rest.split_at(n_val);

    for (subset, files) in SUBSETS.iter().zip([train_files, val_files, test_files]) {
        for name in files {
            let from = session_dir.join(name);
            let to = split_dir.join(subset).join(name);
            std::fs::rename(&from, &to)
                .with_context(|| format!("failed to move {} into {}", name, subset))?;
        }
    }

    Ok(SplitSummary {
        train: train_files.len(),
        val: val_files.len(),
        test: test_files.len(),
        split_dir,
    })
}

// `<parent>/<name>_split`, sibling of the session directory.
fn split_dir_for(session_dir: &Path) -> Result<PathBuf> {
    let name = session_dir
        .file_name()
        .with_context(|| format!("session path {} has no name", session_dir.display()))?;
    let mut split_name = name.to_owned();
    split_name.push("_split");
    Ok(session_dir.with_file_name(split_name))
}

fn enumerate_frames(session_dir: &Path) -> Result<Vec<String>> {
    let pattern = Regex::new(FRAME_PATTERN).expect("frame pattern is valid");
    let entries = std::fs::read_dir(session_dir)
        .with_context(|| format!("failed to read session directory {}", session_dir.display()))?;

    let frames = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| pattern.is_match(name))
        .collect();
    Ok(frames)
}
