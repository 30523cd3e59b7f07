//! Capture sessions.
//!
//! One capture run owns one timestamp-named directory under `<root>/raw/`.
//! A new invocation always creates a new session; prior sessions are never
//! reused or appended to.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Session stamp with second resolution, e.g. `20230525_154512`. Collisions
/// at this resolution are accepted as negligible.
pub fn session_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// One capture run's output directory.
pub struct Session {
    dir: PathBuf,
    stamp: String,
}

impl Session {
    /// Create `<root>/raw/<timestamp>/` and return the session owning it.
    pub fn create(dataset_root: &Path) -> Result<Self> {
        Self::create_stamped(dataset_root, session_timestamp())
    }

    fn create_stamped(dataset_root: &Path, stamp: String) -> Result<Self> {
        let dir = dataset_root.join("raw").join(&stamp);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create session directory {}", dir.display()))?;
        Ok(Self { dir, stamp })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Path of frame `index` inside the session, zero-padded to 6 digits.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }
}
