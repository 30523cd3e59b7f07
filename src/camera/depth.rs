//! 深度图 (Depth map)
//!
//! Per-pixel metric depth as produced by the stereo rig. `NaN` marks pixels
//! the sensor could not measure.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::Array2;

/// Metric depth map, one `f32` (metres) per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    data: Array2<f32>,
}

impl DepthMap {
    /// Build from raw row-major samples. Length must be `width * height`.
    pub fn from_raw(width: u32, height: u32, samples: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            bail!(
                "depth buffer has {} samples, expected {}x{}={}",
                samples.len(),
                width,
                height,
                expected
            );
        }
        let data = Array2::from_shape_vec((height as usize, width as usize), samples)?;
        Ok(Self { data })
    }

    /// All-NaN map, for sources without a depth channel.
    pub fn filled_nan(width: u32, height: u32) -> Self {
        Self {
            data: Array2::from_elem((height as usize, width as usize), f32::NAN),
        }
    }

    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    /// Depth at a pixel: a distance in metres, or NaN when the sensor has no
    /// measurement there. Out-of-range lookups also read as NaN.
    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.data
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(f32::NAN)
    }

    /// Checked lookup: `None` for NaN and out-of-range pixels.
    pub fn measure_at(&self, x: u32, y: u32) -> Option<f32> {
        let d = self.depth_at(x, y);
        if d.is_nan() {
            None
        } else {
            Some(d)
        }
    }

    /// Read a `.depth` file: `u32` width, `u32` height, then
    /// `width * height` `f32` samples, all little-endian.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open depth file {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let mut header = [0u8; 8];
        reader
            .read_exact(&mut header)
            .with_context(|| format!("failed to read depth header from {}", path.display()))?;
        let width = u32::from_le_bytes(header[0..4].try_into()?);
        let height = u32::from_le_bytes(header[4..8].try_into()?);

        let count = width as usize * height as usize;
        let mut raw = vec![0u8; count * 4];
        reader
            .read_exact(&mut raw)
            .with_context(|| format!("truncated depth data in {}", path.display()))?;

        let samples = raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Self::from_raw(width, height, samples)
    }

    /// Write the `.depth` format read by [`DepthMap::load`].
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create depth file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&self.width().to_le_bytes())?;
        writer.write_all(&self.height().to_le_bytes())?;
        for sample in self.data.iter() {
            writer.write_all(&sample.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_nan() {
        let map = DepthMap::from_raw(2, 2, vec![1.5, f32::NAN, 3.0, 4.25]).unwrap();
        assert_eq!(map.depth_at(0, 0), 1.5);
        assert!(map.depth_at(1, 0).is_nan());
        assert_eq!(map.measure_at(1, 1), Some(4.25));
        assert_eq!(map.measure_at(1, 0), None);
        // out of range reads as no measurement
        assert!(map.depth_at(5, 5).is_nan());
        assert_eq!(map.measure_at(0, 9), None);
    }

    #[test]
    fn test_raw_size_mismatch() {
        assert!(DepthMap::from_raw(3, 2, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_000000.depth");

        let map = DepthMap::from_raw(3, 2, vec![0.5, 1.0, f32::NAN, 2.0, 2.5, 3.0]).unwrap();
        map.save(&path).unwrap();

        let loaded = DepthMap::load(&path).unwrap();
        assert_eq!(loaded.width(), 3);
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.depth_at(0, 0), 0.5);
        assert!(loaded.depth_at(2, 0).is_nan());
        assert_eq!(loaded.depth_at(2, 1), 3.0);
    }
}
