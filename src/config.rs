//! 采集配置 - 通过JSON文件调整参数

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::camera::Resolution;
use crate::dataset::SplitRatio;

/// Collector parameters, persisted next to the binary as pretty JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectorConfig {
    // === 相机参数 ===
    pub resolution: Resolution, // requested sensor mode
    pub fps: u32,               // requested frame rate

    // === 数据集参数 ===
    pub dataset_root: PathBuf, // sessions land under <root>/raw/
    pub split: SplitRatio,     // train/val/test allocation

    // === 显示参数 ===
    pub preview: Option<PathBuf>, // live preview PNG, None = headless
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Hd720,
            fps: 30,
            dataset_root: PathBuf::from("dataset"),
            split: SplitRatio::default(),
            preview: None,
        }
    }
}

impl CollectorConfig {
    /// 从JSON文件加载配置
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    println!("✅ 配置已从 {} 加载", path);
                    config
                }
                Err(e) => {
                    eprintln!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                println!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                config.save(path);
                config
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &str) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    eprintln!("❌ 保存配置失败: {}", e);
                } else {
                    println!("💾 配置已保存到 {}", path);
                }
            }
            Err(e) => eprintln!("❌ 序列化配置失败: {}", e),
        }
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        let (w, h) = self.resolution.dimensions();
        println!("\n🎛️  当前采集配置:");
        println!("  分辨率: {}x{} @ {}fps", w, h, self.fps);
        println!("  数据集目录: {}", self.dataset_root.display());
        println!(
            "  划分比例: train {:.2} / val {:.2} / test {:.2}",
            self.split.train(),
            self.split.val(),
            self.split.test()
        );
        match &self.preview {
            Some(path) => println!("  实时预览: {}\n", path.display()),
            None => println!("  实时预览: 关闭\n"),
        }
    }
}
