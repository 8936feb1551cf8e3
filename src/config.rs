// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 配置: 命令行参数 (clap) + 流水线参数 (JSON文件)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::SEQUENCE_LENGTH;

/// 手语视频识别参数
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "手语视频识别 - 视频 → 关键点序列 → 分类", long_about = None)]
pub struct Args {
    /// 视频文件路径 (需要 ffmpeg 特性)
    #[arg(long, conflicts_with_all = ["frames_dir", "stdin"])]
    pub video: Option<PathBuf>,

    /// 帧图片目录 (按文件名排序, 每个文件一帧)
    #[arg(long, conflicts_with = "stdin")]
    pub frames_dir: Option<PathBuf>,

    /// 从标准输入读取视频字节 (暂存为临时文件, 结束后删除)
    #[arg(long, default_value_t = false)]
    pub stdin: bool,

    /// 序列分类模型 (ONNX)
    #[arg(long, default_value = "models/sign_classifier.onnx")]
    pub model: PathBuf,

    /// 姿态+双手关键点模型 (ONNX)
    #[arg(long, default_value = "models/holistic.onnx")]
    pub landmark_model: PathBuf,

    /// 标签文件 (JSON: 类别下标顺序)
    #[arg(long, default_value = "models/labels.json")]
    pub labels: PathBuf,

    /// 流水线配置文件
    #[arg(long, default_value = "signlens.json")]
    pub config: PathBuf,

    /// 帧采样步长, 覆盖配置文件 (1=每帧, 2=隔帧)
    #[arg(long)]
    pub stride: Option<usize>,

    /// device id
    #[arg(long, default_value_t = 0)]
    pub device_id: i32,

    /// using TensorRT EP
    #[arg(long)]
    pub trt: bool,

    /// using CUDA EP
    #[arg(long)]
    pub cuda: bool,

    /// profile
    #[arg(long)]
    pub profile: bool,
}

/// 流水线参数配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    // === 序列参数 ===
    pub sequence_length: usize, // 分类器输入帧数
    pub frame_stride: usize,    // 帧采样步长

    // === 关键点模型 ===
    pub landmark_input_size: u32,      // 输入分辨率
    pub min_detection_confidence: f32, // 部位检测阈值

    // === 分类模型 ===
    pub apply_softmax: bool, // 模型输出为 logits 时开启

    /// 标准标签 → 本地化标签
    pub localized_labels: BTreeMap<String, String>,

    #[serde(skip)]
    pub profile: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sequence_length: SEQUENCE_LENGTH,
            frame_stride: 1,
            landmark_input_size: 256,
            min_detection_confidence: 0.5,
            apply_softmax: false,
            localized_labels: BTreeMap::new(),
            profile: false,
        }
    }
}

impl PipelineConfig {
    /// 从JSON文件加载配置
    ///
    /// 文件不存在时写出默认配置; 解析失败时使用默认值
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    info!("✅ 配置已从 {} 加载", path.display());
                    config
                }
                Err(e) => {
                    warn!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    warn!("❌ 保存配置失败: {}", e);
                }
                config
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        fs::write(path.as_ref(), json)?;
        info!("💾 配置已保存到 {}", path.as_ref().display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sequence_length == 0 {
            return Err(PipelineError::Config("sequence_length must be > 0".into()));
        }
        if self.frame_stride == 0 {
            return Err(PipelineError::Config("frame_stride must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(PipelineError::Config(format!(
                "min_detection_confidence {} not in [0, 1]",
                self.min_detection_confidence
            )));
        }
        Ok(())
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        info!("🎛️  当前流水线配置:");
        info!("  序列长度: {}", self.sequence_length);
        info!("  帧步长: {}", self.frame_stride);
        info!("  关键点输入尺寸: {}", self.landmark_input_size);
        info!("  检测阈值: {:.2}", self.min_detection_confidence);
        info!("  本地化标签: {}条", self.localized_labels.len());
    }
}
