// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 模型统一接口与实现
///
/// # 架构说明
///
/// 流水线只依赖两个 trait, 具体模型格式对核心逻辑不可见:
/// - **LandmarkDetector**: RGB图片 → 姿态/双手关键点 (`holistic.rs`, ONNX实现)
/// - **SequenceClassifier**: (1, T, 201) 张量 → 类别概率 (`classifier.rs`, ONNX实现)
///
/// 两者均在进程启动时构造一次, 通过 `Arc` 只读共享给所有请求。
/// 测试中可以用任意桩实现替换。
///
/// ## 核心流程
/// ```text
/// Frame → to_rgb → LandmarkDetector::detect → HolisticLandmarks
///                                 ↓
///                    assemble + normalize (逐帧)
///                                 ↓
///                     resample → (40, 201)
///                                 ↓
///              SequenceClassifier::predict → 概率分布
/// ```
use image::RgbImage;
use ndarray::Array3;

use crate::error::Result;
use crate::types::HolisticLandmarks;

/// 姿态 + 双手关键点检测器
///
/// 实现必须对每次调用无状态: 同一张图片的结果不依赖调用顺序
pub trait LandmarkDetector: Send + Sync {
    /// 检测单张 RGB 图片, 未检测到的部位返回 None
    fn detect(&self, image: &RgbImage) -> Result<HolisticLandmarks>;

    /// 打印模型信息
    fn summary(&self) {}
}

/// 序列分类器 (不透明函数: 固定形状张量 → 概率分布)
pub trait SequenceClassifier: Send + Sync {
    /// # Arguments
    /// * `batch` - 形状 (1, T, 201)
    ///
    /// # Returns
    /// * `Vec<f32>` - batch 中第一个样本的类别概率
    fn predict(&self, batch: &Array3<f32>) -> Result<Vec<f32>>;

    /// 打印模型信息
    fn summary(&self) {}
}

pub mod classifier;
pub mod holistic;

// Re-exports
pub use classifier::OnnxSequenceClassifier;
pub use holistic::{HolisticConfig, HolisticOnnx};
