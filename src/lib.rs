// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod config; // 流水线配置参数
pub mod error; // 错误类型
pub mod input; // 视频/帧输入
pub mod labels; // 标签编码与本地化
pub mod landmarks; // 关键点提取与归一化
pub mod models; // 检测器/分类器接口与 ONNX 实现
pub mod ort_backend;
pub mod pipeline; // 视频 → 特征序列 → 预测
pub mod response; // 输出边界 (JSON)
pub mod types;

pub use crate::config::{Args, PipelineConfig};
pub use crate::error::{PipelineError, Result};
pub use crate::labels::{LabelEncoder, LabelTable, LocalizedLabels};
pub use crate::landmarks::{normalize, LandmarkExtractor, NormalizeOutcome};
pub use crate::models::{HolisticOnnx, LandmarkDetector, OnnxSequenceClassifier, SequenceClassifier};
pub use crate::ort_backend::{OrtBackend, OrtConfig, OrtEP};
pub use crate::pipeline::{resample, InferenceAdapter, ResampleReport, SignPipeline};
pub use crate::response::PredictionResponse;
pub use crate::types::{
    FeatureVector, FixedSequence, Frame, HolisticLandmarks, Landmark, PixelFormat,
    PredictionResult, Sequence,
};

/// 分类器输入的固定时间长度
pub const SEQUENCE_LENGTH: usize = 40;

/// 每个关键点的坐标数 (x, y, z)
pub const COORDS: usize = 3;

/// 上半身姿态关键点数量 (取检测结果前25个)
pub const POSE_LANDMARKS: usize = 25;

/// 单手关键点数量
pub const HAND_LANDMARKS: usize = 21;

pub const POSE_FEATURES: usize = POSE_LANDMARKS * COORDS; // 75
pub const HAND_FEATURES: usize = HAND_LANDMARKS * COORDS; // 63

/// 单帧特征长度: 75 (pose) + 63 (left hand) + 63 (right hand)
pub const FEATURE_LEN: usize = POSE_FEATURES + HAND_FEATURES * 2; // 201

/// 姿态关键点中的左右肩索引
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;

/// 对概率分布做 softmax (用于输出 logits 的模型)
pub fn softmax(xs: &[f32]) -> Vec<f32> {
    let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = xs.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|&x| x / sum).collect()
}

/// 按概率从高到低取前k个 (class_id, prob)
pub fn topk(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut probs = probs
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_nan())
        .map(|(a, b)| (a, *b))
        .collect::<Vec<_>>();
    probs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    probs.truncate(k);
    probs
}
