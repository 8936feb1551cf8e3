// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 流水线错误类型

/// 预测请求可能出现的错误
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 未提供视频或视频为空, 流水线不会被调用
    #[error("No video uploaded")]
    NoInput,

    /// 没有任何可用帧 (全部解码失败或视频没有帧)
    #[error("No landmarks detected")]
    NoLandmarks,

    #[error("video decode failed: {0}")]
    Decode(String),

    #[error("landmark detector failed: {0}")]
    Detector(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("class id {class_id} out of range ({num_classes} labels)")]
    UnknownClass { class_id: usize, num_classes: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
