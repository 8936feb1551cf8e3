// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 输出边界: 预测结果 / 错误 → JSON

use serde::Serialize;
use tracing::error;

use crate::error::{PipelineError, Result};
use crate::types::PredictionResult;

/// 对外返回的结构
///
/// 成功: `{"prediction": 本地化标签, "label": 标准标签, "confidence": 百分比(2位小数)}`
/// 失败: `{"error": 消息}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success {
        prediction: String,
        label: String,
        confidence: f64,
    },
    Failure {
        error: String,
    },
}

impl PredictionResponse {
    /// 最外层边界: 所有错误都在这里转成消息, 进程不受影响
    pub fn from_outcome(outcome: Result<PredictionResult>) -> Self {
        match outcome {
            Ok(result) => Self::from(result),
            Err(e @ (PipelineError::NoInput | PipelineError::NoLandmarks)) => Self::Failure {
                error: e.to_string(),
            },
            Err(e) => {
                error!("❌ 预测失败: {}", e);
                Self::Failure {
                    error: "Prediction failed".to_string(),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"Prediction failed"}"#.into())
    }
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self::Success {
            confidence: result.confidence_percent(),
            prediction: result.localized_label,
            label: result.label,
        }
    }
}
