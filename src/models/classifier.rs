// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 序列分类模型 (CNN-BiLSTM 等导出的 ONNX)
// 输入: (1, 40, 201) f32   输出: (1, num_classes) 概率或 logits

use std::path::Path;

use anyhow::Result as AnyResult;
use ndarray::Array3;
use tracing::debug;

use super::SequenceClassifier;
use crate::error::{PipelineError, Result};
use crate::{softmax, OrtBackend, OrtConfig, OrtEP};

pub struct OnnxSequenceClassifier {
    engine: OrtBackend,
    apply_softmax: bool,
    profile: bool,
}

impl OnnxSequenceClassifier {
    pub fn new(path: impl AsRef<Path>, ep: OrtEP, apply_softmax: bool, profile: bool) -> AnyResult<Self> {
        let engine = OrtBackend::build(OrtConfig::new(path.as_ref(), ep))?;
        Ok(Self {
            engine,
            apply_softmax,
            profile,
        })
    }
}

impl SequenceClassifier for OnnxSequenceClassifier {
    fn predict(&self, batch: &Array3<f32>) -> Result<Vec<f32>> {
        let ys = self
            .engine
            .run(batch.clone().into_dyn(), self.profile)
            .map_err(|e| PipelineError::Inference(format!("{:#}", e)))?;

        let output = ys
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Inference("model produced no outputs".into()))?;
        debug!("分类器输出形状: {:?}", output.shape());

        // 只取 batch 中的第一个样本
        let num_classes = output.shape().last().copied().unwrap_or(0);
        let probs: Vec<f32> = output.iter().take(num_classes).copied().collect();

        Ok(if self.apply_softmax {
            softmax(&probs)
        } else {
            probs
        })
    }

    fn summary(&self) {
        self.engine.summary();
    }
}
