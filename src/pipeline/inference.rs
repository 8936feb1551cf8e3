// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 推理适配 (Inference Adapter)
//! 职责: FixedSequence → (1, T, 201) → 分类器 → argmax → 标签查表

use std::sync::Arc;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::labels::LabelTable;
use crate::models::SequenceClassifier;
use crate::topk;
use crate::types::{FixedSequence, PredictionResult};

/// argmax, 并列时取最小下标; NaN 不参与比较
pub fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probs.iter().enumerate() {
        if p.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| p > b) {
            best = Some((i, p));
        }
    }
    best
}

pub struct InferenceAdapter {
    classifier: Arc<dyn SequenceClassifier>,
    labels: Arc<LabelTable>,
}

impl InferenceAdapter {
    pub fn new(classifier: Arc<dyn SequenceClassifier>, labels: Arc<LabelTable>) -> Self {
        Self { classifier, labels }
    }

    /// 执行一次推理并解码, 失败不重试
    pub fn infer(&self, sequence: &FixedSequence) -> Result<PredictionResult> {
        let batch = sequence.to_batch();
        let probs = self.classifier.predict(&batch)?;
        debug!("top3: {:?}", topk(&probs, 3));

        let (class_id, confidence) = argmax(&probs).ok_or_else(|| {
            PipelineError::Inference(format!(
                "classifier returned no usable probabilities ({} values)",
                probs.len()
            ))
        })?;

        let (label, localized_label) = self.labels.resolve(class_id)?;
        Ok(PredictionResult {
            class_id,
            confidence,
            label,
            localized_label,
        })
    }
}
