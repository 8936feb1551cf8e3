// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 视频处理流水线 (Video Processing Pipeline)
///
/// 单请求、单线程、同步执行:
/// - 帧流 → (步长采样) → 关键点提取 → 归一化 → 缓冲
/// - 帧数为0 → NoLandmarks (不进入推理)
/// - 重采样 → (40, 201) → 推理适配 → PredictionResult
pub mod inference;
pub mod resample;

pub use inference::{argmax, InferenceAdapter};
pub use resample::{linspace_indices, resample, resample_with_report, ResampleReport};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::labels::LabelTable;
use crate::landmarks::LandmarkExtractor;
use crate::models::{LandmarkDetector, SequenceClassifier};
use crate::types::{Frame, PredictionResult, Sequence};

pub struct SignPipeline {
    extractor: LandmarkExtractor,
    adapter: InferenceAdapter,
    sequence_length: usize,
    frame_stride: usize,
    profile: bool,
}

impl SignPipeline {
    pub fn new(
        detector: Arc<dyn LandmarkDetector>,
        classifier: Arc<dyn SequenceClassifier>,
        labels: Arc<LabelTable>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            extractor: LandmarkExtractor::new(detector),
            adapter: InferenceAdapter::new(classifier, labels),
            sequence_length: config.sequence_length,
            frame_stride: config.frame_stride.max(1),
            profile: config.profile,
        }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn frame_stride(&self) -> usize {
        self.frame_stride
    }

    /// 逐帧提取特征 (按步长采样)
    pub fn collect<I>(&self, frames: I) -> Sequence
    where
        I: IntoIterator<Item = Frame>,
    {
        let t = Instant::now();
        let mut sequence = Sequence::new();
        let mut decoded = 0usize;

        for (i, frame) in frames.into_iter().enumerate() {
            decoded += 1;
            if i % self.frame_stride != 0 {
                continue;
            }
            sequence.push(self.extractor.extract(&frame));
        }

        debug!(
            "解码{}帧, 提取{}帧 (步长{})",
            decoded,
            sequence.len(),
            self.frame_stride
        );
        if self.profile {
            info!("[Extract]: {:?} ({}帧)", t.elapsed(), sequence.len());
        }
        sequence
    }

    /// 已收集序列 → 预测结果
    pub fn predict_sequence(&self, sequence: &Sequence) -> Result<PredictionResult> {
        if sequence.is_empty() {
            return Err(PipelineError::NoLandmarks);
        }

        let t = Instant::now();
        let (fixed, report) = resample_with_report(sequence, self.sequence_length);
        debug!("重采样: {:?}", report);
        if self.profile {
            info!("[Resample]: {:?}", t.elapsed());
        }

        let t = Instant::now();
        let result = self.adapter.infer(&fixed)?;
        if self.profile {
            info!("[Inference]: {:?}", t.elapsed());
        }

        info!(
            "✅ 预测: {} ({}) {:.2}%",
            result.localized_label,
            result.label,
            result.confidence_percent()
        );
        Ok(result)
    }

    /// 完整流程: 帧流 → 预测结果
    pub fn predict<I>(&self, frames: I) -> Result<PredictionResult>
    where
        I: IntoIterator<Item = Frame>,
    {
        let sequence = self.collect(frames);
        self.predict_sequence(&sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{LabelEncoder, LocalizedLabels};
    use crate::types::{HolisticLandmarks, Landmark, PixelFormat};
    use image::RgbImage;
    use ndarray::Array3;
    use std::sync::Mutex;

    /// 把帧的第一个像素值写入左手 x 坐标, 便于追踪采样了哪些帧
    struct PixelDetector;

    impl LandmarkDetector for PixelDetector {
        fn detect(&self, image: &RgbImage) -> Result<HolisticLandmarks> {
            let v = image.get_pixel(0, 0).0[0] as f32;
            Ok(HolisticLandmarks {
                left_hand: Some(vec![Landmark::new(v, 0.0, 0.0); 21]),
                ..Default::default()
            })
        }
    }

    struct Recorder(Mutex<Option<Array3<f32>>>);

    impl SequenceClassifier for Recorder {
        fn predict(&self, batch: &Array3<f32>) -> Result<Vec<f32>> {
            *self.0.lock().unwrap() = Some(batch.clone());
            Ok(vec![0.25, 0.75])
        }
    }

    fn frames(n: u8) -> Vec<Frame> {
        (0..n)
            .map(|i| Frame::new(vec![i; 3], 1, 1, PixelFormat::Rgb24, i as u64))
            .collect()
    }

    fn pipeline(stride: usize, recorder: Arc<Recorder>) -> SignPipeline {
        let config = PipelineConfig {
            frame_stride: stride,
            ..Default::default()
        };
        let labels = LabelTable::new(
            LabelEncoder::from_classes(["no", "yes"]),
            LocalizedLabels::default(),
        );
        SignPipeline::new(Arc::new(PixelDetector), recorder, Arc::new(labels), &config)
    }

    #[test]
    fn test_zero_stride_clamped_to_one() {
        let p = pipeline(0, Arc::new(Recorder(Mutex::new(None))));
        assert_eq!(p.frame_stride(), 1);
        assert_eq!(p.sequence_length(), crate::SEQUENCE_LENGTH);
        assert_eq!(p.collect(frames(3)).len(), 3);
    }

    #[test]
    fn test_stride_two_keeps_even_frames() {
        let p = pipeline(2, Arc::new(Recorder(Mutex::new(None))));
        let seq = p.collect(frames(7));
        let picked: Vec<f32> = seq.rows().iter().map(|r| r[75]).collect();
        assert_eq!(picked, vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_no_frames_is_no_landmarks() {
        let recorder = Arc::new(Recorder(Mutex::new(None)));
        let p = pipeline(1, recorder.clone());
        let err = p.predict(Vec::<Frame>::new()).unwrap_err();
        assert!(matches!(err, PipelineError::NoLandmarks));
        assert!(recorder.0.lock().unwrap().is_none());
    }

    #[test]
    fn test_predict_end_to_end() {
        let recorder = Arc::new(Recorder(Mutex::new(None)));
        let p = pipeline(1, recorder.clone());
        let result = p.predict(frames(5)).unwrap();
        assert_eq!(result.label, "yes");
        assert_eq!(result.confidence_percent(), 75.0);

        let batch = recorder.0.lock().unwrap().clone().unwrap();
        assert_eq!(batch.dim(), (1, 40, 201));
        assert_eq!(batch[[0, 4, 75]], 4.0);
        assert_eq!(batch[[0, 5, 75]], 0.0);
    }
}
