// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 端到端: 桩检测器 + 桩分类器, 覆盖检测丢失、补零、解码与输出格式

use std::sync::{Arc, Mutex};

use image::RgbImage;
use ndarray::Array3;
use signlens_rs::pipeline::resample_with_report;
use signlens_rs::{
    LabelEncoder, LabelTable, Landmark, LandmarkDetector, LocalizedLabels, PipelineConfig,
    PipelineError, PredictionResponse, SequenceClassifier, SignPipeline, FEATURE_LEN,
    HAND_LANDMARKS, SEQUENCE_LENGTH,
};
use signlens_rs::{Frame, HolisticLandmarks, PixelFormat};

/// 红色通道 < 128 的帧视为"有人", 否则什么都检测不到
struct ThresholdDetector;

impl LandmarkDetector for ThresholdDetector {
    fn detect(&self, image: &RgbImage) -> signlens_rs::Result<HolisticLandmarks> {
        let r = image.get_pixel(0, 0).0[0];
        if r >= 128 {
            return Ok(HolisticLandmarks::empty());
        }
        let t = r as f32 / 255.0;
        let pose = (0..33)
            .map(|i| Landmark::new(0.3 + i as f32 * 0.01, 0.4 + t, -0.2))
            .collect();
        let hand = |x: f32| {
            (0..HAND_LANDMARKS)
                .map(|i| Landmark::new(x + i as f32 * 0.005, 0.6, t))
                .collect()
        };
        Ok(HolisticLandmarks {
            pose: Some(pose),
            left_hand: Some(hand(0.2)),
            right_hand: Some(hand(0.7)),
        })
    }
}

struct FixedClassifier {
    probs: Vec<f32>,
    seen: Mutex<Option<Array3<f32>>>,
}

impl SequenceClassifier for FixedClassifier {
    fn predict(&self, batch: &Array3<f32>) -> signlens_rs::Result<Vec<f32>> {
        *self.seen.lock().unwrap() = Some(batch.clone());
        Ok(self.probs.clone())
    }
}

fn frame(index: u64, red: u8) -> Frame {
    // BGR, 和 OpenCV 解码结果一致
    let data = [0u8, 0, red].repeat(4 * 4);
    Frame::new(data, 4, 4, PixelFormat::Bgr24, index)
}

fn labels() -> Arc<LabelTable> {
    Arc::new(LabelTable::new(
        LabelEncoder::from_classes(["hello", "thank_you", "yes", "no"]),
        LocalizedLabels::from_pairs([("thank_you", "धन्यवाद"), ("hello", "नमस्ते")]),
    ))
}

#[test]
fn detection_loss_then_padding() {
    let classifier = Arc::new(FixedClassifier {
        probs: vec![0.05, 0.8765, 0.05, 0.0235],
        seen: Mutex::new(None),
    });
    let pipeline = SignPipeline::new(
        Arc::new(ThresholdDetector),
        classifier.clone(),
        labels(),
        &PipelineConfig::default(),
    );

    // 0-4 有检测, 5-9 检测丢失
    let frames: Vec<Frame> = (0..10)
        .map(|i| frame(i, if i < 5 { 10 * i as u8 } else { 200 }))
        .collect();

    let sequence = pipeline.collect(frames);
    assert_eq!(sequence.len(), 10);
    assert!(sequence.rows().iter().all(|r| r.len() == FEATURE_LEN));
    assert!(sequence.rows()[..5].iter().all(|r| r.iter().any(|&v| v != 0.0)));
    assert!(sequence.rows()[5..].iter().all(|r| r.iter().all(|&v| v == 0.0)));

    let (fixed, report) = resample_with_report(&sequence, SEQUENCE_LENGTH);
    assert_eq!(fixed.shape(), (40, 201));
    assert_eq!(report.padding_frames, 30);
    for (i, row) in sequence.rows().iter().enumerate() {
        assert_eq!(fixed.row(i).to_vec(), *row);
    }
    for i in 10..40 {
        assert!(fixed.row(i).iter().all(|&v| v == 0.0));
    }

    let result = pipeline.predict_sequence(&sequence).unwrap();
    assert_eq!(result.class_id, 1);
    assert_eq!(result.label, "thank_you");
    assert_eq!(result.localized_label, "धन्यवाद");
    assert_eq!(result.confidence_percent(), 87.65);

    let batch = classifier.seen.lock().unwrap().clone().unwrap();
    assert_eq!(batch.dim(), (1, 40, 201));
    assert_eq!(batch.index_axis(ndarray::Axis(0), 0), fixed.data().view());

    let response = PredictionResponse::from_outcome(Ok(result));
    assert_eq!(
        response.to_json(),
        r#"{"prediction":"धन्यवाद","label":"thank_you","confidence":87.65}"#
    );
}

#[test]
fn pose_is_centred_on_shoulders() {
    let pipeline = SignPipeline::new(
        Arc::new(ThresholdDetector),
        Arc::new(FixedClassifier {
            probs: vec![1.0],
            seen: Mutex::new(None),
        }),
        labels(),
        &PipelineConfig::default(),
    );
    let sequence = pipeline.collect([frame(0, 40)]);
    let row = &sequence.rows()[0];
    for c in 0..3 {
        let mid = (row[11 * 3 + c] + row[12 * 3 + c]) / 2.0;
        assert!(mid.abs() < 1e-6);
    }
    // 手部不受归一化影响
    assert!((row[75] - 0.2).abs() < 1e-6);
    assert!((row[138] - 0.7).abs() < 1e-6);
}

#[test]
fn long_video_is_subsampled_across_whole_range() {
    let classifier = Arc::new(FixedClassifier {
        probs: vec![0.1, 0.1, 0.7, 0.1],
        seen: Mutex::new(None),
    });
    let config = PipelineConfig {
        frame_stride: 2,
        ..Default::default()
    };
    let pipeline = SignPipeline::new(Arc::new(ThresholdDetector), classifier.clone(), labels(), &config);

    // 200 帧, 步长2 → 100 行, 再均匀取40行
    let frames: Vec<Frame> = (0..200).map(|i| frame(i, (i % 100) as u8)).collect();
    let result = pipeline.predict(frames).unwrap();
    assert_eq!(result.label, "yes");
    assert_eq!(result.localized_label, "yes");

    let batch = classifier.seen.lock().unwrap().clone().unwrap();
    // 最后一行来自第 198 帧 (red = 98), 左手 z = t
    let expected_t = 98.0 / 255.0;
    assert!((batch[[0, 39, 75 + 2]] - expected_t).abs() < 1e-6);
    // 第一行来自第 0 帧
    assert!(batch[[0, 0, 75 + 2]].abs() < 1e-6);
}

#[test]
fn empty_stream_reports_no_landmarks() {
    let classifier = Arc::new(FixedClassifier {
        probs: vec![1.0],
        seen: Mutex::new(None),
    });
    let pipeline = SignPipeline::new(
        Arc::new(ThresholdDetector),
        classifier.clone(),
        labels(),
        &PipelineConfig::default(),
    );
    let outcome = pipeline.predict(Vec::<Frame>::new());
    assert!(matches!(outcome, Err(PipelineError::NoLandmarks)));
    assert!(classifier.seen.lock().unwrap().is_none());
    assert_eq!(
        PredictionResponse::from_outcome(outcome).to_json(),
        r#"{"error":"No landmarks detected"}"#
    );
}
