// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 整体关键点模型 (姿态 + 双手) 的 ONNX 实现
//
// 输入: (1, 3, H, W) RGB, [0, 1]
// 输出 (按顺序):
//   0: pose        (1, P, C≥3)  归一化坐标 x, y, z
//   1: pose_score  (1, 1)
//   2: left_hand   (1, 21, C≥3)
//   3: left_score  (1, 1)
//   4: right_hand  (1, 21, C≥3)
//   5: right_score (1, 1)
// 分数低于 min_detection_confidence 的部位视为未检测到

use std::path::PathBuf;

use anyhow::Result as AnyResult;
use image::{imageops::FilterType, DynamicImage, RgbImage};
use ndarray::{Array, IxDyn};

use super::LandmarkDetector;
use crate::error::{PipelineError, Result};
use crate::types::{HolisticLandmarks, Landmark};
use crate::{OrtBackend, OrtConfig, OrtEP, COORDS};

const NUM_OUTPUTS: usize = 6;

#[derive(Debug, Clone)]
pub struct HolisticConfig {
    pub model: PathBuf,
    pub ep: OrtEP,
    pub input_size: u32,
    pub min_detection_confidence: f32,
    pub profile: bool,
}

impl HolisticConfig {
    pub fn new(model: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            ep: OrtEP::CPU,
            input_size: 256,
            min_detection_confidence: 0.5,
            profile: false,
        }
    }
}

pub struct HolisticOnnx {
    engine: OrtBackend,
    input_size: u32,
    min_detection_confidence: f32,
    profile: bool,
}

impl HolisticOnnx {
    pub fn new(config: HolisticConfig) -> AnyResult<Self> {
        let engine = OrtBackend::build(OrtConfig::new(config.model, config.ep))?;
        if engine.outputs().len() < NUM_OUTPUTS {
            anyhow::bail!(
                "holistic model must expose {} outputs, found {:?}",
                NUM_OUTPUTS,
                engine.outputs()
            );
        }
        Ok(Self {
            engine,
            input_size: config.input_size,
            min_detection_confidence: config.min_detection_confidence,
            profile: config.profile,
        })
    }

    pub fn preprocess(&self, image: &RgbImage) -> Array<f32, IxDyn> {
        preprocess(image, self.input_size)
    }
}

/// 预处理: RGB → resize(size×size) → NCHW [0, 1]
pub fn preprocess(image: &RgbImage, size: u32) -> Array<f32, IxDyn> {
    let img = if image.dimensions() == (size, size) {
        image.clone()
    } else {
        DynamicImage::ImageRgb8(image.clone())
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8()
    };

    let mut ys = Array::zeros((1, 3, size as usize, size as usize)).into_dyn();
    for (x, y, rgb) in img.enumerate_pixels() {
        let x = x as usize;
        let y = y as usize;
        let [r, g, b] = rgb.0;
        ys[[0, 0, y, x]] = (r as f32) / 255.0;
        ys[[0, 1, y, x]] = (g as f32) / 255.0;
        ys[[0, 2, y, x]] = (b as f32) / 255.0;
    }
    ys
}

/// 解析一个部位: 分数不足或张量形状不对时返回 None
pub(crate) fn parse_part(
    points: &Array<f32, IxDyn>,
    score: &Array<f32, IxDyn>,
    min_confidence: f32,
) -> Option<Vec<Landmark>> {
    let score = score.iter().next().copied()?;
    if score.is_nan() || score < min_confidence {
        return None;
    }

    let shape = points.shape();
    let channels = *shape.last()?;
    if channels < COORDS {
        return None;
    }
    let n = if shape.len() >= 2 { shape[shape.len() - 2] } else { 0 };

    let flat: Vec<f32> = points.iter().copied().collect();
    Some(
        flat.chunks_exact(channels)
            .take(n)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect(),
    )
}

impl LandmarkDetector for HolisticOnnx {
    fn detect(&self, image: &RgbImage) -> Result<HolisticLandmarks> {
        let xs = self.preprocess(image);
        let ys = self
            .engine
            .run(xs, self.profile)
            .map_err(|e| PipelineError::Detector(format!("{:#}", e)))?;
        if ys.len() < NUM_OUTPUTS {
            return Err(PipelineError::Detector(format!(
                "expected {} outputs, got {}",
                NUM_OUTPUTS,
                ys.len()
            )));
        }

        let conf = self.min_detection_confidence;
        Ok(HolisticLandmarks {
            pose: parse_part(&ys[0], &ys[1], conf),
            left_hand: parse_part(&ys[2], &ys[3], conf),
            right_hand: parse_part(&ys[4], &ys[5], conf),
        })
    }

    fn summary(&self) {
        self.engine.summary();
    }
}
