// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 关键点提取器 (Landmark Extractor)
//! 职责: Frame → RGB → 检测器 → 201维特征向量 → 姿态归一化

use std::sync::Arc;

use tracing::{debug, warn};

use super::normalize::normalize;
use crate::models::LandmarkDetector;
use crate::types::{FeatureVector, Frame, HolisticLandmarks, Landmark};
use crate::{FEATURE_LEN, HAND_FEATURES, POSE_FEATURES, POSE_LANDMARKS};

pub struct LandmarkExtractor {
    detector: Arc<dyn LandmarkDetector>,
}

impl LandmarkExtractor {
    pub fn new(detector: Arc<dyn LandmarkDetector>) -> Self {
        Self { detector }
    }

    /// 提取单帧特征并归一化
    pub fn extract(&self, frame: &Frame) -> FeatureVector {
        let mut features = self.extract_raw(frame);
        normalize(features.as_mut_slice());
        features
    }

    /// 提取单帧特征 (未归一化)
    ///
    /// 颜色转换或检测失败时退化为全零向量, 不会中断整个请求
    pub fn extract_raw(&self, frame: &Frame) -> FeatureVector {
        let rgb = match frame.to_rgb() {
            Ok(img) => img,
            Err(e) => {
                warn!("❌ 帧 #{} 颜色转换失败: {}, 使用零向量", frame.index, e);
                return FeatureVector::zeros();
            }
        };

        match self.detector.detect(&rgb) {
            Ok(landmarks) => assemble(&landmarks),
            Err(e) => {
                warn!("❌ 帧 #{} 关键点检测失败: {}, 使用零向量", frame.index, e);
                FeatureVector::zeros()
            }
        }
    }
}

/// 拼接检测结果: pose(前25点) + left_hand + right_hand
///
/// 未检测到的部位补零; 拼接长度不是201时整帧置零
pub fn assemble(landmarks: &HolisticLandmarks) -> FeatureVector {
    let mut data = Vec::with_capacity(FEATURE_LEN);

    match landmarks.pose.as_deref() {
        Some(pose) if pose.len() >= POSE_LANDMARKS => {
            flatten_into(&mut data, &pose[..POSE_LANDMARKS]);
        }
        Some(pose) => {
            debug!("姿态点不足 ({} < {}), 姿态段补零", pose.len(), POSE_LANDMARKS);
            data.resize(POSE_FEATURES, 0.0);
        }
        None => data.resize(POSE_FEATURES, 0.0),
    }

    for hand in [&landmarks.left_hand, &landmarks.right_hand] {
        match hand {
            Some(points) => flatten_into(&mut data, points),
            None => data.resize(data.len() + HAND_FEATURES, 0.0),
        }
    }

    match FeatureVector::from_vec(data) {
        Some(features) => features,
        None => {
            warn!("⚠️ 特征长度异常 (期望{}), 整帧置零", FEATURE_LEN);
            FeatureVector::zeros()
        }
    }
}

fn flatten_into(data: &mut Vec<f32>, points: &[Landmark]) {
    for p in points {
        data.push(p.x);
        data.push(p.y);
        data.push(p.z);
    }
}
