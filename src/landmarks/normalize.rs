// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 姿态归一化: 以左右肩中点为原点, 平移全部姿态关键点
//! 手部坐标保持不变

use tracing::debug;

use crate::types::FeatureVector;
use crate::{COORDS, LEFT_SHOULDER, POSE_FEATURES, RIGHT_SHOULDER};

/// 归一化结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeOutcome {
    /// 已平移, center 为减去的肩部中点
    Centered { center: [f32; COORDS] },
    /// 姿态段无法重排为 25×3, 原样返回
    Skipped { len: usize },
}

impl NormalizeOutcome {
    pub fn is_centered(&self) -> bool {
        matches!(self, NormalizeOutcome::Centered { .. })
    }
}

/// 原地归一化前75个值 (25个姿态点)
///
/// 输入不足75个值时不做任何修改, 也不会返回错误
pub fn normalize(features: &mut [f32]) -> NormalizeOutcome {
    if features.len() < POSE_FEATURES {
        debug!(
            "⚠️ 姿态段长度不足 ({} < {}), 跳过归一化",
            features.len(),
            POSE_FEATURES
        );
        return NormalizeOutcome::Skipped {
            len: features.len(),
        };
    }

    let pose = &mut features[..POSE_FEATURES];
    let l = LEFT_SHOULDER * COORDS;
    let r = RIGHT_SHOULDER * COORDS;
    let center = [
        (pose[l] + pose[r]) / 2.0,
        (pose[l + 1] + pose[r + 1]) / 2.0,
        (pose[l + 2] + pose[r + 2]) / 2.0,
    ];

    for point in pose.chunks_exact_mut(COORDS) {
        for (v, c) in point.iter_mut().zip(center) {
            *v -= c;
        }
    }

    NormalizeOutcome::Centered { center }
}

/// 函数式版本
pub fn normalized(mut features: FeatureVector) -> FeatureVector {
    normalize(features.as_mut_slice());
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEATURE_LEN, POSE_LANDMARKS};

    fn sample() -> Vec<f32> {
        (0..FEATURE_LEN).map(|i| (i as f32) * 0.01 + 0.5).collect()
    }

    #[test]
    fn test_shoulder_midpoint_becomes_origin() {
        let mut v = sample();
        let outcome = normalize(&mut v);
        assert!(outcome.is_centered());

        for c in 0..COORDS {
            let mid = (v[LEFT_SHOULDER * COORDS + c] + v[RIGHT_SHOULDER * COORDS + c]) / 2.0;
            assert!(mid.abs() < 1e-5);
        }
    }

    #[test]
    fn test_all_pose_points_share_one_shift() {
        let original = sample();
        let mut v = original.clone();
        let NormalizeOutcome::Centered { center } = normalize(&mut v) else {
            panic!("expected centered");
        };

        for p in 0..POSE_LANDMARKS {
            for c in 0..COORDS {
                let i = p * COORDS + c;
                assert!((original[i] - v[i] - center[c]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_hands_untouched() {
        let original = sample();
        let mut v = original.clone();
        normalize(&mut v);
        assert_eq!(&v[POSE_FEATURES..], &original[POSE_FEATURES..]);
    }

    #[test]
    fn test_zero_pose_unchanged() {
        let mut v = FeatureVector::zeros();
        let outcome = normalize(v.as_mut_slice());
        assert_eq!(outcome, NormalizeOutcome::Centered { center: [0.0; 3] });
        assert!(v.is_zero());
    }

    #[test]
    fn test_short_input_passes_through() {
        let mut v = vec![1.0; 40];
        assert_eq!(normalize(&mut v), NormalizeOutcome::Skipped { len: 40 });
        assert!(v.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_normalized_matches_in_place() {
        let raw = FeatureVector::from_vec(sample()).unwrap();
        let mut expected = sample();
        normalize(&mut expected);

        let out = normalized(raw);
        assert_eq!(out.as_slice(), expected.as_slice());
        assert_eq!(out.right_hand(), &expected[FEATURE_LEN - 63..]);
    }

    #[test]
    fn test_idempotent_once_centered() {
        let mut v = sample();
        normalize(&mut v);
        let once = v.clone();
        normalize(&mut v);
        for (a, b) in once.iter().zip(&v) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
