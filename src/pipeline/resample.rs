// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 序列重采样 (Sequence Resampler)
//!
//! 任意长度的逐帧特征 → 固定 (T, 201):
//! - 帧数 > T: 在 [0, n-1] 上均匀取 T 个下标 (覆盖整个手势)
//! - 帧数 = T: 原样返回
//! - 帧数 < T: 末尾补零帧
//!
//! 每一行先做宽度修复: 超过201截断, 不足201右侧补零。

use ndarray::{s, Array2};
use tracing::warn;

use crate::types::{FixedSequence, Sequence};
use crate::FEATURE_LEN;

/// 重采样过程中的修复统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResampleReport {
    pub input_frames: usize,
    /// 被截断到201的行数
    pub truncated_rows: usize,
    /// 被补零到201的行数
    pub padded_rows: usize,
    /// 末尾追加的零帧数量
    pub padding_frames: usize,
    /// 帧数超过 T 时选中的下标
    pub selected: Option<Vec<usize>>,
}

impl ResampleReport {
    pub fn repaired_rows(&self) -> usize {
        self.truncated_rows + self.padded_rows
    }
}

/// 在 [0, n-1] 上均匀取 `count` 个整数下标, 与 `linspace(0, n-1, count, dtype=int)` 逐位一致
///
/// 步长先按 f64 计算再乘下标后截断, 所以步长不可精确表示时个别下标会比精确除法小1;
/// 最后一个下标固定为 n-1。第一个下标为 0, 单调不减
pub fn linspace_indices(n: usize, count: usize) -> Vec<usize> {
    if n == 0 || count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![0];
    }
    let last = n - 1;
    let step = last as f64 / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                last
            } else {
                (i as f64 * step) as usize
            }
        })
        .collect()
}

/// 重采样为 (target_len, 201)
pub fn resample(sequence: &Sequence, target_len: usize) -> FixedSequence {
    resample_with_report(sequence, target_len).0
}

/// 重采样并返回修复统计
pub fn resample_with_report(sequence: &Sequence, target_len: usize) -> (FixedSequence, ResampleReport) {
    let n = sequence.len();
    let mut report = ResampleReport {
        input_frames: n,
        ..Default::default()
    };
    let mut out = Array2::<f32>::zeros((target_len, FEATURE_LEN));

    if n == 0 {
        warn!("⚠️ 空序列, 返回全零 ({}, {})", target_len, FEATURE_LEN);
        report.padding_frames = target_len;
        return (FixedSequence::from_array(out), report);
    }

    for row in sequence.rows() {
        if row.len() > FEATURE_LEN {
            report.truncated_rows += 1;
        } else if row.len() < FEATURE_LEN {
            report.padded_rows += 1;
        }
    }
    if report.repaired_rows() > 0 {
        warn!(
            "⚠️ 特征维度异常: 期望{}, 截断{}行, 补零{}行",
            FEATURE_LEN, report.truncated_rows, report.padded_rows
        );
    }

    let indices: Vec<usize> = if n > target_len {
        let idx = linspace_indices(n, target_len);
        report.selected = Some(idx.clone());
        idx
    } else {
        report.padding_frames = target_len - n;
        (0..n).collect()
    };

    for (dst, &src) in indices.iter().enumerate() {
        let row = &sequence.rows()[src];
        let width = row.len().min(FEATURE_LEN);
        out.slice_mut(s![dst, ..width])
            .iter_mut()
            .zip(&row[..width])
            .for_each(|(d, &v)| *d = v);
    }

    (FixedSequence::from_array(out), report)
}
