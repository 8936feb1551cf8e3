// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 数据结构定义: 帧、关键点、特征向量、序列、预测结果

use image::{DynamicImage, RgbImage};
use ndarray::{s, Array2, Array3, ArrayView1, Axis};
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::{FEATURE_LEN, HAND_FEATURES, POSE_FEATURES};

// ========== 帧 ==========

/// 像素排列格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    /// OpenCV 风格的 BGR
    Bgr24,
    Rgba32,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Rgba32 => 4,
        }
    }
}

/// 已解码帧 (仅在帧循环内存活)
#[derive(Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub index: u64, // 帧序号
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("index", &self.index)
            .field("size", &format_args!("{}x{}", self.width, self.height))
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat, index: u64) -> Self {
        Self {
            data,
            width,
            height,
            format,
            index,
        }
    }

    pub fn from_image(image: &DynamicImage, index: u64) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::new(rgb.into_raw(), width, height, PixelFormat::Rgb24, index)
    }

    /// 颜色空间转换: 任意格式 → RGB (检测模型的输入格式)
    pub fn to_rgb(&self) -> Result<RgbImage> {
        let channels = self.format.channels();
        let expected = self.width as usize * self.height as usize * channels;
        if self.data.len() != expected || expected == 0 {
            return Err(PipelineError::Decode(format!(
                "frame #{}: {} bytes for {}x{} {:?}",
                self.index,
                self.data.len(),
                self.width,
                self.height,
                self.format
            )));
        }

        let rgb_data = match self.format {
            PixelFormat::Rgb24 => self.data.clone(),
            PixelFormat::Bgr24 => {
                let mut rgb = Vec::with_capacity(expected);
                for chunk in self.data.chunks_exact(3) {
                    rgb.push(chunk[2]); // R
                    rgb.push(chunk[1]); // G
                    rgb.push(chunk[0]); // B
                }
                rgb
            }
            PixelFormat::Rgba32 => {
                let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
                for chunk in self.data.chunks_exact(4) {
                    rgb.push(chunk[0]);
                    rgb.push(chunk[1]);
                    rgb.push(chunk[2]);
                    // 跳过 Alpha 通道
                }
                rgb
            }
        };

        RgbImage::from_raw(self.width, self.height, rgb_data)
            .ok_or_else(|| PipelineError::Decode(format!("frame #{}: RGB缓冲区无效", self.index)))
    }
}

// ========== 关键点 ==========

/// 归一化图像坐标系下的3D关键点
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// 单帧的检测结果, 未检测到的部位为 None
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HolisticLandmarks {
    pub pose: Option<Vec<Landmark>>,
    pub left_hand: Option<Vec<Landmark>>,
    pub right_hand: Option<Vec<Landmark>>,
}

impl HolisticLandmarks {
    pub fn empty() -> Self {
        Self::default()
    }
}

// ========== 特征 ==========

/// 单帧特征向量: 长度恒为201, 依次为 pose / left_hand / right_hand
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    pub fn zeros() -> Self {
        Self {
            data: vec![0.0; FEATURE_LEN],
        }
    }

    /// 长度不是201时返回 None
    pub fn from_vec(data: Vec<f32>) -> Option<Self> {
        (data.len() == FEATURE_LEN).then_some(Self { data })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    pub fn pose(&self) -> &[f32] {
        &self.data[..POSE_FEATURES]
    }

    pub fn left_hand(&self) -> &[f32] {
        &self.data[POSE_FEATURES..POSE_FEATURES + HAND_FEATURES]
    }

    pub fn right_hand(&self) -> &[f32] {
        &self.data[POSE_FEATURES + HAND_FEATURES..]
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

/// 可变长度的逐帧特征序列
///
/// 行使用普通 `Vec<f32>`, 允许上游出现长度异常的行, 由重采样阶段修复
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    rows: Vec<Vec<f32>>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, features: FeatureVector) {
        self.rows.push(features.into_inner());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }
}

impl From<Vec<Vec<f32>>> for Sequence {
    fn from(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }
}

impl FromIterator<FeatureVector> for Sequence {
    fn from_iter<I: IntoIterator<Item = FeatureVector>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(FeatureVector::into_inner).collect(),
        }
    }
}

/// 固定形状 (T, 201) 的序列, 分类器的唯一输入
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSequence {
    data: Array2<f32>,
}

impl FixedSequence {
    pub fn zeros(len: usize) -> Self {
        Self {
            data: Array2::zeros((len, FEATURE_LEN)),
        }
    }

    pub(crate) fn from_array(data: Array2<f32>) -> Self {
        debug_assert_eq!(data.ncols(), FEATURE_LEN);
        Self { data }
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.data.slice(s![index, ..])
    }

    /// 增加 batch 维度: (T, 201) → (1, T, 201)
    pub fn to_batch(&self) -> Array3<f32> {
        self.data.clone().insert_axis(Axis(0))
    }
}

// ========== 预测结果 ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub class_id: usize,
    pub confidence: f32,
    pub label: String,
    pub localized_label: String,
}

impl PredictionResult {
    /// 百分比置信度, 保留两位小数
    pub fn confidence_percent(&self) -> f64 {
        (f64::from(self.confidence) * 100.0 * 100.0).round() / 100.0
    }
}
