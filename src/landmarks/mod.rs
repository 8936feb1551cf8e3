// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 关键点特征 (Landmark Features)
///
/// - Extractor:  单帧 → 检测器 → 201维特征向量 (未检测部位补零)
/// - Normalizer: 以双肩中点为原点平移姿态坐标
pub mod extractor;
pub mod normalize;

pub use extractor::{assemble, LandmarkExtractor};
pub use normalize::{normalize, normalized, NormalizeOutcome};
