// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 视频输入系统 (Video Input System)
///
/// 把请求中的视频转换为有序帧流, 流水线只消费 `Iterator<Item = Frame>`:
/// - ImageSequenceSource: 帧图片目录 (无需解码器)
/// - StagedVideo:         请求字节 → 临时文件 (任何退出路径都会删除)
/// - FfmpegFrameSource:   ez-ffmpeg 解码, rgb24 帧 (需要 `ffmpeg` 特性)
pub mod image_sequence;
pub mod staged;

#[cfg(feature = "ffmpeg")]
pub mod decode_filter;
#[cfg(feature = "ffmpeg")]
pub mod decoder;

pub use image_sequence::ImageSequenceSource;
pub use staged::StagedVideo;

#[cfg(feature = "ffmpeg")]
pub use decoder::FfmpegFrameSource;

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::types::Frame;

/// 有序帧流
pub type FrameStream = Box<dyn Iterator<Item = Frame> + Send>;

/// 视频文件不存在或为空 → NoInput
pub fn check_video(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(PipelineError::NoInput),
    }
}

/// 打开视频文件为帧流
pub fn open_video(path: &Path) -> Result<FrameStream> {
    check_video(path)?;
    decode(path)
}

#[cfg(feature = "ffmpeg")]
fn decode(path: &Path) -> Result<FrameStream> {
    Ok(Box::new(FfmpegFrameSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn decode(path: &Path) -> Result<FrameStream> {
    Err(PipelineError::Decode(format!(
        "{}: built without the `ffmpeg` feature, use --frames-dir",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_empty_video_is_no_input() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.webm");
        fs::write(&empty, b"").unwrap();

        assert!(matches!(check_video(&empty), Err(PipelineError::NoInput)));
        assert!(matches!(
            check_video(&dir.path().join("missing.webm")),
            Err(PipelineError::NoInput)
        ));
        assert!(matches!(open_video(&empty), Err(PipelineError::NoInput)));
    }
}
