// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 帧图片目录 → 帧流
//! 按文件名排序, 无法解码的文件跳过 (记录警告)

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::types::Frame;

pub struct ImageSequenceSource {
    paths: std::vec::IntoIter<PathBuf>,
    index: u64,
    dropped: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PipelineError::NoInput);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && ImageFormat::from_path(p).is_ok())
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(PipelineError::NoInput);
        }
        info!("🎞️ 帧目录 {}: {}帧", dir.display(), paths.len());

        Ok(Self {
            paths: paths.into_iter(),
            index: 0,
            dropped: 0,
        })
    }

    /// 解码失败被跳过的文件数
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Iterator for ImageSequenceSource {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        for path in self.paths.by_ref() {
            match image::open(&path) {
                Ok(img) => {
                    let frame = Frame::from_image(&img, self.index);
                    self.index += 1;
                    return Some(frame);
                }
                Err(e) => {
                    self.dropped += 1;
                    warn!("⚠️ 丢弃帧 {}: {}", path.display(), e);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_frames_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, value) in [("002.png", 20u8), ("001.png", 10), ("010.png", 30)] {
            RgbImage::from_pixel(2, 2, Rgb([value, 0, 0]))
                .save(dir.path().join(name))
                .unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let firsts: Vec<u8> = ImageSequenceSource::open(dir.path())
            .unwrap()
            .map(|f| f.data[0])
            .collect();
        assert_eq!(firsts, vec![10, 20, 30]);
    }

    #[test]
    fn test_corrupt_image_skipped() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(2, 2).save(dir.path().join("a.png")).unwrap();
        fs::write(dir.path().join("b.png"), b"garbage").unwrap();

        let mut source = ImageSequenceSource::open(dir.path()).unwrap();
        assert_eq!(source.by_ref().count(), 1);
        assert_eq!(source.dropped(), 1);
    }

    #[test]
    fn test_empty_dir_is_no_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageSequenceSource::open(dir.path()),
            Err(PipelineError::NoInput)
        ));
    }
}
