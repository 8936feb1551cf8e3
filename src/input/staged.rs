// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 上传暂存: 请求中的视频字节写入临时文件
//! 临时文件随 StagedVideo 一起释放, 成功、失败、panic 路径都会删除

use std::io::{Read, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::{PipelineError, Result};

pub struct StagedVideo {
    file: NamedTempFile,
}

impl StagedVideo {
    /// 空内容 → NoInput, 不会创建文件
    pub fn from_bytes(bytes: &[u8], suffix: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PipelineError::NoInput);
        }
        let mut file = Builder::new()
            .prefix("signlens-upload-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!("📥 上传已暂存: {} ({} bytes)", file.path().display(), bytes.len());
        Ok(Self { file })
    }

    pub fn from_reader<R: Read>(mut reader: R, suffix: &str) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, suffix)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// 显式删除, 返回删除错误
    pub fn close(self) -> Result<()> {
        self.file.close()?;
        Ok(())
    }
}
