// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 视频文件解码器 (ez-ffmpeg, CPU软件解码)
///
/// 解码在独立线程中运行, 帧通过有界通道按顺序送出;
/// 对调用方而言就是一个顺序迭代器, 不支持并发访问同一视频
use std::path::Path;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use ez_ffmpeg::core::context::null_output::create_null_output;
use ez_ffmpeg::filter::frame_pipeline_builder::FramePipelineBuilder;
use ez_ffmpeg::{AVMediaType, FfmpegContext, Input};
use tracing::{info, warn};

use super::decode_filter::DecodeFilter;
use crate::error::{PipelineError, Result};
use crate::types::Frame;

/// 解码通道容量 (帧)
const CHANNEL_CAPACITY: usize = 32;

pub struct FfmpegFrameSource {
    rx: Receiver<Frame>,
    worker: Option<JoinHandle<()>>,
}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        let url = path.to_string_lossy().to_string();
        info!("🎬 解码视频: {}", url);

        let (tx, rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
        let filter = DecodeFilter::new(tx);

        let pipe: FramePipelineBuilder = AVMediaType::AVMEDIA_TYPE_VIDEO.into();
        let pipe = pipe.filter("decode", Box::new(filter));
        let out = create_null_output().add_frame_pipeline(pipe);

        // 构建FFmpeg上下文, 统一输出 packed rgb24
        let ctx = FfmpegContext::builder()
            .input(Input::new(url.as_str()))
            .filter_descs(["format=rgb24"].into())
            .output(out)
            .build()
            .map_err(|e| PipelineError::Decode(format!("构建失败: {}", e)))?;

        let sch = ctx
            .start()
            .map_err(|e| PipelineError::Decode(format!("启动失败: {}", e)))?;

        let worker = std::thread::spawn(move || {
            if let Err(e) = sch.wait() {
                warn!("❌ 解码线程退出: {}", e);
            }
        });

        Ok(Self {
            rx,
            worker: Some(worker),
        })
    }
}

impl Iterator for FfmpegFrameSource {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        match self.rx.recv() {
            Ok(frame) => Some(frame),
            Err(_) => {
                // 过滤器已释放 → 解码结束
                if let Some(worker) = self.worker.take() {
                    let _ = worker.join();
                }
                None
            }
        }
    }
}
