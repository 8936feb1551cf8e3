// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// FFmpeg解码过滤器模块
/// FFmpeg decode filter: rgb24 AVFrame → Frame → channel
use crossbeam_channel::Sender;
use ez_ffmpeg::filter::frame_filter::FrameFilter;
use ez_ffmpeg::filter::frame_filter_context::FrameFilterContext;
use ez_ffmpeg::{AVMediaType, Frame as AvFrame};
use tracing::{debug, warn};

use crate::types::{Frame, PixelFormat};

/// 解码过滤器: 逐帧复制 rgb24 数据并按顺序发送给流水线
pub struct DecodeFilter {
    tx: Sender<Frame>,
    pub total_frames: u64,   // 总帧数
    pub dropped_frames: u64, // 丢弃的帧数
    index: u64,
}

impl DecodeFilter {
    pub fn new(tx: Sender<Frame>) -> Self {
        Self {
            tx,
            total_frames: 0,
            dropped_frames: 0,
            index: 0,
        }
    }

    fn drop_frame(&mut self, reason: &str) {
        self.dropped_frames += 1;
        if self.total_frames <= 10 {
            warn!("⚠️ 丢弃帧 #{}: {}", self.total_frames, reason);
        }
    }
}

impl FrameFilter for DecodeFilter {
    fn media_type(&self) -> AVMediaType {
        AVMediaType::AVMEDIA_TYPE_VIDEO
    }

    fn init(&mut self, _ctx: &FrameFilterContext) -> Result<(), String> {
        debug!("✅ 解码过滤器启动");
        Ok(())
    }

    fn filter_frame(
        &mut self,
        frame: AvFrame,
        _ctx: &FrameFilterContext,
    ) -> Result<Option<AvFrame>, String> {
        self.total_frames += 1;

        let decoded = unsafe {
            // 基本检查：空帧或损坏帧
            if frame.as_ptr().is_null() || frame.is_empty() || frame.is_corrupt() {
                self.drop_frame("空帧/损坏帧");
                return Ok(None);
            }

            let raw = &*frame.as_ptr();
            let w = raw.width.max(0) as usize;
            let h = raw.height.max(0) as usize;
            if w == 0 || h == 0 {
                self.drop_frame("非法分辨率");
                return Ok(None);
            }

            // 只丢弃严重错误的帧 (缺少参考帧、无效比特流)
            if raw.decode_error_flags & 0x03 != 0 {
                self.drop_frame("解码错误标志");
                return Ok(None);
            }

            let plane = raw.data[0];
            let stride = raw.linesize[0].max(0) as usize;
            if plane.is_null() || stride < w * 3 {
                self.drop_frame("RGB平面无效");
                return Ok(None);
            }

            // 按行复制, 去掉每行末尾的对齐填充
            let mut rgb = Vec::with_capacity(w * h * 3);
            for y in 0..h {
                let row = std::slice::from_raw_parts(plane.add(y * stride), w * 3);
                rgb.extend_from_slice(row);
            }
            Frame::new(rgb, w as u32, h as u32, PixelFormat::Rgb24, self.index)
        };

        self.index += 1;
        // 接收端已关闭 → 停止解码
        self.tx
            .send(decoded)
            .map_err(|_| "frame receiver closed".to_string())?;
        Ok(Some(frame))
    }
}
