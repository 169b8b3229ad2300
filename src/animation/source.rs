use std::fmt::Display;

use super::FrameTiming;

/// 多帧图像来源。
///
/// 将"按下标解码单帧 + 读取帧时序"抽象为能力接口，使时间线构建算法不依赖具体编解码器。
pub trait FrameSource {
    type Frame;
    type Error: Display;

    /// 容器声明的帧数。
    fn frame_count(&self) -> usize;

    /// 解码指定下标的帧。失败的下标会被跳过。
    fn decode_frame(&mut self, index: usize) -> Result<Self::Frame, Self::Error>;

    /// 指定下标的时序元数据，缺失时返回默认值（延迟为 0）。
    fn frame_timing(&self, index: usize) -> FrameTiming;
}
