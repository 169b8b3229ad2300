//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将"外部输入类型"和"流水线中间结果"解耦：
//! - `ImageSource` 表示外部来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `LoadedImage` 表示可直接交给显示层的静态图或动画时间线

use image::RgbaImage;

use crate::animation::AnimationTimeline;

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 调用方已加载好的字节。
    Bytes(Vec<u8>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径来源。
    FilePath(String),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码阶段输出。
#[derive(Debug, Clone)]
pub enum LoadedImage {
    Static(RgbaImage),
    Animated(AnimationTimeline<RgbaImage>),
}

impl LoadedImage {
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// 静态图本身，或动画的第一个 tick。
    pub fn first_frame(&self) -> Option<&RgbaImage> {
        match self {
            Self::Static(image) => Some(image),
            Self::Animated(timeline) => timeline.first_frame(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.first_frame()
            .map(|frame| frame.dimensions())
            .unwrap_or((0, 0))
    }
}
