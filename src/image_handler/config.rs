//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有"可调策略"集中到 `ImageConfig`，以显式参数传入处理流程，替代进程级全局变量。
//! 性能档位（quality / balanced / speed）作为高层语义，映射到压缩率、缩放尺寸与滤镜组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置（压缩开启、压缩率 0.7）。
//! - `ImagePerformanceProfile` 负责档位字符串解析与反向输出。
//! - `apply_performance_profile` 将档位转换为具体参数。
//! - `infer_performance_profile` 从当前配置反推档位。
//! - `validate` 在配置生效前做范围校验。

use fast_image_resize as fr;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::ImageError;
use crate::animation::AnimationConfig;

/// 目标尺寸（像素）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 缩放滤镜。
///
/// 独立于 `image` 的 `FilterType`，以便序列化到配置文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }

    pub(crate) fn to_fast_filter(self) -> fr::FilterType {
        match self {
            Self::Nearest => fr::FilterType::Box,
            Self::Triangle => fr::FilterType::Bilinear,
            Self::CatmullRom => fr::FilterType::CatmullRom,
            Self::Gaussian => fr::FilterType::Mitchell,
            Self::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}

/// 图片处理配置。
///
/// 字段覆盖加载、解码、动图展开、缩放与压缩几个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// 读取原始字节时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 单帧像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码内存上限（按 RGBA 估算，动图为全部帧之和）。
    pub max_decoded_bytes: u64,
    /// 动图最多读取的帧数。
    pub max_animation_frames: usize,
    /// 转换为数据前是否缩放并压缩。
    pub compression_enabled: bool,
    /// JPEG 压缩率，取值 0.0 ~ 1.0。
    pub compression_rate: f32,
    /// 压缩前的缩放目标尺寸（只缩小不放大）。
    pub resizing_size: TargetSize,
    /// 引用消息等预览位使用的缩略图尺寸。
    pub thumbnail_size: TargetSize,
    /// 缩放滤镜策略。
    pub resize_filter: ResizeFilter,
    /// 动图展开策略。
    pub animation: AnimationConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 512 * 1024 * 1024,
            max_animation_frames: 2_000,
            compression_enabled: true,
            compression_rate: 0.7,
            resizing_size: TargetSize::new(1080, 1920),
            thumbnail_size: TargetSize::new(240, 160),
            resize_filter: ResizeFilter::Triangle,
            animation: AnimationConfig::default(),
        }
    }
}

/// 图片性能档位（面向产品/用户语义）。
///
/// - `Quality`：不压缩，尽量保真
/// - `Balanced`：质量与体积平衡
/// - `Speed`：优先发送速度与体积
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePerformanceProfile {
    Quality,
    Balanced,
    Speed,
}

impl ImagePerformanceProfile {
    /// 从外部字符串解析档位。
    ///
    /// ```
    /// use chat_media::image_handler::ImagePerformanceProfile;
    ///
    /// let p = ImagePerformanceProfile::from_str("Balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), chat_media::image_handler::ImageError>(())
    /// ```
    pub fn from_str(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl ImageConfig {
    /// 基于当前参数反推性能档位。
    pub fn infer_performance_profile(&self) -> ImagePerformanceProfile {
        if !self.compression_enabled {
            return ImagePerformanceProfile::Quality;
        }

        if self.compression_rate <= 0.5
            || self.resizing_size.width.max(self.resizing_size.height) <= 1280
        {
            return ImagePerformanceProfile::Speed;
        }

        ImagePerformanceProfile::Balanced
    }

    /// 应用指定性能档位到实际参数。
    pub fn apply_performance_profile(&mut self, profile: ImagePerformanceProfile) {
        match profile {
            ImagePerformanceProfile::Quality => {
                self.compression_enabled = false;
                self.compression_rate = 1.0;
                self.resize_filter = ResizeFilter::CatmullRom;
            }
            ImagePerformanceProfile::Balanced => {
                self.compression_enabled = true;
                self.compression_rate = 0.7;
                self.resizing_size = TargetSize::new(1080, 1920);
                self.resize_filter = ResizeFilter::Triangle;
            }
            ImagePerformanceProfile::Speed => {
                self.compression_enabled = true;
                self.compression_rate = 0.5;
                self.resizing_size = TargetSize::new(720, 1280);
                self.resize_filter = ResizeFilter::Nearest;
            }
        }
    }

    /// 校验配置取值范围。
    pub fn validate(&self) -> Result<(), ImageError> {
        if !(0.0..=1.0).contains(&self.compression_rate) {
            return Err(ImageError::InvalidFormat(format!(
                "compression_rate 必须在 0.0~1.0 之间，当前为 {}",
                self.compression_rate
            )));
        }
        for (name, size) in [
            ("resizing_size", self.resizing_size),
            ("thumbnail_size", self.thumbnail_size),
        ] {
            if size.width == 0 || size.height == 0 {
                return Err(ImageError::InvalidFormat(format!("{} 的宽高必须大于 0", name)));
            }
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(ImageError::InvalidFormat("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        if self.max_animation_frames < 2 {
            return Err(ImageError::InvalidFormat("max_animation_frames 不能小于 2".to_string()));
        }
        if self.animation.max_ticks == 0 {
            return Err(ImageError::InvalidFormat("animation.max_ticks 必须大于 0".to_string()));
        }
        if self.animation.fallback_frame_delay_ms == 0 {
            return Err(ImageError::InvalidFormat(
                "animation.fallback_frame_delay_ms 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }
}
