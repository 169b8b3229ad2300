//! # 解码流水线模块
//!
//! ## 设计思路
//!
//! 将"字节 → 静态图 / 动画时间线"的分流集中管理，并在完整解码前做资源上限控制。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸，按像素与内存上限快速拒绝
//! 2. 构建 `CodecFrameSource`，帧数 > 1 时尝试展开动画时间线
//! 3. 动画构建失败（坏帧过多、时序异常、tick 过多）时回退到静态解码
//! 4. 静态解码按 EXIF 方向摆正

use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};
use std::io::Cursor;

use super::source::{LoadedImage, RawImageData};
use super::{ImageConfig, ImageError, ImageHandler};
use crate::animation::{AnimatedImageDecoder, CodecFrameSource};

impl ImageHandler {
    /// 将原始字节解码为静态图或动画时间线。
    pub(crate) fn decode_loaded_image(
        &self,
        raw: RawImageData,
        config: &ImageConfig,
    ) -> Result<LoadedImage, ImageError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let mut source = CodecFrameSource::from_bytes(&raw.bytes, config)?;
        if source.is_animated() {
            let decoder = AnimatedImageDecoder::new(config.animation.clone());
            match decoder.decode(&mut source) {
                Some(timeline) => {
                    log::info!(
                        "✅ 动图解码成功 - 来源: {} 格式: {:?} 尺寸: {}x{} 帧: {} tick: {} 总时长: {:.3}s",
                        raw.source_hint,
                        source.format(),
                        header_width,
                        header_height,
                        timeline.frame_count(),
                        timeline.tick_count(),
                        timeline.total_seconds()
                    );
                    return Ok(LoadedImage::Animated(timeline));
                }
                None => {
                    log::info!("🖼️ 动图无法展开，回退静态图 - 来源: {}", raw.source_hint);
                }
            }
        }
        drop(source);

        let image = Self::decode_static_oriented(&raw.bytes)?;
        log::info!(
            "✅ 静态图解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            image.width(),
            image.height()
        );

        Ok(LoadedImage::Static(image))
    }

    /// 完整解码首帧，并按 EXIF 方向摆正。
    fn decode_static_oriented(bytes: &[u8]) -> Result<RgbaImage, ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ImageError::Decode(format!("无法创建解码器：{}", e)))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| ImageError::Decode(format!("读取图片方向失败：{}", e)))?;

        let mut image = DynamicImage::from_decoder(decoder)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;
        image.apply_orientation(orientation);

        Ok(image.into_rgba8())
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(config: &ImageConfig, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = u64::from(width) * u64::from(height);

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = u64::from(width) * u64::from(height) * 4;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
