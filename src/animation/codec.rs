//! # 编解码器帧来源
//!
//! ## 设计思路
//!
//! 基于 `image` crate 的 `AnimationDecoder` 实现 `FrameSource`：
//! - GIF 一律按多帧容器处理；
//! - WebP 仅在 `has_animation` 时、PNG 仅在 APNG 时按多帧处理；
//! - 其余格式视为单帧，交由静态图路径。
//!
//! ## 实现思路
//!
//! `image` 的帧迭代器按顺序合成完整画布，无法随机访问，因此构建时一次性收集：
//! 遇到第一帧错误即停止（解码器状态已不可信），该下标记为失败帧。
//! 收集过程同时执行帧数与解码内存上限检查，超限时截断为已收集的前若干帧。

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, Frames, ImageFormat, RgbaImage};

use super::{FrameSource, FrameTiming};
use crate::image_handler::{ImageConfig, ImageError};

/// 由已加载字节构建的多帧来源。
pub struct CodecFrameSource {
    format: ImageFormat,
    declared_frames: usize,
    slots: Vec<Option<Result<RgbaImage, String>>>,
    timings: Vec<FrameTiming>,
}

impl CodecFrameSource {
    /// 识别容器格式并收集全部帧。
    pub fn from_bytes(bytes: &[u8], config: &ImageConfig) -> Result<Self, ImageError> {
        let format = image::guess_format(bytes)
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        let frames = match format {
            ImageFormat::Gif => {
                let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(map_decode_error)?;
                Some(decoder.into_frames())
            }
            ImageFormat::WebP => {
                let decoder = WebPDecoder::new(Cursor::new(bytes)).map_err(map_decode_error)?;
                if decoder.has_animation() {
                    Some(decoder.into_frames())
                } else {
                    None
                }
            }
            ImageFormat::Png => {
                let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(map_decode_error)?;
                if decoder.is_apng().map_err(map_decode_error)? {
                    Some(decoder.apng().map_err(map_decode_error)?.into_frames())
                } else {
                    None
                }
            }
            _ => None,
        };

        match frames {
            Some(frames) => Self::collect(format, frames, config),
            None => Ok(Self {
                format,
                declared_frames: 1,
                slots: Vec::new(),
                timings: Vec::new(),
            }),
        }
    }

    fn collect(
        format: ImageFormat,
        frames: Frames<'_>,
        config: &ImageConfig,
    ) -> Result<Self, ImageError> {
        let mut slots = Vec::new();
        let mut timings = Vec::new();
        let mut decoded_bytes: u64 = 0;

        for (index, frame) in frames.enumerate() {
            if slots.len() >= config.max_animation_frames {
                log::warn!(
                    "⚠️ 动图帧数超过上限 {}，其余帧已忽略",
                    config.max_animation_frames
                );
                break;
            }

            match frame {
                Ok(frame) => {
                    let timing = FrameTiming::from_delay(frame.delay(), &config.animation);
                    let buffer = frame.into_buffer();

                    let next_total = decoded_bytes.saturating_add(buffer.as_raw().len() as u64);
                    if next_total > config.max_decoded_bytes {
                        log::warn!(
                            "⚠️ 动图解码内存将超过上限 {:.2} MB，保留前 {} 帧",
                            config.max_decoded_bytes as f64 / 1024.0 / 1024.0,
                            slots.len()
                        );
                        break;
                    }
                    decoded_bytes = next_total;

                    timings.push(timing);
                    slots.push(Some(Ok(buffer)));
                }
                Err(err) => {
                    log::warn!("⚠️ {:?} 第 {} 帧解码失败，停止读取后续帧：{}", format, index, err);
                    timings.push(FrameTiming::default());
                    slots.push(Some(Err(err.to_string())));
                    break;
                }
            }
        }

        Ok(Self {
            format,
            declared_frames: slots.len(),
            slots,
            timings,
        })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// 是否为多帧容器（帧数 > 1）。
    pub fn is_animated(&self) -> bool {
        self.declared_frames > 1
    }
}

impl FrameSource for CodecFrameSource {
    type Frame = RgbaImage;
    type Error = ImageError;

    fn frame_count(&self) -> usize {
        self.declared_frames
    }

    /// 取出第 `index` 帧的画布；每个下标只能取一次。
    fn decode_frame(&mut self, index: usize) -> Result<RgbaImage, ImageError> {
        match self.slots.get_mut(index).map(Option::take) {
            Some(Some(Ok(buffer))) => Ok(buffer),
            Some(Some(Err(message))) => Err(ImageError::Decode(message)),
            Some(None) => Err(ImageError::Decode(format!("第 {} 帧已被取走", index))),
            None => Err(ImageError::Decode(format!(
                "帧下标 {} 不可用（共 {} 帧）",
                index, self.declared_frames
            ))),
        }
    }

    fn frame_timing(&self, index: usize) -> FrameTiming {
        self.timings.get(index).copied().unwrap_or_default()
    }
}

fn map_decode_error(err: image::ImageError) -> ImageError {
    ImageError::Decode(format!("动图容器解析失败：{}", err))
}
