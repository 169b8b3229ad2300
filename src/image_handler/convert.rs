//! # 缩放与数据转换
//!
//! ## 设计思路
//!
//! 发送图片前的"缩放 → JPEG 压缩"与缩略图生成都在这里完成，参数全部来自 `ImageConfig`。
//!
//! ## 实现思路
//!
//! - `fit_scale`：只缩小不放大，取超出方向上的最小比例。
//! - `resize_to_fit`：优先 `fast_image_resize`，失败时回退 `image::resize_exact`。
//! - `convert_to_data`：压缩开启时先缩放，再按压缩率编码 JPEG（JPEG 无透明通道，先转 RGB）。

use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, Rgba};

use super::config::{ResizeFilter, TargetSize};
use super::{ImageConfig, ImageError};

/// 计算让 `(width, height)` 放进 `target` 的缩放比例，不超过 1.0。
pub fn fit_scale(width: u32, height: u32, target: TargetSize) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }

    let width_ratio = f64::from(target.width) / f64::from(width);
    let height_ratio = f64::from(target.height) / f64::from(height);

    width_ratio.min(height_ratio).min(1.0)
}

/// 等比缩放到 `target` 以内；已经放得下时原样返回。
pub fn resize_to_fit(image: DynamicImage, target: TargetSize, filter: ResizeFilter) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let scale = fit_scale(width, height, target);
    if scale >= 1.0 {
        return image;
    }

    let target_width = ((f64::from(width) * scale).floor() as u32).max(1);
    let target_height = ((f64::from(height) * scale).floor() as u32).max(1);

    log::debug!(
        "🧩 等比缩放：{}x{} -> {}x{}（filter={:?}）",
        width,
        height,
        target_width,
        target_height,
        filter
    );

    match resize_with_fast_image_resize(&image, target_width, target_height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            image.resize_exact(target_width, target_height, filter.to_filter_type())
        }
    }
}

/// 生成预览位使用的缩略图。
pub fn thumbnail(image: DynamicImage, config: &ImageConfig) -> DynamicImage {
    resize_to_fit(image, config.thumbnail_size, config.resize_filter)
}

/// 将图片转换为待发送的 JPEG 数据。
///
/// 压缩开启时先缩放到 `resizing_size` 并按 `compression_rate` 压缩，否则以最高质量编码。
pub fn convert_to_data(image: DynamicImage, config: &ImageConfig) -> Result<Vec<u8>, ImageError> {
    let (image, quality) = if config.compression_enabled {
        (
            resize_to_fit(image, config.resizing_size, config.resize_filter),
            jpeg_quality(config.compression_rate),
        )
    } else {
        (image, 100)
    };

    let rgb = image.to_rgb8();
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, quality)
        .encode_image(&rgb)
        .map_err(|e| ImageError::Encode(format!("JPEG 编码失败：{}", e)))?;

    if data.is_empty() {
        log::error!("❌ 图片编码结果为空");
        return Err(ImageError::Encode("图片编码结果为空".to_string()));
    }

    log::debug!(
        "📤 图片转换完成 - {}x{} quality={} size={}KB",
        rgb.width(),
        rgb.height(),
        quality,
        data.len() / 1024
    );

    Ok(data)
}

/// 0.0 ~ 1.0 的压缩率映射到 JPEG 的 1 ~ 100。
fn jpeg_quality(rate: f32) -> u8 {
    (rate.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: ResizeFilter,
) -> Result<DynamicImage, ImageError> {
    let src = image.to_rgba8();
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::Image::from_vec_u8(src_width, src_height, src.into_raw(), fr::PixelType::U8x4)
        .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;
    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(filter.to_fast_filter()));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))?;

    Ok(DynamicImage::ImageRgba8(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 30, 90, 255])))
    }

    #[test]
    fn fit_scale_never_upscales() {
        assert_eq!(fit_scale(100, 50, TargetSize::new(200, 200)), 1.0);
    }

    #[test]
    fn fit_scale_uses_overflowing_axis() {
        assert_eq!(fit_scale(400, 100, TargetSize::new(200, 200)), 0.5);
        assert_eq!(fit_scale(100, 400, TargetSize::new(200, 200)), 0.5);
        assert_eq!(fit_scale(800, 400, TargetSize::new(200, 200)), 0.25);
    }

    #[test]
    fn resize_to_fit_keeps_aspect_ratio() {
        let resized = resize_to_fit(solid(400, 200), TargetSize::new(100, 100), ResizeFilter::Triangle);

        assert_eq!((resized.width(), resized.height()), (100, 50));
    }

    #[test]
    fn thumbnail_uses_configured_size() {
        let config = ImageConfig::default();
        let thumb = thumbnail(solid(960, 640), &config);

        assert_eq!((thumb.width(), thumb.height()), (240, 160));
    }

    #[test]
    fn convert_to_data_produces_jpeg() {
        let config = ImageConfig::default();
        let data = convert_to_data(solid(32, 16), &config).expect("conversion should succeed");

        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&data).expect("jpeg should decode");
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn compression_resizes_to_configured_bounds() {
        let mut config = ImageConfig::default();
        config.resizing_size = TargetSize::new(20, 20);
        let data = convert_to_data(solid(80, 40), &config).expect("conversion should succeed");

        let decoded = image::load_from_memory(&data).expect("jpeg should decode");
        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn disabled_compression_keeps_original_size() {
        let mut config = ImageConfig::default();
        config.compression_enabled = false;
        config.resizing_size = TargetSize::new(20, 20);
        let data = convert_to_data(solid(80, 40), &config).expect("conversion should succeed");

        let decoded = image::load_from_memory(&data).expect("jpeg should decode");
        assert_eq!((decoded.width(), decoded.height()), (80, 40));
    }

    #[test]
    fn quality_mapping_is_clamped() {
        assert_eq!(jpeg_quality(0.7), 70);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(3.0), 100);
    }
}
