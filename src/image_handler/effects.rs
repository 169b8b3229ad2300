//! # 图像效果
//!
//! 图标着色、纯色占位图、带底板的头像/图标等小型像素操作。

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// 用 `tint` 填充图像的不透明区域，原图 alpha 作为蒙版。
///
/// `tint` 为 `None` 时原样返回。
pub fn with_tint(image: &RgbaImage, tint: Option<Rgba<u8>>) -> RgbaImage {
    let Some(Rgba([r, g, b, a])) = tint else {
        return image.clone();
    };

    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let mask = image.get_pixel(x, y)[3];
        let alpha = (u16::from(mask) * u16::from(a) + 127) / 255;
        Rgba([r, g, b, alpha as u8])
    })
}

/// 1x1 的纯色图像。
pub fn from_color(color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(1, 1, color)
}

/// 在纯色底板上绘制图像，四周留出 `margin` 像素。
///
/// `circle` 为 `true` 时底板为圆角半径 `min(w, h) / 2` 的胶囊（正方形即为圆）。
pub fn with_background(image: &RgbaImage, color: Rgba<u8>, margin: u32, circle: bool) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::new(width, height);

    let radius = f64::from(width.min(height)) / 2.0;
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        if !circle || inside_capsule(x, y, width, height, radius) {
            *pixel = color;
        }
    }

    let inner_width = width.saturating_sub(margin.saturating_mul(2));
    let inner_height = height.saturating_sub(margin.saturating_mul(2));
    if inner_width == 0 || inner_height == 0 {
        return canvas;
    }

    let inner = imageops::resize(image, inner_width, inner_height, FilterType::Triangle);
    imageops::overlay(&mut canvas, &inner, i64::from(margin), i64::from(margin));

    canvas
}

/// 像素中心是否落在圆角矩形（圆角半径 `radius`）内。
fn inside_capsule(x: u32, y: u32, width: u32, height: u32, radius: f64) -> bool {
    let px = f64::from(x) + 0.5;
    let py = f64::from(y) + 0.5;

    let cx = px.clamp(radius, f64::from(width) - radius);
    let cy = py.clamp(radius, f64::from(height) - radius);

    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn tint_keeps_alpha_mask() {
        let mut icon = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        icon.put_pixel(1, 0, Rgba([10, 20, 30, 0]));

        let tinted = with_tint(&icon, Some(RED));

        assert_eq!(*tinted.get_pixel(0, 0), RED);
        assert_eq!(tinted.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn no_tint_returns_original() {
        let icon = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 128]));
        assert_eq!(with_tint(&icon, None), icon);
    }

    #[test]
    fn from_color_is_single_pixel() {
        let image = from_color(BLUE);
        assert_eq!(image.dimensions(), (1, 1));
        assert_eq!(*image.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn rectangular_background_fills_margin() {
        let icon = RgbaImage::from_pixel(10, 10, RED);
        let plated = with_background(&icon, BLUE, 2, false);

        assert_eq!(*plated.get_pixel(0, 0), BLUE);
        assert_eq!(*plated.get_pixel(5, 5), RED);
    }

    #[test]
    fn circular_background_leaves_corners_transparent() {
        let icon = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        let plated = with_background(&icon, BLUE, 2, true);

        assert_eq!(plated.get_pixel(0, 0)[3], 0);
        assert_eq!(*plated.get_pixel(5, 5), BLUE);
        assert_eq!(*plated.get_pixel(5, 0), BLUE);
    }

    #[test]
    fn oversized_margin_returns_plain_plate() {
        let icon = RgbaImage::from_pixel(4, 4, RED);
        let plated = with_background(&icon, BLUE, 3, false);

        assert!(plated.pixels().all(|p| *p == BLUE));
    }
}
