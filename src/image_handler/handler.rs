//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排与配置管理，不绑定任何 UI 框架。
//! 加载链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载原始字节
//! 3. 解码为静态图或动画时间线
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ImageConfig>>` 支持运行时动态切档，克隆出的处理器共享同一份配置。
//! - 单次请求内使用"同一配置快照"，避免处理中途配置漂移。
//! - 记录 `load/decode/total` 阶段耗时，便于性能诊断。
//! - 解码是同步 CPU 计算；需要避开 UI 线程的调用方使用 `load_in_background`。

use image::DynamicImage;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::convert;
use super::source::LoadedImage;
use super::{ImageConfig, ImageError, ImagePerformanceProfile, ImageSource};

/// 图片处理器。
#[derive(Clone)]
pub struct ImageHandler {
    pub(super) config: Arc<RwLock<ImageConfig>>,
}

impl ImageHandler {
    /// 根据初始配置创建处理器，配置非法时直接拒绝。
    ///
    /// ```
    /// use chat_media::image_handler::{ImageConfig, ImageHandler};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// # Ok::<(), chat_media::image_handler::ImageError>(())
    /// ```
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<ImageConfig, ImageError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置（先校验）。
    pub fn set_config(&self, new_config: ImageConfig) -> Result<(), ImageError> {
        new_config.validate()?;

        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        *config = new_config;

        Ok(())
    }

    /// 设置性能档位。
    pub fn set_performance_profile(&self, profile: ImagePerformanceProfile) -> Result<(), ImageError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_performance_profile(profile);

        log::info!(
            "⚙️ 已切换图片性能档位：{:?}（compression={}, rate={}, size={}x{}, filter={:?}）",
            profile,
            config.compression_enabled,
            config.compression_rate,
            config.resizing_size.width,
            config.resizing_size.height,
            config.resize_filter
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_performance_profile(&self) -> Result<ImagePerformanceProfile, ImageError> {
        let config = self
            .config
            .read()
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_performance_profile())
    }

    /// 处理主入口：从任意来源加载图片，多帧图像展开为动画时间线。
    ///
    /// ```
    /// use chat_media::image_handler::{ImageConfig, ImageHandler, ImageSource};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// let result = handler.load(ImageSource::Bytes(b"not an image".to_vec()));
    /// assert!(result.is_err());
    /// # Ok::<(), chat_media::image_handler::ImageError>(())
    /// ```
    pub fn load(&self, source: ImageSource) -> Result<LoadedImage, ImageError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = match source {
            ImageSource::Bytes(bytes) => self.load_from_bytes(bytes, &config)?,
            ImageSource::Base64(data) => self.load_from_base64(&data, &config)?,
            ImageSource::FilePath(path) => self.load_from_file(&path, &config)?,
        };
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let loaded = self.decode_loaded_image(raw, &config)?;
        let decode_elapsed = decode_start.elapsed();

        log::info!(
            "✅ 图片加载完成 - animated={} load={}ms decode={}ms total={}ms",
            loaded.is_animated(),
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(loaded)
    }

    /// 在阻塞线程池中执行 `load`，结果交回调用方所在任务。
    pub async fn load_in_background(&self, source: ImageSource) -> Result<LoadedImage, ImageError> {
        let handler = self.clone();

        tokio::task::spawn_blocking(move || handler.load(source))
            .await
            .map_err(|e| ImageError::Task(format!("后台解码任务异常退出：{}", e)))?
    }

    /// 将已加载的图片转换为待发送数据。动图取第一帧。
    pub fn convert_to_data(&self, image: &LoadedImage) -> Result<Vec<u8>, ImageError> {
        let config = self.config_snapshot()?;
        let frame = image
            .first_frame()
            .ok_or_else(|| ImageError::Decode("没有可转换的图像帧".to_string()))?;

        convert::convert_to_data(DynamicImage::ImageRgba8(frame.clone()), &config)
    }

    /// 按配置生成缩略图。动图取第一帧。
    pub fn thumbnail(&self, image: &LoadedImage) -> Result<DynamicImage, ImageError> {
        let config = self.config_snapshot()?;
        let frame = image
            .first_frame()
            .ok_or_else(|| ImageError::Decode("没有可生成缩略图的图像帧".to_string()))?;

        Ok(convert::thumbnail(DynamicImage::ImageRgba8(frame.clone()), &config))
    }
}
