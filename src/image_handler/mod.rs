//! # 图片处理模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将"来源加载校验 → 解码分流（静态 / 动画）→ 缩放压缩 → 像素效果"
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线，持有可动态切换的配置
//! - `loader`：负责字节 / Base64 / 文件加载与安全校验
//! - `pipeline`：负责尺寸限制、动图展开与静态回退
//! - `convert`：负责等比缩放、缩略图与 JPEG 转换
//! - `effects`：着色、纯色图、底板等像素操作
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 调用方（消息气泡 / 引用预览）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积/签名校验）
//!    └─ pipeline.rs（尺寸限制 → animation::AnimatedImageDecoder → 静态回退）
//!    ↓
//! LoadedImage（Static / Animated）
//!    ↓
//! convert.rs（发送前压缩 / 缩略图）
//! ```

mod config;
mod convert;
mod effects;
mod error;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use config::{ImageConfig, ImagePerformanceProfile, ResizeFilter, TargetSize};
pub use convert::{convert_to_data, fit_scale, resize_to_fit, thumbnail};
pub use effects::{from_color, with_background, with_tint};
pub use error::ImageError;
pub use handler::ImageHandler;
pub use source::{ImageSource, LoadedImage};
