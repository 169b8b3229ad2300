//! # chat-media：聊天消息媒体层
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        聊天 UI（消息气泡 / 引用消息预览 / 会话列表）        │
//! │                    （外部调用方）                          │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ ImageSource → Result<LoadedImage, ImageError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕                 chat-media                       │
//! │                                                          │
//! │  ┌─ error ────────── AppError (统一错误类型)              │
//! │  │                                                       │
//! │  ├─ image_handler ── 加载·校验·静态/动画分流·压缩·效果     │
//! │  │                                                       │
//! │  └─ animation ────── 多帧图像 → GCD 展开的动画时间线       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行入口的返回类型 |
//! | [`animation`] | 帧时序提取、最大公约数展开、`AnimationTimeline` 构建 |
//! | [`image_handler`] | 从字节/Base64/文件加载图片，解码为静态图或动画，发送前压缩 |

pub mod animation;
pub mod error;
pub mod image_handler;
