//! # 动图时间线模块（animation）
//!
//! ## 设计思路
//!
//! 宿主的动画原语只接受"有序帧数组 + 单一总时长"，每帧显示时长相同。
//! 本模块把逐帧延迟各不相同的多帧图像，转换为以最大公约数为 tick 的展开序列，
//! 使固定时长播放也能还原原始节奏。
//!
//! ```text
//! FrameSource（codec.rs 或任意实现）
//!    ↓ decode_frame / frame_timing
//! decoder.rs（逐帧解码、跳过坏帧）
//!    ↓ delays
//! plan.rs（gcd.rs 求 unit → repeat counts）
//!    ↓
//! timeline.rs（AnimationTimeline：ticks + 总时长）
//! ```
//!
//! 算法只依赖 `FrameSource` trait，可脱离具体编解码器单独测试。

mod codec;
mod config;
mod decoder;
mod gcd;
mod plan;
mod source;
mod timeline;
mod timing;

pub use codec::CodecFrameSource;
pub use config::{AnimationConfig, ZeroDelayPolicy};
pub use decoder::{AnimatedImageDecoder, MIN_ANIMATED_FRAMES};
pub use gcd::{gcd_of, gcd_pair};
pub use plan::TickPlan;
pub use source::FrameSource;
pub use timeline::AnimationTimeline;
pub use timing::FrameTiming;
