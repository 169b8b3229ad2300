//! # 动画解码配置
//!
//! 动画相关的可调策略集中于 `AnimationConfig`，作为 `ImageConfig` 的嵌套字段随请求快照传入，
//! 不使用进程级全局变量。

use serde::{Deserialize, Serialize};

/// 所有帧延迟均为 0（无可用时序信息）时的处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDelayPolicy {
    /// 每帧固定 1 个 tick，tick 时长取 `fallback_frame_delay_ms`。
    UniformFallback,
    /// 拒绝生成时间线，调用方回退到静态图路径。
    Refuse,
}

/// 动画解码配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// 延迟全为 0 时的策略。
    pub zero_delay_policy: ZeroDelayPolicy,
    /// 回退模式下每帧的显示时长（毫秒）。
    pub fallback_frame_delay_ms: u32,
    /// 原始延迟低于该阈值（毫秒）时，"clamped" 延迟被替换为 `clamped_delay_ms`。
    pub clamp_threshold_ms: u32,
    /// 钳制后的替换延迟（毫秒）。
    pub clamped_delay_ms: u32,
    /// 展开后的 tick 数上限，超出则放弃动画。
    pub max_ticks: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            zero_delay_policy: ZeroDelayPolicy::UniformFallback,
            fallback_frame_delay_ms: 100,
            clamp_threshold_ms: 20,
            clamped_delay_ms: 100,
            max_ticks: 100_000,
        }
    }
}
