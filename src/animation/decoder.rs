//! # 动图解码器
//!
//! ## 实现思路
//!
//! 1. 逐帧解码，失败的下标跳过，帧与延迟保持下标对齐
//! 2. 可用帧少于 2 时放弃，交给静态图路径
//! 3. 计算展开计划；延迟全为 0 时按 `ZeroDelayPolicy` 处理
//! 4. 展开为 tick 序列并构建时间线
//!
//! 所有异常都降级为 `None`，不向调用方抛错。

use super::{AnimationConfig, AnimationTimeline, FrameSource, TickPlan, ZeroDelayPolicy};

/// 构成动画所需的最少可用帧数。
pub const MIN_ANIMATED_FRAMES: usize = 2;

/// 多帧图像到动画时间线的转换器。
#[derive(Debug, Clone, Default)]
pub struct AnimatedImageDecoder {
    config: AnimationConfig,
}

impl AnimatedImageDecoder {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    /// 将多帧来源转换为动画时间线。
    ///
    /// 返回 `None` 表示调用方应回退到静态图（或占位图）。
    pub fn decode<S: FrameSource>(&self, source: &mut S) -> Option<AnimationTimeline<S::Frame>> {
        let count = source.frame_count();
        if count < MIN_ANIMATED_FRAMES {
            log::debug!("🖼️ 帧数 {} 不足以构成动画，走静态图路径", count);
            return None;
        }

        let mut frames = Vec::with_capacity(count);
        let mut delays = Vec::with_capacity(count);

        for index in 0..count {
            match source.decode_frame(index) {
                Ok(frame) => {
                    frames.push(frame);
                    delays.push(source.frame_timing(index).delay_ms());
                }
                Err(err) => {
                    log::warn!("⚠️ 第 {} 帧解码失败，已跳过：{}", index, err);
                }
            }
        }

        if frames.len() < MIN_ANIMATED_FRAMES {
            log::warn!(
                "⚠️ 可用帧不足（{}/{}），回退静态图",
                frames.len(),
                count
            );
            return None;
        }

        let plan = match TickPlan::from_delays(&delays) {
            Some(plan) => plan,
            None => match self.config.zero_delay_policy {
                ZeroDelayPolicy::UniformFallback => {
                    log::info!(
                        "⏱️ 帧延迟全为 0，按每帧 {}ms 均匀播放",
                        self.config.fallback_frame_delay_ms
                    );
                    TickPlan::uniform(frames.len(), self.config.fallback_frame_delay_ms)
                }
                ZeroDelayPolicy::Refuse => {
                    log::info!("⏱️ 帧延迟全为 0，按配置放弃动画");
                    return None;
                }
            },
        };

        if plan.tick_count() > self.config.max_ticks as u64 {
            log::warn!(
                "⚠️ 展开后 tick 数过多：{}（限制：{}，unit={}ms），回退静态图",
                plan.tick_count(),
                self.config.max_ticks,
                plan.unit_ms()
            );
            return None;
        }

        log::debug!(
            "🎞️ 动画时间线 - 帧数: {} tick: {} unit: {}ms 总时长: {}ms",
            frames.len(),
            plan.tick_count(),
            plan.unit_ms(),
            plan.total_duration_ms()
        );

        Some(AnimationTimeline::from_plan(frames, &plan))
    }
}
