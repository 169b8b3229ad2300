//! # 帧时序
//!
//! ## 设计思路
//!
//! 动图容器通常同时提供两种延迟：
//! - unclamped：容器中记录的原始值；
//! - clamped：按浏览器惯例钳制后的值（过小的延迟被替换为默认值）。
//!
//! 优先使用有效（> 0）的 unclamped，其次 clamped，都不可用时为 0。

use image::Delay;

use super::AnimationConfig;

/// 单帧的时序元数据（毫秒）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTiming {
    pub unclamped_ms: Option<u32>,
    pub clamped_ms: Option<u32>,
}

impl FrameTiming {
    pub fn new(unclamped_ms: Option<u32>, clamped_ms: Option<u32>) -> Self {
        Self {
            unclamped_ms,
            clamped_ms,
        }
    }

    /// 由容器原始延迟推导两种时序值。
    ///
    /// 原始值为 0 时 unclamped 记为缺省；低于阈值时 clamped 取替换值。
    pub fn from_raw_ms(raw_ms: u32, config: &AnimationConfig) -> Self {
        let unclamped_ms = (raw_ms > 0).then_some(raw_ms);
        let clamped_ms = if raw_ms < config.clamp_threshold_ms {
            config.clamped_delay_ms
        } else {
            raw_ms
        };

        Self {
            unclamped_ms,
            clamped_ms: Some(clamped_ms),
        }
    }

    /// GIF 图形控制扩展中的延迟单位为 1/100 秒。
    pub fn from_centiseconds(centis: u16, config: &AnimationConfig) -> Self {
        Self::from_raw_ms(u32::from(centis) * 10, config)
    }

    /// `image` 解码器给出的帧延迟。
    pub fn from_delay(delay: Delay, config: &AnimationConfig) -> Self {
        Self::from_raw_ms(delay_to_ms(delay), config)
    }

    /// 实际采用的帧延迟（毫秒），缺失或非法时为 0。
    pub fn delay_ms(&self) -> u32 {
        self.unclamped_ms
            .filter(|ms| *ms > 0)
            .or(self.clamped_ms.filter(|ms| *ms > 0))
            .unwrap_or(0)
    }
}

/// 将分数形式的延迟四舍五入到整毫秒。
fn delay_to_ms(delay: Delay) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 {
        return 0;
    }

    let rounded = (u64::from(numer) + u64::from(denom) / 2) / u64::from(denom);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_positive_unclamped_value() {
        let timing = FrameTiming::new(Some(30), Some(100));
        assert_eq!(timing.delay_ms(), 30);
    }

    #[test]
    fn falls_back_to_clamped_then_zero() {
        assert_eq!(FrameTiming::new(Some(0), Some(100)).delay_ms(), 100);
        assert_eq!(FrameTiming::new(None, Some(80)).delay_ms(), 80);
        assert_eq!(FrameTiming::new(None, Some(0)).delay_ms(), 0);
        assert_eq!(FrameTiming::default().delay_ms(), 0);
    }

    #[test]
    fn raw_zero_delay_is_clamped_to_default() {
        let config = AnimationConfig::default();
        let timing = FrameTiming::from_centiseconds(0, &config);

        assert_eq!(timing.unclamped_ms, None);
        assert_eq!(timing.clamped_ms, Some(100));
        assert_eq!(timing.delay_ms(), 100);
    }

    #[test]
    fn tiny_raw_delay_keeps_unclamped_value() {
        let config = AnimationConfig::default();
        let timing = FrameTiming::from_centiseconds(1, &config);

        assert_eq!(timing.unclamped_ms, Some(10));
        assert_eq!(timing.clamped_ms, Some(100));
        assert_eq!(timing.delay_ms(), 10);
    }

    #[test]
    fn delay_fraction_rounds_to_nearest_millisecond() {
        let config = AnimationConfig::default();
        let timing = FrameTiming::from_delay(Delay::from_numer_denom_ms(100, 3), &config);

        assert_eq!(timing.unclamped_ms, Some(33));
    }
}
