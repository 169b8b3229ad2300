//! # 展开计划
//!
//! ## 设计思路
//!
//! 宿主动画原语只接受"帧数组 + 单一总时长"，每帧显示时长相同。
//! 为了还原不同帧的不同延迟，以全部延迟的最大公约数作为 tick 时长，
//! 第 i 帧重复 `delays[i] / unit` 次。
//!
//! 由于 `unit` 整除每个延迟，`Σ repeat[i] * unit == Σ delays[i]` 严格成立，不存在舍入漂移。

use super::gcd_of;

/// 由帧延迟序列计算出的展开方案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickPlan {
    unit_ms: u32,
    repeat_counts: Vec<u32>,
    total_duration_ms: u64,
    timing_fallback: bool,
}

impl TickPlan {
    /// 基于真实延迟构建方案。
    ///
    /// 全部延迟为 0（或序列为空）时没有可用的时间粒度，返回 `None`。
    pub fn from_delays(delays: &[u32]) -> Option<Self> {
        let total_duration_ms = delays.iter().map(|d| u64::from(*d)).sum();
        let unit_ms = gcd_of(delays);

        if unit_ms == 0 || total_duration_ms == 0 {
            return None;
        }

        let repeat_counts = delays.iter().map(|delay| delay / unit_ms).collect();

        Some(Self {
            unit_ms,
            repeat_counts,
            total_duration_ms,
            timing_fallback: false,
        })
    }

    /// 无时序信息时的回退方案：每帧 1 个 tick。
    pub fn uniform(frame_count: usize, frame_delay_ms: u32) -> Self {
        let unit_ms = frame_delay_ms.max(1);

        Self {
            unit_ms,
            repeat_counts: vec![1; frame_count],
            total_duration_ms: u64::from(unit_ms) * frame_count as u64,
            timing_fallback: true,
        }
    }

    pub fn unit_ms(&self) -> u32 {
        self.unit_ms
    }

    pub fn repeat_counts(&self) -> &[u32] {
        &self.repeat_counts
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn is_timing_fallback(&self) -> bool {
        self.timing_fallback
    }

    /// 展开后的 tick 总数。
    pub fn tick_count(&self) -> u64 {
        self.repeat_counts.iter().map(|c| u64::from(*c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_delays_repeat_once() {
        let plan = TickPlan::from_delays(&[100, 100, 100]).expect("plan should exist");

        assert_eq!(plan.unit_ms(), 100);
        assert_eq!(plan.repeat_counts(), &[1, 1, 1]);
        assert_eq!(plan.tick_count(), 3);
        assert_eq!(plan.total_duration_ms(), 300);
    }

    #[test]
    fn uneven_delays_expand_by_gcd() {
        let plan = TickPlan::from_delays(&[30, 45, 60]).expect("plan should exist");

        assert_eq!(plan.unit_ms(), 15);
        assert_eq!(plan.repeat_counts(), &[2, 3, 4]);
        assert_eq!(plan.tick_count(), 9);
        assert_eq!(plan.total_duration_ms(), 135);
    }

    #[test]
    fn zero_delays_have_no_plan() {
        assert!(TickPlan::from_delays(&[0, 0]).is_none());
        assert!(TickPlan::from_delays(&[]).is_none());
    }

    #[test]
    fn zero_delay_frame_in_mixed_sequence_gets_no_ticks() {
        let plan = TickPlan::from_delays(&[0, 100, 200]).expect("plan should exist");

        assert_eq!(plan.repeat_counts(), &[0, 1, 2]);
        assert_eq!(plan.total_duration_ms(), 300);
    }

    #[test]
    fn uniform_plan_gives_each_frame_one_tick() {
        let plan = TickPlan::uniform(2, 100);

        assert!(plan.is_timing_fallback());
        assert_eq!(plan.repeat_counts(), &[1, 1]);
        assert_eq!(plan.total_duration_ms(), 200);
    }

    proptest! {
        #[test]
        fn ticks_reproduce_total_exactly(delays in prop::collection::vec(1u32..5_000, 1..32)) {
            let plan = TickPlan::from_delays(&delays).expect("positive delays always plan");
            let replayed: u64 = plan
                .repeat_counts()
                .iter()
                .map(|count| u64::from(*count) * u64::from(plan.unit_ms()))
                .sum();
            let expected: u64 = delays.iter().map(|d| u64::from(*d)).sum();

            prop_assert_eq!(replayed, expected);
            prop_assert_eq!(plan.tick_count() * u64::from(plan.unit_ms()), plan.total_duration_ms());
        }
    }
}
