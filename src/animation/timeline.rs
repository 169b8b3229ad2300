use std::sync::Arc;
use std::time::Duration;

use super::TickPlan;

/// 展开后的动画时间线。
///
/// 以固定 tick 时长逐个播放 `ticks` 即可还原原始的逐帧延迟。
/// 同一源帧的重复 tick 共享同一份 `Arc`，构建后不可变。
#[derive(Debug, Clone)]
pub struct AnimationTimeline<F> {
    ticks: Vec<Arc<F>>,
    frame_count: usize,
    tick_duration: Duration,
    total_duration: Duration,
    timing_fallback: bool,
}

impl<F> AnimationTimeline<F> {
    /// 按计划把 `frames[i]` 追加 `repeat_counts[i]` 次。
    ///
    /// `frames` 与计划中的重复次数按下标一一对应。
    pub(crate) fn from_plan(frames: Vec<F>, plan: &TickPlan) -> Self {
        let capacity = usize::try_from(plan.tick_count()).unwrap_or(0);
        let mut ticks = Vec::with_capacity(capacity);
        let frame_count = frames.len();

        for (frame, repeat) in frames.into_iter().zip(plan.repeat_counts()) {
            let shared = Arc::new(frame);
            for _ in 0..*repeat {
                ticks.push(Arc::clone(&shared));
            }
        }

        Self {
            ticks,
            frame_count,
            tick_duration: Duration::from_millis(u64::from(plan.unit_ms())),
            total_duration: Duration::from_millis(plan.total_duration_ms()),
            timing_fallback: plan.is_timing_fallback(),
        }
    }

    pub fn ticks(&self) -> &[Arc<F>] {
        &self.ticks
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// 参与构建的可用源帧数量（含 0 tick 的帧）。
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// 总时长（秒），即宿主动画原语的循环时长。
    pub fn total_seconds(&self) -> f64 {
        self.total_duration.as_millis() as f64 / 1000.0
    }

    /// 是否为无时序信息时的回退时间线。
    pub fn is_timing_fallback(&self) -> bool {
        self.timing_fallback
    }

    pub fn first_frame(&self) -> Option<&F> {
        self.ticks.first().map(|tick| tick.as_ref())
    }

    /// 播放到 `elapsed` 时应显示的帧，超过总时长后循环。
    pub fn frame_at(&self, elapsed: Duration) -> Option<&F> {
        let tick_ms = self.tick_duration.as_millis();
        let total_ms = self.total_duration.as_millis();
        if tick_ms == 0 || total_ms == 0 {
            return self.first_frame();
        }

        let offset = elapsed.as_millis() % total_ms;
        let index = usize::try_from(offset / tick_ms).unwrap_or(usize::MAX);
        self.ticks
            .get(index)
            .or_else(|| self.ticks.last())
            .map(|tick| tick.as_ref())
    }
}
