use std::time::{Duration, Instant};

/// One reporting window of loop health.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    /// Measured tps over the configured target; below 1.0 the simulation is falling behind.
    pub tps_ratio: f32,
    pub frame_time_ms: f32,
    /// Ticks since the loop started, not just this window.
    pub total_ticks: u64,
    /// Backlog discarded by the per-frame tick cap during this window.
    pub dropped_backlog_ms: u64,
}

#[derive(Debug)]
pub(crate) struct LoopMetrics {
    target_tps: u32,
    report_every: Duration,
    window_opened_at: Instant,
    window: WindowCounts,
    total_ticks: u64,
}

#[derive(Debug, Default)]
struct WindowCounts {
    frames: u32,
    ticks: u32,
    frame_time: Duration,
    dropped_backlog: Duration,
}

impl LoopMetrics {
    pub(crate) fn new(target_tps: u32, report_every: Duration) -> Self {
        Self::opened_at(Instant::now(), target_tps, report_every)
    }

    pub(crate) fn opened_at(start: Instant, target_tps: u32, report_every: Duration) -> Self {
        Self {
            target_tps: target_tps.max(1),
            report_every,
            window_opened_at: start,
            window: WindowCounts::default(),
            total_ticks: 0,
        }
    }

    pub(crate) fn tick(&mut self) {
        self.window.ticks = self.window.ticks.saturating_add(1);
        self.total_ticks = self.total_ticks.saturating_add(1);
    }

    pub(crate) fn frame(&mut self, frame_dt: Duration) {
        self.window.frames = self.window.frames.saturating_add(1);
        self.window.frame_time = self.window.frame_time.saturating_add(frame_dt);
    }

    pub(crate) fn backlog_dropped(&mut self, backlog: Duration) {
        self.window.dropped_backlog = self.window.dropped_backlog.saturating_add(backlog);
    }

    /// Closes the window once `report_every` has elapsed.
    pub(crate) fn report(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_opened_at);
        if elapsed < self.report_every {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let window = std::mem::take(&mut self.window);
        self.window_opened_at = now;

        let tps = window.ticks as f32 / seconds;
        let frame_time_ms = match window.frames {
            0 => 0.0,
            frames => window.frame_time.as_secs_f32() * 1000.0 / frames as f32,
        };
        Some(LoopMetricsSnapshot {
            fps: window.frames as f32 / seconds,
            tps,
            tps_ratio: tps / self.target_tps as f32,
            frame_time_ms,
            total_ticks: self.total_ticks,
            dropped_backlog_ms: window.dropped_backlog.as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_reports_rates_against_target() {
        let start = Instant::now();
        let mut metrics = LoopMetrics::opened_at(start, 60, Duration::from_secs(1));
        for _ in 0..30 {
            metrics.tick();
            metrics.frame(Duration::from_millis(20));
        }

        let snapshot = metrics
            .report(start + Duration::from_secs(1))
            .expect("window closed");

        assert!((snapshot.tps - 30.0).abs() < 0.05);
        assert!((snapshot.fps - 30.0).abs() < 0.05);
        assert!((snapshot.tps_ratio - 0.5).abs() < 0.01);
        assert!((snapshot.frame_time_ms - 20.0).abs() < 0.001);
        assert_eq!(snapshot.total_ticks, 30);
    }

    #[test]
    fn open_window_does_not_report() {
        let start = Instant::now();
        let mut metrics = LoopMetrics::opened_at(start, 60, Duration::from_secs(1));
        metrics.tick();

        assert!(metrics.report(start + Duration::from_millis(500)).is_none());
    }

    #[test]
    fn totals_survive_window_resets_but_backlog_does_not() {
        let start = Instant::now();
        let mut metrics = LoopMetrics::opened_at(start, 60, Duration::from_secs(1));
        metrics.tick();
        metrics.tick();
        metrics.backlog_dropped(Duration::from_millis(40));
        let first = metrics
            .report(start + Duration::from_secs(1))
            .expect("first window");
        metrics.tick();
        let second = metrics
            .report(start + Duration::from_secs(2))
            .expect("second window");

        assert_eq!(first.dropped_backlog_ms, 40);
        assert_eq!(second.dropped_backlog_ms, 0);
        assert_eq!(second.total_ticks, 3);
        assert_eq!(second.frame_time_ms, 0.0);
    }

    #[test]
    fn zero_target_is_treated_as_one() {
        let start = Instant::now();
        let mut metrics = LoopMetrics::opened_at(start, 0, Duration::from_secs(1));
        metrics.tick();

        let snapshot = metrics.report(start + Duration::from_secs(1)).expect("window");
        assert!((snapshot.tps_ratio - 1.0).abs() < 0.01);
    }
}
