use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::metrics::{LoopMetrics, LoopMetricsSnapshot};
use super::{DrawSurface, InputSnapshot, InputSource, Scene, SceneCommand};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    /// Stop after this many ticks; `None` runs until the scene quits.
    pub max_ticks: Option<u64>,
    /// Pace ticks against the wall clock instead of running them back to back.
    pub realtime: bool,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_ticks: None,
            realtime: false,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("scene failed to load: {message}")]
    SceneLoad { message: String },
    #[error("scene failed to reload after restart: {message}")]
    SceneReload { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TickLimit,
    SceneQuit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSummary {
    pub ticks_run: u64,
    pub frames_rendered: u64,
    pub stop_reason: StopReason,
    pub last_metrics: Option<LoopMetricsSnapshot>,
}

/// Polls every input source exactly once per tick, slot order = source order.
pub struct InputCollector {
    sources: Vec<Box<dyn InputSource>>,
}

impl InputCollector {
    pub fn new(sources: Vec<Box<dyn InputSource>>) -> Self {
        Self { sources }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Any source may request quit or restart for the whole session.
    pub fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let players = self
            .sources
            .iter_mut()
            .map(|source| source.poll())
            .collect::<Vec<_>>();
        let quit_requested = self.sources.iter().any(|source| source.quit_requested());
        let restart_pressed = self.sources.iter().any(|source| source.restart_pressed());
        InputSnapshot::with_player_inputs(players)
            .with_quit_requested(quit_requested)
            .with_restart_pressed(restart_pressed)
    }
}

/// Drives a scene with fixed-size ticks and no window.
///
/// Each frame runs the planned ticks, then renders once into `surface`.
pub fn run_headless(
    config: &LoopConfig,
    scene: &mut dyn Scene,
    input: &mut InputCollector,
    surface: &mut dyn DrawSurface,
) -> Result<LoopSummary, AppError> {
    scene
        .load()
        .map_err(|message| AppError::SceneLoad { message })?;

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();

    info!(
        target_tps,
        max_ticks = ?config.max_ticks,
        realtime = config.realtime,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        input_sources = input.source_count(),
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics = LoopMetrics::new(target_tps, metrics_log_interval);
    let mut last_metrics = None;
    let mut ticks_run = 0u64;
    let mut frames_rendered = 0u64;

    let stop_reason = 'frames: loop {
        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        let ticks_to_run = if config.realtime {
            accumulator = accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));
            let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
            accumulator = step_plan.remaining_accumulator;
            if step_plan.dropped_backlog > Duration::ZERO {
                metrics.backlog_dropped(step_plan.dropped_backlog);
                warn!(
                    dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                    max_ticks_per_frame, "sim_clamp_triggered"
                );
            }
            step_plan.ticks_to_run
        } else {
            1
        };

        for _ in 0..ticks_to_run {
            if config.max_ticks.is_some_and(|limit| ticks_run >= limit) {
                break 'frames StopReason::TickLimit;
            }
            let input_snapshot = input.snapshot_for_tick();
            let command = scene.update(fixed_dt_seconds, &input_snapshot);
            ticks_run += 1;
            metrics.tick();

            match command {
                SceneCommand::None => {}
                SceneCommand::Restart => {
                    scene.unload();
                    scene
                        .load()
                        .map_err(|message| AppError::SceneReload { message })?;
                    info!(tick = ticks_run, "scene_restarted");
                }
                SceneCommand::Quit => {
                    info!(tick = ticks_run, reason = "scene_quit", "shutdown_requested");
                    break 'frames StopReason::SceneQuit;
                }
            }
        }

        if ticks_to_run > 0 {
            surface.begin_frame();
            scene.render(surface);
            frames_rendered += 1;
            metrics.frame(raw_frame_dt);
        }

        if let Some(snapshot) = metrics.report(now) {
            last_metrics = Some(snapshot);
            let title = scene.debug_title();
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                tps_ratio = snapshot.tps_ratio,
                frame_time_ms = snapshot.frame_time_ms,
                total_ticks = snapshot.total_ticks,
                dropped_backlog_ms = snapshot.dropped_backlog_ms,
                title = title.as_deref().unwrap_or(""),
                "loop_metrics"
            );
        }

        if config.realtime {
            let elapsed = Instant::now().saturating_duration_since(now);
            let sleep = fixed_dt.saturating_sub(elapsed);
            if sleep > Duration::ZERO {
                thread::sleep(sleep);
            }
        }
    };

    debug!(ticks_run, frames_rendered, ?stop_reason, "loop_finished");
    scene.unload();
    info!(ticks_run, ?stop_reason, "shutdown");

    Ok(LoopSummary {
        ticks_run,
        frames_rendered,
        stop_reason,
        last_metrics,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
