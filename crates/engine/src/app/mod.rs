mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{
    load_input_script, parse_input_script_json, ActionInputSource, InputAction, InputScript,
    InputScriptError, InputSource, PlayerInput, ScriptStep, ScriptedInputSource,
};
pub use loop_runner::{run_headless, AppError, InputCollector, LoopConfig, LoopSummary, StopReason};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{DrawCommand, DrawLog, DrawSurface, ProgressTint};
pub use scene::{InputSnapshot, Scene, SceneCommand, Vec2};
