//! Headless fixed-tick runtime: scenes, polled player input, and the render hook.

pub mod app;
mod sprite_keys;

pub use app::{
    load_input_script, parse_input_script_json, run_headless, ActionInputSource, AppError,
    DrawCommand, DrawLog, DrawSurface, InputAction, InputCollector, InputScript,
    InputScriptError, InputSnapshot, InputSource, LoopConfig, LoopMetricsSnapshot, LoopSummary,
    PlayerInput, ProgressTint, Scene, SceneCommand, ScriptStep, ScriptedInputSource, StopReason,
    Vec2,
};
pub use sprite_keys::{SpriteKey, SpriteKeyError};
