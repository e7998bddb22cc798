use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    Work,
    Quit,
    Restart,
}

const ACTION_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn release_all(&mut self) {
        self.down = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Interact => 4,
            InputAction::Work => 5,
            InputAction::Quit => 6,
            InputAction::Restart => 7,
        }
    }
}

/// Per-tick input record consumed by one player.
///
/// Axes are in `[-1, 1]`; `interact` and `start_working` are true only on the tick
/// the button went down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub move_horizontal: f32,
    pub move_vertical: f32,
    pub interact: bool,
    pub start_working: bool,
}

impl PlayerInput {
    pub fn has_movement(&self) -> bool {
        self.move_horizontal != 0.0 || self.move_vertical != 0.0
    }
}

/// A polled per-player input device. Edge detection lives in the source.
///
/// Session requests reflect the state as of the latest [`InputSource::poll`].
pub trait InputSource {
    fn poll(&mut self) -> PlayerInput;

    fn quit_requested(&self) -> bool {
        false
    }

    fn restart_pressed(&self) -> bool {
        false
    }
}

/// Turns held action states into edge-triggered [`PlayerInput`] records.
///
/// A device layer calls [`ActionInputSource::set`] as buttons change; the loop polls
/// once per tick.
#[derive(Debug, Clone, Default)]
pub struct ActionInputSource {
    actions: ActionStates,
    interact_was_down: bool,
    work_was_down: bool,
    restart_was_down: bool,
    restart_edge: bool,
}

impl ActionInputSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, action: InputAction, is_down: bool) {
        self.actions.set(action, is_down);
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn release_all(&mut self) {
        self.actions.release_all();
    }
}

impl InputSource for ActionInputSource {
    fn poll(&mut self) -> PlayerInput {
        let axis = |negative: InputAction, positive: InputAction| {
            let mut value = 0.0;
            if self.actions.is_down(negative) {
                value -= 1.0;
            }
            if self.actions.is_down(positive) {
                value += 1.0;
            }
            value
        };
        let move_horizontal = axis(InputAction::MoveLeft, InputAction::MoveRight);
        let move_vertical = axis(InputAction::MoveUp, InputAction::MoveDown);

        let interact_down = self.actions.is_down(InputAction::Interact);
        let interact = interact_down && !self.interact_was_down;
        self.interact_was_down = interact_down;

        let work_down = self.actions.is_down(InputAction::Work);
        let start_working = work_down && !self.work_was_down;
        self.work_was_down = work_down;

        let restart_down = self.actions.is_down(InputAction::Restart);
        self.restart_edge = restart_down && !self.restart_was_down;
        self.restart_was_down = restart_down;

        PlayerInput {
            move_horizontal,
            move_vertical,
            interact,
            start_working,
        }
    }

    fn quit_requested(&self) -> bool {
        self.actions.is_down(InputAction::Quit)
    }

    fn restart_pressed(&self) -> bool {
        self.restart_edge
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptStep {
    pub ticks: u32,
    #[serde(default)]
    pub hold: Vec<InputAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Error)]
pub enum InputScriptError {
    #[error("failed to read input script {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse input script json: {message}")]
    Parse { message: String },
    #[error("parse input script json at {path}: {message}")]
    ParseAt { path: String, message: String },
}

pub fn parse_input_script_json(raw: &str) -> Result<InputScript, InputScriptError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, InputScript>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let message = error.into_inner().to_string();
        if path.is_empty() || path == "." {
            InputScriptError::Parse { message }
        } else {
            InputScriptError::ParseAt { path, message }
        }
    })
}

pub fn load_input_script(path: &Path) -> Result<InputScript, InputScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| InputScriptError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_input_script_json(&raw)
}

/// Plays an [`InputScript`] back through an [`ActionInputSource`]; idle once finished.
#[derive(Debug, Clone)]
pub struct ScriptedInputSource {
    script: InputScript,
    step_index: usize,
    ticks_into_step: u32,
    actions: ActionInputSource,
}

impl ScriptedInputSource {
    pub fn new(script: InputScript) -> Self {
        Self {
            script,
            step_index: 0,
            ticks_into_step: 0,
            actions: ActionInputSource::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step_index >= self.script.steps.len()
    }

    fn skip_empty_steps(&mut self) {
        while let Some(step) = self.script.steps.get(self.step_index) {
            if step.ticks > 0 {
                break;
            }
            self.step_index += 1;
        }
    }
}

impl InputSource for ScriptedInputSource {
    fn poll(&mut self) -> PlayerInput {
        self.skip_empty_steps();
        self.actions.release_all();
        if let Some(step) = self.script.steps.get(self.step_index) {
            for action in &step.hold {
                self.actions.set(*action, true);
            }
            self.ticks_into_step += 1;
            if self.ticks_into_step >= step.ticks {
                self.step_index += 1;
                self.ticks_into_step = 0;
            }
        }
        self.actions.poll()
    }

    fn quit_requested(&self) -> bool {
        self.actions.quit_requested()
    }

    fn restart_pressed(&self) -> bool {
        self.actions.restart_pressed()
    }
}
