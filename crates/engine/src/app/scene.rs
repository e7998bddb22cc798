use serde::{Deserialize, Serialize};

use super::input::PlayerInput;
use super::rendering::DrawSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dx: f32, dy: f32) -> Vec2 {
        Vec2 {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Everything a scene sees from the outside world for one fixed tick.
///
/// Player inputs are indexed by input slot; a slot with no source reads as idle.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    restart_pressed: bool,
    players: Vec<PlayerInput>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_player_inputs(players: Vec<PlayerInput>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }

    pub fn with_player_input(mut self, slot: usize, input: PlayerInput) -> Self {
        if self.players.len() <= slot {
            self.players.resize(slot + 1, PlayerInput::default());
        }
        self.players[slot] = input;
        self
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }

    pub fn player(&self, slot: usize) -> PlayerInput {
        self.players.get(slot).copied().unwrap_or_default()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

pub trait Scene {
    /// Builds the scene state. An error means the scene refuses to start.
    fn load(&mut self) -> Result<(), String>;
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, surface: &mut dyn DrawSurface);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}
