use tracing::warn;

use crate::app::Vec2;
use crate::sprite_keys::SpriteKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTint {
    Green,
    Blue,
}

/// Render hook implemented by the presentation layer.
///
/// Anchors are world positions; the surface owns scaling and sprite lookup.
pub trait DrawSurface {
    fn begin_frame(&mut self) {}
    fn size(&self) -> (u32, u32);
    fn draw_sprite(&mut self, sprite: SpriteKey, anchor: Vec2);
    fn draw_progress(&mut self, anchor: Vec2, ratio: f32, tint: ProgressTint);
    fn draw_text(&mut self, text: &str, anchor: Vec2);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        sprite: SpriteKey,
        anchor: Vec2,
    },
    Progress {
        anchor: Vec2,
        ratio: f32,
        tint: ProgressTint,
    },
    Text {
        text: String,
        anchor: Vec2,
    },
}

/// Headless surface that records every draw call of a frame.
#[derive(Debug, Clone)]
pub struct DrawLog {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    invalid_sprite_count: usize,
}

impl Default for DrawLog {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl DrawLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            invalid_sprite_count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn invalid_sprite_count(&self) -> usize {
        self.invalid_sprite_count
    }

    pub fn sprites(&self) -> impl Iterator<Item = (SpriteKey, Vec2)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { sprite, anchor } => Some((*sprite, *anchor)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for DrawLog {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_sprite(&mut self, sprite: SpriteKey, anchor: Vec2) {
        if let Err(error) = sprite.validate() {
            self.invalid_sprite_count += 1;
            warn!(sprite = %sprite, error = %error, "sprite_key_invalid");
            return;
        }
        self.commands.push(DrawCommand::Sprite { sprite, anchor });
    }

    fn draw_progress(&mut self, anchor: Vec2, ratio: f32, tint: ProgressTint) {
        self.commands.push(DrawCommand::Progress {
            anchor,
            ratio: ratio.clamp(0.0, 1.0),
            tint,
        });
    }

    fn draw_text(&mut self, text: &str, anchor: Vec2) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
        });
    }
}
