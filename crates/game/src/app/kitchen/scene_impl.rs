use engine::{DrawSurface, InputSnapshot, Scene, SceneCommand};
use tracing::{info, warn};

use super::layout::KitchenConfig;
use super::snapshot::KitchenSnapshot;
use super::world::KitchenWorld;

/// Adapts a [`KitchenWorld`] to the engine's scene lifecycle.
pub struct KitchenScene {
    config: KitchenConfig,
    world: Option<KitchenWorld>,
    last_snapshot: Option<KitchenSnapshot>,
}

impl KitchenScene {
    pub fn new(config: KitchenConfig) -> Self {
        Self {
            config,
            world: None,
            last_snapshot: None,
        }
    }

    pub fn world(&self) -> Option<&KitchenWorld> {
        self.world.as_ref()
    }

    /// State captured when the scene was last unloaded.
    pub fn last_snapshot(&self) -> Option<&KitchenSnapshot> {
        self.last_snapshot.as_ref()
    }
}

impl Scene for KitchenScene {
    fn load(&mut self) -> Result<(), String> {
        let world = KitchenWorld::from_config(&self.config).map_err(|error| error.to_string())?;
        info!(
            stations = world.stations().len(),
            players = world.players().len(),
            pending_orders = world.orders().pending().len(),
            seed = self.config.seed,
            "scene_loaded"
        );
        self.world = Some(world);
        Ok(())
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }
        if input.restart_pressed() {
            return SceneCommand::Restart;
        }
        match self.world.as_mut() {
            Some(world) => world.tick(input),
            None => warn!("update_without_world"),
        }
        SceneCommand::None
    }

    fn render(&mut self, surface: &mut dyn DrawSurface) {
        if let Some(world) = &self.world {
            world.draw(surface);
        }
    }

    fn unload(&mut self) {
        if let Some(world) = self.world.take() {
            self.last_snapshot = Some(world.snapshot());
        }
    }

    fn debug_title(&self) -> Option<String> {
        let world = self.world.as_ref()?;
        let orders = world.orders();
        Some(format!(
            "kitchen | tick:{} | pending:{} | delivered:{}",
            world.tick_count(),
            orders.pending().len(),
            orders.delivered_total()
        ))
    }
}
