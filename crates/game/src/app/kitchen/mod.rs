//! The kitchen simulation: items, stations, orders, chefs, and the world that ticks them.

mod interaction;
mod item;
mod layout;
mod movement;
mod orders;
mod player;
mod scene_impl;
mod snapshot;
mod station;
mod world;

pub(crate) use layout::{default_layout, load_kitchen_config, ConfigError, KitchenConfig};
pub(crate) use scene_impl::KitchenScene;

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
