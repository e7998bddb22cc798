use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use engine::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::{Item, ItemError, ItemKind, Plate};
use super::orders::{Order, OrderLedger, MAX_PENDING_ORDERS, ORDER_SPAWN_ONE_IN_TICKS};
use super::player::Player;
use super::station::{Station, StationType, WorkSlot, WORK_DURATION_TICKS};
use super::world::KitchenWorld;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read layout '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    Parse { message: String },
    #[error("validation failed at {path}: {message}")]
    Validation { path: String, message: String },
    #[error("invalid item at {path}: {source}")]
    Item {
        path: String,
        #[source]
        source: ItemError,
    },
}

/// Static description of a kitchen: where things are and what they start with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitchenConfig {
    #[serde(default)]
    pub seed: u64,
    pub stations: Vec<StationConfig>,
    pub players: Vec<PlayerConfig>,
    pub orders: OrdersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    pub kind: StationType,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<ItemConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<ItemKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersConfig {
    #[serde(default)]
    pub initial: Vec<Vec<ItemKind>>,
    pub catalog: Vec<Vec<ItemKind>>,
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
    #[serde(default = "default_spawn_one_in_ticks")]
    pub spawn_one_in_ticks: u32,
}

fn default_max_pending() -> usize {
    MAX_PENDING_ORDERS
}

fn default_spawn_one_in_ticks() -> u32 {
    ORDER_SPAWN_ONE_IN_TICKS
}

impl ItemConfig {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            contents: Vec::new(),
        }
    }

    pub fn plate(contents: Vec<ItemKind>) -> Self {
        Self {
            kind: ItemKind::CleanPlate,
            contents,
        }
    }
}

impl StationConfig {
    pub fn new(kind: StationType, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            contents: None,
            progress: None,
        }
    }

    pub fn with_contents(mut self, contents: ItemConfig) -> Self {
        self.contents = Some(contents);
        self
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// The reference kitchen: a row of stations, a row of stocked counters, three chefs.
pub fn default_layout() -> KitchenConfig {
    use ItemKind::{ChoppedLettuce, ChoppedTomato, DirtyPlate, RawLettuce, RawTomato};
    use StationType as S;

    let stations = vec![
        StationConfig::new(S::Wall, 10.0, 10.0),
        StationConfig::new(S::Trash, 26.0, 10.0),
        StationConfig::new(S::CuttingBoard, 42.0, 10.0)
            .with_contents(ItemConfig::new(RawLettuce))
            .with_progress(0.25),
        StationConfig::new(S::TomatoTap, 58.0, 10.0),
        StationConfig::new(S::LettuceTap, 74.0, 10.0),
        StationConfig::new(S::DeliveryExit, 90.0, 10.0),
        StationConfig::new(S::WashBasin, 106.0, 10.0)
            .with_contents(ItemConfig::new(DirtyPlate))
            .with_progress(0.25),
        StationConfig::new(S::Counter, 10.0, 26.0)
            .with_contents(ItemConfig::plate(vec![ChoppedLettuce, ChoppedTomato])),
        StationConfig::new(S::Counter, 26.0, 26.0).with_contents(ItemConfig::new(RawLettuce)),
        StationConfig::new(S::Counter, 42.0, 26.0).with_contents(ItemConfig::new(ChoppedLettuce)),
        StationConfig::new(S::Counter, 58.0, 26.0).with_contents(ItemConfig::new(RawTomato)),
        StationConfig::new(S::Counter, 74.0, 26.0).with_contents(ItemConfig::new(ChoppedTomato)),
        StationConfig::new(S::Counter, 90.0, 26.0).with_contents(ItemConfig::new(DirtyPlate)),
        StationConfig::new(S::Counter, 106.0, 26.0),
    ];

    KitchenConfig {
        seed: 0,
        stations,
        players: vec![
            PlayerConfig { x: 100.0, y: 100.0 },
            PlayerConfig { x: 150.0, y: 150.0 },
            PlayerConfig { x: 100.0, y: 150.0 },
        ],
        orders: OrdersConfig {
            initial: vec![vec![ChoppedLettuce, ChoppedTomato]],
            catalog: vec![vec![ChoppedLettuce], vec![ChoppedLettuce, ChoppedTomato]],
            max_pending: MAX_PENDING_ORDERS,
            spawn_one_in_ticks: ORDER_SPAWN_ONE_IN_TICKS,
        },
    }
}

pub fn parse_kitchen_config_json(raw: &str) -> Result<KitchenConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, KitchenConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            let message = if path.is_empty() || path == "." {
                format!("parse layout json: {source}")
            } else {
                format!("parse layout json at {path}: {source}")
            };
            Err(ConfigError::Parse { message })
        }
    }
}

/// Reads, parses and validates a layout file.
pub fn load_kitchen_config(path: &Path) -> Result<KitchenConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_kitchen_config_json(&raw)?;
    config.validate()?;
    Ok(config)
}

fn validation_err(path: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        path: path.into(),
        message: message.into(),
    }
}

fn expected_actual(path: impl Into<String>, expected: impl Display, actual: impl Display) -> ConfigError {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn check_finite(path: String, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(expected_actual(path, "finite number", value))
    }
}

impl KitchenConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, station) in self.stations.iter().enumerate() {
            validate_station(index, station)?;
        }

        if self.players.is_empty() {
            return Err(expected_actual("players", "at least one player", 0));
        }
        for (index, player) in self.players.iter().enumerate() {
            check_finite(format!("players[{index}].x"), player.x)?;
            check_finite(format!("players[{index}].y"), player.y)?;
        }

        let orders = &self.orders;
        if orders.catalog.is_empty() {
            return Err(expected_actual("orders.catalog", "at least one order", 0));
        }
        if orders.spawn_one_in_ticks == 0 {
            return Err(expected_actual(
                "orders.spawn_one_in_ticks",
                "positive tick count",
                0,
            ));
        }
        if orders.initial.len() > orders.max_pending {
            return Err(expected_actual(
                "orders.initial",
                format!("at most {} orders", orders.max_pending),
                orders.initial.len(),
            ));
        }
        validate_recipes("orders.initial", &orders.initial)?;
        validate_recipes("orders.catalog", &orders.catalog)?;
        Ok(())
    }
}

fn validate_station(index: usize, station: &StationConfig) -> Result<(), ConfigError> {
    check_finite(format!("stations[{index}].x"), station.x)?;
    check_finite(format!("stations[{index}].y"), station.y)?;

    if let Some(contents) = &station.contents {
        let path = format!("stations[{index}].contents");
        if !station.kind.holds_contents() {
            return Err(validation_err(
                path,
                format!("{} cannot hold contents", station.kind.name()),
            ));
        }
        let admitted = match station.kind {
            StationType::CuttingBoard => Item::new(contents.kind).can_cut(),
            StationType::WashBasin => Item::new(contents.kind).can_wash(),
            _ => true,
        };
        if !admitted {
            return Err(validation_err(
                format!("{path}.kind"),
                format!(
                    "{} does not accept {}",
                    station.kind.name(),
                    contents.kind.name()
                ),
            ));
        }
        if contents.kind != ItemKind::CleanPlate && !contents.contents.is_empty() {
            return Err(expected_actual(
                format!("{path}.contents"),
                "no contents",
                format!("{} entries on {}", contents.contents.len(), contents.kind.name()),
            ));
        }
    }

    if let Some(progress) = station.progress {
        let path = format!("stations[{index}].progress");
        if !station.kind.has_progress() {
            return Err(validation_err(
                path,
                format!("{} has no work progress", station.kind.name()),
            ));
        }
        if !progress.is_finite() || !(0.0..1.0).contains(&progress) {
            return Err(expected_actual(path, "ratio in [0, 1)", progress));
        }
    }
    Ok(())
}

fn validate_recipes(path: &str, recipes: &[Vec<ItemKind>]) -> Result<(), ConfigError> {
    for (order_index, recipe) in recipes.iter().enumerate() {
        if recipe.is_empty() {
            return Err(expected_actual(
                format!("{path}[{order_index}]"),
                "at least one ingredient",
                0,
            ));
        }
        for (ingredient_index, kind) in recipe.iter().enumerate() {
            if !kind.is_combinable() {
                return Err(expected_actual(
                    format!("{path}[{order_index}][{ingredient_index}]"),
                    "combinable ingredient",
                    kind.name(),
                ));
            }
        }
    }
    Ok(())
}

fn build_item(path: String, config: &ItemConfig) -> Result<Item, ConfigError> {
    if config.kind != ItemKind::CleanPlate {
        return Ok(Item::new(config.kind));
    }
    let items = config.contents.iter().copied().map(Item::new).collect();
    Plate::with_contents(items)
        .map(Item::CleanPlate)
        .map_err(|source| ConfigError::Item { path, source })
}

fn progress_ticks(progress: Option<f32>) -> u32 {
    progress.map_or(0, |ratio| (ratio * WORK_DURATION_TICKS as f32).round() as u32)
}

fn build_station(index: usize, config: &StationConfig) -> Result<Station, ConfigError> {
    let origin = Vec2::new(config.x, config.y);
    let contents = config
        .contents
        .as_ref()
        .map(|item| build_item(format!("stations[{index}].contents"), item))
        .transpose()?;
    let work_ticks = progress_ticks(config.progress);

    let station = match config.kind {
        StationType::Wall => Station::wall(origin),
        StationType::Counter => Station::counter(origin, contents),
        StationType::TomatoTap => Station::tomato_tap(origin),
        StationType::LettuceTap => Station::lettuce_tap(origin),
        StationType::DeliveryExit => Station::delivery_exit(origin),
        StationType::Trash => Station::trash(origin),
        StationType::CuttingBoard => Station::cutting_board(
            origin,
            WorkSlot::new(contents, work_ticks, WORK_DURATION_TICKS),
        ),
        StationType::WashBasin => Station::wash_basin(
            origin,
            WorkSlot::new(contents, work_ticks, WORK_DURATION_TICKS),
        ),
    };
    Ok(station)
}

fn orders_from(recipes: &[Vec<ItemKind>]) -> Vec<Order> {
    recipes.iter().cloned().map(Order::new).collect()
}

impl KitchenWorld {
    /// Validates `config` and builds a fresh world from it.
    pub fn from_config(config: &KitchenConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let stations = config
            .stations
            .iter()
            .enumerate()
            .map(|(index, station)| build_station(index, station))
            .collect::<Result<Vec<_>, _>>()?;
        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(slot, player)| Player::new(Vec2::new(player.x, player.y), slot))
            .collect();
        let orders = OrderLedger::new(orders_from(&config.orders.catalog), config.seed)
            .with_limits(config.orders.max_pending, config.orders.spawn_one_in_ticks)
            .with_pending(orders_from(&config.orders.initial));

        Ok(Self::new(stations, players, orders))
    }
}
