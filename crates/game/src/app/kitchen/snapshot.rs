use serde::Serialize;

use super::item::{Item, ItemKind};
use super::station::{Station, StationKind, StationType};
use super::world::KitchenWorld;

/// Serializable view of the world, for dumps and assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KitchenSnapshot {
    pub tick: u64,
    pub players: Vec<PlayerSnapshot>,
    pub stations: Vec<StationSnapshot>,
    pub pending_orders: Vec<Vec<&'static str>>,
    pub orders_spawned: u64,
    pub orders_delivered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub holding: Option<ItemSnapshot>,
    pub working: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub kind: StationType,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<ItemSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owed_dirty_plates: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<&'static str>,
}

impl From<&Item> for ItemSnapshot {
    fn from(item: &Item) -> Self {
        Self {
            kind: item.kind(),
            contents: item
                .as_plate()
                .map(|plate| plate.sorted_names())
                .unwrap_or_default(),
        }
    }
}

impl From<&Station> for StationSnapshot {
    fn from(station: &Station) -> Self {
        let station_type = station.station_type();
        let owed_dirty_plates = match station.kind() {
            StationKind::DeliveryExit { owed_dirty_plates } => Some(*owed_dirty_plates),
            _ => None,
        };
        Self {
            kind: station_type,
            x: station.origin().x,
            y: station.origin().y,
            contents: station.contents().map(ItemSnapshot::from),
            progress: station_type.has_progress().then(|| station.progress()),
            owed_dirty_plates,
        }
    }
}

impl KitchenWorld {
    pub fn snapshot(&self) -> KitchenSnapshot {
        let orders = self.orders();
        KitchenSnapshot {
            tick: self.tick_count(),
            players: self
                .players()
                .iter()
                .map(|player| PlayerSnapshot {
                    slot: player.input_slot(),
                    x: player.position().x,
                    y: player.position().y,
                    holding: player.holding().map(ItemSnapshot::from),
                    working: player.is_working(),
                })
                .collect(),
            stations: self.stations().iter().map(StationSnapshot::from).collect(),
            pending_orders: orders.pending().iter().map(|order| order.sorted_names()).collect(),
            orders_spawned: orders.spawned_total(),
            orders_delivered: orders.delivered_total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::app::kitchen::layout::default_layout;
    use crate::app::kitchen::world::KitchenWorld;

    #[test]
    fn snapshot_serializes_default_kitchen() {
        let world = KitchenWorld::from_config(&default_layout()).expect("default layout");
        let value = serde_json::to_value(world.snapshot()).expect("serialize");

        assert_eq!(value["tick"], json!(0));
        assert_eq!(value["pending_orders"], json!([["chopped_lettuce", "chopped_tomato"]]));
        assert_eq!(
            value["stations"][2],
            json!({
                "kind": "cutting_board",
                "x": 42.0,
                "y": 10.0,
                "contents": { "kind": "raw_lettuce" },
                "progress": 0.25
            })
        );
        assert_eq!(
            value["stations"][5],
            json!({ "kind": "delivery_exit", "x": 90.0, "y": 10.0, "owed_dirty_plates": 0 })
        );
        assert_eq!(
            value["stations"][7]["contents"],
            json!({ "kind": "clean_plate", "contents": ["chopped_lettuce", "chopped_tomato"] })
        );
        assert_eq!(
            value["players"][0],
            json!({ "slot": 0, "x": 100.0, "y": 100.0, "holding": null, "working": false })
        );
    }
}
