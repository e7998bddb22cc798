use engine::{DrawSurface, ProgressTint, SpriteKey, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::item::Item;
use super::orders::OrderLedger;

pub const TILE_SIZE: f32 = 16.0;
pub const TILE_HALF: f32 = TILE_SIZE / 2.0;
/// Ticks of sustained work to finish a cut or wash: 3 s at 60 TPS.
pub const WORK_DURATION_TICKS: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationType {
    Wall,
    Counter,
    TomatoTap,
    LettuceTap,
    DeliveryExit,
    Trash,
    CuttingBoard,
    WashBasin,
}

impl StationType {
    pub const ALL: [StationType; 8] = [
        StationType::Wall,
        StationType::Counter,
        StationType::TomatoTap,
        StationType::LettuceTap,
        StationType::DeliveryExit,
        StationType::Trash,
        StationType::CuttingBoard,
        StationType::WashBasin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Counter => "counter",
            Self::TomatoTap => "tomato_tap",
            Self::LettuceTap => "lettuce_tap",
            Self::DeliveryExit => "delivery_exit",
            Self::Trash => "trash",
            Self::CuttingBoard => "cutting_board",
            Self::WashBasin => "wash_basin",
        }
    }

    /// Only these stations own an item slot.
    pub fn holds_contents(self) -> bool {
        matches!(self, Self::Counter | Self::CuttingBoard | Self::WashBasin)
    }

    pub fn has_progress(self) -> bool {
        matches!(self, Self::CuttingBoard | Self::WashBasin)
    }

    pub(crate) fn sprite(self) -> SpriteKey {
        match self {
            Self::Wall => SpriteKey::from_static("stations/wall"),
            Self::Counter => SpriteKey::from_static("stations/counter"),
            Self::TomatoTap => SpriteKey::from_static("stations/tomato_tap"),
            Self::LettuceTap => SpriteKey::from_static("stations/lettuce_tap"),
            Self::DeliveryExit => SpriteKey::from_static("stations/delivery_exit"),
            Self::Trash => SpriteKey::from_static("stations/trash"),
            Self::CuttingBoard => SpriteKey::from_static("stations/cutting_board"),
            Self::WashBasin => SpriteKey::from_static("stations/wash_basin"),
        }
    }
}

/// Item slot plus timed-work progress shared by cutting boards and wash basins.
#[derive(Debug, PartialEq)]
pub struct WorkSlot {
    contents: Option<Item>,
    work_ticks: u32,
    duration_ticks: u32,
}

impl WorkSlot {
    pub fn new(contents: Option<Item>, work_ticks: u32, duration_ticks: u32) -> Self {
        let duration_ticks = duration_ticks.max(1);
        Self {
            contents,
            work_ticks: work_ticks.min(duration_ticks - 1),
            duration_ticks,
        }
    }

    pub fn empty() -> Self {
        Self::new(None, 0, WORK_DURATION_TICKS)
    }

    pub fn progress(&self) -> f32 {
        self.work_ticks as f32 / self.duration_ticks as f32
    }

    fn take(&mut self) -> Option<Item> {
        let item = self.contents.take()?;
        self.work_ticks = 0;
        Some(item)
    }

    fn accept(&mut self, item: Item, gate: fn(&Item) -> bool) -> Result<(), Item> {
        if !gate(&item) {
            return Err(item);
        }
        if let Some(held) = self.contents.as_mut() {
            return held.combine(item);
        }
        self.contents = Some(item);
        Ok(())
    }

    /// Advances one tick of work; returns the finished product's name on completion.
    fn advance(
        &mut self,
        gate: fn(&Item) -> bool,
        complete: fn(&Item) -> Option<Item>,
    ) -> Option<&'static str> {
        let held = self.contents.as_ref()?;
        if !gate(held) {
            return None;
        }
        self.work_ticks += 1;
        if self.work_ticks < self.duration_ticks {
            return None;
        }
        self.work_ticks = 0;
        let product = complete(held)?;
        let name = product.name();
        self.contents = Some(product);
        Some(name)
    }

    fn draw(&self, surface: &mut dyn DrawSurface, origin: Vec2, tint: ProgressTint) {
        if let Some(item) = &self.contents {
            item.draw(surface, origin.offset(TILE_HALF, TILE_HALF));
        }
        if self.work_ticks > 0 {
            surface.draw_progress(origin, self.progress(), tint);
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum StationKind {
    Wall,
    Counter { contents: Option<Item> },
    TomatoTap,
    LettuceTap,
    DeliveryExit { owed_dirty_plates: u32 },
    Trash,
    CuttingBoard(WorkSlot),
    WashBasin(WorkSlot),
}

impl StationKind {
    pub fn station_type(&self) -> StationType {
        match self {
            Self::Wall => StationType::Wall,
            Self::Counter { .. } => StationType::Counter,
            Self::TomatoTap => StationType::TomatoTap,
            Self::LettuceTap => StationType::LettuceTap,
            Self::DeliveryExit { .. } => StationType::DeliveryExit,
            Self::Trash => StationType::Trash,
            Self::CuttingBoard(_) => StationType::CuttingBoard,
            Self::WashBasin(_) => StationType::WashBasin,
        }
    }
}

/// A fixed tile in the kitchen. `origin` is the tile's top-left corner.
#[derive(Debug, PartialEq)]
pub struct Station {
    origin: Vec2,
    kind: StationKind,
}

impl Station {
    pub fn new(origin: Vec2, kind: StationKind) -> Self {
        Self { origin, kind }
    }

    pub fn wall(origin: Vec2) -> Self {
        Self::new(origin, StationKind::Wall)
    }

    pub fn counter(origin: Vec2, contents: Option<Item>) -> Self {
        Self::new(origin, StationKind::Counter { contents })
    }

    pub fn tomato_tap(origin: Vec2) -> Self {
        Self::new(origin, StationKind::TomatoTap)
    }

    pub fn lettuce_tap(origin: Vec2) -> Self {
        Self::new(origin, StationKind::LettuceTap)
    }

    pub fn delivery_exit(origin: Vec2) -> Self {
        Self::new(
            origin,
            StationKind::DeliveryExit {
                owed_dirty_plates: 0,
            },
        )
    }

    pub fn trash(origin: Vec2) -> Self {
        Self::new(origin, StationKind::Trash)
    }

    pub fn cutting_board(origin: Vec2, slot: WorkSlot) -> Self {
        Self::new(origin, StationKind::CuttingBoard(slot))
    }

    pub fn wash_basin(origin: Vec2, slot: WorkSlot) -> Self {
        Self::new(origin, StationKind::WashBasin(slot))
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Tile center; used for targeting and collision.
    pub fn position(&self) -> Vec2 {
        self.origin.offset(TILE_HALF, TILE_HALF)
    }

    pub fn kind(&self) -> &StationKind {
        &self.kind
    }

    pub fn station_type(&self) -> StationType {
        self.kind.station_type()
    }

    pub fn contents(&self) -> Option<&Item> {
        match &self.kind {
            StationKind::Counter { contents } => contents.as_ref(),
            StationKind::CuttingBoard(slot) | StationKind::WashBasin(slot) => {
                slot.contents.as_ref()
            }
            _ => None,
        }
    }

    pub fn progress(&self) -> f32 {
        match &self.kind {
            StationKind::CuttingBoard(slot) | StationKind::WashBasin(slot) => slot.progress(),
            _ => 0.0,
        }
    }

    pub fn owed_dirty_plates(&self) -> u32 {
        match self.kind {
            StationKind::DeliveryExit { owed_dirty_plates } => owed_dirty_plates,
            _ => 0,
        }
    }

    pub fn pick_up(&mut self) -> Option<Item> {
        match &mut self.kind {
            StationKind::Wall | StationKind::Trash => None,
            StationKind::TomatoTap => Some(Item::RawTomato),
            StationKind::LettuceTap => Some(Item::RawLettuce),
            StationKind::Counter { contents } => contents.take(),
            StationKind::CuttingBoard(slot) | StationKind::WashBasin(slot) => slot.take(),
            StationKind::DeliveryExit { owed_dirty_plates } => {
                if *owed_dirty_plates == 0 {
                    return None;
                }
                *owed_dirty_plates -= 1;
                Some(Item::DirtyPlate)
            }
        }
    }

    /// Offers `item` to the station. `Err` hands the item back to the caller.
    pub fn drop_item(&mut self, item: Item, orders: &mut OrderLedger) -> Result<(), Item> {
        let station = self.station_type().name();
        let item_name = item.name();
        let outcome = match &mut self.kind {
            StationKind::Wall | StationKind::TomatoTap | StationKind::LettuceTap => Err(item),
            StationKind::Counter { contents } => match contents.as_mut() {
                Some(held) => held.combine(item),
                None => {
                    *contents = Some(item);
                    Ok(())
                }
            },
            StationKind::Trash => trash_item(item),
            StationKind::CuttingBoard(slot) => slot.accept(item, Item::can_cut),
            StationKind::WashBasin(slot) => slot.accept(item, Item::can_wash),
            StationKind::DeliveryExit { owed_dirty_plates } => {
                deliver(item, orders, owed_dirty_plates)
            }
        };
        debug!(
            station,
            item = item_name,
            accepted = outcome.is_ok(),
            "station_drop"
        );
        outcome
    }

    pub fn work(&mut self) {
        let station = self.station_type().name();
        match &mut self.kind {
            StationKind::CuttingBoard(slot) => {
                if let Some(product) = slot.advance(Item::can_cut, Item::complete_cut) {
                    debug!(station, product, "cut_complete");
                }
            }
            StationKind::WashBasin(slot) => {
                if let Some(product) = slot.advance(Item::can_wash, Item::complete_wash) {
                    debug!(station, product, "wash_complete");
                }
            }
            _ => {}
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.draw_sprite(self.station_type().sprite(), self.origin);
        match &self.kind {
            StationKind::Counter {
                contents: Some(item),
            } => item.draw(surface, self.origin),
            StationKind::CuttingBoard(slot) => slot.draw(surface, self.origin, ProgressTint::Green),
            StationKind::WashBasin(slot) => slot.draw(surface, self.origin, ProgressTint::Blue),
            StationKind::DeliveryExit { owed_dirty_plates } if *owed_dirty_plates > 0 => {
                Item::DirtyPlate.draw(surface, self.origin.offset(TILE_HALF, TILE_HALF));
            }
            _ => {}
        }
    }
}

fn trash_item(item: Item) -> Result<(), Item> {
    match item {
        Item::CleanPlate(mut plate) => {
            plate.clear();
            Err(Item::CleanPlate(plate))
        }
        Item::DirtyPlate => Err(Item::DirtyPlate),
        _ => Ok(()),
    }
}

fn deliver(item: Item, orders: &mut OrderLedger, owed_dirty_plates: &mut u32) -> Result<(), Item> {
    let fulfilled = match &item {
        Item::CleanPlate(plate) => orders.fulfill(plate),
        _ => return Err(item),
    };
    match fulfilled {
        Some(order) => {
            *owed_dirty_plates += 1;
            info!(
                ingredients = ?order.sorted_names(),
                pending = orders.pending().len(),
                owed_dirty_plates = *owed_dirty_plates,
                "order_delivered"
            );
            Ok(())
        }
        None => {
            let contents = item.as_plate().map(|plate| plate.sorted_names());
            info!(contents = ?contents, "delivery_rejected");
            Err(item)
        }
    }
}
