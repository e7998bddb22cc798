use std::collections::HashMap;

use engine::{DrawSurface, SpriteKey, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PLATE_CAPACITY: usize = 3;
const PLATE_CELL_SIZE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    RawTomato,
    ChoppedTomato,
    RawLettuce,
    ChoppedLettuce,
    DirtyPlate,
    CleanPlate,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::RawTomato,
        ItemKind::ChoppedTomato,
        ItemKind::RawLettuce,
        ItemKind::ChoppedLettuce,
        ItemKind::DirtyPlate,
        ItemKind::CleanPlate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::RawTomato => "raw_tomato",
            Self::ChoppedTomato => "chopped_tomato",
            Self::RawLettuce => "raw_lettuce",
            Self::ChoppedLettuce => "chopped_lettuce",
            Self::DirtyPlate => "dirty_plate",
            Self::CleanPlate => "clean_plate",
        }
    }

    pub fn is_combinable(self) -> bool {
        matches!(self, Self::ChoppedTomato | Self::ChoppedLettuce)
    }

    pub(crate) fn sprite(self) -> SpriteKey {
        match self {
            Self::RawTomato => SpriteKey::from_static("items/raw_tomato"),
            Self::ChoppedTomato => SpriteKey::from_static("items/chopped_tomato"),
            Self::RawLettuce => SpriteKey::from_static("items/raw_lettuce"),
            Self::ChoppedLettuce => SpriteKey::from_static("items/chopped_lettuce"),
            Self::DirtyPlate => SpriteKey::from_static("items/dirty_plate"),
            Self::CleanPlate => SpriteKey::from_static("items/clean_plate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("'{name}' cannot be combined onto a plate")]
    NotCombinable { name: &'static str },
    #[error("plate already holds '{name}'")]
    DuplicateIngredient { name: &'static str },
    #[error("plate is full ({capacity} items)")]
    PlateFull { capacity: usize },
}

/// Food or dishware. Moved between holders, never copied.
#[derive(Debug, PartialEq)]
pub enum Item {
    RawTomato,
    ChoppedTomato,
    RawLettuce,
    ChoppedLettuce,
    DirtyPlate,
    CleanPlate(Plate),
}

impl Item {
    /// A fresh item of `kind`; clean plates start empty.
    pub fn new(kind: ItemKind) -> Self {
        match kind {
            ItemKind::RawTomato => Self::RawTomato,
            ItemKind::ChoppedTomato => Self::ChoppedTomato,
            ItemKind::RawLettuce => Self::RawLettuce,
            ItemKind::ChoppedLettuce => Self::ChoppedLettuce,
            ItemKind::DirtyPlate => Self::DirtyPlate,
            ItemKind::CleanPlate => Self::CleanPlate(Plate::default()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::RawTomato => ItemKind::RawTomato,
            Self::ChoppedTomato => ItemKind::ChoppedTomato,
            Self::RawLettuce => ItemKind::RawLettuce,
            Self::ChoppedLettuce => ItemKind::ChoppedLettuce,
            Self::DirtyPlate => ItemKind::DirtyPlate,
            Self::CleanPlate(_) => ItemKind::CleanPlate,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn can_combine(&self) -> bool {
        self.kind().is_combinable()
    }

    /// Puts `other` onto this item. Only clean plates accept anything; a rejected
    /// item is handed back unchanged.
    pub fn combine(&mut self, other: Item) -> Result<(), Item> {
        match self {
            Self::CleanPlate(plate) => plate.combine(other),
            _ => Err(other),
        }
    }

    pub fn can_cut(&self) -> bool {
        matches!(self, Self::RawTomato | Self::RawLettuce)
    }

    pub fn complete_cut(&self) -> Option<Item> {
        match self {
            Self::RawTomato => Some(Self::ChoppedTomato),
            Self::RawLettuce => Some(Self::ChoppedLettuce),
            _ => None,
        }
    }

    pub fn can_wash(&self) -> bool {
        matches!(self, Self::DirtyPlate)
    }

    pub fn complete_wash(&self) -> Option<Item> {
        match self {
            Self::DirtyPlate => Some(Self::CleanPlate(Plate::default())),
            _ => None,
        }
    }

    pub fn as_plate(&self) -> Option<&Plate> {
        match self {
            Self::CleanPlate(plate) => Some(plate),
            _ => None,
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, anchor: Vec2) {
        surface.draw_sprite(self.kind().sprite(), anchor);
        if let Self::CleanPlate(plate) = self {
            plate.draw_contents(surface, anchor);
        }
    }
}

/// Contents of a clean plate, keyed by ingredient name.
#[derive(Debug, Default, PartialEq)]
pub struct Plate {
    contents: HashMap<&'static str, Item>,
}

impl Plate {
    /// Builds a pre-seeded plate. Any item that would be refused is a setup fault.
    pub fn with_contents(items: Vec<Item>) -> Result<Self, ItemError> {
        let mut plate = Self::default();
        for item in items {
            plate.admission(&item)?;
            plate.contents.insert(item.name(), item);
        }
        Ok(plate)
    }

    pub fn combine(&mut self, other: Item) -> Result<(), Item> {
        if self.admission(&other).is_err() {
            return Err(other);
        }
        self.contents.insert(other.name(), other);
        Ok(())
    }

    fn admission(&self, item: &Item) -> Result<(), ItemError> {
        if !item.can_combine() {
            return Err(ItemError::NotCombinable { name: item.name() });
        }
        if self.contents.len() >= PLATE_CAPACITY {
            return Err(ItemError::PlateFull {
                capacity: PLATE_CAPACITY,
            });
        }
        if self.contents.contains_key(item.name()) {
            return Err(ItemError::DuplicateIngredient { name: item.name() });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Drops everything on the plate.
    pub fn clear(&mut self) {
        self.contents.clear();
    }

    pub fn sorted_contents(&self) -> Vec<&Item> {
        let mut items = self.contents.values().collect::<Vec<_>>();
        items.sort_by_key(|item| item.name());
        items
    }

    pub fn sorted_names(&self) -> Vec<&'static str> {
        let mut names = self.contents.keys().copied().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    fn draw_contents(&self, surface: &mut dyn DrawSurface, anchor: Vec2) {
        let mut column = 1;
        let mut row = 0;
        for item in self.sorted_contents() {
            item.draw(
                surface,
                anchor.offset(column as f32 * PLATE_CELL_SIZE, row as f32 * PLATE_CELL_SIZE),
            );
            column += 1;
            if column > 1 {
                column = 0;
                row = 1;
            }
        }
    }
}
