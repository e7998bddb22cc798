use engine::{DrawSurface, SpriteKey, Vec2};

use super::item::Item;
use super::movement::PLAYER_HALF;
use super::orders::OrderLedger;
use super::station::Station;

const PLAYER_SPRITES: [SpriteKey; 3] = [
    SpriteKey::from_static("players/chef_red"),
    SpriteKey::from_static("players/chef_blue"),
    SpriteKey::from_static("players/chef_green"),
];

#[derive(Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    holding: Option<Item>,
    working: bool,
    input_slot: usize,
}

impl Player {
    pub fn new(position: Vec2, input_slot: usize) -> Self {
        Self {
            position,
            holding: None,
            working: false,
            input_slot,
        }
    }

    /// Top-left corner of the 16x16 body.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn center(&self) -> Vec2 {
        self.position.offset(PLAYER_HALF, PLAYER_HALF)
    }

    pub fn holding(&self) -> Option<&Item> {
        self.holding.as_ref()
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    pub fn input_slot(&self) -> usize {
        self.input_slot
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn set_working(&mut self, working: bool) {
        self.working = working;
    }

    /// Empty hands pick up; full hands offer the item, keeping it on rejection.
    pub fn interact(&mut self, station: &mut Station, orders: &mut OrderLedger) {
        match self.holding.take() {
            None => self.holding = station.pick_up(),
            Some(item) => {
                if let Err(rejected) = station.drop_item(item, orders) {
                    self.holding = Some(rejected);
                }
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        let sprite = PLAYER_SPRITES[self.input_slot % PLAYER_SPRITES.len()];
        surface.draw_sprite(sprite, self.position);
        if let Some(item) = &self.holding {
            item.draw(surface, self.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::DrawLog;

    use super::*;

    #[test]
    fn empty_hand_picks_up_from_tap() {
        let mut player = Player::new(Vec2::ZERO, 0);
        let mut tap = Station::tomato_tap(Vec2::ZERO);
        let mut orders = OrderLedger::new(Vec::new(), 0);

        player.interact(&mut tap, &mut orders);

        assert_eq!(player.holding(), Some(&Item::RawTomato));
    }

    #[test]
    fn rejected_drop_keeps_item_in_hand() {
        let mut player = Player::new(Vec2::ZERO, 0);
        let mut wall = Station::wall(Vec2::ZERO);
        let mut tap = Station::lettuce_tap(Vec2::ZERO);
        let mut orders = OrderLedger::new(Vec::new(), 0);
        player.interact(&mut tap, &mut orders);

        player.interact(&mut wall, &mut orders);

        assert_eq!(player.holding(), Some(&Item::RawLettuce));
    }

    #[test]
    fn accepted_drop_empties_hand() {
        let mut player = Player::new(Vec2::ZERO, 0);
        let mut tap = Station::lettuce_tap(Vec2::ZERO);
        let mut counter = Station::counter(Vec2::ZERO, None);
        let mut orders = OrderLedger::new(Vec::new(), 0);
        player.interact(&mut tap, &mut orders);

        player.interact(&mut counter, &mut orders);

        assert!(player.holding().is_none());
        assert_eq!(counter.contents(), Some(&Item::RawLettuce));
    }

    #[test]
    fn center_is_offset_by_half_body() {
        let player = Player::new(Vec2::new(100.0, 150.0), 1);
        assert_eq!(player.center(), Vec2::new(108.0, 158.0));
    }

    #[test]
    fn draws_body_then_held_item() {
        let mut player = Player::new(Vec2::new(5.0, 6.0), 4);
        let mut tap = Station::tomato_tap(Vec2::ZERO);
        let mut orders = OrderLedger::new(Vec::new(), 0);
        player.interact(&mut tap, &mut orders);
        let mut log = DrawLog::default();

        player.draw(&mut log);

        let sprites = log.sprites().collect::<Vec<_>>();
        assert_eq!(
            sprites,
            vec![
                (SpriteKey::from_static("players/chef_blue"), Vec2::new(5.0, 6.0)),
                (SpriteKey::from_static("items/raw_tomato"), Vec2::new(5.0, 6.0)),
            ]
        );
    }
}
