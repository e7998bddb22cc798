use engine::{DrawSurface, InputSnapshot, PlayerInput};

use super::interaction::{nearest_station, INTERACTION_RADIUS};
use super::movement::{normalize_direction, resolve_step};
use super::orders::OrderLedger;
use super::player::Player;
use super::station::Station;

/// All mutable simulation state. One `tick` advances every player, then the orders.
#[derive(Debug)]
pub struct KitchenWorld {
    tick: u64,
    stations: Vec<Station>,
    players: Vec<Player>,
    orders: OrderLedger,
}

impl KitchenWorld {
    pub fn new(stations: Vec<Station>, players: Vec<Player>, orders: OrderLedger) -> Self {
        Self {
            tick: 0,
            stations,
            players,
            orders,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn orders(&self) -> &OrderLedger {
        &self.orders
    }

    pub fn tick(&mut self, input: &InputSnapshot) {
        for index in 0..self.players.len() {
            let player_input = input.player(self.players[index].input_slot());
            self.step_player(index, player_input);
        }
        self.orders.maybe_replenish();
        self.tick += 1;
    }

    fn step_player(&mut self, index: usize, input: PlayerInput) {
        let direction = normalize_direction(input.move_horizontal, input.move_vertical);
        let current = self.players[index].position();
        let others = self
            .players
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, player)| player.position());
        let next = resolve_step(current, direction, &self.stations, others);

        let player = &mut self.players[index];
        if input.has_movement() {
            player.set_working(false);
        }
        player.set_position(next);

        if input.interact {
            if let Some(target) = nearest_station(&self.stations, player.center(), INTERACTION_RADIUS) {
                player.interact(&mut self.stations[target], &mut self.orders);
            }
        }
        if input.start_working {
            player.set_working(true);
        }
        if player.is_working() {
            if let Some(target) = nearest_station(&self.stations, player.center(), INTERACTION_RADIUS) {
                self.stations[target].work();
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for station in &self.stations {
            station.draw(surface);
        }
        for player in &self.players {
            player.draw(surface);
        }
        self.orders.draw(surface);
    }
}
