use engine::{DrawSurface, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::item::{ItemKind, Plate};

pub const MAX_PENDING_ORDERS: usize = 5;
/// One spawn roll in this many succeeds: about one order per 10 s at 60 TPS.
pub const ORDER_SPAWN_ONE_IN_TICKS: u32 = 600;

const ORDER_TEXT_BOTTOM_MARGIN: f32 = 20.0;
const ORDER_TEXT_ORDER_SPACING: f32 = 40.0;
const ORDER_TEXT_LINE_SPACING: f32 = 10.0;

/// A recipe: the finished ingredients a delivered plate must hold, in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    ingredients: Vec<ItemKind>,
}

impl Order {
    pub fn new(ingredients: Vec<ItemKind>) -> Self {
        Self { ingredients }
    }

    pub fn sorted_names(&self) -> Vec<&'static str> {
        let mut names = self
            .ingredients
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Exact multiset match against name-sorted plate contents.
    pub fn matches(&self, sorted_plate_names: &[&str]) -> bool {
        self.ingredients.len() == sorted_plate_names.len()
            && self
                .sorted_names()
                .iter()
                .zip(sorted_plate_names)
                .all(|(required, held)| required == held)
    }
}

#[derive(Debug, Clone)]
pub struct OrderLedger {
    pending: Vec<Order>,
    catalog: Vec<Order>,
    max_pending: usize,
    spawn_one_in_ticks: u32,
    rng: ChaCha8Rng,
    spawned_total: u64,
    delivered_total: u64,
}

impl OrderLedger {
    pub fn new(catalog: Vec<Order>, seed: u64) -> Self {
        Self {
            pending: Vec::new(),
            catalog,
            max_pending: MAX_PENDING_ORDERS,
            spawn_one_in_ticks: ORDER_SPAWN_ONE_IN_TICKS,
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawned_total: 0,
            delivered_total: 0,
        }
    }

    pub fn with_limits(mut self, max_pending: usize, spawn_one_in_ticks: u32) -> Self {
        self.max_pending = max_pending;
        self.spawn_one_in_ticks = spawn_one_in_ticks.max(1);
        self
    }

    pub fn with_pending(mut self, orders: Vec<Order>) -> Self {
        self.pending = orders;
        self
    }

    pub fn pending(&self) -> &[Order] {
        &self.pending
    }

    pub fn catalog(&self) -> &[Order] {
        &self.catalog
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn delivered_total(&self) -> u64 {
        self.delivered_total
    }

    /// Rolls for a new order once; returns it when one was appended.
    pub fn maybe_replenish(&mut self) -> Option<&Order> {
        if self.pending.len() >= self.max_pending || self.catalog.is_empty() {
            return None;
        }
        if self.rng.gen_range(0..self.spawn_one_in_ticks) != 0 {
            return None;
        }
        let index = self.rng.gen_range(0..self.catalog.len());
        self.pending.push(self.catalog[index].clone());
        self.spawned_total += 1;
        let order = self.pending.last()?;
        info!(
            ingredients = ?order.sorted_names(),
            pending = self.pending.len(),
            "order_spawned"
        );
        Some(order)
    }

    /// Removes and returns the earliest pending order the plate satisfies.
    pub fn fulfill(&mut self, plate: &Plate) -> Option<Order> {
        let names = plate.sorted_names();
        let index = self
            .pending
            .iter()
            .position(|order| order.matches(&names))?;
        self.delivered_total += 1;
        Some(self.pending.remove(index))
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        let (_, height) = surface.size();
        let bottom = height as f32 - ORDER_TEXT_BOTTOM_MARGIN;
        for (order_index, order) in self.pending.iter().enumerate() {
            for (line_index, kind) in order.ingredients.iter().enumerate() {
                let y = bottom
                    - order_index as f32 * ORDER_TEXT_ORDER_SPACING
                    - line_index as f32 * ORDER_TEXT_LINE_SPACING;
                surface.draw_text(kind.name(), Vec2::new(0.0, y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::{DrawCommand, DrawLog};

    use super::*;
    use crate::app::kitchen::item::Item;

    fn salad() -> Order {
        Order::new(vec![ItemKind::ChoppedLettuce, ItemKind::ChoppedTomato])
    }

    fn lettuce_only() -> Order {
        Order::new(vec![ItemKind::ChoppedLettuce])
    }

    fn plate_of(items: Vec<Item>) -> Plate {
        Plate::with_contents(items).expect("valid plate")
    }

    #[test]
    fn matching_ignores_listing_order() {
        let plate = plate_of(vec![Item::ChoppedTomato, Item::ChoppedLettuce]);
        let names = plate.sorted_names();

        assert!(salad().matches(&names));
        assert!(Order::new(vec![ItemKind::ChoppedTomato, ItemKind::ChoppedLettuce]).matches(&names));
        assert!(!lettuce_only().matches(&names));
        assert!(
            !Order::new(vec![ItemKind::ChoppedLettuce, ItemKind::ChoppedLettuce]).matches(&names)
        );
    }

    #[test]
    fn empty_plate_matches_only_empty_order() {
        let plate = Plate::default();
        assert!(Order::new(Vec::new()).matches(&plate.sorted_names()));
        assert!(!lettuce_only().matches(&plate.sorted_names()));
    }

    #[test]
    fn fulfill_removes_earliest_matching_order() {
        let mut ledger = OrderLedger::new(vec![lettuce_only()], 1).with_pending(vec![
            salad(),
            lettuce_only(),
            salad(),
        ]);
        let plate = plate_of(vec![Item::ChoppedLettuce, Item::ChoppedTomato]);

        let fulfilled = ledger.fulfill(&plate).expect("match");

        assert_eq!(fulfilled, salad());
        assert_eq!(ledger.pending(), &[lettuce_only(), salad()]);
        assert_eq!(ledger.delivered_total(), 1);
    }

    #[test]
    fn fulfill_without_match_leaves_ledger_unchanged() {
        let mut ledger = OrderLedger::new(vec![lettuce_only()], 1).with_pending(vec![salad()]);
        let plate = plate_of(vec![Item::ChoppedTomato]);

        assert!(ledger.fulfill(&plate).is_none());
        assert_eq!(ledger.pending(), &[salad()]);
        assert_eq!(ledger.delivered_total(), 0);
    }

    #[test]
    fn replenish_never_exceeds_capacity() {
        let mut ledger = OrderLedger::new(vec![lettuce_only(), salad()], 7).with_limits(5, 1);

        for _ in 0..20 {
            ledger.maybe_replenish();
        }

        assert_eq!(ledger.pending().len(), 5);
        assert_eq!(ledger.spawned_total(), 5);
    }

    #[test]
    fn replenish_draws_only_catalog_orders() {
        let catalog = vec![lettuce_only(), salad()];
        let mut ledger = OrderLedger::new(catalog.clone(), 99).with_limits(5, 1);

        while ledger.maybe_replenish().is_some() {}

        assert!(ledger.pending().iter().all(|order| catalog.contains(order)));
    }

    #[test]
    fn replenish_rate_is_roughly_one_in_six_hundred() {
        let mut ledger = OrderLedger::new(vec![lettuce_only()], 42).with_limits(usize::MAX, 600);

        for _ in 0..600_000 {
            ledger.maybe_replenish();
        }

        let spawned = ledger.spawned_total();
        assert!((800..=1200).contains(&spawned), "spawned={spawned}");
    }

    #[test]
    fn same_seed_spawns_same_sequence() {
        let catalog = vec![lettuce_only(), salad()];
        let mut a = OrderLedger::new(catalog.clone(), 5).with_limits(5, 3);
        let mut b = OrderLedger::new(catalog, 5).with_limits(5, 3);

        for _ in 0..200 {
            a.maybe_replenish();
            b.maybe_replenish();
        }

        assert_eq!(a.pending(), b.pending());
    }

    #[test]
    fn empty_catalog_never_spawns() {
        let mut ledger = OrderLedger::new(Vec::new(), 3).with_limits(5, 1);
        assert!(ledger.maybe_replenish().is_none());
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn pending_orders_draw_bottom_up() {
        let ledger = OrderLedger::new(Vec::new(), 0).with_pending(vec![salad(), lettuce_only()]);
        let mut log = DrawLog::new(640, 480);
        ledger.draw(&mut log);

        assert_eq!(
            log.commands(),
            &[
                DrawCommand::Text {
                    text: "chopped_lettuce".to_string(),
                    anchor: Vec2::new(0.0, 460.0),
                },
                DrawCommand::Text {
                    text: "chopped_tomato".to_string(),
                    anchor: Vec2::new(0.0, 450.0),
                },
                DrawCommand::Text {
                    text: "chopped_lettuce".to_string(),
                    anchor: Vec2::new(0.0, 420.0),
                },
            ]
        );
    }
}
