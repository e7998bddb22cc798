use engine::Vec2;

use super::station::{Station, TILE_HALF};

/// Units per tick: 100 units per second at 60 TPS.
pub const PLAYER_SPEED: f32 = 100.0 / 60.0;
pub const PLAYER_HALF: f32 = 8.0;
const BODY_CLEARANCE: f32 = 16.0;

/// L1-normalized direction; zero (or non-finite) input yields zero.
pub fn normalize_direction(horizontal: f32, vertical: f32) -> Vec2 {
    let total = horizontal.abs() + vertical.abs();
    if total == 0.0 || !total.is_finite() {
        return Vec2::ZERO;
    }
    Vec2::new(horizontal / total, vertical / total)
}

/// Moves a player (top-left `position`) one tick along `direction`.
///
/// Returns the tentative position unless it overlaps a station footprint or another
/// player, in which case the step is reverted as a whole.
pub fn resolve_step(
    position: Vec2,
    direction: Vec2,
    stations: &[Station],
    other_players: impl IntoIterator<Item = Vec2>,
) -> Vec2 {
    if direction == Vec2::ZERO {
        return position;
    }
    let tentative = position.offset(direction.x * PLAYER_SPEED, direction.y * PLAYER_SPEED);
    if blocked_by_station(tentative, stations) || blocked_by_player(tentative, other_players) {
        return position;
    }
    tentative
}

fn blocked_by_station(top_left: Vec2, stations: &[Station]) -> bool {
    let center = top_left.offset(PLAYER_HALF, PLAYER_HALF);
    let broad_phase = TILE_HALF + (2.0 * TILE_HALF * TILE_HALF).sqrt();
    stations.iter().any(|station| {
        let tile = station.position();
        let distance = center.distance(tile);
        if distance > broad_phase {
            return false;
        }
        distance < BODY_CLEARANCE
            || (top_left.x >= tile.x - TILE_HALF
                && top_left.x < tile.x + TILE_HALF
                && top_left.y >= tile.y - TILE_HALF
                && top_left.y < tile.y + TILE_HALF)
    })
}

fn blocked_by_player(top_left: Vec2, other_players: impl IntoIterator<Item = Vec2>) -> bool {
    other_players
        .into_iter()
        .any(|other| top_left.distance(other) < BODY_CLEARANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOBODY: [Vec2; 0] = [];

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn normalization_uses_component_sum() {
        assert!(approx(normalize_direction(1.0, 1.0), Vec2::new(0.5, 0.5)));
        assert!(approx(normalize_direction(-0.5, 0.0), Vec2::new(-1.0, 0.0)));
        assert!(approx(normalize_direction(0.3, -0.1), Vec2::new(0.75, -0.25)));
        assert_eq!(normalize_direction(0.0, 0.0), Vec2::ZERO);
        assert_eq!(normalize_direction(f32::NAN, 1.0), Vec2::ZERO);
    }

    #[test]
    fn open_floor_moves_full_speed() {
        let next = resolve_step(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), &[], NOBODY);
        assert!(approx(next, Vec2::new(100.0 + PLAYER_SPEED, 100.0)));
    }

    #[test]
    fn zero_direction_stays_put() {
        let start = Vec2::new(10.0, 10.0);
        let stations = [Station::wall(Vec2::new(10.0, 10.0))];
        assert_eq!(resolve_step(start, Vec2::ZERO, &stations, NOBODY), start);
    }

    #[test]
    fn station_footprint_reverts_step_once() {
        let stations = [Station::wall(Vec2::new(10.0, 26.0))];
        // Player center starts 16.5 below the tile center; moving up would close to ~14.8.
        let start = Vec2::new(10.0, 42.5);
        let next = resolve_step(start, Vec2::new(0.0, -1.0), &stations, NOBODY);
        assert_eq!(next, start);
    }

    #[test]
    fn top_left_inside_tile_square_blocks_beyond_body_clearance() {
        let stations = [Station::wall(Vec2::ZERO)];
        // Lands at (15, 8.33): center distance ~17.2, but the top-left corner is on the tile.
        let start = Vec2::new(15.0, 10.0);
        let next = resolve_step(start, Vec2::new(0.0, -1.0), &stations, NOBODY);
        assert_eq!(next, start);

        // One unit to the right the corner clears the tile and the center is still > 16 away.
        let beside = Vec2::new(16.0, 10.0);
        let moved = resolve_step(beside, Vec2::new(0.0, -1.0), &stations, NOBODY);
        assert!(approx(moved, Vec2::new(16.0, 10.0 - PLAYER_SPEED)));
    }

    #[test]
    fn distant_station_does_not_block() {
        let stations = [Station::wall(Vec2::new(200.0, 200.0))];
        let start = Vec2::new(10.0, 10.0);
        let next = resolve_step(start, Vec2::new(0.0, 1.0), &stations, NOBODY);
        assert!(approx(next, Vec2::new(10.0, 10.0 + PLAYER_SPEED)));
    }

    #[test]
    fn other_player_within_body_width_blocks() {
        let start = Vec2::new(100.0, 100.0);
        let next = resolve_step(start, Vec2::new(1.0, 0.0), &[], [Vec2::new(116.0, 100.0)]);
        assert_eq!(next, start);

        let clear = resolve_step(start, Vec2::new(-1.0, 0.0), &[], [Vec2::new(116.0, 100.0)]);
        assert!(approx(clear, Vec2::new(100.0 - PLAYER_SPEED, 100.0)));
    }
}
