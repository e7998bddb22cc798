use engine::Vec2;

use super::station::Station;

/// Reach of interact/work intents, measured from the player center.
pub const INTERACTION_RADIUS: f32 = 20.0;

/// Index of the station whose center is nearest `query` and strictly inside `max_radius`.
/// Equal distances resolve to the earlier station.
pub fn nearest_station(stations: &[Station], query: Vec2, max_radius: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, station) in stations.iter().enumerate() {
        let distance = query.distance(station.position());
        let limit = best.map_or(max_radius, |(_, closest)| closest);
        if distance < limit {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walls(origins: &[(f32, f32)]) -> Vec<Station> {
        origins
            .iter()
            .map(|&(x, y)| Station::wall(Vec2::new(x, y)))
            .collect()
    }

    #[test]
    fn picks_closest_station_in_range() {
        let stations = walls(&[(10.0, 10.0), (26.0, 10.0), (42.0, 10.0)]);
        assert_eq!(
            nearest_station(&stations, Vec2::new(33.0, 20.0), INTERACTION_RADIUS),
            Some(1)
        );
    }

    #[test]
    fn radius_is_exclusive() {
        let stations = walls(&[(0.0, 0.0)]);
        let center = stations[0].position();

        assert_eq!(
            nearest_station(&stations, center.offset(20.0, 0.0), INTERACTION_RADIUS),
            None
        );
        assert_eq!(
            nearest_station(&stations, center.offset(19.9, 0.0), INTERACTION_RADIUS),
            Some(0)
        );
    }

    #[test]
    fn ties_go_to_declaration_order() {
        let stations = walls(&[(0.0, 0.0), (16.0, 0.0)]);
        assert_eq!(
            nearest_station(&stations, Vec2::new(16.0, 8.0), INTERACTION_RADIUS),
            Some(0)
        );
    }

    #[test]
    fn empty_roster_has_no_target() {
        assert_eq!(nearest_station(&[], Vec2::ZERO, INTERACTION_RADIUS), None);
    }
}
