use crate::aircraft::{classify_all, AircraftState, Category, ConflictRecord};
use crate::geodesy::distance_3d;

use super::thresholds::ThresholdTable;

/// Clears alert levels and conflict lists so the snapshot can go through a
/// new detection pass.
pub fn reset(snapshot: &mut [AircraftState]) {
    for state in snapshot.iter_mut() {
        state.reset();
    }
}

/// Evaluates every unordered pair of positioned, distinct aircraft and
/// records conflicts on both sides.
///
/// Expects a classified snapshot with empty conflict lists. Running it twice
/// without [`reset`] duplicates the conflict records. Pairs sharing one
/// `icao24` are skipped.
pub fn detect_conflicts(snapshot: &mut [AircraftState], thresholds: &ThresholdTable) {
    let positions: Vec<_> = snapshot.iter().map(AircraftState::position).collect();
    let mut conflict_count = 0usize;

    for i in 0..snapshot.len() {
        let Some(p1) = positions[i] else { continue };

        for j in (i + 1)..snapshot.len() {
            let Some(p2) = positions[j] else { continue };
            if snapshot[i].icao24 == snapshot[j].icao24 {
                continue;
            }

            let distance = distance_3d(&p1, &p2);
            let category = Category::of(snapshot[i].status, snapshot[j].status);
            let Some(alert) = thresholds.bands(category).severity(distance) else {
                continue;
            };
            let distance_m = distance.round() as u32;

            let (head, tail) = snapshot.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);

            a.conflicts.push(ConflictRecord {
                icao24: b.icao24.clone(),
                callsign: b.callsign.clone(),
                distance_m,
                alert,
                category,
            });
            b.conflicts.push(ConflictRecord {
                icao24: a.icao24.clone(),
                callsign: a.callsign.clone(),
                distance_m,
                alert,
                category,
            });
            a.raise_alert(alert);
            b.raise_alert(alert);
            conflict_count += 1;
        }
    }

    log::debug!(
        "detection pass over {} aircraft found {} conflicting pairs",
        snapshot.len(),
        conflict_count
    );
}

/// Full assessment of a snapshot: reset, classify, detect.
pub fn assess(snapshot: &mut [AircraftState], thresholds: &ThresholdTable) {
    reset(snapshot);
    classify_all(snapshot);
    detect_conflicts(snapshot, thresholds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::{AlertLevel, Status};

    // meters per degree of latitude near 47.45N on the WGS-84 ellipsoid,
    // close enough for offsetting test aircraft by a few hundred meters
    const M_PER_DEG_LAT: f64 = 111_180.0;

    const LAT: f64 = 47.45;
    const LON: f64 = -122.31;

    fn aircraft(id: &str, north_m: f64, altitude_m: f64, status: Status) -> AircraftState {
        let mut ac = AircraftState::new(id, id.to_uppercase())
            .with_position(LAT + north_m / M_PER_DEG_LAT, LON, Some(altitude_m));
        ac.status = status;
        ac
    }

    fn max_level(ac: &AircraftState) -> AlertLevel {
        ac.conflicts
            .iter()
            .map(|c| c.alert)
            .max()
            .unwrap_or(AlertLevel::None)
    }

    #[test]
    fn airborne_pair_inside_high_bound_alarms() {
        // vertical separation only: exactly 150 m
        let mut snapshot = vec![
            aircraft("a", 0.0, 1000.0, Status::Airborne),
            aircraft("b", 0.0, 1150.0, Status::Airborne),
        ];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());

        for ac in &snapshot {
            assert_eq!(ac.alert_level, AlertLevel::Alarm);
            assert_eq!(ac.conflicts.len(), 1);
            assert_eq!(ac.conflicts[0].category, Category::AirAir);
            assert_eq!(ac.conflicts[0].distance_m, 150);
        }
        assert_eq!(snapshot[0].conflicts[0].icao24, "b");
        assert_eq!(snapshot[1].conflicts[0].icao24, "a");
    }

    #[test]
    fn ground_and_airborne_pair_between_high_and_medium_alerts() {
        let mut ground = AircraftState::new("g", "G").with_position(LAT, LON, Some(10.0));
        ground.status = Status::Ground;
        // same horizontal position, 120 m higher
        let mut air = AircraftState::new("h", "H").with_position(LAT, LON, Some(130.0));
        air.status = Status::Airborne;

        let mut snapshot = vec![ground, air];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());

        for ac in &snapshot {
            assert_eq!(ac.alert_level, AlertLevel::Alert);
            assert_eq!(ac.conflicts.len(), 1);
            assert_eq!(ac.conflicts[0].category, Category::AirGround);
            assert_eq!(ac.conflicts[0].distance_m, 120);
        }
    }

    #[test]
    fn ground_pair_outside_low_bound_is_ignored() {
        let mut snapshot = vec![
            aircraft("a", 0.0, 0.0, Status::Ground),
            aircraft("b", 20.0, 0.0, Status::Ground),
        ];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());

        for ac in &snapshot {
            assert_eq!(ac.alert_level, AlertLevel::None);
            assert!(ac.conflicts.is_empty());
        }
    }

    #[test]
    fn unknown_position_is_excluded() {
        let mut lost = AircraftState::new("x", "X");
        lost.longitude = Some(LON);
        let mut snapshot = vec![
            lost,
            aircraft("a", 0.0, 0.0, Status::Ground),
            aircraft("b", 0.0, 0.0, Status::Ground),
        ];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());

        assert!(snapshot[0].conflicts.is_empty());
        assert_eq!(snapshot[0].alert_level, AlertLevel::None);
        assert_eq!(snapshot[1].conflicts.len(), 1);
        assert_eq!(snapshot[2].conflicts.len(), 1);
    }

    #[test]
    fn duplicate_identity_never_conflicts() {
        let mut snapshot = vec![
            aircraft("dup", 0.0, 500.0, Status::Airborne),
            aircraft("dup", 0.0, 500.0, Status::Airborne),
        ];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());
        assert!(snapshot.iter().all(|ac| ac.conflicts.is_empty()));
    }

    #[test]
    fn categories_are_per_pair() {
        // "a" is airborne with a close airborne peer and a close ground peer
        let mut snapshot = vec![
            aircraft("a", 0.0, 150.0, Status::Airborne),
            aircraft("b", 0.0, 300.0, Status::Airborne),
            aircraft("c", 0.0, 0.0, Status::Ground),
        ];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());

        let categories: Vec<_> = snapshot[0].conflicts.iter().map(|c| (c.icao24.as_str(), c.category)).collect();
        assert_eq!(categories, vec![("b", Category::AirAir), ("c", Category::AirGround)]);
    }

    #[test]
    fn overall_level_is_max_of_conflicts() {
        let mut snapshot = vec![
            aircraft("a", 0.0, 1000.0, Status::Airborne),
            aircraft("b", 280.0, 1000.0, Status::Airborne), // warning with a
            aircraft("c", 0.0, 1100.0, Status::Airborne),   // alarm with a
            aircraft("d", 5000.0, 1000.0, Status::Airborne),
        ];
        detect_conflicts(&mut snapshot, &ThresholdTable::default());

        assert_eq!(snapshot[0].alert_level, AlertLevel::Alarm);
        for ac in &snapshot {
            assert_eq!(ac.alert_level, max_level(ac), "{}", ac.icao24);
        }
        assert!(snapshot[3].conflicts.is_empty());
    }

    #[test]
    fn second_pass_without_reset_duplicates_records() {
        let mut snapshot = vec![
            aircraft("a", 0.0, 1000.0, Status::Airborne),
            aircraft("b", 0.0, 1150.0, Status::Airborne),
        ];
        let table = ThresholdTable::default();
        detect_conflicts(&mut snapshot, &table);
        detect_conflicts(&mut snapshot, &table);
        assert_eq!(snapshot[0].conflicts.len(), 2);

        reset(&mut snapshot);
        assert!(snapshot.iter().all(|ac| ac.conflicts.is_empty() && ac.alert_level == AlertLevel::None));
        detect_conflicts(&mut snapshot, &table);
        assert_eq!(snapshot[0].conflicts.len(), 1);
    }

    #[test]
    fn assess_reclassifies_and_is_repeatable() {
        let mut snapshot = vec![
            AircraftState::new("a", "A").with_position(LAT, LON, Some(1000.0)),
            AircraftState::new("b", "B").with_position(LAT, LON, Some(1150.0)),
        ];
        // stale label from an older snapshot
        snapshot[0].status = Status::Ground;

        let table = ThresholdTable::default();
        assess(&mut snapshot, &table);
        assess(&mut snapshot, &table);

        assert_eq!(snapshot[0].status, Status::Airborne);
        assert_eq!(snapshot[0].conflicts.len(), 1);
        assert_eq!(snapshot[0].alert_level, AlertLevel::Alarm);
    }
}
