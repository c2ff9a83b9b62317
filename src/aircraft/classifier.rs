use super::types::{AircraftState, Status};

const MPS_TO_KT: f64 = 1.943_844_492_4;
const MPS_TO_FPS: f64 = 3.280_84;

// altitude bands (m)
const SURFACE_ALT_M: f64 = 15.0;
const LOW_ALT_M: f64 = 60.0;
const TAXI_ALT_M: f64 = 120.0;

const LOW_BAND_MAX_SPEED_KT: f64 = 40.0;
const LOW_BAND_MAX_VRATE_FPS: f64 = 2.0;
const TAXI_BAND_MAX_SPEED_KT: f64 = 25.0;
const TAXI_BAND_MAX_VRATE_FPS: f64 = 1.5;

/// Coarse ground/airborne heuristic over altitude (m), ground speed (m/s)
/// and vertical rate (m/s). Not a certified flight-phase detector.
pub fn is_ground(altitude_m: f64, velocity_mps: f64, vertical_rate_mps: f64) -> bool {
    let speed_kt = velocity_mps * MPS_TO_KT;
    let vrate_fps = (vertical_rate_mps * MPS_TO_FPS).abs();

    if altitude_m < SURFACE_ALT_M {
        return true;
    }
    if altitude_m < LOW_ALT_M {
        return !(speed_kt >= LOW_BAND_MAX_SPEED_KT || vrate_fps >= LOW_BAND_MAX_VRATE_FPS);
    }
    if altitude_m < TAXI_ALT_M && speed_kt < TAXI_BAND_MAX_SPEED_KT && vrate_fps < TAXI_BAND_MAX_VRATE_FPS {
        return true;
    }
    false
}

pub fn status_of(state: &AircraftState) -> Status {
    if is_ground(
        state.altitude_or_zero(),
        state.velocity_or_zero(),
        state.vertical_rate_or_zero(),
    ) {
        Status::Ground
    } else {
        Status::Airborne
    }
}

/// Recomputes the status of every record from its own snapshot values.
pub fn classify_all(snapshot: &mut [AircraftState]) {
    for state in snapshot.iter_mut() {
        state.status = status_of(state);
    }
}
