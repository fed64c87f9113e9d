//! Orbital oscillator and stroke-cadence helpers.
//!
//! All rates here are per millisecond: `speed` is device units per ms and
//! angular velocities are radians per ms, so `angle = omega * t_ms`.

use std::f64::consts::PI;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Strokes (full down-and-up cycles) per minute for a stroke of `distance`
/// units travelled at `speed` units/ms. Zero speed yields 0 bpm.
pub fn bpm(distance: f64, speed: f64) -> f64 {
    let cycle_ms = (distance * 2.0) / speed;
    MS_PER_MINUTE / cycle_ms
}

/// Angular velocity (rad/ms) of an oscillator beating at `bpm`.
pub fn omega_for_bpm(bpm: f64) -> f64 {
    2.0 * PI * (bpm / MS_PER_MINUTE)
}

/// Angular velocity (rad/ms) that completes one turn per stroke cycle.
pub fn angular_velocity(distance: f64, speed: f64) -> f64 {
    omega_for_bpm(bpm(distance, speed))
}

/// Phase- and eccentricity-skewed periodic position between two limits.
///
/// `midpoint + amplitude * cos(θ + e·sin(θ))` with `θ = angle + phase·π/2`,
/// truncated toward zero. `phase` is in quarter turns.
pub fn orbital_position(
    angle: f64,
    limit_a: i32,
    limit_b: i32,
    phase: f64,
    eccentricity: f64,
) -> i32 {
    let midpoint = (f64::from(limit_a) + f64::from(limit_b)) / 2.0;
    let amplitude = (f64::from(limit_a) - f64::from(limit_b)) / 2.0;
    let theta = angle + phase * PI / 2.0;
    (midpoint + amplitude * (theta + eccentricity * theta.sin()).cos()) as i32
}

/// An orbital oscillator bound to its limits, shape and angular velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub limit_a: i32,
    pub limit_b: i32,
    pub phase: f64,
    pub eccentricity: f64,
    /// Radians per millisecond.
    pub omega: f64,
}

impl Orbit {
    pub fn new(limits: (i32, i32), phase: f64, eccentricity: f64, omega: f64) -> Self {
        Self {
            limit_a: limits.0,
            limit_b: limits.1,
            phase,
            eccentricity,
            omega,
        }
    }

    /// Position at `t_ms` milliseconds into the motion.
    pub fn at(&self, t_ms: u64) -> i32 {
        orbital_position(
            self.omega * t_ms as f64,
            self.limit_a,
            self.limit_b,
            self.phase,
            self.eccentricity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_angle_without_skew_sits_on_limit_a() {
        assert_eq!(orbital_position(0.0, 100, 0, 0.0, 0.0), 100);
    }

    #[test]
    fn quarter_phase_sits_on_midpoint() {
        assert_eq!(orbital_position(0.0, 100, 0, 1.0, 0.0), 50);
        assert_eq!(orbital_position(PI / 2.0, 100, 0, 0.0, 0.0), 50);
    }

    #[test]
    fn bpm_matches_cycle_time() {
        // 100 units at 0.2 units/ms: 1000 ms per cycle -> 60 bpm
        assert!((bpm(100.0, 0.2) - 60.0).abs() < 1e-9);
        assert!((angular_velocity(100.0, 0.2) - 2.0 * PI / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn zero_speed_is_a_standstill() {
        assert_eq!(bpm(100.0, 0.0), 0.0);
        let orbit = Orbit::new((900, 100), 1.0, -0.1, angular_velocity(100.0, 0.0));
        assert_eq!(orbit.at(0), orbit.at(10_000));
    }
}
