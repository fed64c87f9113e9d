//! Runtime configuration types for the motion engine.
//!
//! These are the structs the scheduler, selector and generators consume.
//! They are separate from the TOML-deserialized config in `stroker_config`;
//! see `conversions` for the mapping.

use std::time::Duration;

use crate::mapper::AxisRanges;
use crate::trajectory::GeneratorKind;

/// Dispatch loop tuning.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerCfg {
    /// How often a pacing wait re-checks the session; bounds cancellation latency.
    pub poll: Duration,
}

impl Default for SchedulerCfg {
    fn default() -> Self {
        Self {
            poll: Duration::from_millis(10),
        }
    }
}

/// Frame timing shared by the stepped generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectoryCfg {
    /// Steady-state frame duration (ms).
    pub step_ms: u32,
    /// First-frame duration (ms), lets the actuator settle before stepping.
    pub init_ms: u32,
}

impl Default for TrajectoryCfg {
    fn default() -> Self {
        Self {
            step_ms: 50,
            init_ms: 300,
        }
    }
}

/// Fill-ahead policy.
#[derive(Debug, Clone)]
pub struct SelectorCfg {
    /// Lookahead buffered on each intent change (ms).
    pub horizon_ms: u64,
    /// Optional generators enabled by configuration. The composite
    /// oscillator is always a candidate and need not be listed.
    pub optional: Vec<GeneratorKind>,
}

impl Default for SelectorCfg {
    fn default() -> Self {
        Self {
            horizon_ms: 72_000,
            optional: Vec::new(),
        }
    }
}

/// Input conversion factors for percentage speed and raw velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    pub speed_factor: f32,
    pub velocity_factor: f32,
}

impl Default for Factors {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            velocity_factor: 1.0,
        }
    }
}

/// Everything the engine needs, bundled for the binary.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub ranges: AxisRanges,
    pub trajectory: TrajectoryCfg,
    pub selector: SelectorCfg,
    pub scheduler: SchedulerCfg,
    pub factors: Factors,
}
