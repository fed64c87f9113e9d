#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the T-code stroker.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Axis ranges are mandatory for all seven axes; everything else has defaults.
//! - Table and key aliases (`[COM]`, `baudrate`) accept older config files.
use serde::Deserialize;
use std::path::Path;

/// Largest absolute value an axis may be commanded to on the wire.
pub const MAX_AXIS_VALUE: i32 = 9999;

/// Absolute bounds of one axis, in device units.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RangeCfg {
    pub min: i32,
    pub max: i32,
}

/// Per-axis ranges. Every axis is required; a missing table fails parsing.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct Ranges {
    pub stroke: RangeCfg, // L0
    pub surge: RangeCfg,  // L1
    pub sway: RangeCfg,   // L2
    pub twist: RangeCfg,  // R0
    pub roll: RangeCfg,   // R1
    pub pitch: RangeCfg,  // R2
    pub valve: RangeCfg,  // A0
}

impl Ranges {
    /// Iterate `(name, range)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, RangeCfg)> {
        [
            ("stroke", self.stroke),
            ("surge", self.surge),
            ("sway", self.sway),
            ("twist", self.twist),
            ("roll", self.roll),
            ("pitch", self.pitch),
            ("valve", self.valve),
        ]
        .into_iter()
    }
}

/// Optional trajectory generators that join the random selection.
///
/// The composite oscillator generator always participates and has no flag.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Patterns {
    pub full_stroke_with_roll: bool,
    pub full_stroke_with_pitch: bool,
    pub long_stroke_1: bool,
    pub long_stroke_2: bool,
    pub wild_speed: bool,
    pub tempest: bool,
}

/// Conversion factors applied to percentage speed and raw velocity inputs.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Factors {
    /// Multiplier turning a speed percentage into mm/s.
    pub speed_factor: f32,
    /// Multiplier turning a velocity value into mm/s.
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

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TransportCfg {
    /// Serial port identifier, e.g. "/dev/ttyUSB0" or "COM3".
    pub port: String,
    #[serde(alias = "baudrate")]
    pub baud_rate: u32,
    /// Replace the serial port with a mock that prints each line.
    pub debug: bool,
}

impl Default for TransportCfg {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            debug: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SchedulerCfg {
    /// Granularity at which a pacing wait re-checks for cancellation.
    pub poll_ms: u64,
    /// Lookahead buffered by the selector on every intent change.
    pub horizon_ms: u64,
}

impl Default for SchedulerCfg {
    fn default() -> Self {
        Self {
            poll_ms: 10,
            horizon_ms: 72_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct TrajectoryCfg {
    /// Steady-state frame duration for stepped generators.
    pub step_ms: u32,
    /// Duration of the first frame, letting the actuator settle.
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

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub ranges: Ranges,
    #[serde(default)]
    pub patterns: Patterns,
    #[serde(default)]
    pub factors: Factors,
    #[serde(default, alias = "COM")]
    pub transport: TransportCfg,
    #[serde(default)]
    pub scheduler: SchedulerCfg,
    #[serde(default)]
    pub trajectory: TrajectoryCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text)
        .map_err(|e| eyre::eyre!("invalid configuration in {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Ranges
        for (name, r) in self.ranges.iter() {
            if !(0..=MAX_AXIS_VALUE).contains(&r.min) {
                eyre::bail!("ranges.{name}.min must be in [0, {MAX_AXIS_VALUE}]");
            }
            if !(0..=MAX_AXIS_VALUE).contains(&r.max) {
                eyre::bail!("ranges.{name}.max must be in [0, {MAX_AXIS_VALUE}]");
            }
        }
        if self.ranges.stroke.min == self.ranges.stroke.max {
            eyre::bail!("ranges.stroke must span at least one unit (min != max)");
        }

        // Factors
        if !(self.factors.speed_factor.is_finite() && self.factors.speed_factor > 0.0) {
            eyre::bail!("factors.speed_factor must be > 0");
        }
        if !(self.factors.velocity_factor.is_finite() && self.factors.velocity_factor > 0.0) {
            eyre::bail!("factors.velocity_factor must be > 0");
        }

        // Transport
        if !self.transport.debug && self.transport.port.trim().is_empty() {
            eyre::bail!("transport.port must be set unless transport.debug = true");
        }
        if self.transport.baud_rate == 0 {
            eyre::bail!("transport.baud_rate must be > 0");
        }

        // Scheduler
        if self.scheduler.poll_ms == 0 {
            eyre::bail!("scheduler.poll_ms must be >= 1");
        }
        if self.scheduler.poll_ms > 1000 {
            eyre::bail!("scheduler.poll_ms is unreasonably large (>1s)");
        }
        if self.scheduler.horizon_ms == 0 {
            eyre::bail!("scheduler.horizon_ms must be >= 1");
        }
        if self.scheduler.horizon_ms > 60 * 60 * 1000 {
            eyre::bail!("scheduler.horizon_ms is unreasonably large (>1h)");
        }

        // Trajectory
        if self.trajectory.step_ms == 0 {
            eyre::bail!("trajectory.step_ms must be >= 1");
        }
        if self.trajectory.init_ms == 0 {
            eyre::bail!("trajectory.init_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}
