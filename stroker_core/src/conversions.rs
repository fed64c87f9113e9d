//! `From` implementations bridging `stroker_config` types to `stroker_core` types.

use std::time::Duration;

use crate::config::{Factors, SchedulerCfg, SelectorCfg, Settings, TrajectoryCfg};
use crate::mapper::{AxisRange, AxisRanges};
use crate::trajectory::GeneratorKind;

// ── Ranges ───────────────────────────────────────────────────────────────────

impl From<&stroker_config::RangeCfg> for AxisRange {
    fn from(c: &stroker_config::RangeCfg) -> Self {
        Self::new(c.min, c.max)
    }
}

impl From<&stroker_config::Ranges> for AxisRanges {
    fn from(c: &stroker_config::Ranges) -> Self {
        // Order must match AxisId::ALL.
        Self::new([
            (&c.stroke).into(),
            (&c.surge).into(),
            (&c.sway).into(),
            (&c.twist).into(),
            (&c.roll).into(),
            (&c.pitch).into(),
            (&c.valve).into(),
        ])
    }
}

// ── Patterns ─────────────────────────────────────────────────────────────────

impl GeneratorKind {
    /// Optional generators switched on in `[patterns]`, in declaration order.
    pub fn enabled_in(p: &stroker_config::Patterns) -> Vec<GeneratorKind> {
        [
            (p.full_stroke_with_roll, GeneratorKind::FullStrokeWithRoll),
            (p.full_stroke_with_pitch, GeneratorKind::FullStrokeWithPitch),
            (p.long_stroke_1, GeneratorKind::LongStroke1),
            (p.long_stroke_2, GeneratorKind::LongStroke2),
            (p.wild_speed, GeneratorKind::WildSpeed),
            (p.tempest, GeneratorKind::Tempest),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }
}

// ── Timing ───────────────────────────────────────────────────────────────────

impl From<&stroker_config::SchedulerCfg> for SchedulerCfg {
    fn from(c: &stroker_config::SchedulerCfg) -> Self {
        Self {
            poll: Duration::from_millis(c.poll_ms),
        }
    }
}

impl From<&stroker_config::TrajectoryCfg> for TrajectoryCfg {
    fn from(c: &stroker_config::TrajectoryCfg) -> Self {
        Self {
            step_ms: c.step_ms,
            init_ms: c.init_ms,
        }
    }
}

// ── Factors ──────────────────────────────────────────────────────────────────

impl From<&stroker_config::Factors> for Factors {
    fn from(c: &stroker_config::Factors) -> Self {
        Self {
            speed_factor: c.speed_factor,
            velocity_factor: c.velocity_factor,
        }
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

impl From<&stroker_config::Config> for Settings {
    fn from(c: &stroker_config::Config) -> Self {
        Self {
            ranges: (&c.ranges).into(),
            trajectory: (&c.trajectory).into(),
            selector: SelectorCfg {
                horizon_ms: c.scheduler.horizon_ms,
                optional: GeneratorKind::enabled_in(&c.patterns),
            },
            scheduler: (&c.scheduler).into(),
            factors: (&c.factors).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_in_keeps_only_switched_on_kinds() {
        let p = stroker_config::Patterns {
            full_stroke_with_pitch: true,
            tempest: true,
            ..Default::default()
        };
        assert_eq!(
            GeneratorKind::enabled_in(&p),
            vec![GeneratorKind::FullStrokeWithPitch, GeneratorKind::Tempest]
        );
    }
}
