//! Trajectory generator library.
//!
//! Every generator is a pull-based, never-ending source of [`Frame`]s built
//! from one set of [`MotionParams`]. Generators hold only the state needed to
//! resume (ramp index, sample index, rng) and are not restartable: build a new
//! one for a new intent.
//!
//! | kind | axes | shape |
//! |---|---|---|
//! | `costumed` | L0 + L1/R1 + R0 | two frames per cycle, randomized split and secondary axis |
//! | `full_stroke_with_roll` | L0 R1 R0 | stepped stroke ramp, orbital roll and twist |
//! | `full_stroke_with_pitch` | L0 R2 R0 | stepped stroke ramp, orbital pitch and twist |
//! | `long_stroke_1` / `long_stroke_2` | L0 L1 R1 R2 | stroke and surge ramps, orbital roll and pitch |
//! | `wild_speed` | L0 R1 | variable local velocity within each stroke |
//! | `tempest` | L0 R2 R0 | phase-locked oscillators on a shared BPM |

pub mod oscillator;
pub mod ramp;

mod costumed;
mod long_stroke;
mod stepped;
mod tempest;
mod wild;

pub use costumed::Costumed;
pub use long_stroke::{LONG_STROKE_1, LONG_STROKE_2, LongStroke, LongStrokeTuning};
pub use stepped::SteppedCycle;
pub use tempest::{Tempest, TempestTuning};
pub use wild::WildSpeed;

use core::fmt;
use core::str::FromStr;

use rand::Rng;

use crate::config::TrajectoryCfg;
use crate::error::StrokerError;
use crate::mapper::AxisRanges;
use crate::tcode::{AxisId, Frame};

/// Source of an unbounded frame sequence. Exhaustion is impossible by type.
pub trait TrajectoryGenerator {
    fn next_frame(&mut self) -> Frame;
}

/// Relative extents (percent) and speed a generator is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionParams {
    pub top: i32,
    pub bottom: i32,
    /// Secondary-axis extent on the up phase.
    pub back: i32,
    /// Secondary-axis extent on the down phase.
    pub forth: i32,
    /// Linear speed, mm/s.
    pub speed: u32,
}

impl MotionParams {
    /// Speed in device units per millisecond.
    pub fn speed_per_ms(&self) -> f64 {
        f64::from(self.speed) / 1000.0
    }
}

/// Absolute stroke endpoints; a zero-span stroke has no defined progress.
pub(crate) fn stroke_endpoints(
    params: &MotionParams,
    ranges: &AxisRanges,
) -> Result<(i32, i32), StrokerError> {
    let top = ranges.position(AxisId::Stroke, params.top)?;
    let bottom = ranges.position(AxisId::Stroke, params.bottom)?;
    if top == bottom {
        return Err(StrokerError::Domain(format!(
            "stroke {}%..{}% maps to the single position {top}",
            params.bottom, params.top
        )));
    }
    Ok((top, bottom))
}

/// Closed set of generator algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Costumed,
    FullStrokeWithRoll,
    FullStrokeWithPitch,
    LongStroke1,
    LongStroke2,
    WildSpeed,
    Tempest,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 7] = [
        GeneratorKind::Costumed,
        GeneratorKind::FullStrokeWithRoll,
        GeneratorKind::FullStrokeWithPitch,
        GeneratorKind::LongStroke1,
        GeneratorKind::LongStroke2,
        GeneratorKind::WildSpeed,
        GeneratorKind::Tempest,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            GeneratorKind::Costumed => "costumed",
            GeneratorKind::FullStrokeWithRoll => "full_stroke_with_roll",
            GeneratorKind::FullStrokeWithPitch => "full_stroke_with_pitch",
            GeneratorKind::LongStroke1 => "long_stroke_1",
            GeneratorKind::LongStroke2 => "long_stroke_2",
            GeneratorKind::WildSpeed => "wild_speed",
            GeneratorKind::Tempest => "tempest",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = StrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| StrokerError::Config(format!("unknown pattern {s:?}")))
    }
}

/// A built generator of any kind.
#[derive(Debug)]
pub enum Trajectory {
    Costumed(Costumed),
    Stepped(SteppedCycle),
    LongStroke(LongStroke),
    Wild(WildSpeed),
    Tempest(Tempest),
}

impl Trajectory {
    /// Build the generator for `kind`. Fails with `StrokerError::Domain` when a
    /// relative extent is outside [0,100] or the stroke has zero span.
    pub fn build<R: Rng + ?Sized>(
        kind: GeneratorKind,
        params: &MotionParams,
        ranges: &AxisRanges,
        timing: TrajectoryCfg,
        rng: &mut R,
    ) -> Result<Self, StrokerError> {
        let t = match kind {
            GeneratorKind::Costumed => {
                Trajectory::Costumed(Costumed::new(params, ranges, timing, rng.random())?)
            }
            GeneratorKind::FullStrokeWithRoll => Trajectory::Stepped(SteppedCycle::new(
                params,
                ranges,
                timing,
                AxisId::Roll,
            )?),
            GeneratorKind::FullStrokeWithPitch => Trajectory::Stepped(SteppedCycle::new(
                params,
                ranges,
                timing,
                AxisId::Pitch,
            )?),
            GeneratorKind::LongStroke1 => {
                Trajectory::LongStroke(LongStroke::new(params, ranges, timing, LONG_STROKE_1)?)
            }
            GeneratorKind::LongStroke2 => {
                Trajectory::LongStroke(LongStroke::new(params, ranges, timing, LONG_STROKE_2)?)
            }
            GeneratorKind::WildSpeed => Trajectory::Wild(WildSpeed::new(params, ranges, timing)?),
            GeneratorKind::Tempest => Trajectory::Tempest(Tempest::new(
                params,
                ranges,
                timing,
                TempestTuning::default(),
            )?),
        };
        Ok(t)
    }
}

/// First `frames` frames of `kind` for `params`, without a transport.
pub fn preview<R: Rng + ?Sized>(
    kind: GeneratorKind,
    params: &MotionParams,
    ranges: &AxisRanges,
    timing: TrajectoryCfg,
    rng: &mut R,
    frames: usize,
) -> Result<Vec<Frame>, StrokerError> {
    Ok(Trajectory::build(kind, params, ranges, timing, rng)?
        .take(frames)
        .collect())
}

impl TrajectoryGenerator for Trajectory {
    fn next_frame(&mut self) -> Frame {
        match self {
            Trajectory::Costumed(g) => g.next_frame(),
            Trajectory::Stepped(g) => g.next_frame(),
            Trajectory::LongStroke(g) => g.next_frame(),
            Trajectory::Wild(g) => g.next_frame(),
            Trajectory::Tempest(g) => g.next_frame(),
        }
    }
}

impl Iterator for Trajectory {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        Some(self.next_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip_through_from_str() {
        for kind in GeneratorKind::ALL {
            assert_eq!(kind.name().parse::<GeneratorKind>(), Ok(kind));
        }
        assert!(matches!(
            "spiral".parse::<GeneratorKind>(),
            Err(StrokerError::Config(_))
        ));
    }

    #[test]
    fn zero_span_stroke_is_rejected() {
        let params = MotionParams {
            top: 40,
            bottom: 40,
            back: 0,
            forth: 100,
            speed: 200,
        };
        let err = stroke_endpoints(&params, &AxisRanges::default()).expect_err("zero span");
        assert!(matches!(err, StrokerError::Domain(_)));
    }
}
