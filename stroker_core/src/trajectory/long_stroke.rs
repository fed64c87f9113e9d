use super::oscillator::{Orbit, angular_velocity};
use super::ramp::{PositionCycle, mirrored, ramp, step_size};
use super::{MotionParams, TrajectoryGenerator, stroke_endpoints};
use crate::config::TrajectoryCfg;
use crate::error::StrokerError;
use crate::mapper::AxisRanges;
use crate::tcode::{AxisId, Frame, Instruction};

/// Roll and pitch shaping of a long-stroke variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongStrokeTuning {
    /// Relative roll limits (percent).
    pub roll: (i32, i32),
    pub roll_phase: f64,
    pub roll_eccentricity: f64,
    pub pitch_phase: f64,
    pub pitch_eccentricity: f64,
}

/// Narrow roll band, pitch and roll near quadrature.
pub const LONG_STROKE_1: LongStrokeTuning = LongStrokeTuning {
    roll: (60, 30),
    roll_phase: 1.5,
    roll_eccentricity: -0.1,
    pitch_phase: 1.0,
    pitch_eccentricity: -0.1,
};

/// Full roll band, strongly skewed pitch.
pub const LONG_STROKE_2: LongStrokeTuning = LongStrokeTuning {
    roll: (100, 0),
    roll_phase: 1.0,
    roll_eccentricity: -0.5,
    pitch_phase: -1.0,
    pitch_eccentricity: -0.8,
};

/// Stroke and surge ramps walked in lockstep, with roll and pitch orbiting at
/// the stroke cadence.
#[derive(Debug, Clone)]
pub struct LongStroke {
    stroke: PositionCycle,
    surge: PositionCycle,
    roll: Orbit,
    pitch: Orbit,
    timing: TrajectoryCfg,
    t_ms: u64,
    started: bool,
}

impl LongStroke {
    pub fn new(
        params: &MotionParams,
        ranges: &AxisRanges,
        timing: TrajectoryCfg,
        tuning: LongStrokeTuning,
    ) -> Result<Self, StrokerError> {
        let (top, bottom) = stroke_endpoints(params, ranges)?;
        let speed = params.speed_per_ms();
        let increment = step_size(timing.step_ms, speed);
        let stroke_path = ramp(top, bottom, increment);
        let stroke_len = stroke_path.len();

        let back = ranges.position(AxisId::Surge, params.back)?;
        let forth = ranges.position(AxisId::Surge, params.forth)?;
        let surge_increment = surge_step(increment, back.abs_diff(forth), stroke_len);
        let surge = PositionCycle::new(mirrored(ramp(forth, back, surge_increment)));

        let omega = angular_velocity(f64::from(top.abs_diff(bottom)), speed);
        let roll = Orbit::new(
            (
                ranges.position(AxisId::Roll, tuning.roll.0)?,
                ranges.position(AxisId::Roll, tuning.roll.1)?,
            ),
            tuning.roll_phase,
            tuning.roll_eccentricity,
            omega,
        );
        let pitch = Orbit::new(
            (
                ranges.position(AxisId::Pitch, 100)?,
                ranges.position(AxisId::Pitch, 0)?,
            ),
            tuning.pitch_phase,
            tuning.pitch_eccentricity,
            omega,
        );

        Ok(Self {
            stroke: PositionCycle::new(mirrored(stroke_path)),
            surge,
            roll,
            pitch,
            timing,
            t_ms: 0,
            started: false,
        })
    }
}

/// Surge increment that spreads the surge travel over the stroke's steps.
fn surge_step(stroke_increment: i32, surge_span: u32, stroke_len: usize) -> i32 {
    let inc = i64::from(stroke_increment);
    let chunks = i64::from(surge_span) / inc + 1;
    let raw = (inc as f64 * (chunks as f64 / stroke_len.max(1) as f64)).trunc();
    (raw as i32).max(1)
}

impl TrajectoryGenerator for LongStroke {
    fn next_frame(&mut self) -> Frame {
        self.t_ms += u64::from(self.timing.step_ms);
        let duration = if self.started {
            self.timing.step_ms
        } else {
            self.started = true;
            self.timing.init_ms
        };
        Frame::new(vec![
            Instruction::new(AxisId::Stroke, self.stroke.next_position(), duration),
            Instruction::new(AxisId::Surge, self.surge.next_position(), duration),
            Instruction::new(AxisId::Roll, self.roll.at(self.t_ms), duration),
            Instruction::new(AxisId::Pitch, self.pitch.at(self.t_ms), duration),
        ])
    }
}
