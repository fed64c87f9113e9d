use super::oscillator::{Orbit, bpm, omega_for_bpm};
use super::{MotionParams, TrajectoryGenerator, stroke_endpoints};
use crate::config::TrajectoryCfg;
use crate::error::StrokerError;
use crate::mapper::AxisRanges;
use crate::tcode::{AxisId, Frame, Instruction};

/// Phase and eccentricity of each tempest oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempestTuning {
    pub stroke: (f64, f64),
    pub pitch: (f64, f64),
    pub twist: (f64, f64),
}

impl Default for TempestTuning {
    fn default() -> Self {
        Self {
            stroke: (0.0, 0.2),
            pitch: (1.0, -0.3),
            twist: (-1.0, 0.5),
        }
    }
}

/// Stroke, pitch and twist locked to one BPM, sampled on a fixed grid.
///
/// Sample times come from a frame counter, so output does not depend on when
/// frames are pulled.
#[derive(Debug, Clone)]
pub struct Tempest {
    stroke: Orbit,
    pitch: Orbit,
    twist: Orbit,
    step_ms: u32,
    sample: u64,
    bpm: f64,
}

impl Tempest {
    pub fn new(
        params: &MotionParams,
        ranges: &AxisRanges,
        timing: TrajectoryCfg,
        tuning: TempestTuning,
    ) -> Result<Self, StrokerError> {
        let (top, bottom) = stroke_endpoints(params, ranges)?;
        let beat = bpm(f64::from(top.abs_diff(bottom)), params.speed_per_ms());
        let omega = omega_for_bpm(beat);

        let pitch = (
            ranges.position(AxisId::Pitch, params.back)?,
            ranges.position(AxisId::Pitch, params.forth)?,
        );
        let twist = (
            ranges.position(AxisId::Twist, 100)?,
            ranges.position(AxisId::Twist, 0)?,
        );
        Ok(Self {
            stroke: Orbit::new((top, bottom), tuning.stroke.0, tuning.stroke.1, omega),
            pitch: Orbit::new(pitch, tuning.pitch.0, tuning.pitch.1, omega),
            twist: Orbit::new(twist, tuning.twist.0, tuning.twist.1, omega),
            step_ms: timing.step_ms,
            sample: 0,
            bpm: beat,
        })
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }
}

impl TrajectoryGenerator for Tempest {
    fn next_frame(&mut self) -> Frame {
        let t = self.sample * u64::from(self.step_ms);
        self.sample += 1;
        let d = self.step_ms;
        Frame::new(vec![
            Instruction::new(AxisId::Stroke, self.stroke.at(t), d),
            Instruction::new(AxisId::Pitch, self.pitch.at(t), d),
            Instruction::new(AxisId::Twist, self.twist.at(t), d),
        ])
    }
}
