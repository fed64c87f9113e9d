use super::oscillator::{Orbit, angular_velocity};
use super::ramp::{PositionCycle, mirrored, ramp, step_size};
use super::{MotionParams, TrajectoryGenerator, stroke_endpoints};
use crate::config::TrajectoryCfg;
use crate::error::StrokerError;
use crate::mapper::AxisRanges;
use crate::tcode::{AxisId, Frame, Instruction};

/// Full stroke replayed as a stepped ramp, with one orbiting secondary axis
/// (roll or pitch) and a slow twist sweep.
#[derive(Debug, Clone)]
pub struct SteppedCycle {
    stroke: PositionCycle,
    secondary_axis: AxisId,
    secondary: Orbit,
    twist: Orbit,
    timing: TrajectoryCfg,
    t_ms: u64,
    started: bool,
}

impl SteppedCycle {
    pub fn new(
        params: &MotionParams,
        ranges: &AxisRanges,
        timing: TrajectoryCfg,
        secondary_axis: AxisId,
    ) -> Result<Self, StrokerError> {
        let (top, bottom) = stroke_endpoints(params, ranges)?;
        let speed = params.speed_per_ms();
        let increment = step_size(timing.step_ms, speed);
        let stroke = PositionCycle::new(mirrored(ramp(top, bottom, increment)));

        let back = ranges.position(secondary_axis, params.back)?;
        let forth = ranges.position(secondary_axis, params.forth)?;
        let distance = f64::from(top.abs_diff(bottom));
        let secondary = Orbit::new((back, forth), 1.0, -0.1, angular_velocity(distance, speed));

        let t0 = ranges.position(AxisId::Twist, 100)?;
        let t1 = ranges.position(AxisId::Twist, 0)?;
        let twist_radius = f64::from(t0.abs_diff(t1)) + 1.0;
        let twist = Orbit::new((t0, t1), -1.0, 0.1, speed / twist_radius);

        Ok(Self {
            stroke,
            secondary_axis,
            secondary,
            twist,
            timing,
            t_ms: 0,
            started: false,
        })
    }

    /// Frames in one full down-and-up stroke.
    pub fn period(&self) -> usize {
        self.stroke.period()
    }
}

impl TrajectoryGenerator for SteppedCycle {
    fn next_frame(&mut self) -> Frame {
        let duration = if self.started {
            self.t_ms += u64::from(self.timing.step_ms);
            self.timing.step_ms
        } else {
            self.started = true;
            self.timing.init_ms
        };
        Frame::new(vec![
            Instruction::new(AxisId::Stroke, self.stroke.next_position(), duration),
            Instruction::new(self.secondary_axis, self.secondary.at(self.t_ms), duration),
            Instruction::new(AxisId::Twist, self.twist.at(self.t_ms), duration),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::oscillator::orbital_position;

    #[test]
    fn first_frame_settles_then_steps() {
        let params = MotionParams {
            top: 100,
            bottom: 0,
            back: 0,
            forth: 100,
            speed: 200,
        };
        let mut g = SteppedCycle::new(
            &params,
            &AxisRanges::default(),
            TrajectoryCfg::default(),
            AxisId::Roll,
        )
        .expect("valid");
        let first = g.next_frame();
        assert_eq!(first.duration_ms(), 300);
        assert_eq!(first.value_of(AxisId::Stroke), Some(999));
        assert_eq!(
            first.value_of(AxisId::Roll),
            Some(orbital_position(0.0, 0, 999, 1.0, -0.1))
        );
        let second = g.next_frame();
        assert_eq!(second.duration_ms(), 50);
        assert_eq!(second.value_of(AxisId::Stroke), Some(989));
    }

    #[test]
    fn stroke_replays_a_mirrored_ramp() {
        let params = MotionParams {
            top: 10,
            bottom: 0,
            back: 20,
            forth: 70,
            speed: 400,
        };
        let mut g = SteppedCycle::new(
            &params,
            &AxisRanges::default(),
            TrajectoryCfg::default(),
            AxisId::Pitch,
        )
        .expect("valid");
        // 99 -> 0 in steps of 20: 99 79 59 39 19 0, back up through 19..79
        assert_eq!(g.period(), 10);
        let strokes: Vec<i32> = (0..12)
            .map(|_| g.next_frame().value_of(AxisId::Stroke).unwrap_or(-1))
            .collect();
        assert_eq!(strokes, vec![99, 79, 59, 39, 19, 0, 19, 39, 59, 79, 99, 79]);
    }
}
