use super::oscillator::{Orbit, angular_velocity};
use super::ramp::{PositionCycle, mirrored, ramp_with, step_size};
use super::{MotionParams, TrajectoryGenerator, stroke_endpoints};
use crate::config::TrajectoryCfg;
use crate::error::StrokerError;
use crate::mapper::AxisRanges;
use crate::tcode::{AxisId, Frame, Instruction};

/// Stroke whose local velocity changes inside each pass: the first half of
/// the range crawls at half the nominal step, the second half rushes at four
/// times it. The return pass replays the outbound path backwards.
#[derive(Debug, Clone)]
pub struct WildSpeed {
    stroke: PositionCycle,
    roll: Orbit,
    timing: TrajectoryCfg,
    t_ms: u64,
    started: bool,
}

impl WildSpeed {
    pub fn new(
        params: &MotionParams,
        ranges: &AxisRanges,
        timing: TrajectoryCfg,
    ) -> Result<Self, StrokerError> {
        let (top, bottom) = stroke_endpoints(params, ranges)?;
        let speed = params.speed_per_ms();
        let path = wild_path(top, bottom, step_size(timing.step_ms, speed));

        let roll = Orbit::new(
            (
                ranges.position(AxisId::Roll, params.back)?,
                ranges.position(AxisId::Roll, params.forth)?,
            ),
            1.0,
            -0.1,
            angular_velocity(f64::from(top.abs_diff(bottom)), speed),
        );

        Ok(Self {
            stroke: PositionCycle::new(mirrored(path)),
            roll,
            timing,
            t_ms: 0,
            started: false,
        })
    }
}

fn wild_path(top: i32, bottom: i32, increment: i32) -> Vec<i32> {
    let half_span = (top - bottom).abs() / 2;
    let slow = (increment / 2).max(1);
    let fast = increment.saturating_mul(4);
    ramp_with(top, bottom, |travelled| {
        if travelled < half_span { slow } else { fast }
    })
}

impl TrajectoryGenerator for WildSpeed {
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
            Instruction::new(AxisId::Roll, self.roll.at(self.t_ms), duration),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_half_crawls_second_half_rushes() {
        assert_eq!(
            wild_path(100, 0, 10),
            vec![100, 95, 90, 85, 80, 75, 70, 65, 60, 55, 50, 10, 0]
        );
    }

    #[test]
    fn return_pass_mirrors_speeds() {
        let params = MotionParams {
            top: 100,
            bottom: 0,
            back: 10,
            forth: 90,
            speed: 200,
        };
        let mut g = WildSpeed::new(&params, &AxisRanges::default(), TrajectoryCfg::default())
            .expect("valid");
        let pass: Vec<i32> = (0..400)
            .map(|_| g.next_frame().value_of(AxisId::Stroke).unwrap_or(-1))
            .collect();
        let deltas: Vec<i32> = pass.windows(2).map(|w| w[1] - w[0]).collect();
        let down = deltas.iter().position(|d| *d > 0).expect("turns around");
        let outbound: Vec<i32> = deltas[..down].iter().map(|d| -d).collect();
        let inbound: Vec<i32> = deltas[down..2 * down].iter().rev().copied().collect();
        assert_eq!(outbound, inbound);
    }
}
