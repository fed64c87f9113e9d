use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{MotionParams, TrajectoryGenerator, stroke_endpoints};
use crate::config::TrajectoryCfg;
use crate::error::StrokerError;
use crate::mapper::AxisRanges;
use crate::tcode::{AxisId, Frame, Instruction};

/// Two frames per cycle: apex (stroke top, secondary `back`, twist 50%) then
/// base (stroke bottom, secondary `forth`, twist 0%).
///
/// The up/down split is re-rolled every cycle within ±10% of the midpoint, and
/// the secondary axis is drawn between surge and roll.
#[derive(Debug)]
pub struct Costumed {
    rng: StdRng,
    top: i32,
    bottom: i32,
    surge: (i32, i32),
    roll: (i32, i32),
    twist: (i32, i32),
    cycle_ms: u32,
    pending_base: Option<Frame>,
}

impl Costumed {
    pub fn new(
        params: &MotionParams,
        ranges: &AxisRanges,
        timing: TrajectoryCfg,
        seed: u64,
    ) -> Result<Self, StrokerError> {
        let (top, bottom) = stroke_endpoints(params, ranges)?;
        let surge = (
            ranges.position(AxisId::Surge, params.back)?,
            ranges.position(AxisId::Surge, params.forth)?,
        );
        let roll = (
            ranges.position(AxisId::Roll, params.back)?,
            ranges.position(AxisId::Roll, params.forth)?,
        );
        let twist = (
            ranges.position(AxisId::Twist, 50)?,
            ranges.position(AxisId::Twist, 0)?,
        );
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            top,
            bottom,
            surge,
            roll,
            twist,
            cycle_ms: cycle_ms(top.abs_diff(bottom), params.speed, timing.step_ms),
            pending_base: None,
        })
    }

    /// Nominal duration of one apex+base cycle.
    pub fn cycle_ms(&self) -> u32 {
        self.cycle_ms
    }

    fn split(&mut self) -> (u32, u32) {
        let half = self.cycle_ms / 2;
        let jitter = i64::from(half / 10);
        let up = (i64::from(half) + self.rng.random_range(-jitter..=jitter)).max(1);
        let up = u32::try_from(up).unwrap_or(half);
        (up, self.cycle_ms.saturating_sub(up).max(1))
    }
}

/// Full down-and-up travel time at `speed` mm/s, never shorter than two steps.
fn cycle_ms(distance: u32, speed: u32, step_ms: u32) -> u32 {
    let ms = 2 * u64::from(distance) * 1000 / u64::from(speed.max(1));
    let floor = u64::from(step_ms) * 2;
    u32::try_from(ms.max(floor)).unwrap_or(u32::MAX)
}

impl TrajectoryGenerator for Costumed {
    fn next_frame(&mut self) -> Frame {
        if let Some(base) = self.pending_base.take() {
            return base;
        }
        let (up, down) = self.split();
        let (axis, (back, forth)) = if self.rng.random_bool(0.5) {
            (AxisId::Surge, self.surge)
        } else {
            (AxisId::Roll, self.roll)
        };
        self.pending_base = Some(Frame::new(vec![
            Instruction::new(AxisId::Stroke, self.bottom, down),
            Instruction::new(axis, forth, down),
            Instruction::new(AxisId::Twist, self.twist.1, down),
        ]));
        Frame::new(vec![
            Instruction::new(AxisId::Stroke, self.top, up),
            Instruction::new(axis, back, up),
            Instruction::new(AxisId::Twist, self.twist.0, up),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MotionParams {
        MotionParams {
            top: 100,
            bottom: 0,
            back: 20,
            forth: 80,
            speed: 200,
        }
    }

    #[test]
    fn cycle_is_travel_time_of_the_stroke() {
        // 999 units down and up at 200 units/s
        let g = Costumed::new(&params(), &AxisRanges::default(), TrajectoryCfg::default(), 7)
            .expect("valid");
        assert_eq!(g.cycle_ms(), 9990);
        assert_eq!(cycle_ms(10, 0, 50), 20_000);
        assert_eq!(cycle_ms(1, 1000, 50), 100);
    }

    #[test]
    fn apex_then_base_with_split_within_ten_percent() {
        let mut g =
            Costumed::new(&params(), &AxisRanges::default(), TrajectoryCfg::default(), 42)
                .expect("valid");
        let half = g.cycle_ms() / 2;
        for _ in 0..200 {
            let apex = g.next_frame();
            let base = g.next_frame();
            assert_eq!(apex.value_of(AxisId::Stroke), Some(999));
            assert_eq!(base.value_of(AxisId::Stroke), Some(0));
            assert_eq!(apex.value_of(AxisId::Twist), Some(499));
            assert_eq!(base.value_of(AxisId::Twist), Some(0));
            assert_eq!(apex.duration_ms() + base.duration_ms(), g.cycle_ms());
            assert!(apex.duration_ms().abs_diff(half) <= half / 10);

            let secondary = apex.instructions()[1].axis;
            assert!(matches!(secondary, AxisId::Surge | AxisId::Roll));
            assert_eq!(base.instructions()[1].axis, secondary);
        }
    }

    #[test]
    fn both_secondary_axes_get_drawn() {
        let mut g =
            Costumed::new(&params(), &AxisRanges::default(), TrajectoryCfg::default(), 3)
                .expect("valid");
        let axes: Vec<AxisId> = (0..100)
            .map(|_| {
                let apex = g.next_frame();
                g.next_frame();
                apex.instructions()[1].axis
            })
            .collect();
        assert!(axes.contains(&AxisId::Surge));
        assert!(axes.contains(&AxisId::Roll));
    }
}
