//! Motion intents and the closed set of events that change them.

use core::fmt;

use crate::config::Factors;
use crate::error::StrokerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Halting,
    Running,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Halting => "halting",
            Mode::Running => "running",
        })
    }
}

/// What the device should be doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionIntent {
    /// Relative stroke bottom, percent.
    pub stroke_bottom: i32,
    /// Relative stroke top, percent.
    pub stroke_top: i32,
    /// mm/s
    pub speed: u32,
    pub mode: Mode,
}

impl Default for MotionIntent {
    fn default() -> Self {
        Self {
            stroke_bottom: 0,
            stroke_top: 100,
            speed: 0,
            mode: Mode::Halting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeUnit {
    Percent,
    /// Device travel in mm; the stroke is 200 mm long, so percent = mm / 2.
    Millimetres,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    /// Scaled to mm/s by `speed_factor`.
    Percent,
    MillimetresPerSecond,
}

/// Control actions accepted from the interception layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntentEvent {
    /// Stroke from 0 to `value`.
    SetStroke { value: i32, unit: StrokeUnit },
    /// Stroke window; missing ends fall back to 0 and 100.
    Slide { min: Option<i32>, max: Option<i32> },
    SetSpeed { value: u32, unit: SpeedUnit },
    /// Raw velocity scaled to mm/s by `velocity_factor`.
    SetVelocity(f64),
    SetMode(Mode),
    Start,
    Stop,
}

fn relative(value: i32) -> Result<i32, StrokerError> {
    if (0..=100).contains(&value) {
        Ok(value)
    } else {
        Err(StrokerError::relative_out_of_range(value))
    }
}

fn scaled_speed(value: f64, factor: f32) -> Result<u32, StrokerError> {
    let v = (value * f64::from(factor)).trunc();
    if !v.is_finite() || v < 0.0 {
        return Err(StrokerError::Domain(format!(
            "speed must be a non-negative number, got {v}"
        )));
    }
    Ok(if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    })
}

impl MotionIntent {
    /// Both stroke ends must be relative positions.
    pub fn validate(&self) -> Result<(), StrokerError> {
        relative(self.stroke_bottom)?;
        relative(self.stroke_top)?;
        Ok(())
    }

    /// Fold `event` into the intent. On error the intent is left unchanged.
    /// A halting intent always carries speed 0.
    pub fn apply(&mut self, event: IntentEvent, factors: &Factors) -> Result<(), StrokerError> {
        let mut next = *self;
        match event {
            IntentEvent::SetStroke { value, unit } => {
                let value = match unit {
                    StrokeUnit::Percent => value,
                    StrokeUnit::Millimetres if value < 0 => {
                        return Err(StrokerError::Domain(format!(
                            "stroke must be non-negative, got {value} mm"
                        )));
                    }
                    StrokeUnit::Millimetres => value / 2,
                };
                next.stroke_bottom = 0;
                next.stroke_top = relative(value)?;
            }
            IntentEvent::Slide { min, max } => {
                next.stroke_bottom = relative(min.unwrap_or(0))?;
                next.stroke_top = relative(max.unwrap_or(100))?;
            }
            IntentEvent::SetSpeed { value, unit } => {
                next.speed = match unit {
                    SpeedUnit::MillimetresPerSecond => value,
                    SpeedUnit::Percent => scaled_speed(f64::from(value), factors.speed_factor)?,
                };
            }
            IntentEvent::SetVelocity(v) => {
                next.speed = scaled_speed(v, factors.velocity_factor)?;
            }
            IntentEvent::SetMode(mode) => next.mode = mode,
            IntentEvent::Start => next.mode = Mode::Running,
            IntentEvent::Stop => next.mode = Mode::Halting,
        }
        if next.mode == Mode::Halting {
            next.speed = 0;
        }
        *self = next;
        Ok(())
    }

    /// Whether this intent calls for motion at all.
    pub fn is_active(&self) -> bool {
        self.mode == Mode::Running && self.speed != 0 && self.stroke_top != self.stroke_bottom
    }
}

impl fmt::Display for MotionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stroke {}-{}%, speed {} mm/s, {}",
            self.stroke_bottom, self.stroke_top, self.speed, self.mode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn running() -> MotionIntent {
        MotionIntent {
            mode: Mode::Running,
            speed: 120,
            ..MotionIntent::default()
        }
    }

    #[rstest]
    #[case(IntentEvent::SetStroke { value: 80, unit: StrokeUnit::Percent }, 0, 80)]
    #[case(IntentEvent::SetStroke { value: 150, unit: StrokeUnit::Millimetres }, 0, 75)]
    #[case(IntentEvent::Slide { min: Some(20), max: Some(70) }, 20, 70)]
    #[case(IntentEvent::Slide { min: None, max: None }, 0, 100)]
    fn stroke_events_set_the_window(
        #[case] event: IntentEvent,
        #[case] bottom: i32,
        #[case] top: i32,
    ) {
        let mut intent = running();
        intent.apply(event, &Factors::default()).expect("valid");
        assert_eq!((intent.stroke_bottom, intent.stroke_top), (bottom, top));
    }

    #[test]
    fn out_of_range_stroke_is_rejected_and_leaves_intent_alone() {
        let mut intent = running();
        let err = intent
            .apply(
                IntentEvent::SetStroke {
                    value: 101,
                    unit: StrokeUnit::Percent,
                },
                &Factors::default(),
            )
            .expect_err("101% is out of range");
        assert!(matches!(err, StrokerError::Domain(_)));
        assert_eq!(intent, running());
    }

    #[test]
    fn speed_units_apply_their_factor() {
        let factors = Factors {
            speed_factor: 4.0,
            velocity_factor: 2.5,
        };
        let mut intent = running();
        intent
            .apply(
                IntentEvent::SetSpeed {
                    value: 50,
                    unit: SpeedUnit::Percent,
                },
                &factors,
            )
            .expect("valid");
        assert_eq!(intent.speed, 200);
        intent
            .apply(IntentEvent::SetVelocity(33.3), &factors)
            .expect("valid");
        assert_eq!(intent.speed, 83);
        assert!(intent.apply(IntentEvent::SetVelocity(-1.0), &factors).is_err());
    }

    #[test]
    fn halting_zeroes_speed_and_stays_inactive() {
        let mut intent = running();
        assert!(intent.is_active());
        intent.apply(IntentEvent::Stop, &Factors::default()).expect("valid");
        assert_eq!(intent.speed, 0);
        assert!(!intent.is_active());
        // speed offered while halted does not stick
        intent
            .apply(
                IntentEvent::SetSpeed {
                    value: 90,
                    unit: SpeedUnit::MillimetresPerSecond,
                },
                &Factors::default(),
            )
            .expect("valid");
        assert_eq!(intent.speed, 0);
        intent.apply(IntentEvent::Start, &Factors::default()).expect("valid");
        assert!(!intent.is_active());
        intent
            .apply(
                IntentEvent::SetSpeed {
                    value: 90,
                    unit: SpeedUnit::MillimetresPerSecond,
                },
                &Factors::default(),
            )
            .expect("valid");
        assert_eq!(intent.speed, 90);
        assert!(intent.is_active());
    }

    #[rstest]
    #[case(-1)]
    #[case(-200)]
    fn negative_millimetre_stroke_is_rejected(#[case] mm: i32) {
        let mut intent = running();
        let err = intent
            .apply(
                IntentEvent::SetStroke {
                    value: mm,
                    unit: StrokeUnit::Millimetres,
                },
                &Factors::default(),
            )
            .expect_err("negative stroke");
        assert!(matches!(err, StrokerError::Domain(_)));
        assert_eq!(intent, running());
    }

    #[test]
    fn validate_checks_both_stroke_ends() {
        assert!(MotionIntent::default().validate().is_ok());
        let bad = MotionIntent {
            stroke_top: 150,
            ..MotionIntent::default()
        };
        assert!(matches!(bad.validate(), Err(StrokerError::Domain(_))));
    }
}
