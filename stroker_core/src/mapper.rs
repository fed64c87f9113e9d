//! Relative [0,100] coordinates to axis-specific absolute values.

use crate::error::StrokerError;
use crate::tcode::AxisId;

/// Absolute bounds of one axis. `min > max` is allowed and inverts the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Map `relative` (percent) onto `range`, truncating toward zero.
///
/// Values outside [0,100] are a caller bug and fail with `StrokerError::Domain`.
pub fn absolute(range: AxisRange, relative: i32) -> Result<i32, StrokerError> {
    if !(0..=100).contains(&relative) {
        return Err(StrokerError::relative_out_of_range(relative));
    }
    let span = f64::from(range.max) - f64::from(range.min);
    let value = f64::from(range.min) + span * (f64::from(relative) / 100.0);
    Ok(value.trunc() as i32)
}

/// Ranges for all seven axes, indexed by `AxisId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRanges {
    ranges: [AxisRange; 7],
}

impl AxisRanges {
    /// Build from ranges listed in `AxisId::ALL` order.
    pub const fn new(ranges: [AxisRange; 7]) -> Self {
        Self { ranges }
    }

    /// Same range on every axis; handy for tests and previews.
    pub const fn uniform(range: AxisRange) -> Self {
        Self { ranges: [range; 7] }
    }

    pub fn get(&self, axis: AxisId) -> AxisRange {
        self.ranges[axis_index(axis)]
    }

    /// Absolute value of `relative` on `axis`.
    pub fn position(&self, axis: AxisId, relative: i32) -> Result<i32, StrokerError> {
        absolute(self.get(axis), relative)
    }
}

impl Default for AxisRanges {
    fn default() -> Self {
        Self::uniform(AxisRange::new(0, 999))
    }
}

const fn axis_index(axis: AxisId) -> usize {
    match axis {
        AxisId::Stroke => 0,
        AxisId::Surge => 1,
        AxisId::Sway => 2,
        AxisId::Twist => 3,
        AxisId::Roll => 4,
        AxisId::Pitch => 5,
        AxisId::Valve => 6,
    }
}
