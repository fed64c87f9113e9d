//! Discretized ramps and endlessly replayed position cycles.

/// Position increment for one frame of `step_ms` at `speed` units/ms.
///
/// Truncated toward zero and clamped to at least 1, so a zero speed still
/// advances instead of stalling or dividing by zero.
pub fn step_size(step_ms: u32, speed: f64) -> i32 {
    let raw = (f64::from(step_ms) * speed).trunc();
    if raw >= f64::from(i32::MAX) {
        i32::MAX
    } else {
        (raw as i32).max(1)
    }
}

/// Positions from `from` to `to`, both inclusive, moving at most `step` per point.
///
/// The last increment is shortened so the ramp lands exactly on `to`.
pub fn ramp(from: i32, to: i32, step: i32) -> Vec<i32> {
    ramp_with(from, to, |_| step)
}

/// Like `ramp`, with the increment chosen per point from the distance
/// already travelled.
pub fn ramp_with(from: i32, to: i32, mut step_for: impl FnMut(i32) -> i32) -> Vec<i32> {
    let dir = (to - from).signum();
    let mut out = vec![from];
    let mut v = from;
    while v != to {
        let remaining = (to - v).abs();
        let step = step_for((v - from).abs()).max(1).min(remaining);
        v += step * dir;
        out.push(v);
    }
    out
}

/// Close a one-way path into a round trip: `a..z` then back through the
/// interior points. Neither endpoint repeats when the cycle wraps.
pub fn mirrored(path: Vec<i32>) -> Vec<i32> {
    if path.len() < 3 {
        return path;
    }
    let back: Vec<i32> = path[1..path.len() - 1].iter().rev().copied().collect();
    let mut out = path;
    out.extend(back);
    out
}

/// Replays a non-empty list of positions forever.
#[derive(Debug, Clone)]
pub struct PositionCycle {
    points: Vec<i32>,
    idx: usize,
}

impl PositionCycle {
    pub fn new(points: Vec<i32>) -> Self {
        debug_assert!(!points.is_empty(), "position cycle needs at least one point");
        Self { points, idx: 0 }
    }

    /// Number of points in one full cycle.
    pub fn period(&self) -> usize {
        self.points.len()
    }

    pub fn next_position(&mut self) -> i32 {
        let v = self.points.get(self.idx).copied().unwrap_or(0);
        self.idx = (self.idx + 1) % self.points.len().max(1);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_size_clamps_to_one() {
        assert_eq!(step_size(50, 0.0), 1);
        assert_eq!(step_size(50, 0.01), 1);
        assert_eq!(step_size(50, 0.2), 10);
        assert_eq!(step_size(50, 0.239), 11);
    }

    #[test]
    fn ramp_lands_exactly_on_target_in_both_directions() {
        assert_eq!(ramp(100, 0, 30), vec![100, 70, 40, 10, 0]);
        assert_eq!(ramp(0, 100, 40), vec![0, 40, 80, 100]);
        assert_eq!(ramp(7, 7, 5), vec![7]);
    }

    #[test]
    fn mirrored_round_trip_does_not_repeat_endpoints() {
        assert_eq!(mirrored(vec![100, 50, 0]), vec![100, 50, 0, 50]);
        assert_eq!(mirrored(vec![10, 0]), vec![10, 0]);
    }

    #[test]
    fn position_cycle_wraps() {
        let mut c = PositionCycle::new(vec![3, 2, 1, 2]);
        let got: Vec<i32> = (0..6).map(|_| c.next_position()).collect();
        assert_eq!(got, vec![3, 2, 1, 2, 3, 2]);
        assert_eq!(c.period(), 4);
    }

    #[test]
    fn ramp_with_varies_increment_by_distance() {
        let path = ramp_with(0, 20, |travelled| if travelled < 10 { 2 } else { 5 });
        assert_eq!(path, vec![0, 2, 4, 6, 8, 10, 15, 20]);
    }
}
