//! Fill-ahead selection: turn each intent change into a buffered horizon of
//! frames from one randomly chosen generator.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::config::Settings;
use crate::error::{Report, Result};
use crate::intent::{IntentEvent, MotionIntent, Mode};
use crate::queue::FrameQueue;
use crate::session::Session;
use crate::trajectory::{GeneratorKind, MotionParams, Trajectory, TrajectoryGenerator};

/// What a single intent change put on the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    /// Session minted by the clear that preceded the fill.
    pub session: Session,
    /// `None` when the intent called for no motion.
    pub pattern: Option<GeneratorKind>,
    pub frames: usize,
    pub total_ms: u64,
}

/// Pull frames from `generator` into `queue` until their durations add up to
/// at least `horizon_ms`. Returns the frame count and the summed duration.
pub fn fill_horizon<G: TrajectoryGenerator + ?Sized>(
    queue: &FrameQueue,
    generator: &mut G,
    horizon_ms: u64,
) -> (usize, u64) {
    let mut frames = 0;
    let mut total = 0u64;
    while total < horizon_ms {
        let frame = generator.next_frame();
        let d = u64::from(frame.duration_ms());
        if d == 0 {
            tracing::warn!(line = %frame, "zero-length frame; horizon fill stopped");
            break;
        }
        total += d;
        queue.push(frame);
        frames += 1;
    }
    (frames, total)
}

/// Sole producer for the frame queue.
pub struct Selector<R: Rng = StdRng> {
    queue: FrameQueue,
    settings: Settings,
    intent: MotionIntent,
    rng: R,
}

impl Selector<StdRng> {
    pub fn new(queue: FrameQueue, settings: Settings) -> Self {
        Self::with_rng(queue, settings, StdRng::from_os_rng())
    }
}

impl<R: Rng> Selector<R> {
    pub fn with_rng(queue: FrameQueue, settings: Settings, rng: R) -> Self {
        Self {
            queue,
            settings,
            intent: MotionIntent::default(),
            rng,
        }
    }

    pub fn current_intent(&self) -> MotionIntent {
        self.intent
    }

    /// Generators a fill may pick from; the composite oscillator is always
    /// among them.
    pub fn candidates(&self) -> Vec<GeneratorKind> {
        let mut kinds = vec![GeneratorKind::Costumed];
        for kind in &self.settings.selector.optional {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    /// Fold an event into the remembered intent and refill.
    pub fn apply(&mut self, event: IntentEvent) -> Result<FillReport> {
        let mut next = self.intent;
        next.apply(event, &self.settings.factors)
            .map_err(Report::new)?;
        self.on_intent_change(next)
    }

    /// Replace the queued motion with motion for `intent`.
    ///
    /// An accepted intent always clears the queue before anything is pushed,
    /// which also cancels the frame being paced. Nothing is queued unless the intent is running with a non-zero
    /// speed over a non-empty stroke window. A halting intent is remembered
    /// with speed 0.
    ///
    /// A rejected intent (stroke outside 0..=100, or a stroke window that maps
    /// to a single position) leaves the queue and the remembered intent alone.
    pub fn on_intent_change(&mut self, mut intent: MotionIntent) -> Result<FillReport> {
        intent.validate().map_err(Report::new)?;
        if intent.mode == Mode::Halting {
            intent.speed = 0;
        }

        let picked = if intent.is_active() {
            let back = self.rng.random_range(0..=50);
            let forth = self.rng.random_range(50..=100);
            let candidates = self.candidates();
            match candidates.choose(&mut self.rng) {
                Some(&kind) => {
                    let params = MotionParams {
                        top: intent.stroke_top,
                        bottom: intent.stroke_bottom,
                        back,
                        forth,
                        speed: intent.speed,
                    };
                    let trajectory = Trajectory::build(
                        kind,
                        &params,
                        &self.settings.ranges,
                        self.settings.trajectory,
                        &mut self.rng,
                    )
                    .map_err(Report::new)?;
                    Some((kind, trajectory, back, forth))
                }
                None => None,
            }
        } else {
            None
        };

        self.intent = intent;
        let session = self.queue.clear();
        tracing::info!(intent = %intent, session = %session, "intent changed");

        let Some((kind, mut trajectory, back, forth)) = picked else {
            return Ok(FillReport {
                session,
                pattern: None,
                frames: 0,
                total_ms: 0,
            });
        };

        let (frames, total_ms) =
            fill_horizon(&self.queue, &mut trajectory, self.settings.selector.horizon_ms);
        tracing::info!(
            pattern = %kind,
            frames,
            total_ms,
            back,
            forth,
            session = %session,
            "queue filled"
        );
        Ok(FillReport {
            session,
            pattern: Some(kind),
            frames,
            total_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_always_include_the_composite_once() {
        let mut settings = Settings::default();
        settings.selector.optional = vec![
            GeneratorKind::Tempest,
            GeneratorKind::Costumed,
            GeneratorKind::Tempest,
        ];
        let s = Selector::with_rng(FrameQueue::new(), settings, StdRng::seed_from_u64(1));
        assert_eq!(
            s.candidates(),
            vec![GeneratorKind::Costumed, GeneratorKind::Tempest]
        );
    }
}
