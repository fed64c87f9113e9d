//! Shared FIFO of frames plus the session it belongs to.
//!
//! The frames and the session live under one mutex: a clear empties the
//! queue and mints the new session atomically, and a pop hands out the frame
//! together with the session it was taken under.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::session::Session;
use crate::tcode::Frame;

#[derive(Debug, Default)]
struct QueueState {
    frames: VecDeque<Frame>,
    session: Session,
}

/// Cloneable handle to the frame queue; clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    inner: Arc<Mutex<QueueState>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the deque intact, so the state
    // stays usable.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, frame: Frame) {
        self.lock().frames.push_back(frame);
    }

    pub fn extend(&self, frames: impl IntoIterator<Item = Frame>) {
        self.lock().frames.extend(frames);
    }

    /// Drop every pending frame and start a new session; returns it.
    pub fn clear(&self) -> Session {
        let mut st = self.lock();
        st.frames.clear();
        st.session = st.session.next();
        st.session
    }

    /// Take the head frame along with the session current at the time.
    pub fn pop(&self) -> Option<(Frame, Session)> {
        let mut st = self.lock();
        let session = st.session;
        st.frames.pop_front().map(|f| (f, session))
    }

    pub fn session(&self) -> Session {
        self.lock().session
    }

    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().frames.is_empty()
    }

    /// Sum of the durations of all pending frames (ms).
    pub fn pending_duration_ms(&self) -> u64 {
        self.lock()
            .frames
            .iter()
            .map(|f| u64::from(f.duration_ms()))
            .sum()
    }
}
