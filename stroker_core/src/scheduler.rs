//! Frame dispatch: the single consumer of the `FrameQueue` and the only
//! writer to the transport.
//!
//! [`Dispatcher`] runs one pop/write/pace cycle at a time and is driven
//! directly by tests with a `ManualClock`. [`Scheduler`] owns a dispatcher on
//! a background thread, reports the first fatal error over a channel and
//! joins the thread on `stop()` or drop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel as xch;
use stroker_traits::{Clock, Transport};

use crate::config::SchedulerCfg;
use crate::error::{Result, StrokerError};
use crate::queue::FrameQueue;
use crate::session::Session;
use crate::transport_error::map_transport_error;
use crate::util::{next_tick, remaining};

/// Outcome of one dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Queue empty; nothing was transmitted.
    Idle,
    /// Frame written and paced to its full duration.
    Completed { session: Session, duration_ms: u32 },
    /// Frame written; the queue was cleared while pacing.
    Cancelled { session: Session },
    /// Shutdown requested while pacing.
    Stopped,
}

pub struct Dispatcher<T: Transport, C: Clock> {
    queue: FrameQueue,
    transport: T,
    clock: C,
    cfg: SchedulerCfg,
    shutdown: Arc<AtomicBool>,
}

impl<T: Transport, C: Clock> Dispatcher<T, C> {
    pub fn new(queue: FrameQueue, transport: T, clock: C, cfg: SchedulerCfg) -> Self {
        Self {
            queue,
            transport,
            clock,
            cfg,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends the current pacing wait at its next poll tick.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn open(&mut self) -> core::result::Result<(), StrokerError> {
        self.transport
            .open()
            .map_err(|e| map_transport_error("open", e.as_ref()))
    }

    pub fn close(&mut self) -> core::result::Result<(), StrokerError> {
        self.transport
            .close()
            .map_err(|e| map_transport_error("close", e.as_ref()))
    }

    /// Pop the head frame, transmit it as one line and wait out its duration.
    ///
    /// The wait polls the queue session every `cfg.poll` and returns early
    /// with [`Cycle::Cancelled`] once it changes. A write failure is fatal and
    /// returned as `StrokerError::Transport`.
    pub fn run_once(&mut self) -> core::result::Result<Cycle, StrokerError> {
        let Some((frame, session)) = self.queue.pop() else {
            return Ok(Cycle::Idle);
        };
        if frame.instructions().is_empty() {
            return Err(StrokerError::State(
                "queued frame carries no instructions".into(),
            ));
        }
        let started = self.clock.now();
        self.transport
            .write(&frame.encode())
            .map_err(|e| map_transport_error("write", e.as_ref()))?;
        tracing::trace!(line = %frame, session = %session, "frame sent");

        let budget = frame.duration_ms();
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(Cycle::Stopped);
            }
            if self.queue.session() != session {
                tracing::debug!(session = %session, "pacing wait cancelled");
                return Ok(Cycle::Cancelled { session });
            }
            let left = remaining(
                budget,
                self.clock.now().saturating_duration_since(started),
            );
            if left.is_zero() {
                return Ok(Cycle::Completed {
                    session,
                    duration_ms: budget,
                });
            }
            self.clock.sleep(next_tick(self.cfg.poll, left));
        }
    }
}

/// Background dispatch loop.
pub struct Scheduler {
    failures: xch::Receiver<StrokerError>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Open `transport` and start draining `queue` on a dedicated thread.
    ///
    /// Fails up front if the transport cannot be opened. After that, the
    /// first write failure stops the loop and is delivered through
    /// [`Scheduler::failures`]. The transport is closed when the loop exits.
    pub fn start<T, C>(queue: FrameQueue, transport: T, clock: C, cfg: SchedulerCfg) -> Result<Self>
    where
        T: Transport + Send + 'static,
        C: Clock + Send + 'static,
    {
        let mut dispatcher = Dispatcher::new(queue, transport, clock, cfg);
        dispatcher.open().map_err(eyre::Report::new)?;
        let shutdown = dispatcher.shutdown_flag();
        let (tx, rx) = xch::bounded(1);

        let join_handle = std::thread::Builder::new()
            .name("stroker-dispatch".into())
            .spawn(move || {
                loop {
                    if dispatcher.shutdown.load(Ordering::Relaxed) {
                        tracing::debug!("dispatch thread received shutdown signal");
                        break;
                    }
                    match dispatcher.run_once() {
                        Ok(Cycle::Idle) => dispatcher.clock.sleep(dispatcher.cfg.poll),
                        Ok(Cycle::Stopped) => break,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "dispatch loop failed");
                            let _ = tx.try_send(e);
                            break;
                        }
                    }
                }
                if let Err(e) = dispatcher.close() {
                    tracing::warn!(error = %e, "closing transport failed");
                }
                tracing::trace!("dispatch thread exiting cleanly");
            })
            .map_err(|e| {
                eyre::Report::new(StrokerError::State(format!(
                    "spawn dispatch thread: {e}"
                )))
            })?;

        Ok(Self {
            failures: rx,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    /// Channel carrying the fatal error that ended the loop, if any.
    pub fn failures(&self) -> &xch::Receiver<StrokerError> {
        &self.failures
    }

    /// Non-blocking check for a fatal error.
    pub fn failure(&self) -> Option<StrokerError> {
        self.failures.try_recv().ok()
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Halt permanently: end the current wait, join the thread, close the
    /// transport. Returns a fatal error the loop hit and nobody collected.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            handle.join().map_err(|_| {
                eyre::Report::new(StrokerError::State("dispatch thread panicked".into()))
            })?;
        }
        match self.failures.try_recv() {
            Ok(e) => Err(eyre::Report::new(e)),
            Err(_) => Ok(()),
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("dispatch thread joined"),
                Err(e) => tracing::warn!(?e, "dispatch thread panicked during shutdown"),
            }
        }
    }
}
