#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Motion engine (transport-agnostic).
//!
//! Turns motion intents into paced streams of multi-axis T-code frames. All
//! device I/O goes through `stroker_traits::Transport`; all timing goes
//! through `stroker_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Mapping**: relative percent to absolute axis values (`mapper`)
//! - **Wire types**: axes, instructions, frames (`tcode`)
//! - **Generators**: parametric, never-ending frame sources (`trajectory`)
//! - **Queue**: FIFO plus session token under one lock (`queue`, `session`)
//! - **Dispatch**: paced, cancellable single consumer (`scheduler`)
//! - **Selection**: intent change to buffered horizon (`intent`, `selector`)
//!
//! Data flows one way: intent change, queue clear (new session), generator
//! pick, horizon fill, paced transmission.

pub mod config;
pub mod conversions;
pub mod error;
pub mod intent;
pub mod mapper;
pub mod mocks;
pub mod queue;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod tcode;
pub mod trajectory;
pub mod transport_error;
pub mod util;

pub use config::{Factors, SchedulerCfg, SelectorCfg, Settings, TrajectoryCfg};
pub use error::{Report, Result, StrokerError};
pub use intent::{IntentEvent, Mode, MotionIntent, SpeedUnit, StrokeUnit};
pub use mapper::{AxisRange, AxisRanges, absolute};
pub use queue::FrameQueue;
pub use scheduler::{Cycle, Dispatcher, Scheduler};
pub use selector::{FillReport, Selector, fill_horizon};
pub use session::Session;
pub use tcode::{AxisId, Frame, Instruction};
pub use trajectory::{GeneratorKind, MotionParams, Trajectory, TrajectoryGenerator};
