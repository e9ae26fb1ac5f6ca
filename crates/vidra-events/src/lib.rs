#![forbid(unsafe_code)]

//! Event plumbing for playback sessions.
//!
//! Backends speak divergent raw vocabularies ([`MediaEvent`] for a native
//! decoder, [`AdaptiveEvent`] for an adaptive engine); the session
//! normalizes both into [`EngineEvent`], published on the shared
//! [`EventBus`] and consumed by the controller's dispatch loop.

mod bus;
mod engine;
mod error;
mod event;
mod raw;
mod stats;

pub use bus::EventBus;
pub use engine::EngineEvent;
pub use error::{ClassifiedError, ErrorKind};
pub use event::Event;
pub use raw::{AdaptiveEvent, MediaEvent, RawErrorKind};
pub use stats::StatsSample;
