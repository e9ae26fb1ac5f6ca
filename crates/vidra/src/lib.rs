#![forbid(unsafe_code)]

//! # Vidra
//!
//! Adaptive streaming playback controller: wraps either a native decoder
//! or a software adaptive-bitrate engine behind one uniform imperative
//! control surface, reconciles asynchronous engine events into a single
//! consistent state record, recovers from transient failures, and
//! collapses conflicting user input into well-ordered effects.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use vidra::prelude::*;
//!
//! let controller = PlayerController::new(probe, provider, PlayerHooks::new());
//! let source = PlaybackSource::new("https://cdn.example/stream.m3u8".parse()?);
//! controller.load_source(source, SessionConfig::new())?;
//! controller.play()?;
//! ```
//!
//! The host supplies the two integration points: a [`CapabilityProbe`]
//! answering whether the runtime decodes the format natively, and a
//! [`BackendProvider`] constructing the concrete decoder/engine.
//!
//! [`CapabilityProbe`]: vidra_engine::CapabilityProbe
//! [`BackendProvider`]: vidra_engine::BackendProvider

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod control {
    pub use vidra_control::*;
}

pub mod engine {
    pub use vidra_engine::*;
}

pub mod events {
    pub use vidra_events::*;
}

pub mod levels {
    pub use vidra_levels::*;
}

pub use vidra_control::{PlaybackState, PlayerController, PlayerHooks};
pub use vidra_engine::{PlaybackSource, SessionConfig};

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use vidra_control::{
        InputChannel, Key, PlaybackState, PlayerController, PlayerError, PlayerHooks,
    };
    pub use vidra_engine::{
        BackendProvider, CapabilityProbe, CaptionTrack, PlaybackSource, SessionConfig,
    };
    pub use vidra_events::{ClassifiedError, EngineEvent, ErrorKind, Event, StatsSample};
    pub use vidra_levels::{QualityLevel, QualityPreference};
}
