#![forbid(unsafe_code)]

//! Engine session layer: binds a playback source to one of two decoding
//! strategies (native decoder or adaptive engine) and normalizes their
//! event streams behind a single session handle.

mod backend;
mod config;
mod probe;
mod session;
mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use backend::{AdaptiveEngine, Backend, BackendProvider, NativeDecoder, OutputHandle};
pub use config::{AdaptiveTuning, PreloadPolicy, SessionConfig};
pub use probe::{CapabilityProbe, StreamKind, HLS_MIME};
pub use session::{EngineSession, SessionPhase};
pub use source::{CaptionTrack, PlaybackSource};
