#![forbid(unsafe_code)]

//! Playback controller: reconciles engine events, user input, and failure
//! recovery into one consistent, UI-observable state record.

mod controller;
mod debounce;
mod error;
mod hooks;
mod keys;
mod recovery;
mod sampler;
mod state;

pub use controller::PlayerController;
pub use debounce::{Debouncer, InputChannel, DEBOUNCE_WINDOW};
pub use error::PlayerError;
pub use hooks::PlayerHooks;
pub use keys::Key;
pub use recovery::{RecoveryAction, RecoveryMachine, RecoveryState};
pub use sampler::STATS_INTERVAL;
pub use state::PlaybackState;
