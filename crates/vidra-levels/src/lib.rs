#![forbid(unsafe_code)]

//! Quality level model for adaptive streams.
//!
//! A stream exposes a set of selectable bitrate/resolution variants
//! ("levels"). This crate owns the level metadata, the presentation
//! ordering shown to users, and the pure resolution of a user preference
//! to a concrete level index.

mod order;
mod resolve;
mod types;

pub use order::{from_manifest, presentation_order};
pub use resolve::{resolve, Resolution};
pub use types::{QualityLevel, QualityPreference, RawLevel};
