use crate::types::{QualityLevel, QualityPreference};

/// Outcome of resolving a quality preference against the current level set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Hand control back to the engine (sentinel index -1).
    Auto,
    /// Pin the engine to this level index.
    Apply(usize),
    /// Preference cannot be honored; leave the engine untouched.
    NoOp,
}

/// Resolve a preference to a concrete engine level index.
///
/// Pure function of the current level set; carries no state between calls.
///
/// - `Auto` always resolves to [`Resolution::Auto`].
/// - `ByIndex(i)` is accepted only when `i` is within the level set.
/// - `ByHeight(h)` prefers an exact height match, otherwise the smallest
///   `|height - h|` among levels that report a height; ties go to the level
///   encountered first in the presentation-ordered list (the higher-bitrate
///   one). Levels without a height never match.
#[must_use]
pub fn resolve(preference: QualityPreference, levels: &[QualityLevel]) -> Resolution {
    match preference {
        QualityPreference::Auto => Resolution::Auto,
        QualityPreference::ByIndex(index) => {
            if index < levels.len() {
                Resolution::Apply(index)
            } else {
                tracing::warn!(index, available = levels.len(), "level index out of range");
                Resolution::NoOp
            }
        }
        QualityPreference::ByHeight(height) => {
            let mut best: Option<(usize, u32)> = None;
            for level in levels {
                let Some(level_height) = level.height else {
                    continue;
                };
                let distance = level_height.abs_diff(height);
                if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                    best = Some((level.index, distance));
                }
            }
            match best {
                Some((index, _)) => Resolution::Apply(index),
                None => {
                    tracing::warn!(height, "no level reports a height");
                    Resolution::NoOp
                }
            }
        }
    }
}
