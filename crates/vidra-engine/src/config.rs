use vidra_levels::QualityPreference;

/// Preload policy passed through to the output element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreloadPolicy {
    None,
    #[default]
    Metadata,
    Auto,
}

/// Pass-through tuning for the adaptive engine.
///
/// Ignored under native playback; no controller-side validation beyond
/// type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdaptiveTuning {
    /// Offload demuxing to a worker where the engine supports it.
    pub worker: bool,
    /// Cap the selected level to the player's rendered size.
    pub cap_level_to_player_size: bool,
    /// Level index the engine starts on; -1 lets it choose.
    pub start_level: i64,
    /// Prefer low-latency streaming behavior.
    pub low_latency: bool,
}

impl Default for AdaptiveTuning {
    fn default() -> Self {
        Self {
            worker: true,
            cap_level_to_player_size: true,
            start_level: -1,
            low_latency: false,
        }
    }
}

/// Session configuration.
///
/// Element-level hints (`autoplay`, `muted`, `plays_inline`, `preload`)
/// pass straight through to the output element; `initial_quality` seeds the
/// quality resolver once the level set is known.
///
/// # Example
///
/// ```
/// use vidra_engine::SessionConfig;
/// use vidra_levels::QualityPreference;
///
/// let config = SessionConfig::new()
///     .with_autoplay(true)
///     .with_initial_quality(QualityPreference::ByHeight(720));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub autoplay: bool,
    pub muted: bool,
    pub plays_inline: bool,
    pub preload: PreloadPolicy,
    pub initial_quality: QualityPreference,
    pub adaptive: AdaptiveTuning,
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plays_inline: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    #[must_use]
    pub fn with_plays_inline(mut self, plays_inline: bool) -> Self {
        self.plays_inline = plays_inline;
        self
    }

    #[must_use]
    pub fn with_preload(mut self, preload: PreloadPolicy) -> Self {
        self.preload = preload;
        self
    }

    #[must_use]
    pub fn with_initial_quality(mut self, preference: QualityPreference) -> Self {
        self.initial_quality = preference;
        self
    }

    #[must_use]
    pub fn with_adaptive(mut self, tuning: AdaptiveTuning) -> Self {
        self.adaptive = tuning;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_match_element_defaults() {
        let config = SessionConfig::new();
        assert!(!config.autoplay);
        assert!(!config.muted);
        assert!(config.plays_inline);
        assert_eq!(config.preload, PreloadPolicy::Metadata);
        assert!(config.initial_quality.is_auto());
        assert!(config.adaptive.worker);
        assert!(config.adaptive.cap_level_to_player_size);
        assert_eq!(config.adaptive.start_level, -1);
        assert!(!config.adaptive.low_latency);
    }

    #[test]
    fn builder_overrides() {
        let config = SessionConfig::new()
            .with_muted(true)
            .with_preload(PreloadPolicy::Auto)
            .with_adaptive(AdaptiveTuning {
                low_latency: true,
                ..AdaptiveTuning::default()
            });
        assert!(config.muted);
        assert_eq!(config.preload, PreloadPolicy::Auto);
        assert!(config.adaptive.low_latency);
    }
}
