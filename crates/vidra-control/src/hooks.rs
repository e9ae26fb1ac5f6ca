use vidra_events::{ClassifiedError, StatsSample};
use vidra_levels::QualityLevel;

/// Optional caller callbacks, invoked from the dispatch loop.
///
/// Each hook fires after the state store already reflects the event. The
/// failure hook is the sole escape hatch for caller-level error reporting;
/// the controller never panics across its public surface.
#[derive(Default)]
pub struct PlayerHooks {
    pub on_ready: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_play: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_pause: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_ended: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&ClassifiedError) + Send + Sync>>,
    pub on_quality_changed: Option<Box<dyn Fn(QualityLevel) + Send + Sync>>,
    pub on_stats: Option<Box<dyn Fn(StatsSample) + Send + Sync>>,
}

impl PlayerHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_on_ready(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_on_play(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_play = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_on_pause(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_pause = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_on_ended(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ended = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_on_error(
        mut self,
        hook: impl Fn(&ClassifiedError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_on_quality_changed(
        mut self,
        hook: impl Fn(QualityLevel) + Send + Sync + 'static,
    ) -> Self {
        self.on_quality_changed = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_on_stats(mut self, hook: impl Fn(StatsSample) + Send + Sync + 'static) -> Self {
        self.on_stats = Some(Box::new(hook));
        self
    }

    pub(crate) fn ready(&self) {
        if let Some(hook) = &self.on_ready {
            hook();
        }
    }

    pub(crate) fn play(&self) {
        if let Some(hook) = &self.on_play {
            hook();
        }
    }

    pub(crate) fn pause(&self) {
        if let Some(hook) = &self.on_pause {
            hook();
        }
    }

    pub(crate) fn ended(&self) {
        if let Some(hook) = &self.on_ended {
            hook();
        }
    }

    pub(crate) fn error(&self, error: &ClassifiedError) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }

    pub(crate) fn quality_changed(&self, level: QualityLevel) {
        if let Some(hook) = &self.on_quality_changed {
            hook(level);
        }
    }

    pub(crate) fn stats(&self, sample: StatsSample) {
        if let Some(hook) = &self.on_stats {
            hook(sample);
        }
    }
}

impl std::fmt::Debug for PlayerHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHooks")
            .field("on_ready", &self.on_ready.is_some())
            .field("on_play", &self.on_play.is_some())
            .field("on_pause", &self.on_pause.is_some())
            .field("on_ended", &self.on_ended.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_quality_changed", &self.on_quality_changed.is_some())
            .field("on_stats", &self.on_stats.is_some())
            .finish()
    }
}
