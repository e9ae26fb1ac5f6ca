use url::Url;

/// A sidecar caption track attached to a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionTrack {
    pub url: Url,
    /// BCP 47 language code, e.g. `"en"`.
    pub lang: String,
    /// Display label, e.g. `"English"`.
    pub label: String,
    /// Whether the track is enabled by default.
    pub default: bool,
}

impl CaptionTrack {
    pub fn new(url: Url, lang: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url,
            lang: lang.into(),
            label: label.into(),
            default: false,
        }
    }

    /// Mark the track as enabled by default.
    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.default = true;
        self
    }
}

/// The stream a session plays. Immutable once a session is created from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackSource {
    pub url: Url,
    /// Still image shown before first frame.
    pub poster: Option<Url>,
    pub captions: Vec<CaptionTrack>,
}

impl PlaybackSource {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            poster: None,
            captions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_poster(mut self, poster: Url) -> Self {
        self.poster = Some(poster);
        self
    }

    #[must_use]
    pub fn with_caption(mut self, track: CaptionTrack) -> Self {
        self.captions.push(track);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_poster_and_captions() {
        let source = PlaybackSource::new(Url::parse("https://cdn.example/live.m3u8").unwrap())
            .with_poster(Url::parse("https://cdn.example/poster.jpg").unwrap())
            .with_caption(
                CaptionTrack::new(
                    Url::parse("https://cdn.example/en.vtt").unwrap(),
                    "en",
                    "English",
                )
                .with_default(),
            );
        assert!(source.poster.is_some());
        assert_eq!(source.captions.len(), 1);
        assert!(source.captions[0].default);
    }
}
