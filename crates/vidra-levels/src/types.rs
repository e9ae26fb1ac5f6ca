/// Level metadata as reported by the adaptive engine after manifest parsing.
///
/// Raw input to [`from_manifest`](crate::from_manifest); carries whatever the
/// manifest declared. Either field may be absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawLevel {
    /// Vertical resolution in pixels, if declared.
    pub height: Option<u32>,
    /// Average bandwidth in bits per second, if declared.
    pub bitrate_bps: Option<u64>,
}

/// One selectable quality level of a stream.
///
/// `index` is the engine's ordinal for the level and stays stable for the
/// session; the surrounding list is kept in presentation order, so list
/// position and `index` generally differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityLevel {
    /// Engine ordinal, dense from 0 in manifest order.
    pub index: usize,
    /// Vertical resolution in pixels, if known.
    pub height: Option<u32>,
    /// Average bitrate in kbps, if known.
    pub bitrate_kbps: Option<u32>,
}

impl QualityLevel {
    /// Human-readable label, e.g. `"720p (2500 kbps)"` or `"Quality 2"`.
    #[must_use]
    pub fn label(&self) -> String {
        let bitrate = self
            .bitrate_kbps
            .map(|kbps| format!(" ({kbps} kbps)"))
            .unwrap_or_default();
        match self.height {
            Some(height) => format!("{height}p{bitrate}"),
            None => format!("Quality {}{bitrate}", self.index + 1),
        }
    }
}

/// User quality preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QualityPreference {
    /// Let the engine adapt automatically.
    #[default]
    Auto,
    /// Pin a concrete engine level index.
    ByIndex(usize),
    /// Pick the level closest to a vertical resolution.
    ByHeight(u32),
}

impl QualityPreference {
    /// Check whether automatic adaptation is requested.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(QualityLevel { index: 0, height: Some(1080), bitrate_kbps: Some(5000) }, "1080p (5000 kbps)")]
    #[case(QualityLevel { index: 0, height: Some(480), bitrate_kbps: None }, "480p")]
    #[case(QualityLevel { index: 2, height: None, bitrate_kbps: Some(800) }, "Quality 3 (800 kbps)")]
    #[case(QualityLevel { index: 1, height: None, bitrate_kbps: None }, "Quality 2")]
    fn label_formats(#[case] level: QualityLevel, #[case] expected: &str) {
        assert_eq!(level.label(), expected);
    }

    #[test]
    fn preference_default_is_auto() {
        assert!(QualityPreference::default().is_auto());
        assert!(!QualityPreference::ByIndex(0).is_auto());
    }
}
