use url::Url;

/// MIME type of an HLS manifest.
pub const HLS_MIME: &str = "application/vnd.apple.mpegurl";

/// Detected stream kind from URL analysis.
///
/// URLs whose path ends with `.m3u8` are HLS manifests; everything else is
/// treated as progressive media.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    HlsManifest,
    Progressive,
}

impl StreamKind {
    #[must_use]
    pub fn detect(url: &Url) -> Self {
        if url.path().ends_with(".m3u8") {
            Self::HlsManifest
        } else {
            Self::Progressive
        }
    }

    /// MIME hint fed to the capability probe.
    #[must_use]
    pub fn mime_hint(&self) -> &'static str {
        match self {
            Self::HlsManifest => HLS_MIME,
            Self::Progressive => "video/mp4",
        }
    }
}

/// Host-provided capability check.
///
/// Pure and synchronous: a throwaway "can the runtime decode this format
/// directly" query, no network I/O. The answer picks the session's
/// decoding strategy.
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = CapabilityProbeMock)
)]
pub trait CapabilityProbe: Send + Sync + 'static {
    fn supports_native(&self, mime_hint: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://cdn.example/stream/master.m3u8", StreamKind::HlsManifest)]
    #[case("https://cdn.example/stream/master.m3u8?token=abc", StreamKind::HlsManifest)]
    #[case("https://cdn.example/video.mp4", StreamKind::Progressive)]
    #[case("https://cdn.example/m3u8/clip.ts", StreamKind::Progressive)]
    fn detects_kind_from_path(#[case] url: &str, #[case] expected: StreamKind) {
        assert_eq!(StreamKind::detect(&Url::parse(url).unwrap()), expected);
    }

    #[test]
    fn hls_mime_hint() {
        assert_eq!(StreamKind::HlsManifest.mime_hint(), HLS_MIME);
    }
}
