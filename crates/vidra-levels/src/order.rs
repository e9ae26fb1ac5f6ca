use std::cmp::Ordering;

use crate::types::{QualityLevel, RawLevel};

/// Sort levels into presentation order, in place.
///
/// Order: height descending; equal heights break ties by bitrate
/// descending; levels without a height sort last, among themselves by
/// bitrate descending. The sort is stable, so applying it twice yields the
/// same sequence. This is a presentation contract only — engine indices are
/// untouched.
pub fn presentation_order(levels: &mut [QualityLevel]) {
    levels.sort_by(compare);
}

fn compare(a: &QualityLevel, b: &QualityLevel) -> Ordering {
    match (a.height, b.height) {
        (Some(ha), Some(hb)) => hb
            .cmp(&ha)
            .then_with(|| bitrate_desc(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => bitrate_desc(a, b),
    }
}

fn bitrate_desc(a: &QualityLevel, b: &QualityLevel) -> Ordering {
    b.bitrate_kbps
        .unwrap_or(0)
        .cmp(&a.bitrate_kbps.unwrap_or(0))
}

/// Build the session's level set from manifest-reported levels.
///
/// Engine indices follow manifest order (dense from 0); bitrates are
/// rounded to kbps; the returned list is in presentation order.
#[must_use]
pub fn from_manifest(raw: &[RawLevel]) -> Vec<QualityLevel> {
    let mut levels: Vec<QualityLevel> = raw
        .iter()
        .enumerate()
        .map(|(index, level)| QualityLevel {
            index,
            height: level.height,
            bitrate_kbps: level
                .bitrate_bps
                .map(|bps| ((bps as f64) / 1000.0).round() as u32),
        })
        .collect();
    presentation_order(&mut levels);
    levels
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn level(index: usize, height: Option<u32>, bitrate_kbps: Option<u32>) -> QualityLevel {
        QualityLevel {
            index,
            height,
            bitrate_kbps,
        }
    }

    #[test]
    fn sorts_by_height_descending() {
        let mut levels = vec![
            level(0, Some(360), Some(800)),
            level(1, Some(720), Some(2500)),
            level(2, Some(1080), Some(5000)),
        ];
        presentation_order(&mut levels);
        let heights: Vec<_> = levels.iter().map(|l| l.height).collect();
        assert_eq!(heights, vec![Some(1080), Some(720), Some(360)]);
        // Engine indices survive the reorder.
        let indices: Vec<_> = levels.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[test]
    fn equal_heights_break_ties_by_bitrate_descending() {
        let mut levels = vec![
            level(0, Some(720), Some(1500)),
            level(1, Some(720), Some(3000)),
        ];
        presentation_order(&mut levels);
        assert_eq!(levels[0].index, 1);
        assert_eq!(levels[1].index, 0);
    }

    #[test]
    fn unresolved_heights_sort_last_by_bitrate_descending() {
        let mut levels = vec![
            level(0, None, Some(900)),
            level(1, Some(360), Some(700)),
            level(2, None, Some(1800)),
        ];
        presentation_order(&mut levels);
        assert_eq!(levels[0].index, 1);
        assert_eq!(levels[1].index, 2);
        assert_eq!(levels[2].index, 0);
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![level(0, Some(1080), Some(5000))])]
    #[case(vec![
        level(0, Some(360), Some(800)),
        level(1, None, Some(600)),
        level(2, Some(720), Some(2500)),
        level(3, Some(720), Some(1200)),
        level(4, None, None),
    ])]
    fn sort_is_idempotent(#[case] mut levels: Vec<QualityLevel>) {
        presentation_order(&mut levels);
        let once = levels.clone();
        presentation_order(&mut levels);
        assert_eq!(levels, once);
    }

    #[test]
    fn sort_is_stable_for_fully_equal_levels() {
        // Identical metadata keeps manifest order.
        let mut levels = vec![
            level(0, Some(480), Some(1000)),
            level(1, Some(480), Some(1000)),
        ];
        presentation_order(&mut levels);
        assert_eq!(levels[0].index, 0);
        assert_eq!(levels[1].index, 1);
    }

    #[test]
    fn from_manifest_rounds_bitrates_and_sorts() {
        let raw = vec![
            RawLevel {
                height: Some(360),
                bitrate_bps: Some(812_345),
            },
            RawLevel {
                height: Some(1080),
                bitrate_bps: Some(4_999_600),
            },
            RawLevel {
                height: None,
                bitrate_bps: None,
            },
        ];
        let levels = from_manifest(&raw);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].index, 1);
        assert_eq!(levels[0].bitrate_kbps, Some(5000));
        assert_eq!(levels[1].index, 0);
        assert_eq!(levels[1].bitrate_kbps, Some(812));
        assert_eq!(levels[2].index, 2);
        assert_eq!(levels[2].bitrate_kbps, None);
    }
}
