//! Video aggregation.
//!
//! Merges per-frame object-tracking samples into one robust estimate for
//! a clip. Individual frames are noisy (pills occlude each other as the
//! package is turned), so the result carries both a rounded mean and a
//! median over the per-second counts.

use serde::Serialize;

use crate::catalog::KnownMedication;
use crate::config::RecognitionConfig;
use crate::inventory::count::is_pill_like;
use crate::inventory::package::{classify_package, PackageType};
use crate::inventory::resolve_medication_name;
use crate::vision::{geometry, DetectedObject, LabelAnnotation, RecognizedElement};
use std::collections::BTreeMap;

/// Seconds at which fallback samples are synthesized when tracking
/// produced no usable frames.
const FALLBACK_OFFSETS_SECS: [u64; 3] = [0, 4, 8];

/// One time-bucketed pill-count observation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSample {
    /// Whole-second offset, e.g. "4s".
    pub time_offset: String,
    pub count: u32,
    pub confidence: f32,
}

/// Aggregated estimate for one video clip.
#[derive(Clone, Debug, Serialize)]
pub struct VideoEstimate {
    pub medication_name: String,
    /// Non-empty, ascending by time offset.
    pub frames: Vec<FrameSample>,
    pub average_count: u32,
    pub median_count: u32,
    pub confidence: f32,
    pub package_type: PackageType,
}

/// Aggregates tracked objects from one clip into a `VideoEstimate`.
///
/// Occurrences of pill-like tracks are bucketed by flooring their time
/// offset to the whole second; each non-empty bucket becomes one frame
/// sample with the bucket's occurrence count and mean confidence. When no
/// bucket exists at all, three fallback samples are synthesized around a
/// base count derived from the raw track volume, so the aggregate
/// functions always see a non-empty sequence.
pub fn estimate_inventory_from_video(
    tracks: &[DetectedObject],
    text_blocks: &[RecognizedElement],
    labels: &[LabelAnnotation],
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> VideoEstimate {
    let mut buckets: BTreeMap<u64, Vec<f32>> = BTreeMap::new();
    for track in tracks.iter().filter(|t| is_pill_like(&t.label)) {
        for occurrence in &track.frames {
            let second = occurrence.time_offset_secs.max(0.0).floor() as u64;
            buckets
                .entry(second)
                .or_default()
                .push(occurrence.confidence);
        }
    }

    let frames: Vec<FrameSample> = if buckets.is_empty() {
        log::debug!("no tracked pill frames, synthesizing fallback samples");
        fallback_frames(tracks.len(), config)
    } else {
        buckets
            .into_iter()
            .map(|(second, confidences)| FrameSample {
                time_offset: geometry::format_time_offset(second),
                count: confidences.len() as u32,
                confidence: geometry::mean_confidence(&confidences),
            })
            .collect()
    };

    let counts: Vec<u32> = frames.iter().map(|f| f.count).collect();
    let confidences: Vec<f32> = frames.iter().map(|f| f.confidence).collect();

    VideoEstimate {
        medication_name: resolve_medication_name(
            text_blocks.iter().map(|t| t.text.as_str()),
            catalog,
        ),
        average_count: geometry::rounded_mean(&counts),
        median_count: geometry::median(&counts).round() as u32,
        confidence: geometry::mean_confidence(&confidences),
        package_type: classify_package(labels, tracks),
        frames,
    }
}

/// Three synthetic samples at fixed offsets around a base count taken
/// from the raw object-annotation volume (at least 1).
fn fallback_frames(raw_track_count: usize, config: &RecognitionConfig) -> Vec<FrameSample> {
    let base = (raw_track_count as u32).max(1);
    let counts = [base, base + 1, base.saturating_sub(1).max(1)];
    FALLBACK_OFFSETS_SECS
        .iter()
        .zip(counts)
        .map(|(&secs, count)| FrameSample {
            time_offset: geometry::format_time_offset(secs),
            count,
            confidence: config.fallback_frame_confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{BoundingBox, FrameOccurrence};

    fn make_track(label: &str, offsets: &[(f64, f32)]) -> DetectedObject {
        let mut track = DetectedObject::new(label, 0.8, BoundingBox::default());
        track.frames = offsets
            .iter()
            .map(|&(time_offset_secs, confidence)| FrameOccurrence {
                time_offset_secs,
                confidence,
            })
            .collect();
        track
    }

    fn aspirin_catalog() -> Vec<KnownMedication> {
        vec![KnownMedication::new("Aspirin")]
    }

    #[test]
    fn test_bucketing_by_whole_second() {
        let config = RecognitionConfig::default();
        // Two pills visible in second 0, one in second 1.
        let tracks = vec![
            make_track("Pill", &[(0.1, 0.8), (1.5, 0.6)]),
            make_track("Pill", &[(0.9, 0.7)]),
        ];
        let estimate = estimate_inventory_from_video(&tracks, &[], &[], &aspirin_catalog(), &config);

        assert_eq!(estimate.frames.len(), 2);
        assert_eq!(estimate.frames[0].time_offset, "0s");
        assert_eq!(estimate.frames[0].count, 2);
        assert!((estimate.frames[0].confidence - 0.75).abs() < 1e-6);
        assert_eq!(estimate.frames[1].time_offset, "1s");
        assert_eq!(estimate.frames[1].count, 1);
    }

    #[test]
    fn test_median_and_average_of_8_10_9() {
        let config = RecognitionConfig::default();
        // 8 occurrences in second 0, 10 in second 1, 9 in second 2.
        let offsets: Vec<(f64, f32)> = (0..8)
            .map(|_| (0.5, 0.8))
            .chain((0..10).map(|_| (1.5, 0.8)))
            .chain((0..9).map(|_| (2.5, 0.8)))
            .collect();
        let tracks = vec![make_track("Pill", &offsets)];
        let estimate = estimate_inventory_from_video(&tracks, &[], &[], &aspirin_catalog(), &config);

        let counts: Vec<u32> = estimate.frames.iter().map(|f| f.count).collect();
        assert_eq!(counts, vec![8, 10, 9]);
        assert_eq!(estimate.median_count, 9);
        assert_eq!(estimate.average_count, 9);
    }

    #[test]
    fn test_non_pill_tracks_ignored() {
        let config = RecognitionConfig::default();
        let tracks = vec![
            make_track("Hand", &[(0.0, 0.9)]),
            make_track("Tablet", &[(0.0, 0.9)]),
        ];
        let estimate = estimate_inventory_from_video(&tracks, &[], &[], &aspirin_catalog(), &config);
        assert_eq!(estimate.frames.len(), 1);
        assert_eq!(estimate.frames[0].count, 1);
    }

    #[test]
    fn test_fallback_when_no_frames() {
        let config = RecognitionConfig::default();
        // Tracks exist but carry no timed occurrences.
        let tracks = vec![make_track("Pill", &[]), make_track("Pill", &[])];
        let estimate = estimate_inventory_from_video(&tracks, &[], &[], &aspirin_catalog(), &config);

        assert_eq!(estimate.frames.len(), 3);
        let offsets: Vec<&str> = estimate
            .frames
            .iter()
            .map(|f| f.time_offset.as_str())
            .collect();
        assert_eq!(offsets, vec!["0s", "4s", "8s"]);
        for frame in &estimate.frames {
            assert!(frame.count >= 1);
            assert_eq!(frame.confidence, 0.7);
        }
        // Base count is the raw track volume.
        assert_eq!(estimate.frames[0].count, 2);
        assert!(estimate.median_count >= 1);
    }

    #[test]
    fn test_fallback_with_zero_tracks() {
        let config = RecognitionConfig::default();
        let estimate = estimate_inventory_from_video(&[], &[], &[], &aspirin_catalog(), &config);
        assert_eq!(estimate.frames.len(), 3);
        assert_eq!(estimate.frames[0].count, 1);
    }

    #[test]
    fn test_medication_resolution_rules() {
        let config = RecognitionConfig::default();
        let text = vec![RecognizedElement::new(
            "Aspirin 100mg",
            0.9,
            BoundingBox::default(),
        )];
        let catalog = vec![
            KnownMedication::new("Aspirin"),
            KnownMedication::new("Ibuprofen"),
        ];
        let estimate = estimate_inventory_from_video(&[], &text, &[], &catalog, &config);
        assert_eq!(estimate.medication_name, "Aspirin");

        // No text match, single-entry catalog: attribute to it.
        let estimate = estimate_inventory_from_video(&[], &[], &[], &aspirin_catalog(), &config);
        assert_eq!(estimate.medication_name, "Aspirin");

        // No text match, several known: placeholder.
        let estimate = estimate_inventory_from_video(&[], &[], &[], &catalog, &config);
        assert_eq!(estimate.medication_name, "unknown medication");
    }

    #[test]
    fn test_package_type_from_labels() {
        let config = RecognitionConfig::default();
        let labels = vec![LabelAnnotation::new("pill bottle", 0.9)];
        let estimate = estimate_inventory_from_video(&[], &[], &labels, &aspirin_catalog(), &config);
        assert_eq!(estimate.package_type, PackageType::Bottle);
    }
}
