//! Single-frame pill count estimation.
//!
//! Packaging-specific heuristics over the detected objects of one image.
//! Every branch is deterministic; the only randomness in the whole crate
//! lives in the simulated backend.

use crate::config::RecognitionConfig;
use crate::inventory::package::PackageType;
use crate::vision::{DetectedObject, LabelAnnotation};

const PILL_KEYWORDS: [&str; 4] = ["pill", "tablet", "capsule", "medicine"];

/// Cues on a label suggesting a full, factory-sealed bottle.
const FULL_BOTTLE_KEYWORDS: [&str; 3] = ["full", "sealed", "new"];

/// True if the detected-object label names a pill-like thing.
pub fn is_pill_like(label: &str) -> bool {
    let lower = label.to_lowercase();
    PILL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Detected objects that look like individual units.
pub fn pill_like_objects<'a>(objects: &'a [DetectedObject]) -> Vec<&'a DetectedObject> {
    objects.iter().filter(|o| is_pill_like(&o.label)).collect()
}

/// Estimates how many units are visible in one image.
///
/// - `Loose`: the segmented pill count, possibly 0.
/// - `Blister`: the segmented count, floored at `blister_floor` once at
///   least `blister_detection_min` pills were individually segmented (a
///   sparse blister detection stands in for a fuller pack).
/// - `Bottle`: `bottle_full_count` on a full-bottle cue, otherwise the
///   conservative `bottle_partial_count`. The segmented count is ignored
///   entirely; bottles occlude their contents.
/// - anything else: at least 1, never zero for a detected package.
pub fn estimate_pill_count(
    package: PackageType,
    objects: &[DetectedObject],
    labels: &[LabelAnnotation],
    config: &RecognitionConfig,
) -> u32 {
    let detected = pill_like_objects(objects).len() as u32;

    match package {
        PackageType::Loose => detected,
        PackageType::Blister | PackageType::Strip => {
            if detected >= config.blister_detection_min {
                detected.max(config.blister_floor)
            } else {
                detected
            }
        }
        PackageType::Bottle => {
            let full_cue = labels.iter().any(|label| {
                let lower = label.description.to_lowercase();
                FULL_BOTTLE_KEYWORDS.iter().any(|k| lower.contains(k))
            });
            if full_cue {
                config.bottle_full_count
            } else {
                config.bottle_partial_count
            }
        }
        PackageType::Box | PackageType::Unknown => detected.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::BoundingBox;

    fn make_pills(n: usize) -> Vec<DetectedObject> {
        (0..n)
            .map(|i| {
                DetectedObject::new("Pill", 0.8, BoundingBox::new(i as f32 * 10.0, 0.0, 8.0, 8.0))
            })
            .collect()
    }

    fn make_labels(texts: &[&str]) -> Vec<LabelAnnotation> {
        texts
            .iter()
            .map(|t| LabelAnnotation::new(*t, 0.9))
            .collect()
    }

    #[test]
    fn test_is_pill_like() {
        assert!(is_pill_like("Pill"));
        assert!(is_pill_like("white tablet"));
        assert!(is_pill_like("Medicine"));
        assert!(!is_pill_like("bottle cap"));
    }

    #[test]
    fn test_loose_counts_objects() {
        let config = RecognitionConfig::default();
        let objects = make_pills(7);
        assert_eq!(
            estimate_pill_count(PackageType::Loose, &objects, &[], &config),
            7
        );
        assert_eq!(estimate_pill_count(PackageType::Loose, &[], &[], &config), 0);
    }

    #[test]
    fn test_blister_floor_kicks_in_at_five() {
        let config = RecognitionConfig::default();
        assert_eq!(
            estimate_pill_count(PackageType::Blister, &make_pills(5), &[], &config),
            10
        );
        assert_eq!(
            estimate_pill_count(PackageType::Blister, &make_pills(4), &[], &config),
            4
        );
        // Already above the floor: keep the real count.
        assert_eq!(
            estimate_pill_count(PackageType::Blister, &make_pills(14), &[], &config),
            14
        );
    }

    #[test]
    fn test_bottle_ignores_object_count() {
        let config = RecognitionConfig::default();
        assert_eq!(
            estimate_pill_count(PackageType::Bottle, &make_pills(3), &[], &config),
            15
        );
        let labels = make_labels(&["full pill bottle"]);
        assert_eq!(
            estimate_pill_count(PackageType::Bottle, &make_pills(3), &labels, &config),
            30
        );
    }

    #[test]
    fn test_unknown_never_zero() {
        let config = RecognitionConfig::default();
        assert_eq!(
            estimate_pill_count(PackageType::Unknown, &[], &[], &config),
            1
        );
        assert_eq!(
            estimate_pill_count(PackageType::Box, &make_pills(3), &[], &config),
            3
        );
    }
}
