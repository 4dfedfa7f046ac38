//! Inventory estimation from images and video.

pub mod count;
pub mod package;
pub mod video;

pub use count::estimate_pill_count;
pub use package::{classify_package, PackageType};
pub use video::{estimate_inventory_from_video, FrameSample, VideoEstimate};

use serde::Serialize;
use std::collections::BTreeSet;

use crate::catalog::KnownMedication;
use crate::chart::anchors::matches_medication_label;
use crate::config::RecognitionConfig;
use crate::vision::{geometry, DetectedObject, LabelAnnotation, RecognizedElement};

/// Attribution used when no recognized text matches the catalog and more
/// than one medication is known.
pub const UNKNOWN_MEDICATION: &str = "unknown medication";

/// Color words recognized on labels and object names. Pill colors help
/// the user confirm the right medication was photographed.
const COLOR_WORDS: [&str; 12] = [
    "white", "red", "blue", "green", "yellow", "orange", "pink", "brown", "purple", "black",
    "gray", "grey",
];

/// Confidence assumed when neither objects nor labels contributed any.
const NEUTRAL_CONFIDENCE: f32 = 0.5;

/// Best-effort unit count derived from one image.
#[derive(Clone, Debug, Serialize)]
pub struct PillCountEstimate {
    pub package_type: PackageType,
    pub estimated_count: u32,
    pub confidence: f32,
    pub colors: BTreeSet<String>,
    pub ocr_text: Vec<String>,
}

/// Image inventory result: the count estimate plus the medication it was
/// attributed to.
#[derive(Clone, Debug, Serialize)]
pub struct ImageInventoryEstimate {
    pub medication_name: String,
    #[serde(flatten)]
    pub estimate: PillCountEstimate,
}

/// Runs the single-frame inventory pipeline: classify the packaging,
/// estimate the unit count, collect color cues and raw OCR text, and
/// attribute the result to a catalog medication.
pub fn estimate_inventory_from_image(
    elements: &[RecognizedElement],
    objects: &[DetectedObject],
    labels: &[LabelAnnotation],
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> ImageInventoryEstimate {
    let package_type = classify_package(labels, objects);
    let estimated_count = estimate_pill_count(package_type, objects, labels, config);

    let pill_confidences: Vec<f32> = count::pill_like_objects(objects)
        .iter()
        .map(|o| o.confidence)
        .collect();
    let confidence = if !pill_confidences.is_empty() {
        geometry::mean_confidence(&pill_confidences)
    } else if !labels.is_empty() {
        let label_confidences: Vec<f32> = labels.iter().map(|l| l.confidence).collect();
        geometry::mean_confidence(&label_confidences)
    } else {
        NEUTRAL_CONFIDENCE
    };

    log::debug!(
        "image inventory: package={} count={} confidence={:.2}",
        package_type.as_str(),
        estimated_count,
        confidence
    );

    ImageInventoryEstimate {
        medication_name: resolve_medication_name(elements.iter().map(|e| e.text.as_str()), catalog),
        estimate: PillCountEstimate {
            package_type,
            estimated_count,
            confidence,
            colors: collect_colors(objects, labels),
            ocr_text: elements.iter().map(|e| e.text.clone()).collect(),
        },
    }
}

/// Pools recognized text and attributes it to a catalog medication:
/// first textual match wins; with no match a single-entry catalog claims
/// the result; otherwise the placeholder label is used.
pub fn resolve_medication_name<'a>(
    texts: impl Iterator<Item = &'a str>,
    catalog: &[KnownMedication],
) -> String {
    let pooled: Vec<String> = texts.map(|t| t.to_lowercase()).collect();
    for medication in catalog {
        let name_lower = medication.name.to_lowercase();
        if name_lower.is_empty() {
            continue;
        }
        if pooled
            .iter()
            .any(|text| matches_medication_label(text, &name_lower))
        {
            return medication.name.clone();
        }
    }
    if catalog.len() == 1 {
        return catalog[0].name.clone();
    }
    UNKNOWN_MEDICATION.to_string()
}

/// Color words appearing in object names or scene labels.
fn collect_colors(objects: &[DetectedObject], labels: &[LabelAnnotation]) -> BTreeSet<String> {
    let mut colors = BTreeSet::new();
    let texts = objects
        .iter()
        .map(|o| o.label.to_lowercase())
        .chain(labels.iter().map(|l| l.description.to_lowercase()));
    for text in texts {
        for color in COLOR_WORDS {
            if text.contains(color) {
                colors.insert(color.to_string());
            }
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::BoundingBox;

    fn make_pill(label: &str, confidence: f32) -> DetectedObject {
        DetectedObject::new(label, confidence, BoundingBox::default())
    }

    #[test]
    fn test_image_estimate_loose_pills() {
        let config = RecognitionConfig::default();
        let objects = vec![
            make_pill("white pill", 0.8),
            make_pill("white pill", 0.6),
        ];
        let labels = vec![LabelAnnotation::new("tablet", 0.9)];
        let elements = vec![RecognizedElement::new(
            "Aspirin",
            0.9,
            BoundingBox::default(),
        )];
        let catalog = vec![KnownMedication::new("Aspirin")];

        let result = estimate_inventory_from_image(&elements, &objects, &labels, &catalog, &config);
        assert_eq!(result.medication_name, "Aspirin");
        assert_eq!(result.estimate.package_type, PackageType::Loose);
        assert_eq!(result.estimate.estimated_count, 2);
        assert!((result.estimate.confidence - 0.7).abs() < 1e-6);
        assert!(result.estimate.colors.contains("white"));
        assert_eq!(result.estimate.ocr_text, vec!["Aspirin".to_string()]);
    }

    #[test]
    fn test_confidence_falls_back_to_labels() {
        let config = RecognitionConfig::default();
        let labels = vec![LabelAnnotation::new("pill bottle", 0.6)];
        let result = estimate_inventory_from_image(&[], &[], &labels, &[], &config);
        assert_eq!(result.estimate.package_type, PackageType::Bottle);
        assert!((result.estimate.confidence - 0.6).abs() < 1e-6);
        assert_eq!(result.medication_name, UNKNOWN_MEDICATION);
    }

    #[test]
    fn test_neutral_confidence_without_signals() {
        let config = RecognitionConfig::default();
        let result = estimate_inventory_from_image(&[], &[], &[], &[], &config);
        assert_eq!(result.estimate.confidence, 0.5);
        assert_eq!(result.estimate.package_type, PackageType::Unknown);
        assert_eq!(result.estimate.estimated_count, 1);
    }

    #[test]
    fn test_resolve_medication_name_rules() {
        let catalog = vec![
            KnownMedication::new("Aspirin"),
            KnownMedication::new("Ibuprofen"),
        ];
        assert_eq!(
            resolve_medication_name(["Ibuprofen 200mg"].into_iter(), &catalog),
            "Ibuprofen"
        );
        assert_eq!(
            resolve_medication_name(["nothing relevant"].into_iter(), &catalog),
            UNKNOWN_MEDICATION
        );
        let single = vec![KnownMedication::new("Aspirin")];
        assert_eq!(
            resolve_medication_name(std::iter::empty(), &single),
            "Aspirin"
        );
    }

    #[test]
    fn test_collect_colors() {
        let objects = vec![make_pill("white pill", 0.8)];
        let labels = vec![
            LabelAnnotation::new("Orange capsule", 0.7),
            LabelAnnotation::new("table", 0.9),
        ];
        let colors = collect_colors(&objects, &labels);
        assert!(colors.contains("white"));
        assert!(colors.contains("orange"));
        assert_eq!(colors.len(), 2);
    }
}
