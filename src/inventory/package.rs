//! Packaging-type classification.

use serde::{Deserialize, Serialize};

use crate::vision::{DetectedObject, LabelAnnotation};

/// Physical container type inferred from labels and detected objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Blister,
    Bottle,
    Loose,
    Box,
    /// Not produced by the classifier; exists for caller-confirmed data.
    Strip,
    Unknown,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Blister => "blister",
            PackageType::Bottle => "bottle",
            PackageType::Loose => "loose",
            PackageType::Box => "box",
            PackageType::Strip => "strip",
            PackageType::Unknown => "unknown",
        }
    }
}

const BLISTER_KEYWORDS: [&str; 2] = ["blister", "pill pack"];
const BOTTLE_KEYWORDS: [&str; 3] = ["bottle", "container", "jar"];
const BOX_KEYWORDS: [&str; 2] = ["box", "package"];
const LOOSE_KEYWORDS: [&str; 3] = ["pill", "tablet", "capsule"];

/// Classifies the packaging from scene labels and detected-object names.
/// First match in priority order wins: blister, bottle, box, loose.
pub fn classify_package(labels: &[LabelAnnotation], objects: &[DetectedObject]) -> PackageType {
    let texts: Vec<String> = labels
        .iter()
        .map(|l| l.description.to_lowercase())
        .chain(objects.iter().map(|o| o.label.to_lowercase()))
        .collect();

    let any_contains = |keywords: &[&str]| {
        texts
            .iter()
            .any(|text| keywords.iter().any(|k| text.contains(k)))
    };

    if any_contains(&BLISTER_KEYWORDS) {
        PackageType::Blister
    } else if any_contains(&BOTTLE_KEYWORDS) {
        PackageType::Bottle
    } else if any_contains(&BOX_KEYWORDS) {
        PackageType::Box
    } else if any_contains(&LOOSE_KEYWORDS) {
        PackageType::Loose
    } else {
        PackageType::Unknown
    }
}
