//! Day and medication anchor resolution.
//!
//! A photographed chart is a grid: medication names down the left,
//! day-of-week headers across the top. Anchors capture where each row and
//! column sits so checkmarks can be joined to them spatially.

use serde::{Deserialize, Serialize};

use crate::catalog::KnownMedication;
use crate::vision::RecognizedElement;

/// Canonical day of week, rendered with its full English name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Maps a trimmed, lowercased header token to a day. Accepts full and
    /// abbreviated English plus Ukrainian full and two-letter forms (the
    /// charts circulate in both languages).
    fn from_token(token: &str) -> Option<DayOfWeek> {
        let day = match token {
            "monday" | "mon" | "понеділок" | "пн" => DayOfWeek::Monday,
            "tuesday" | "tue" | "tues" | "вівторок" | "вт" => DayOfWeek::Tuesday,
            "wednesday" | "wed" | "середа" | "ср" => DayOfWeek::Wednesday,
            "thursday" | "thu" | "thur" | "thurs" | "четвер" | "чт" => DayOfWeek::Thursday,
            "friday" | "fri" | "п'ятниця" | "п’ятниця" | "пт" => DayOfWeek::Friday,
            "saturday" | "sat" | "субота" | "сб" => DayOfWeek::Saturday,
            "sunday" | "sun" | "неділя" | "нд" => DayOfWeek::Sunday,
            _ => return None,
        };
        Some(day)
    }
}

/// Horizontal position of a day-of-week column header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayAnchor {
    pub day: DayOfWeek,
    pub x: f32,
    pub width: f32,
}

/// Vertical position of a known medication's row.
#[derive(Clone, Debug, PartialEq)]
pub struct MedicationAnchor {
    pub medication_name: String,
    pub y: f32,
    pub height: f32,
}

/// Scans the recognized elements for day-of-week headers.
///
/// At most one anchor per day is kept; when a day name appears more than
/// once, the last occurrence in scan order overwrites earlier ones.
pub fn resolve_day_anchors(elements: &[RecognizedElement]) -> Vec<DayAnchor> {
    let mut slots: [Option<DayAnchor>; 7] = [None; 7];
    for element in elements {
        let token = element.text.trim().to_lowercase();
        if let Some(day) = DayOfWeek::from_token(&token) {
            slots[day.index()] = Some(DayAnchor {
                day,
                x: element.bounding_box.x,
                width: element.bounding_box.width,
            });
        }
    }
    slots.into_iter().flatten().collect()
}

/// How many characters longer than the medication name a containing text
/// may be and still count as that medication's row label. Admits strings
/// like "Aspirin 100mg" without admitting unrelated paragraphs.
const MAX_LABEL_SUFFIX_CHARS: usize = 10;

/// Finds the row anchor for each known medication.
///
/// The first element whose lowercased text exactly equals the medication
/// name, or contains it while staying within the suffix bound, wins.
/// Medications with no matching element are silently absent.
pub fn resolve_medication_anchors(
    elements: &[RecognizedElement],
    catalog: &[KnownMedication],
) -> Vec<MedicationAnchor> {
    let mut anchors = Vec::new();
    for medication in catalog {
        let name_lower = medication.name.to_lowercase();
        if name_lower.is_empty() {
            continue;
        }
        let found = elements.iter().find(|element| {
            let text_lower = element.text.to_lowercase();
            matches_medication_label(&text_lower, &name_lower)
        });
        if let Some(element) = found {
            anchors.push(MedicationAnchor {
                medication_name: medication.name.clone(),
                y: element.bounding_box.y,
                height: element.bounding_box.height,
            });
        }
    }
    anchors
}

/// Exact match, or containment with at most `MAX_LABEL_SUFFIX_CHARS`
/// extra characters. Both inputs are already lowercased.
pub fn matches_medication_label(text_lower: &str, name_lower: &str) -> bool {
    if text_lower == name_lower {
        return true;
    }
    text_lower.contains(name_lower)
        && text_lower.chars().count() <= name_lower.chars().count() + MAX_LABEL_SUFFIX_CHARS
}
