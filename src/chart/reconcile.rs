//! Schedule reconciliation.
//!
//! Joins checkmarks to the nearest medication row and day column,
//! emitting one dose-confirmation fact per matched mark. These facts are
//! best-effort and carry a confidence for the host UI to display before a
//! human confirms them.

use regex::Regex;
use serde::ser::Serializer;
use serde::Serialize;

use crate::catalog::KnownMedication;
use crate::chart::anchors::{
    resolve_day_anchors, resolve_medication_anchors, DayAnchor, DayOfWeek,
};
use crate::chart::checkmark::is_checkmark;
use crate::config::RecognitionConfig;
use crate::vision::geometry;
use crate::vision::RecognizedElement;

/// Pattern for a chart dose time: H:MM or HH:MM, 24-hour.
const DOSE_TIME_PATTERN: &str = r"^([01]?\d|2[0-3]):([0-5]\d)$";

/// One scheduled dose marked as taken on the chart.
#[derive(Clone, Debug, Serialize)]
pub struct DoseConfirmation {
    pub medication_name: String,
    /// Day column the mark was matched to, `None` when the chart had no
    /// recognizable day headers. Serialized as "Unknown" in that case.
    #[serde(serialize_with = "serialize_day")]
    pub day: Option<DayOfWeek>,
    /// Dose time as "HH:MM".
    pub time: String,
    pub taken: bool,
    pub confidence: f32,
}

impl DoseConfirmation {
    /// Day column name, "Unknown" when no day header matched.
    pub fn day_label(&self) -> &str {
        self.day.map(|d| d.name()).unwrap_or("Unknown")
    }
}

fn serialize_day<S: Serializer>(
    day: &Option<DayOfWeek>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(day.map(|d| d.name()).unwrap_or("Unknown"))
}

/// Reconciles a photographed chart against the known-medication catalog.
///
/// For every medication row found on the chart, checkmarks whose vertical
/// center lies within `row height + row_slack_px` of the row anchor are
/// claimed by that row, then assigned to the day column whose header x is
/// closest. Medications with no nearby checkmarks simply produce no
/// confirmations; that is not an error.
pub fn reconcile_schedule(
    elements: &[RecognizedElement],
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> Vec<DoseConfirmation> {
    let checkmarks: Vec<&RecognizedElement> = elements
        .iter()
        .filter(|element| is_checkmark(&element.text))
        .collect();
    let day_anchors = resolve_day_anchors(elements);
    let medication_anchors = resolve_medication_anchors(elements, catalog);

    log::debug!(
        "reconcile: {} checkmarks, {} day columns, {} medication rows",
        checkmarks.len(),
        day_anchors.len(),
        medication_anchors.len()
    );

    let mut confirmations = Vec::new();
    for anchor in &medication_anchors {
        let time = dose_time_for(anchor.medication_name.as_str(), catalog, config);
        let row_window = anchor.height + config.row_slack_px;

        for mark in &checkmarks {
            let mark_center_y = mark.bounding_box.center_y();
            if geometry::vertical_distance(mark_center_y, anchor.y) > row_window {
                continue;
            }
            let day = nearest_day(&day_anchors, mark.bounding_box.x);
            confirmations.push(DoseConfirmation {
                medication_name: anchor.medication_name.clone(),
                day,
                time: time.clone(),
                taken: true,
                confidence: config.confirmation_confidence,
            });
        }
    }
    confirmations
}

/// Day column whose header x is closest to the checkmark's x.
fn nearest_day(day_anchors: &[DayAnchor], mark_x: f32) -> Option<DayOfWeek> {
    day_anchors
        .iter()
        .min_by(|a, b| {
            geometry::horizontal_distance(a.x, mark_x)
                .total_cmp(&geometry::horizontal_distance(b.x, mark_x))
        })
        .map(|anchor| anchor.day)
}

/// First scheduled intake time for the medication, normalized to "HH:MM";
/// the configured default when the catalog has none or it doesn't parse.
fn dose_time_for(
    medication_name: &str,
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> String {
    let scheduled = catalog
        .iter()
        .find(|m| m.name == medication_name)
        .and_then(|m| m.first_intake_time());
    match scheduled.and_then(normalize_dose_time) {
        Some(time) => time,
        None => config.default_dose_time.clone(),
    }
}

/// Validates an "H:MM"/"HH:MM" token and pads the hour to two digits.
fn normalize_dose_time(token: &str) -> Option<String> {
    let re = Regex::new(DOSE_TIME_PATTERN).ok()?;
    let captures = re.captures(token.trim())?;
    let hour: u32 = captures[1].parse().ok()?;
    Some(format!("{:02}:{}", hour, &captures[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::BoundingBox;

    fn make_element(text: &str, x: f32, y: f32) -> RecognizedElement {
        RecognizedElement::new(text, 0.9, BoundingBox::new(x, y, 60.0, 20.0))
    }

    fn chart_elements() -> Vec<RecognizedElement> {
        vec![
            make_element("Aspirin", 10.0, 100.0),
            make_element("Monday", 50.0, 10.0),
            make_element("Tuesday", 150.0, 10.0),
            make_element("✓", 55.0, 105.0),
            make_element("✓", 152.0, 100.0),
        ]
    }

    #[test]
    fn test_two_checkmarks_two_confirmations() {
        let catalog = vec![KnownMedication::new("Aspirin")];
        let config = RecognitionConfig::default();
        let confirmations = reconcile_schedule(&chart_elements(), &catalog, &config);

        assert_eq!(confirmations.len(), 2);
        let days: Vec<&str> = confirmations.iter().map(|c| c.day_label()).collect();
        assert!(days.contains(&"Monday"));
        assert!(days.contains(&"Tuesday"));
        for confirmation in &confirmations {
            assert_eq!(confirmation.medication_name, "Aspirin");
            assert!(confirmation.taken);
            assert_eq!(confirmation.confidence, 0.85);
            assert_eq!(confirmation.time, "08:00");
        }
    }

    #[test]
    fn test_never_emits_unknown_medication() {
        let catalog = vec![KnownMedication::new("Paracetamol")];
        let config = RecognitionConfig::default();
        let confirmations = reconcile_schedule(&chart_elements(), &catalog, &config);
        assert!(confirmations.is_empty());
    }

    #[test]
    fn test_checkmark_outside_row_window_ignored() {
        let catalog = vec![KnownMedication::new("Aspirin")];
        let config = RecognitionConfig::default();
        let mut elements = vec![
            make_element("Aspirin", 10.0, 100.0),
            make_element("Monday", 50.0, 10.0),
        ];
        // Row window is height (20) + slack (50); center y 400 is far out.
        elements.push(make_element("✓", 55.0, 390.0));
        let confirmations = reconcile_schedule(&elements, &catalog, &config);
        assert!(confirmations.is_empty());
    }

    #[test]
    fn test_no_day_anchors_yields_unknown() {
        let catalog = vec![KnownMedication::new("Aspirin")];
        let config = RecognitionConfig::default();
        let elements = vec![
            make_element("Aspirin", 10.0, 100.0),
            make_element("✓", 55.0, 105.0),
        ];
        let confirmations = reconcile_schedule(&elements, &catalog, &config);
        assert_eq!(confirmations.len(), 1);
        assert_eq!(confirmations[0].day, None);
        assert_eq!(confirmations[0].day_label(), "Unknown");
    }

    #[test]
    fn test_scheduled_time_used_when_known() {
        let mut medication = KnownMedication::new("Aspirin");
        medication.intake_times = vec!["9:30".to_string(), "21:00".to_string()];
        let catalog = vec![medication];
        let config = RecognitionConfig::default();
        let confirmations = reconcile_schedule(&chart_elements(), &catalog, &config);
        assert!(!confirmations.is_empty());
        // First scheduled time, hour padded.
        assert_eq!(confirmations[0].time, "09:30");
    }

    #[test]
    fn test_deterministic() {
        let catalog = vec![KnownMedication::new("Aspirin")];
        let config = RecognitionConfig::default();
        let a = reconcile_schedule(&chart_elements(), &catalog, &config);
        let b = reconcile_schedule(&chart_elements(), &catalog, &config);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_normalize_dose_time() {
        assert_eq!(normalize_dose_time("8:00"), Some("08:00".to_string()));
        assert_eq!(normalize_dose_time("20:15"), Some("20:15".to_string()));
        assert_eq!(normalize_dose_time("24:00"), None);
        assert_eq!(normalize_dose_time("8am"), None);
    }

    #[test]
    fn test_day_serialized_as_unknown() {
        let confirmation = DoseConfirmation {
            medication_name: "Aspirin".to_string(),
            day: None,
            time: "08:00".to_string(),
            taken: true,
            confidence: 0.85,
        };
        let json = serde_json::to_string(&confirmation).unwrap();
        assert!(json.contains("\"day\":\"Unknown\""));
    }
}
