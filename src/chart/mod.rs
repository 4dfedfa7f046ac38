//! Paper-chart recognition: checkmarks, anchors, schedule reconciliation.

pub mod anchors;
pub mod checkmark;
pub mod reconcile;

pub use anchors::{resolve_day_anchors, resolve_medication_anchors, DayAnchor, DayOfWeek, MedicationAnchor};
pub use checkmark::is_checkmark;
pub use reconcile::{reconcile_schedule, DoseConfirmation};
