//! Visual medication recognition and inventory reconciliation.
//!
//! Turns raw vision/video annotation output (text blocks, detected
//! objects, labels, per-frame samples) into structured, confidence-scored
//! facts: which scheduled doses were marked as taken on a photographed
//! paper chart, how many units of a medication remain, and when they run
//! out. Everything produced here is a best-effort estimate meant to be
//! confirmed by a human before it is trusted.
//!
//! The analysis core is pure and synchronous; network and polling live
//! behind the [`backend::VisionBackend`] seam.

pub mod backend;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod inventory;
pub mod supply;
pub mod vision;

pub use backend::{backend_from_config, VisionBackend};
pub use catalog::{KnownMedication, MedicationRecord};
pub use chart::{reconcile_schedule, DoseConfirmation};
pub use config::RecognitionConfig;
pub use error::RecognitionError;
pub use inventory::{
    estimate_inventory_from_image, estimate_inventory_from_video, ImageInventoryEstimate,
    PillCountEstimate, VideoEstimate,
};
pub use supply::{
    evaluate_course_completion, forecast_supply, CourseStatus, SupplyForecast, SupplyStatus,
};
