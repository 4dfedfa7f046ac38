//! Caller-supplied medication catalog.
//!
//! The engine never stores medications itself; the host hands it the
//! catalog of known medications for each analysis call. A small JSON
//! loader is provided for the CLI host.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;

/// One medication the engine is allowed to recognize.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnownMedication {
    pub name: String,
    /// Scheduled intake times as "HH:MM", earliest first.
    #[serde(default)]
    pub intake_times: Vec<String>,
    /// Units taken per day, used by the supply forecaster.
    #[serde(default)]
    pub daily_dosage: u32,
}

impl KnownMedication {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intake_times: Vec::new(),
            daily_dosage: 0,
        }
    }

    /// First scheduled intake time, if any.
    pub fn first_intake_time(&self) -> Option<&str> {
        self.intake_times.first().map(String::as_str)
    }
}

/// Prescription course data for the course-completion evaluator.
/// All fields are optional; the evaluator degrades gracefully.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub name: String,
    /// Explicit end date of the prescribed course.
    #[serde(default)]
    pub course_end_date: Option<NaiveDate>,
    /// Date the course started.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Prescribed course length in days, counted from `start_date`.
    #[serde(default)]
    pub prescribed_duration_days: Option<u32>,
}

/// Loads a medication catalog from a JSON array file. A missing file is
/// an empty catalog, not an error; the CLI host treats that as demo data.
pub fn load_catalog(path: &Path) -> Vec<KnownMedication> {
    if !path.exists() {
        log::info!("{} not found, catalog is empty", path.display());
        return Vec::new();
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Failed to parse {}: {}. Catalog is empty.", path.display(), e);
                Vec::new()
            }
        },
        Err(e) => {
            log::warn!("Failed to read {}: {}. Catalog is empty.", path.display(), e);
            Vec::new()
        }
    }
}
