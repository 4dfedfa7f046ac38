//! Course-completion evaluation.
//!
//! Determines whether a prescribed course has ended so the host can stop
//! suggesting refills for it.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::catalog::MedicationRecord;

/// Whether a prescribed course has ended and purchasing should stop.
#[derive(Clone, Debug, Serialize)]
pub struct CourseStatus {
    pub is_completed: bool,
    pub should_stop_buying: bool,
    pub message: String,
}

/// Evaluates course completion as of today.
pub fn evaluate_course_completion(record: &MedicationRecord, current_stock: u32) -> CourseStatus {
    evaluate_course_completion_on(Local::now().date_naive(), record, current_stock)
}

/// Evaluates course completion as of an explicit date.
///
/// Checks, in order: an explicit course end date; a start date plus
/// prescribed duration; remaining stock (course still ongoing); and
/// finally a neutral answer when nothing is known.
pub fn evaluate_course_completion_on(
    today: NaiveDate,
    record: &MedicationRecord,
    current_stock: u32,
) -> CourseStatus {
    if let Some(end_date) = record.course_end_date {
        if today >= end_date {
            return CourseStatus {
                is_completed: true,
                should_stop_buying: true,
                message: format!(
                    "The course of {} ended on {}. No further purchases are needed.",
                    record.name, end_date
                ),
            };
        }
    }

    if let (Some(start_date), Some(duration_days)) =
        (record.start_date, record.prescribed_duration_days)
    {
        if today >= start_date + Duration::days(duration_days as i64) {
            return CourseStatus {
                is_completed: true,
                should_stop_buying: true,
                message: format!(
                    "The prescribed {}-day course of {} is complete. No further purchases are needed.",
                    duration_days, record.name
                ),
            };
        }
    }

    if current_stock > 0 {
        return CourseStatus {
            is_completed: false,
            should_stop_buying: false,
            message: format!(
                "Course of {} is ongoing, stock = {}.",
                record.name, current_stock
            ),
        };
    }

    CourseStatus {
        is_completed: false,
        should_stop_buying: false,
        message: format!(
            "Not enough information to evaluate the course of {}.",
            record.name
        ),
    }
}
