//! Geometry and small text utilities shared by the matching code.

use regex::Regex;

/// Pattern for backend time offsets: a decimal number of seconds with an
/// optional trailing "s" (the REST representation is e.g. "3.500s").
const TIME_OFFSET_PATTERN: &str = r"^(\d+(?:\.\d+)?)s?$";

/// Clamps a confidence value into [0, 1].
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Absolute horizontal distance between two x positions.
pub fn horizontal_distance(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

/// Absolute vertical distance between two y positions.
pub fn vertical_distance(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

/// Parses a backend time offset token ("3.500s", "12s", "4.2") into
/// seconds. Returns `None` for anything that is not a plain non-negative
/// decimal.
pub fn parse_time_offset(token: &str) -> Option<f64> {
    let re = Regex::new(TIME_OFFSET_PATTERN).ok()?;
    let captures = re.captures(token.trim())?;
    captures[1].parse::<f64>().ok()
}

/// Formats a whole-second offset the way frame samples carry it ("4s").
pub fn format_time_offset(secs: u64) -> String {
    format!("{}s", secs)
}

/// Arithmetic mean of a confidence collection. Empty input yields 0.0.
pub fn mean_confidence(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Median of unsigned counts using the standard even/odd rule.
/// Empty input yields 0.0; callers guarantee non-empty sequences.
pub fn median(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 0 {
        let mid = n / 2;
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[n / 2] as f64
    }
}

/// Rounded arithmetic mean of unsigned counts. Empty input yields 0.
pub fn rounded_mean(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    (sum as f64 / values.len() as f64).round() as u32
}
