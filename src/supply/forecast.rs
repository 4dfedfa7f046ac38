//! Supply forecasting.
//!
//! Turns a confirmed (or estimated) stock level plus daily dosage into
//! days remaining, a refill date and a status tier with human-readable
//! alerts for the host UI.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::error::{RecognitionError, Result};

/// Stock status tier, ordered worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyStatus {
    Out,
    Critical,
    Low,
    Sufficient,
}

/// Days remaining at or below which stock is critical.
const CRITICAL_DAYS: u32 = 2;

/// Computed supply outlook for one medication.
#[derive(Clone, Debug, Serialize)]
pub struct SupplyForecast {
    pub medication_name: String,
    pub current_stock: u32,
    pub daily_dosage: u32,
    pub days_remaining: u32,
    pub refill_date: NaiveDate,
    pub status: SupplyStatus,
    pub alerts: Vec<String>,
}

/// Forecasts supply as of today.
///
/// A daily dosage of zero is a caller error and fails fast with
/// `InvalidInput`; the division is never performed silently.
pub fn forecast_supply(
    medication_name: &str,
    current_stock: u32,
    daily_dosage: u32,
    min_stock_days: u32,
) -> Result<SupplyForecast> {
    forecast_supply_on(
        Local::now().date_naive(),
        medication_name,
        current_stock,
        daily_dosage,
        min_stock_days,
    )
}

/// Forecasts supply as of an explicit date. Kept separate so tests and
/// replays do not depend on the wall clock.
pub fn forecast_supply_on(
    today: NaiveDate,
    medication_name: &str,
    current_stock: u32,
    daily_dosage: u32,
    min_stock_days: u32,
) -> Result<SupplyForecast> {
    if daily_dosage == 0 {
        return Err(RecognitionError::InvalidInput(format!(
            "daily dosage for {} must be greater than zero",
            medication_name
        )));
    }

    let days_remaining = current_stock / daily_dosage;
    let refill_date = today + Duration::days(days_remaining as i64);

    let (status, alerts) = if current_stock == 0 {
        (
            SupplyStatus::Out,
            vec![format!(
                "You are out of {}. Refill urgently.",
                medication_name
            )],
        )
    } else if days_remaining <= CRITICAL_DAYS {
        (
            SupplyStatus::Critical,
            vec![
                format!(
                    "Critical shortage: only {} day(s) of {} left.",
                    days_remaining, medication_name
                ),
                format!("Buy more {} as soon as possible.", medication_name),
            ],
        )
    } else if days_remaining <= min_stock_days {
        (
            SupplyStatus::Low,
            vec![
                format!(
                    "Stock of {} is running low: {} days remaining.",
                    medication_name, days_remaining
                ),
                format!("Plan to buy more by {}.", refill_date),
            ],
        )
    } else {
        (
            SupplyStatus::Sufficient,
            vec![format!(
                "Stock of {} is sufficient for {} days.",
                medication_name, days_remaining
            )],
        )
    };

    Ok(SupplyForecast {
        medication_name: medication_name.to_string(),
        current_stock,
        daily_dosage,
        days_remaining,
        refill_date,
        status,
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    #[test]
    fn test_zero_dosage_fails_fast() {
        let err = forecast_supply_on(today(), "Aspirin", 10, 0, 7).unwrap_err();
        assert!(matches!(err, RecognitionError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_stock() {
        let forecast = forecast_supply_on(today(), "Aspirin", 0, 2, 7).unwrap();
        assert_eq!(forecast.status, SupplyStatus::Out);
        assert_eq!(forecast.days_remaining, 0);
        assert_eq!(forecast.refill_date, today());
        assert_eq!(forecast.alerts.len(), 1);
    }

    #[test]
    fn test_critical_at_two_days() {
        let forecast = forecast_supply_on(today(), "Aspirin", 4, 2, 7).unwrap();
        assert_eq!(forecast.days_remaining, 2);
        assert_eq!(forecast.status, SupplyStatus::Critical);
        assert_eq!(forecast.alerts.len(), 2);
    }

    #[test]
    fn test_low_within_min_stock_days() {
        let forecast = forecast_supply_on(today(), "Aspirin", 10, 2, 7).unwrap();
        assert_eq!(forecast.days_remaining, 5);
        assert_eq!(forecast.status, SupplyStatus::Low);
        assert_eq!(forecast.alerts.len(), 2);
        assert_eq!(
            forecast.refill_date,
            NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
        );
    }

    #[test]
    fn test_sufficient() {
        let forecast = forecast_supply_on(today(), "Aspirin", 20, 2, 7).unwrap();
        assert_eq!(forecast.days_remaining, 10);
        assert_eq!(forecast.status, SupplyStatus::Sufficient);
        assert_eq!(forecast.alerts.len(), 1);
        assert_eq!(
            forecast.refill_date,
            NaiveDate::from_ymd_opt(2026, 8, 11).unwrap()
        );
    }

    #[test]
    fn test_floor_division() {
        let forecast = forecast_supply_on(today(), "Aspirin", 7, 2, 1).unwrap();
        assert_eq!(forecast.days_remaining, 3);
    }

    #[test]
    fn test_custom_min_stock_days() {
        // 10 days remaining is "low" when the caller wants 14 days of buffer.
        let forecast = forecast_supply_on(today(), "Aspirin", 20, 2, 14).unwrap();
        assert_eq!(forecast.status, SupplyStatus::Low);
    }
}
