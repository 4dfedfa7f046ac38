//! Supply forecasting and course completion.

pub mod course;
pub mod forecast;

pub use course::{evaluate_course_completion, evaluate_course_completion_on, CourseStatus};
pub use forecast::{forecast_supply, forecast_supply_on, SupplyForecast, SupplyStatus};
