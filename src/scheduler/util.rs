use super::types::{GenerationParams, SchedError};
use crate::rules::Rules;
use chrono::NaiveDate;

pub(super) fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Nombre de jours du mois, années bissextiles comprises.
pub(super) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

pub(super) fn validate_params(params: &GenerationParams, rules: &Rules) -> Result<(), SchedError> {
    rules.validate()?;
    if !(1..=12).contains(&params.month) {
        return Err(SchedError::InvalidParameters(format!(
            "month must be within 1..=12, got {}",
            params.month
        )));
    }
    if params.year < rules.min_year {
        return Err(SchedError::InvalidParameters(format!(
            "year must be >= {}, got {}",
            rules.min_year, params.year
        )));
    }
    if params
        .department
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        return Err(SchedError::InvalidParameters(
            "department cannot be empty".to_string(),
        ));
    }
    Ok(())
}
