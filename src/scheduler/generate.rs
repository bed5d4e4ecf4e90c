use super::assignment::assign_day;
use super::state::RunContext;
use super::types::{GenerationParams, SchedError};
use super::util;
use crate::model::{Nurse, Schedule};
use crate::rules::Rules;
use chrono::Utc;
use rand::Rng;
use tracing::info;

/// Génère le planning brouillon d'un mois pour l'équipe donnée.
pub fn generate_month<R: Rng + ?Sized>(
    nurses: &[Nurse],
    params: &GenerationParams,
    rules: &Rules,
    rng: &mut R,
) -> Result<Schedule, SchedError> {
    run_month(nurses, params, rules, rng).map(|(schedule, _)| schedule)
}

/// Comme [`generate_month`], en rendant aussi les états de fin de mois.
///
/// Avec un service demandé, seules les personnes de ce service sont planifiées.
pub fn run_month<R: Rng + ?Sized>(
    nurses: &[Nurse],
    params: &GenerationParams,
    rules: &Rules,
    rng: &mut R,
) -> Result<(Schedule, RunContext), SchedError> {
    util::validate_params(params, rules)?;
    let pool: Vec<Nurse> = match params.department.as_deref() {
        Some(dept) => nurses
            .iter()
            .filter(|n| n.department == dept)
            .cloned()
            .collect(),
        None => nurses.to_vec(),
    };
    if pool.is_empty() {
        return Err(SchedError::NoWorkersAvailable);
    }

    let invalid = || {
        SchedError::InvalidParameters(format!(
            "no calendar month {}/{}",
            params.month, params.year
        ))
    };
    let first = util::first_of_month(params.year, params.month).ok_or_else(invalid)?;
    let days = util::days_in_month(params.year, params.month).ok_or_else(invalid)?;
    let department = params
        .department
        .as_deref()
        .unwrap_or(&rules.default_department);

    let mut ctx = RunContext::new(&pool);
    let mut schedule = Schedule::draft(params.month, params.year, Utc::now());
    schedule.shifts.reserve(days as usize * 3);

    for date in first.iter_days().take(days as usize) {
        let shifts = assign_day(&pool, &mut ctx, date, department, rules, rng);
        schedule.shifts.extend(shifts);
    }

    info!(
        schedule = schedule.id.as_str(),
        month = params.month,
        year = params.year,
        shifts = schedule.shifts.len(),
        assignments = schedule.total_assignments(),
        "schedule generated"
    );
    Ok((schedule, ctx))
}
