use super::rest::off_days_required;
use super::state::{NurseState, RunContext};
use crate::model::{Nurse, NurseId, ShiftClass, ShiftType};
use crate::rules::Rules;
use chrono::{Datelike, NaiveDate};
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Candidats pour un poste, les moins chargés d'abord (à bruit près).
pub(crate) fn eligible<'a, R: Rng + ?Sized>(
    nurses: &'a [Nurse],
    ctx: &RunContext,
    assigned_today: &HashSet<NurseId>,
    shift_type: ShiftType,
    date: NaiveDate,
    rules: &Rules,
    rng: &mut R,
) -> Vec<&'a Nurse> {
    let mut keyed: Vec<(f64, &Nurse)> = nurses
        .iter()
        .filter(|n| !assigned_today.contains(&n.id) && !n.is_unavailable(date))
        .filter_map(|n| ctx.state(&n.id).map(|state| (n, state)))
        .filter(|(_, state)| is_candidate(state, shift_type, date.day0(), rules))
        .map(|(n, state)| {
            let jitter = rng.gen_range(0.0..rules.fairness_jitter);
            (f64::from(state.total_work_days) + jitter, n)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    debug!(
        count = keyed.len(),
        %shift_type,
        %date,
        "eligible nurses found"
    );
    keyed.into_iter().map(|(_, n)| n).collect()
}

/// Règles d'état : repos dû, sortie de nuit, plafond de série.
pub fn is_candidate(state: &NurseState, shift_type: ShiftType, day: u32, rules: &Rules) -> bool {
    if state.rest_days_left > 0 {
        return false;
    }
    if state.after_night_rest && shift_type != ShiftType::Day {
        return false;
    }
    if !state.worked_yesterday(day) {
        return true;
    }

    let class = shift_type.class();
    match state.last_class {
        Some(last) if last == class => {
            let cap = match class {
                ShiftClass::Day => rules.max_consecutive_day,
                ShiftClass::Night => rules.max_consecutive_night,
            };
            state.consecutive_run < cap
        }
        Some(_) => off_days_required(state.consecutive_run) == 0,
        None => true,
    }
}
