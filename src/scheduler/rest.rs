use super::state::NurseState;
use crate::model::ShiftClass;
use tracing::debug;

/// Jours de repos dus après une série de `run_len` postes de même classe.
///
/// Même formule pour les séries de jour et de nuit.
pub fn off_days_required(run_len: u32) -> u32 {
    if run_len < 2 {
        0
    } else {
        run_len - 1
    }
}

/// Bascule de fin de journée : démarre ou consomme le compte à rebours de repos.
///
/// Une série se termine le premier jour non travaillé ; ce jour compte déjà
/// comme le premier jour de repos.
pub fn roll_rest(state: &mut NurseState, day: u32, assigned_today: bool) {
    if !assigned_today && state.worked_yesterday(day) {
        if let Some(class) = state.last_class {
            let off = off_days_required(state.consecutive_run);
            state.rest_days_left = off;
            if class == ShiftClass::Night {
                state.after_night_rest = true;
            }
            debug!(
                day,
                off,
                run = state.consecutive_run,
                ?class,
                "rest countdown started"
            );
        }
    }
    if state.rest_days_left > 0 {
        state.rest_days_left -= 1;
    }
}
