use super::eligibility::is_candidate;
use super::rest::roll_rest;
use super::state::NurseState;
use super::{conflicts, workload, SchedError, ScheduleStatus, Scheduler};
use crate::model::{NurseId, Schedule, ScheduleId, ShiftId, ShiftType};
use crate::rules::Rules;
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Remplace `from` par `to` sur un poste (demande d'échange acceptée).
pub(super) fn swap(
    scheduler: &mut Scheduler,
    shift_id: &ShiftId,
    from: &NurseId,
    to: &NurseId,
) -> Result<(), SchedError> {
    let Some((si, hi)) = scheduler.roster.locate_shift(shift_id) else {
        return Err(SchedError::UnknownShift(shift_id.as_str().to_string()));
    };
    let target = scheduler
        .roster
        .find_nurse(to)
        .ok_or_else(|| SchedError::UnknownNurse(to.as_str().to_string()))?;

    let schedule = &scheduler.roster.schedules[si];
    if schedule.status == ScheduleStatus::Archived {
        return Err(SchedError::SwapInvalid("schedule is archived"));
    }
    let shift = &schedule.shifts[hi];
    if !shift.assigned.contains(from) {
        return Err(SchedError::SwapInvalid("shift not assigned to requester"));
    }
    if target.is_unavailable(shift.date) {
        warn!(nurse = to.as_str(), date = %shift.date, "swap rejected: unavailable");
        return Err(SchedError::SwapInvalid("target nurse unavailable on that date"));
    }
    if schedule
        .shifts
        .iter()
        .any(|s| s.date == shift.date && s.assigned.contains(to))
    {
        return Err(SchedError::SwapInvalid("target nurse already works that day"));
    }
    let mut days = timeline(schedule, to);
    days.insert(shift.date.day0(), shift.shift_type);
    if let Err(day) = replay(&days, &scheduler.rules) {
        warn!(nurse = to.as_str(), day = day + 1, "swap rejected: run or rest rule broken");
        return Err(SchedError::SwapInvalid(
            "target nurse would exceed a run or skip owed rest",
        ));
    }

    let schedule_id = schedule.id.clone();
    for id in scheduler.roster.schedules[si].shifts[hi].assigned.iter_mut() {
        if id == from {
            *id = to.clone();
        }
    }
    info!(
        shift = shift_id.as_str(),
        from = from.as_str(),
        to = to.as_str(),
        "swap applied"
    );
    refresh_reports(scheduler, &schedule_id)
}

/// Postes d'une personne dans un planning, par jour (index 0).
fn timeline(schedule: &Schedule, nurse: &NurseId) -> BTreeMap<u32, ShiftType> {
    schedule
        .shifts
        .iter()
        .filter(|s| s.assigned.contains(nurse))
        .map(|s| (s.date.day0(), s.shift_type))
        .collect()
}

/// Rejoue les règles de série et de repos sur un calendrier individuel.
/// Rend le premier jour fautif.
fn replay(days: &BTreeMap<u32, ShiftType>, rules: &Rules) -> Result<(), u32> {
    let Some(&last) = days.keys().next_back() else {
        return Ok(());
    };
    let mut state = NurseState::default();
    for day in 0..=last {
        let worked = match days.get(&day) {
            Some(&ty) => {
                if !is_candidate(&state, ty, day, rules) {
                    return Err(day);
                }
                state.record_assignment(ty, day);
                true
            }
            None => false,
        };
        roll_rest(&mut state, day, worked);
    }
    Ok(())
}

/// Recalcule charge et conflits d'un planning après modification.
pub(super) fn refresh_reports(
    scheduler: &mut Scheduler,
    schedule_id: &ScheduleId,
) -> Result<(), SchedError> {
    let roster = &mut scheduler.roster;
    let schedule = roster
        .schedules
        .iter()
        .find(|s| &s.id == schedule_id)
        .ok_or_else(|| SchedError::UnknownSchedule(schedule_id.as_str().to_string()))?;

    let records = workload::aggregate_workload(schedule, &scheduler.rules);
    let found = conflicts::detect_conflicts(schedule);
    let (month, year) = (schedule.month, schedule.year);

    roster
        .workload
        .retain(|w| !(w.month == month && w.year == year));
    roster.workload.extend(records.into_values());
    roster.conflicts.retain(|c| &c.schedule != schedule_id);
    roster.conflicts.extend(found);
    Ok(())
}

/// Draft → Published → Archived ; un brouillon peut aussi être archivé.
pub(super) fn set_status(
    scheduler: &mut Scheduler,
    schedule_id: &ScheduleId,
    to: ScheduleStatus,
) -> Result<(), SchedError> {
    let schedule = scheduler
        .roster
        .schedules
        .iter_mut()
        .find(|s| &s.id == schedule_id)
        .ok_or_else(|| SchedError::UnknownSchedule(schedule_id.as_str().to_string()))?;

    let from = schedule.status;
    let allowed = matches!(
        (from, to),
        (ScheduleStatus::Draft, ScheduleStatus::Published)
            | (ScheduleStatus::Draft, ScheduleStatus::Archived)
            | (ScheduleStatus::Published, ScheduleStatus::Archived)
    );
    if !allowed {
        return Err(SchedError::StatusTransition { from, to });
    }
    schedule.status = to;
    info!(schedule = schedule_id.as_str(), %from, %to, "schedule status changed");
    Ok(())
}
