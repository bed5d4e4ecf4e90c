use crate::model::{NurseId, Schedule, ShiftType, WorkloadRecord};
use crate::rules::Rules;
use std::collections::HashMap;
use tracing::debug;

/// Totaux par personne sur un planning terminé.
///
/// Chaque poste compte pour `rules.hours_per_shift` heures, quelle que soit
/// sa fenêtre. Les heures supplémentaires ne sont pas calculées ici.
pub fn aggregate_workload(schedule: &Schedule, rules: &Rules) -> HashMap<NurseId, WorkloadRecord> {
    let mut out: HashMap<NurseId, WorkloadRecord> = HashMap::new();

    for shift in &schedule.shifts {
        let night = shift.shift_type == ShiftType::Night;
        let weekend = shift.is_weekend();

        for id in &shift.assigned {
            let record = out
                .entry(id.clone())
                .or_insert_with(|| WorkloadRecord::new(id.clone(), schedule.month, schedule.year));
            record.shifts_count += 1;
            record.total_hours += rules.hours_per_shift;
            if night {
                record.night_shifts += 1;
            }
            if weekend {
                record.weekend_shifts += 1;
            }
        }
    }

    debug!(nurses = out.len(), "workload aggregated");
    out
}
