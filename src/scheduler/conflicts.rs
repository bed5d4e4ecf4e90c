use super::{Conflict, ConflictKind, Severity};
use crate::model::Schedule;
use tracing::debug;

pub const SUGGESTIONS: [&str; 3] = [
    "Check for available nurses with matching qualifications",
    "Consider overtime assignments",
    "Review shift requirements",
];

/// Un conflit `understaffed` par poste en sous-effectif.
pub fn detect_conflicts(schedule: &Schedule) -> Vec<Conflict> {
    let out: Vec<Conflict> = schedule
        .shifts
        .iter()
        .filter(|s| s.is_understaffed())
        .map(|shift| Conflict {
            schedule: schedule.id.clone(),
            shift: shift.id.clone(),
            nurse: None,
            kind: ConflictKind::Understaffed,
            severity: if shift.assigned.is_empty() {
                Severity::Critical
            } else {
                Severity::High
            },
            message: format!(
                "{} {} shift needs {} more nurse(s)",
                shift.department,
                shift.shift_type,
                shift.shortfall()
            ),
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    debug!(
        schedule = schedule.id.as_str(),
        conflicts = out.len(),
        "conflicts detected"
    );
    out
}
