mod assignment;
mod conflicts;
mod eligibility;
mod generate;
mod mutate;
mod rest;
mod state;
mod types;
mod util;
mod workload;

pub use conflicts::{detect_conflicts, SUGGESTIONS};
pub use eligibility::is_candidate;
pub use generate::{generate_month, run_month};
pub use rest::{off_days_required, roll_rest};
pub use state::{NurseState, RunContext};
pub use types::{
    Conflict, ConflictKind, GenerationParams, GenerationReport, SchedError, ScheduleStatus,
    Severity,
};
pub use workload::aggregate_workload;

use crate::model::{Nurse, NurseId, Roster, Schedule, ScheduleId, ShiftId, WorkloadRecord};
use crate::rules::Rules;
use rand::Rng;
use tracing::warn;

/// Scheduler : encapsule le Roster et les règles de génération
#[derive(Debug, Default)]
pub struct Scheduler {
    roster: Roster,
    rules: Rules,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Rules) -> Self {
        Self {
            roster: Roster::default(),
            rules,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn add_nurses(&mut self, nurses: Vec<Nurse>) {
        self.roster.nurses.extend(nurses);
    }

    /// Génère et enregistre le planning d'un mois (aléa du thread courant).
    pub fn generate(&mut self, params: GenerationParams) -> Result<GenerationReport, SchedError> {
        self.generate_with_rng(params, &mut rand::thread_rng())
    }

    /// Validation, unicité de la période, puis génération et rapports.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &mut self,
        params: GenerationParams,
        rng: &mut R,
    ) -> Result<GenerationReport, SchedError> {
        util::validate_params(&params, &self.rules)?;
        if self.roster.has_schedule(params.month, params.year) {
            warn!(
                month = params.month,
                year = params.year,
                "schedule already exists"
            );
            return Err(SchedError::DuplicatePeriod {
                month: params.month,
                year: params.year,
            });
        }

        let schedule =
            generate::generate_month(&self.roster.nurses, &params, &self.rules, rng)?;
        let workload = workload::aggregate_workload(&schedule, &self.rules);
        let conflicts = conflicts::detect_conflicts(&schedule);
        let report = GenerationReport {
            schedule: schedule.id.clone(),
            workload,
            conflicts,
        };

        self.roster.schedules.push(schedule);
        self.roster
            .workload
            .extend(report.workload.values().cloned());
        self.roster.conflicts.extend(report.conflicts.iter().cloned());
        Ok(report)
    }

    pub fn schedule_for(&self, month: u32, year: i32) -> Option<&Schedule> {
        self.roster.find_schedule(month, year)
    }

    pub fn workload_for(
        &self,
        month: u32,
        year: i32,
        nurse: Option<&NurseId>,
    ) -> Vec<&WorkloadRecord> {
        self.roster
            .workload
            .iter()
            .filter(|w| w.month == month && w.year == year)
            .filter(|w| nurse.map_or(true, |id| &w.nurse_id == id))
            .collect()
    }

    pub fn conflicts_for(&self, schedule: &ScheduleId) -> Vec<&Conflict> {
        self.roster
            .conflicts
            .iter()
            .filter(|c| &c.schedule == schedule)
            .collect()
    }

    pub fn swap(&mut self, shift_id: &ShiftId, from: &NurseId, to: &NurseId) -> Result<(), SchedError> {
        mutate::swap(self, shift_id, from, to)
    }

    pub fn publish(&mut self, schedule: &ScheduleId) -> Result<(), SchedError> {
        mutate::set_status(self, schedule, ScheduleStatus::Published)
    }

    pub fn archive(&mut self, schedule: &ScheduleId) -> Result<(), SchedError> {
        mutate::set_status(self, schedule, ScheduleStatus::Archived)
    }
}
