use super::rest;
use crate::model::{Nurse, NurseId, ShiftClass, ShiftType};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Historique récent d'une personne pendant une génération.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NurseState {
    /// Dernier jour travaillé (index 0 dans le mois).
    pub last_work_day: Option<u32>,
    pub consecutive_run: u32,
    pub last_class: Option<ShiftClass>,
    pub rest_days_left: u32,
    /// Après une série de nuit, seul un poste de jour est possible.
    pub after_night_rest: bool,
    pub total_work_days: u32,
    pub assignments: BTreeMap<u32, ShiftType>,
}

impl NurseState {
    pub fn worked_yesterday(&self, day: u32) -> bool {
        match (self.last_work_day, day.checked_sub(1)) {
            (Some(last), Some(yesterday)) => last == yesterday,
            _ => false,
        }
    }

    pub fn record_assignment(&mut self, shift_type: ShiftType, day: u32) {
        let class = shift_type.class();
        if self.worked_yesterday(day) && self.last_class == Some(class) {
            self.consecutive_run += 1;
        } else {
            self.consecutive_run = 1;
            self.last_class = Some(class);
        }
        self.last_work_day = Some(day);
        self.total_work_days += 1;
        self.after_night_rest = false;
        self.assignments.insert(day, shift_type);
    }
}

/// États de toutes les personnes pour une seule génération.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    states: HashMap<NurseId, NurseState>,
}

impl RunContext {
    pub fn new(nurses: &[Nurse]) -> Self {
        Self {
            states: nurses
                .iter()
                .map(|n| (n.id.clone(), NurseState::default()))
                .collect(),
        }
    }

    pub fn state(&self, id: &NurseId) -> Option<&NurseState> {
        self.states.get(id)
    }

    pub fn states(&self) -> impl Iterator<Item = (&NurseId, &NurseState)> {
        self.states.iter()
    }

    pub fn record_assignments(&mut self, ids: &[NurseId], shift_type: ShiftType, day: u32) {
        for id in ids {
            if let Some(state) = self.states.get_mut(id) {
                state.record_assignment(shift_type, day);
            }
        }
    }

    pub fn roll_rest(&mut self, day: u32, assigned_today: &HashSet<NurseId>) {
        for (id, state) in self.states.iter_mut() {
            rest::roll_rest(state, day, assigned_today.contains(id));
        }
    }
}
