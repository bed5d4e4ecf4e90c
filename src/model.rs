use crate::scheduler::{Conflict, ScheduleStatus};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiant fort pour Nurse
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NurseId(String);

impl NurseId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NurseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Infirmier·ère. Lu en lecture seule par le moteur pendant une génération.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    pub id: NurseId,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_dates: Vec<NaiveDate>,
}

impl Nurse {
    pub fn new<F: Into<String>, L: Into<String>, D: Into<String>>(
        first_name: F,
        last_name: L,
        department: D,
    ) -> Self {
        Self {
            id: NurseId::random(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            unavailable_dates: Vec::new(),
        }
    }

    pub fn with_unavailable<I: IntoIterator<Item = NaiveDate>>(mut self, dates: I) -> Self {
        self.unavailable_dates.extend(dates);
        self
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_unavailable(&self, date: NaiveDate) -> bool {
        self.unavailable_dates.contains(&date)
    }
}

/// Classe grossière d'un type de poste, pour les séries et le repos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftClass {
    Day,
    Night,
}

/// Type de poste, chacun lié à une fenêtre horaire fixe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftType {
    Day,
    Evening,
    Night,
}

impl ShiftType {
    pub const ALL: [ShiftType; 3] = [ShiftType::Day, ShiftType::Evening, ShiftType::Night];

    /// Fenêtre (début, fin). La nuit se termine le lendemain.
    pub fn window(self) -> (NaiveTime, NaiveTime) {
        let (start, end) = match self {
            ShiftType::Day => (7, 15),
            ShiftType::Evening => (15, 23),
            ShiftType::Night => (23, 7),
        };
        (
            NaiveTime::from_hms_opt(start, 0, 0).unwrap_or_default(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap_or_default(),
        )
    }

    pub fn class(self) -> ShiftClass {
        match self {
            ShiftType::Night => ShiftClass::Night,
            ShiftType::Day | ShiftType::Evening => ShiftClass::Day,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Day => "Day",
            ShiftType::Evening => "Evening",
            ShiftType::Night => "Night",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Poste d'une journée donnée
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub department: String,
    pub required_staff: u32,
    #[serde(default)]
    pub assigned: Vec<NurseId>,
}

impl Shift {
    /// Crée un poste vide avec la fenêtre horaire de son type.
    pub fn new<D: Into<String>>(
        date: NaiveDate,
        shift_type: ShiftType,
        department: D,
        required_staff: u32,
    ) -> Self {
        let (start_time, end_time) = shift_type.window();
        Self {
            id: ShiftId::random(),
            date,
            shift_type,
            start_time,
            end_time,
            department: department.into(),
            required_staff,
            assigned: Vec::new(),
        }
    }

    pub fn assigned_count(&self) -> u32 {
        u32::try_from(self.assigned.len()).unwrap_or(u32::MAX)
    }

    /// Nombre de personnes manquantes (0 si l'effectif est atteint).
    pub fn shortfall(&self) -> u32 {
        self.required_staff.saturating_sub(self.assigned_count())
    }

    pub fn is_understaffed(&self) -> bool {
        self.assigned_count() < self.required_staff
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Identifiant fort pour Schedule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Planning mensuel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub month: u32,
    pub year: i32,
    pub generated_at: DateTime<Utc>,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl Schedule {
    pub fn draft(month: u32, year: i32, generated_at: DateTime<Utc>) -> Self {
        Self {
            id: ScheduleId::random(),
            month,
            year,
            generated_at,
            status: ScheduleStatus::Draft,
            shifts: Vec::new(),
        }
    }

    pub fn find_shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }

    /// Nombre total d'affectations (une par infirmier·ère et par poste).
    pub fn total_assignments(&self) -> usize {
        self.shifts.iter().map(|s| s.assigned.len()).sum()
    }
}

/// Charge de travail d'une personne pour un mois donné.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub nurse_id: NurseId,
    pub month: u32,
    pub year: i32,
    pub shifts_count: u32,
    pub total_hours: f64,
    #[serde(default)]
    pub overtime_hours: f64,
    pub night_shifts: u32,
    pub weekend_shifts: u32,
    #[serde(default)]
    pub consecutive_days: u32,
}

impl WorkloadRecord {
    pub fn new(nurse_id: NurseId, month: u32, year: i32) -> Self {
        Self {
            nurse_id,
            month,
            year,
            shifts_count: 0,
            total_hours: 0.0,
            overtime_hours: 0.0,
            night_shifts: 0,
            weekend_shifts: 0,
            consecutive_days: 0,
        }
    }
}

/// Document persisté : équipe, plannings et rapports dérivés.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    #[serde(default)]
    pub nurses: Vec<Nurse>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub workload: Vec<WorkloadRecord>,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

impl Roster {
    pub fn find_nurse<'a>(&'a self, id: &NurseId) -> Option<&'a Nurse> {
        self.nurses.iter().find(|n| &n.id == id)
    }
    /// Toutes les personnes portant ce nom affiché (casse ignorée).
    pub fn nurses_named<'a>(&'a self, name: &str) -> Vec<&'a Nurse> {
        self.nurses
            .iter()
            .filter(|n| n.display_name().eq_ignore_ascii_case(name.trim()))
            .collect()
    }
    pub fn find_schedule<'a>(&'a self, month: u32, year: i32) -> Option<&'a Schedule> {
        self.schedules
            .iter()
            .find(|s| s.month == month && s.year == year)
    }
    pub fn has_schedule(&self, month: u32, year: i32) -> bool {
        self.find_schedule(month, year).is_some()
    }
    /// Position (planning, poste) d'un shift dans le document.
    pub fn locate_shift(&self, id: &ShiftId) -> Option<(usize, usize)> {
        self.schedules.iter().enumerate().find_map(|(si, schedule)| {
            schedule
                .shifts
                .iter()
                .position(|s| &s.id == id)
                .map(|hi| (si, hi))
        })
    }
}
