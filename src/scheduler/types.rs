use crate::model::{NurseId, ScheduleId, ShiftId, WorkloadRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Paramètres d'une génération mensuelle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub month: u32,
    pub year: i32,
    /// Restreint l'équipe à un service ; sinon service par défaut des règles.
    #[serde(default)]
    pub department: Option<String>,
}

impl GenerationParams {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            department: None,
        }
    }

    pub fn for_department<D: Into<String>>(mut self, department: D) -> Self {
        self.department = Some(department.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Draft,
    Published,
    Archived,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleStatus::Draft => "Draft",
            ScheduleStatus::Published => "Published",
            ScheduleStatus::Archived => "Archived",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Understaffed,
    Overstaffed,
    Qualification,
    Availability,
    Overtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::Understaffed => "understaffed",
            ConflictKind::Overstaffed => "overstaffed",
            ConflictKind::Qualification => "qualification",
            ConflictKind::Availability => "availability",
            ConflictKind::Overtime => "overtime",
        }
    }
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub schedule: ScheduleId,
    pub shift: ShiftId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nurse: Option<NurseId>,
    pub kind: ConflictKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Résultat d'une génération validée et enregistrée dans le roster.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub schedule: ScheduleId,
    pub workload: HashMap<NurseId, WorkloadRecord>,
    pub conflicts: Vec<Conflict>,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("schedule already exists for month {month} and year {year}")]
    DuplicatePeriod { month: u32, year: i32 },
    #[error("no nurses available for scheduling")]
    NoWorkersAvailable,
    #[error("unknown nurse: {0}")]
    UnknownNurse(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("unknown schedule: {0}")]
    UnknownSchedule(String),
    #[error("swap invalid: {0}")]
    SwapInvalid(&'static str),
    #[error("cannot move schedule from {from} to {to}")]
    StatusTransition {
        from: ScheduleStatus,
        to: ScheduleStatus,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
