#![forbid(unsafe_code)]
//! Nurse roster : générateur de plannings mensuels d'infirmiers (sans BD).
//!
//! - Trois postes fixes par jour (jour, soir, nuit).
//! - Affectation gloutonne jour par jour, équité à bruit aléatoire près.
//! - Séries plafonnées, repos obligatoires après une série.
//! - Rapports dérivés : charge par personne, postes en sous-effectif.
//! - Stockage fichiers (JSON/CSV).

pub mod io;
pub mod model;
pub mod render;
pub mod rules;
pub mod scheduler;
pub mod storage;

pub use model::{
    Nurse, NurseId, Roster, Schedule, ScheduleId, Shift, ShiftClass, ShiftId, ShiftType,
    WorkloadRecord,
};
pub use render::{render_schedule, ScheduleRenderer, TextCalendar};
pub use rules::{export_rules_json, load_rules_from_file, Rules};
pub use scheduler::{
    Conflict, ConflictKind, GenerationParams, GenerationReport, SchedError, ScheduleStatus,
    Scheduler, Severity,
};
pub use storage::{JsonStorage, Storage};
