use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Constantes de génération, surchargeables depuis un fichier JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub min_staff_per_shift: u32,
    pub max_staff_per_shift: u32,
    pub max_consecutive_day: u32,
    pub max_consecutive_night: u32,
    /// Probabilité de forcer l'effectif maximal quand assez de candidats.
    pub overstaff_probability: f64,
    /// Amplitude du bruit ajouté au compteur de postes pour départager.
    pub fairness_jitter: f64,
    pub hours_per_shift: f64,
    pub min_year: i32,
    pub default_department: String,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_staff_per_shift: 2,
            max_staff_per_shift: 3,
            max_consecutive_day: 3,
            max_consecutive_night: 3,
            overstaff_probability: 0.3,
            fairness_jitter: 1.0,
            hours_per_shift: 8.0,
            min_year: 2000,
            default_department: "General".to_string(),
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<()> {
        if self.min_staff_per_shift == 0 {
            bail!("min_staff_per_shift must be > 0");
        }
        if self.max_staff_per_shift < self.min_staff_per_shift {
            bail!("max_staff_per_shift must be >= min_staff_per_shift");
        }
        if self.max_consecutive_day == 0 || self.max_consecutive_night == 0 {
            bail!("consecutive caps must be > 0");
        }
        if !(0.0..=1.0).contains(&self.overstaff_probability) {
            bail!("overstaff_probability must be within [0, 1]");
        }
        if !self.fairness_jitter.is_finite() || self.fairness_jitter <= 0.0 {
            bail!("fairness_jitter must be > 0");
        }
        if self.hours_per_shift.is_nan() || self.hours_per_shift <= 0.0 {
            bail!("hours_per_shift must be > 0");
        }
        if self.default_department.trim().is_empty() {
            bail!("default_department cannot be empty");
        }
        Ok(())
    }
}

pub fn load_rules_from_file<P: AsRef<Path>>(path: P) -> Result<Rules> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading rules {}", path.display()))?;
    let rules: Rules = serde_json::from_slice(&data)
        .with_context(|| format!("parsing rules {}", path.display()))?;
    rules.validate()?;
    Ok(rules)
}

pub fn export_rules_json<P: AsRef<Path>>(path: P, rules: &Rules) -> Result<()> {
    rules.validate()?;
    let json = serde_json::to_string_pretty(rules)?;
    fs::write(path, json)?;
    Ok(())
}
