use crate::model::{Roster, Schedule, Shift};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Permet de customiser le rendu d'un planning (texte, tableur, etc.).
pub trait ScheduleRenderer {
    fn render(&self, roster: &Roster, schedule: &Schedule) -> String;
}

/// Calendrier texte groupé par semaine ISO puis par jour.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextCalendar;

impl ScheduleRenderer for TextCalendar {
    fn render(&self, roster: &Roster, schedule: &Schedule) -> String {
        let mut days: BTreeMap<NaiveDate, Vec<&Shift>> = BTreeMap::new();
        for shift in &schedule.shifts {
            days.entry(shift.date).or_default().push(shift);
        }

        let mut out = format!(
            "Planning {:02}/{} ({})\n",
            schedule.month, schedule.year, schedule.status
        );
        let mut current_week = None;
        for (date, mut shifts) in days {
            let week = date.iso_week().week();
            if current_week != Some(week) {
                let _ = writeln!(out, "Semaine {week}");
                current_week = Some(week);
            }
            let _ = writeln!(out, "  {} {}", date, date.format("%a"));

            shifts.sort_by_key(|s| s.shift_type);
            for shift in shifts {
                let _ = writeln!(out, "{}", shift_line(roster, shift));
            }
        }
        out
    }
}

fn shift_line(roster: &Roster, shift: &Shift) -> String {
    let mut names: Vec<String> = shift
        .assigned
        .iter()
        .map(|id| {
            roster
                .find_nurse(id)
                .map(|n| n.display_name())
                .unwrap_or_else(|| id.to_string())
        })
        .collect();
    names.sort();
    let names = if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    };
    let mut line = format!(
        "    {:<7} {}-{}  {}",
        shift.shift_type.as_str(),
        shift.start_time.format("%H:%M"),
        shift.end_time.format("%H:%M"),
        names
    );
    if shift.is_understaffed() {
        let _ = write!(line, " [manque {}]", shift.shortfall());
    }
    line
}

/// Rend le planning d'un mois présent dans le roster.
pub fn render_schedule(
    roster: &Roster,
    month: u32,
    year: i32,
    renderer: &dyn ScheduleRenderer,
) -> Result<String> {
    let schedule = roster
        .find_schedule(month, year)
        .with_context(|| format!("no schedule for {month:02}/{year}"))?;
    Ok(renderer.render(roster, schedule))
}
