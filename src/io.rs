use crate::model::{Nurse, Roster, Schedule};
use crate::scheduler::Conflict;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'infirmiers depuis CSV: header `first_name,last_name,department[,unavailable_dates]`
///
/// `unavailable_dates` : dates `YYYY-MM-DD` séparées par `;`, plages
/// inclusives `début..fin` ou `début/fin` acceptées.
pub fn import_nurses_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Nurse>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let first = rec.get(0).context("missing first_name")?.trim();
        let last = rec.get(1).context("missing last_name")?.trim();
        let department = rec.get(2).context("missing department")?.trim();
        if first.is_empty() || last.is_empty() || department.is_empty() {
            bail!("invalid nurse row (empty)");
        }
        let mut nurse = Nurse::new(first, last, department);
        if let Some(raw) = rec.get(3) {
            let raw = raw.trim();
            if !raw.is_empty() {
                nurse.unavailable_dates = parse_dates(raw)
                    .with_context(|| format!("invalid unavailable_dates for {first} {last}"))?;
            }
        }
        out.push(nurse);
    }
    Ok(out)
}

fn parse_dates(raw: &str) -> anyhow::Result<Vec<NaiveDate>> {
    let mut out = Vec::new();
    for chunk in raw.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some((start, end)) = chunk.split_once("..").or_else(|| chunk.split_once('/')) {
            let start = parse_date(start.trim())?;
            let end = parse_date(end.trim())?;
            if end < start {
                bail!("range end before start: {chunk}");
            }
            out.extend(start.iter_days().take_while(|d| *d <= end));
        } else {
            out.push(parse_date(chunk)?);
        }
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON d'un planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des postes: header `id,date,type,start,end,department,required,assigned`
///
/// `assigned` contient les noms séparés par `;`, triés par date puis type.
pub fn export_shifts_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    schedule: &Schedule,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "date",
        "type",
        "start",
        "end",
        "department",
        "required",
        "assigned",
    ])?;

    let mut shifts: Vec<_> = schedule.shifts.iter().collect();
    shifts.sort_by_key(|s| (s.date, s.shift_type));
    for s in shifts {
        let assigned = s
            .assigned
            .iter()
            .map(|id| {
                roster
                    .find_nurse(id)
                    .map(Nurse::display_name)
                    .unwrap_or_else(|| id.to_string())
            })
            .collect::<Vec<_>>()
            .join(";");
        let date = s.date.to_string();
        let start = s.start_time.format("%H:%M").to_string();
        let end = s.end_time.format("%H:%M").to_string();
        let required = s.required_staff.to_string();
        w.write_record([
            s.id.as_str(),
            date.as_str(),
            s.shift_type.as_str(),
            start.as_str(),
            end.as_str(),
            s.department.as_str(),
            required.as_str(),
            assigned.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des conflits: header `shift_id,kind,severity,message`
pub fn export_conflicts_csv<P: AsRef<Path>>(path: P, conflicts: &[&Conflict]) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["shift_id", "kind", "severity", "message"])?;
    for c in conflicts {
        w.write_record([
            c.shift.as_str(),
            c.kind.as_str(),
            c.severity.as_str(),
            c.message.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
