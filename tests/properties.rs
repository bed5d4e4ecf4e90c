#![forbid(unsafe_code)]
use chrono::{Datelike, NaiveDate};
use nurse_roster::{
    model::{Nurse, NurseId, Schedule, ShiftClass, ShiftType},
    rules::Rules,
    scheduler::{
        aggregate_workload, detect_conflicts, generate_month, run_month, GenerationParams,
        SchedError,
    },
};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use std::collections::{BTreeMap, HashMap, HashSet};

fn team(n: usize) -> Vec<Nurse> {
    (0..n)
        .map(|i| Nurse::new(format!("Nurse{i}"), "Test", "General"))
        .collect()
}

/// Jour (index 0) → type de poste, par personne.
fn timelines(schedule: &Schedule) -> HashMap<NurseId, BTreeMap<u32, ShiftType>> {
    let mut out: HashMap<NurseId, BTreeMap<u32, ShiftType>> = HashMap::new();
    for shift in &schedule.shifts {
        for id in &shift.assigned {
            let prev = out
                .entry(id.clone())
                .or_default()
                .insert(shift.date.day0(), shift.shift_type);
            assert!(prev.is_none(), "nurse {id} booked twice on {}", shift.date);
        }
    }
    out
}

/// Séries (début, longueur, classe) de jours consécutifs de même classe.
fn runs(days: &BTreeMap<u32, ShiftType>) -> Vec<(u32, u32, ShiftClass)> {
    let mut out: Vec<(u32, u32, ShiftClass)> = Vec::new();
    for (&day, ty) in days {
        let class = ty.class();
        match out.last_mut() {
            Some((start, len, c)) if *c == class && *start + *len == day => *len += 1,
            _ => out.push((day, 1, class)),
        }
    }
    out
}

fn scenarios() -> Vec<(usize, u32, i32, u64)> {
    let mut out = Vec::new();
    for seed in 0..12u64 {
        out.push((4, 4, 2025, seed));
        out.push((7, 2, 2024, seed));
        out.push((12, 1, 2025, seed));
    }
    out
}

#[test]
fn shifts_are_capped_and_never_double_booked() {
    let rules = Rules::default();
    for (size, month, year, seed) in scenarios() {
        let nurses = team(size);
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let schedule =
            generate_month(&nurses, &GenerationParams::new(month, year), &rules, &mut rng)
                .unwrap();
        for shift in &schedule.shifts {
            assert!(shift.assigned.len() <= 3);
            let unique: HashSet<_> = shift.assigned.iter().collect();
            assert_eq!(unique.len(), shift.assigned.len());
        }
        // le contrôle de double affectation est fait dans `timelines`
        timelines(&schedule);
    }
}

#[test]
fn runs_are_capped_and_followed_by_rest() {
    let rules = Rules::default();
    for (size, month, year, seed) in scenarios() {
        let nurses = team(size);
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let schedule =
            generate_month(&nurses, &GenerationParams::new(month, year), &rules, &mut rng)
                .unwrap();

        for (id, days) in timelines(&schedule) {
            let spans = runs(&days);
            for &(start, len, class) in &spans {
                assert!(len <= 3, "nurse {id}: run of {len} from day {start}");
                let end = start + len - 1;
                if len >= 2 {
                    for off in 1..len {
                        assert!(
                            !days.contains_key(&(end + off)),
                            "nurse {id}: worked day {} inside rest after run of {len}",
                            end + off
                        );
                    }
                }
                // série de nuit close par un jour sans poste : la reprise est un poste de jour
                if class == ShiftClass::Night && !days.contains_key(&(end + 1)) {
                    if let Some((&next_day, &next)) = days.range(end + 1..).next() {
                        assert_eq!(
                            next,
                            ShiftType::Day,
                            "nurse {id}: {next} on day {next_day} after night run"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn workload_totals_match_assignments() {
    let rules = Rules::default();
    for (size, month, year, seed) in scenarios() {
        let nurses = team(size);
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let schedule =
            generate_month(&nurses, &GenerationParams::new(month, year), &rules, &mut rng)
                .unwrap();
        let total = schedule.total_assignments();
        let records = aggregate_workload(&schedule, &rules);

        let shifts: u32 = records.values().map(|r| r.shifts_count).sum();
        let hours: f64 = records.values().map(|r| r.total_hours).sum();
        assert_eq!(shifts as usize, total);
        assert_eq!(hours, 8.0 * total as f64);
        assert!(records.values().all(|r| r.shifts_count > 0));
    }
}

#[test]
fn conflicts_match_understaffed_shifts() {
    let rules = Rules::default();
    for (size, month, year, seed) in scenarios() {
        let nurses = team(size);
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let schedule =
            generate_month(&nurses, &GenerationParams::new(month, year), &rules, &mut rng)
                .unwrap();
        let conflicts = detect_conflicts(&schedule);
        let short: HashSet<_> = schedule
            .shifts
            .iter()
            .filter(|s| s.assigned.len() < s.required_staff as usize)
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(conflicts.len(), short.len());
        assert!(conflicts.iter().all(|c| short.contains(&c.shift)));
    }
}

#[test]
fn unavailable_dates_are_respected() {
    let rules = Rules::default();
    let blocked = |day: u32| NaiveDate::from_ymd_opt(2025, 4, day).unwrap();
    for seed in 0..10u64 {
        let nurses: Vec<Nurse> = team(6)
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                let i = i as u32;
                n.with_unavailable([blocked(1 + i), blocked(10 + i), blocked(20 + i)])
            })
            .collect();
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let schedule =
            generate_month(&nurses, &GenerationParams::new(4, 2025), &rules, &mut rng)
                .unwrap();
        for shift in &schedule.shifts {
            for id in &shift.assigned {
                let nurse = nurses.iter().find(|n| &n.id == id).unwrap();
                assert!(!nurse.is_unavailable(shift.date));
            }
        }
    }
}

#[test]
fn department_run_only_uses_that_department() {
    let rules = Rules::default();
    let mut nurses = team(4);
    let icu: Vec<Nurse> = (0..4)
        .map(|i| Nurse::new(format!("Icu{i}"), "Test", "ICU"))
        .collect();
    let icu_ids: HashSet<NurseId> = icu.iter().map(|n| n.id.clone()).collect();
    nurses.extend(icu);

    for seed in 0..6u64 {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let params = GenerationParams::new(1, 2025).for_department("ICU");
        let (schedule, ctx) = run_month(&nurses, &params, &rules, &mut rng).unwrap();
        assert!(schedule.total_assignments() > 0);
        for shift in &schedule.shifts {
            assert_eq!(shift.department, "ICU");
            assert!(shift.assigned.iter().all(|id| icu_ids.contains(id)));
        }
        assert_eq!(ctx.states().count(), 4);
    }

    let mut rng = Pcg64Mcg::seed_from_u64(1);
    let general_only = team(2);
    assert!(matches!(
        generate_month(
            &general_only,
            &GenerationParams::new(1, 2025).for_department("ICU"),
            &rules,
            &mut rng
        ),
        Err(SchedError::NoWorkersAvailable)
    ));
}

#[test]
fn run_context_matches_schedule() {
    let rules = Rules::default();
    let nurses = team(5);
    let mut rng = Pcg64Mcg::seed_from_u64(42);
    let (schedule, ctx) =
        run_month(&nurses, &GenerationParams::new(3, 2025), &rules, &mut rng).unwrap();

    let lines = timelines(&schedule);
    for nurse in &nurses {
        let state = ctx.state(&nurse.id).unwrap();
        let expected = lines.get(&nurse.id).cloned().unwrap_or_default();
        assert_eq!(state.assignments, expected);
        assert_eq!(state.total_work_days as usize, expected.len());
        assert_eq!(state.last_work_day, expected.keys().next_back().copied());
    }
}
