use super::eligibility;
use super::state::RunContext;
use crate::model::{Nurse, NurseId, Shift, ShiftType};
use crate::rules::Rules;
use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::warn;

/// Remplit les trois postes d'une journée puis fait tourner les repos.
///
/// L'ordre des types de poste est tiré au sort chaque jour ; une personne
/// affectée à un poste est exclue des suivants le même jour.
pub(crate) fn assign_day<R: Rng + ?Sized>(
    nurses: &[Nurse],
    ctx: &mut RunContext,
    date: NaiveDate,
    department: &str,
    rules: &Rules,
    rng: &mut R,
) -> Vec<Shift> {
    let day = date.day0();
    let mut order = ShiftType::ALL;
    order.shuffle(rng);

    let mut assigned_today: HashSet<NurseId> = HashSet::new();
    let mut shifts = Vec::with_capacity(order.len());

    for shift_type in order {
        let mut shift = Shift::new(date, shift_type, department, rules.min_staff_per_shift);
        let mut candidates =
            eligibility::eligible(nurses, ctx, &assigned_today, shift_type, date, rules, rng);

        if candidates.is_empty() {
            warn!(%shift_type, %date, "no eligible nurses for shift");
            shifts.push(shift);
            continue;
        }

        let target = staffing_target(candidates.len(), rules, rng);
        candidates.shuffle(rng);
        let chosen: Vec<NurseId> = candidates
            .iter()
            .take(target)
            .map(|n| n.id.clone())
            .collect();

        ctx.record_assignments(&chosen, shift_type, day);
        assigned_today.extend(chosen.iter().cloned());
        shift.assigned = chosen;
        shifts.push(shift);
    }

    ctx.roll_rest(day, &assigned_today);
    shifts
}

/// Effectif visé : borné entre le minimum et le maximum, avec une chance
/// de forcer le maximum quand les candidats suffisent.
pub(super) fn staffing_target<R: Rng + ?Sized>(eligible: usize, rules: &Rules, rng: &mut R) -> usize {
    let min = rules.min_staff_per_shift as usize;
    let max = rules.max_staff_per_shift as usize;
    let mut target = eligible.max(min).min(max);
    if eligible >= max && rng.gen_bool(rules.overstaff_probability) {
        target = max;
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn target_is_clamped() {
        let rules = Rules::default();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        assert_eq!(staffing_target(1, &rules, &mut rng), 2);
        assert_eq!(staffing_target(2, &rules, &mut rng), 2);
        assert_eq!(staffing_target(3, &rules, &mut rng), 3);
        assert_eq!(staffing_target(10, &rules, &mut rng), 3);
    }

    #[test]
    fn one_day_never_double_books() {
        let nurses: Vec<Nurse> = (0..5)
            .map(|i| Nurse::new(format!("N{i}"), "Test", "General"))
            .collect();
        let mut ctx = RunContext::new(&nurses);
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let shifts = assign_day(&nurses, &mut ctx, date, "General", &Rules::default(), &mut rng);
        assert_eq!(shifts.len(), 3);

        let mut seen = HashSet::new();
        for shift in &shifts {
            assert_eq!(shift.date, date);
            assert_eq!(shift.required_staff, 2);
            for id in &shift.assigned {
                assert!(seen.insert(id.clone()), "nurse booked twice on one day");
            }
        }
        // 5 personnes libres : 3 sur le premier poste, 2 sur le suivant, rien au dernier
        assert_eq!(seen.len(), 5);
        let mut sizes: Vec<usize> = shifts.iter().map(|s| s.assigned.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![0, 2, 3]);
    }

    #[test]
    fn unavailable_team_leaves_empty_shifts() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let nurses = vec![Nurse::new("Solo", "Away", "General").with_unavailable([date])];
        let mut ctx = RunContext::new(&nurses);
        let mut rng = Pcg64Mcg::seed_from_u64(9);

        let shifts = assign_day(&nurses, &mut ctx, date, "ICU", &Rules::default(), &mut rng);
        assert!(shifts.iter().all(|s| s.assigned.is_empty()));
        assert!(shifts.iter().all(|s| s.department == "ICU"));
    }
}
