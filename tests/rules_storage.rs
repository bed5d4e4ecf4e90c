#![forbid(unsafe_code)]
use chrono::NaiveDate;
use nurse_roster::{
    export_rules_json, io, load_rules_from_file, GenerationParams, JsonStorage, Rules, Scheduler,
    Storage,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn rules_roundtrip_and_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.json");

    let rules = Rules {
        max_staff_per_shift: 4,
        overstaff_probability: 0.5,
        default_department: "Urgences".into(),
        ..Rules::default()
    };
    export_rules_json(&path, &rules).unwrap();
    assert_eq!(load_rules_from_file(&path).unwrap(), rules);

    fs::write(&path, r#"{ "min_staff_per_shift": 3 }"#).unwrap();
    let partial = load_rules_from_file(&path).unwrap();
    assert_eq!(partial.min_staff_per_shift, 3);
    assert_eq!(partial.max_staff_per_shift, 3);
    assert_eq!(partial.default_department, "General");
}

#[test]
fn inconsistent_rules_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, r#"{ "min_staff_per_shift": 4, "max_staff_per_shift": 2 }"#).unwrap();
    assert!(load_rules_from_file(&path).is_err());

    let bad = Rules {
        overstaff_probability: 1.5,
        ..Rules::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn storage_roundtrip_keeps_reports() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("roster.json")).unwrap();
    assert!(storage.load_or_default().unwrap().nurses.is_empty());

    let mut s = Scheduler::new();
    s.add_nurses(
        (0..4)
            .map(|i| nurse_roster::Nurse::new(format!("N{i}"), "Test", "General"))
            .collect(),
    );
    let report = s.generate(GenerationParams::new(11, 2025)).unwrap();
    storage.save(s.roster()).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.nurses.len(), 4);
    assert_eq!(loaded.schedules.len(), 1);
    assert_eq!(loaded.schedules[0].id, report.schedule);
    assert_eq!(loaded.schedules[0].shifts.len(), 90);
    assert_eq!(loaded.workload.len(), report.workload.len());
    assert_eq!(loaded.conflicts.len(), report.conflicts.len());
    assert!(loaded.has_schedule(11, 2025));
}

#[test]
fn import_nurses_with_unavailable_ranges() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nurses.csv");
    fs::write(
        &path,
        "first_name,last_name,department,unavailable_dates\n\
         Alice,Martin,General,2025-03-01;2025-03-04..2025-03-06\n\
         Bruno,Petit,ICU\n\
         Chloe,Roux,General,2025-03-10/2025-03-11\n",
    )
    .unwrap();

    let nurses = io::import_nurses_csv(&path).unwrap();
    assert_eq!(nurses.len(), 3);

    let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
    assert_eq!(nurses[0].unavailable_dates, vec![d(1), d(4), d(5), d(6)]);
    assert!(nurses[1].unavailable_dates.is_empty());
    assert_eq!(nurses[1].department, "ICU");
    assert_eq!(nurses[2].unavailable_dates, vec![d(10), d(11)]);
    assert_eq!(nurses[2].display_name(), "Chloe Roux");
}

#[test]
fn import_rejects_bad_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nurses.csv");
    fs::write(
        &path,
        "first_name,last_name,department,unavailable_dates\nAlice,Martin,General,2025-13-01\n",
    )
    .unwrap();
    assert!(io::import_nurses_csv(&path).is_err());

    fs::write(&path, "first_name,last_name,department\n,Martin,General\n").unwrap();
    assert!(io::import_nurses_csv(&path).is_err());
}

#[test]
fn export_shifts_csv_lists_every_shift() {
    let dir = tempdir().unwrap();
    let mut s = Scheduler::new();
    s.add_nurses(
        (0..5)
            .map(|i| nurse_roster::Nurse::new(format!("N{i}"), "Test", "General"))
            .collect(),
    );
    s.generate(GenerationParams::new(2, 2025)).unwrap();
    let schedule = s.schedule_for(2, 2025).unwrap();

    let path = dir.path().join("shifts.csv");
    io::export_shifts_csv(&path, s.roster(), schedule).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,type,start,end,department,required,assigned")
    );
    assert_eq!(lines.count(), 28 * 3);
    assert!(text.contains(",2025-02-01,Day,07:00,15:00,General,2,"));
    assert!(text.contains(",2025-02-28,Night,23:00,07:00,General,2,"));
}
