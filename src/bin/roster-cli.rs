#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nurse_roster::{
    io,
    model::{NurseId, Schedule, ShiftId},
    render::{render_schedule, TextCalendar},
    rules::{load_rules_from_file, Rules},
    scheduler::{GenerationParams, Scheduler},
    storage::{JsonStorage, Storage},
};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning mensuel d'infirmiers (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du roster (équipe, plannings, rapports)
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    /// Fichier JSON de règles (valeurs par défaut sinon)
    #[arg(long, global = true)]
    rules: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des infirmiers depuis un CSV
    ImportNurses {
        #[arg(long)]
        csv: String,
    },

    /// Générer le planning d'un mois
    Generate {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Restreindre à un service
        #[arg(long)]
        department: Option<String>,
        /// Graine pour une génération reproductible
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Lister les postes et optionnellement exporter
    List {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Charge de travail par personne
    Workload {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Nom affiché ("Prénom Nom")
        #[arg(long)]
        nurse: Option<String>,
    },

    /// Vérifier les postes en sous-effectif
    Conflicts {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Remplacer une personne par une autre sur un poste
    Swap {
        #[arg(long)]
        shift_id: String,
        /// Nom affiché de la personne remplacée
        #[arg(long)]
        nurse: String,
        /// Nom affiché du remplaçant
        #[arg(long)]
        with: String,
    },

    /// Publier un planning brouillon
    Publish {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },

    /// Archiver un planning
    Archive {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },

    /// Afficher le planning en calendrier texte
    Render {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Fichier de sortie (texte brut), stdout sinon
        #[arg(long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let rules = match &cli.rules {
        Some(path) => load_rules_from_file(path)?,
        None => Rules::default(),
    };
    let storage = JsonStorage::open(&cli.roster)?;
    let mut scheduler = Scheduler::with_rules(rules);
    *scheduler.roster_mut() = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::ImportNurses { csv } => {
            let nurses = io::import_nurses_csv(csv)?;
            println!("Imported {} nurse(s)", nurses.len());
            scheduler.add_nurses(nurses);
            storage.save(scheduler.roster())?;
            0
        }
        Commands::Generate {
            month,
            year,
            department,
            seed,
        } => {
            let mut params = GenerationParams::new(month, year);
            params.department = department;
            let report = match seed {
                Some(seed) => {
                    scheduler.generate_with_rng(params, &mut Pcg64Mcg::seed_from_u64(seed))?
                }
                None => scheduler.generate(params)?,
            };
            storage.save(scheduler.roster())?;
            println!(
                "Generated schedule {} for {:02}/{}: {} nurse(s) scheduled, {} conflict(s)",
                report.schedule.as_str(),
                month,
                year,
                report.workload.len(),
                report.conflicts.len()
            );
            0
        }
        Commands::List {
            month,
            year,
            out_json,
            out_csv,
        } => {
            let schedule = find_schedule(&scheduler, month, year)?;
            if let Some(path) = out_json {
                io::export_schedule_json(path, schedule)?;
            }
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, scheduler.roster(), schedule)?;
            }
            // impression compacte
            let mut shifts: Vec<_> = schedule.shifts.iter().collect();
            shifts.sort_by_key(|s| (s.date, s.shift_type));
            for s in shifts {
                let names: Vec<String> = s
                    .assigned
                    .iter()
                    .map(|id| {
                        scheduler
                            .roster()
                            .find_nurse(id)
                            .map(|n| n.display_name())
                            .unwrap_or_else(|| id.to_string())
                    })
                    .collect();
                println!(
                    "{} | {} {} | {}/{} | {}",
                    s.id.as_str(),
                    s.date,
                    s.shift_type,
                    s.assigned.len(),
                    s.required_staff,
                    if names.is_empty() { "-".to_string() } else { names.join(", ") }
                );
            }
            0
        }
        Commands::Workload { month, year, nurse } => {
            let filter: Option<NurseId> = match nurse {
                Some(name) => Some(nurse_id(&scheduler, &name)?),
                None => None,
            };
            let records = scheduler.workload_for(month, year, filter.as_ref());
            if records.is_empty() {
                println!("No workload recorded for {month:02}/{year}");
            }
            for w in records {
                let name = scheduler
                    .roster()
                    .find_nurse(&w.nurse_id)
                    .map(|n| n.display_name())
                    .unwrap_or_else(|| w.nurse_id.to_string());
                println!(
                    "{name} | shifts {} | hours {:.1} | nights {} | weekends {}",
                    w.shifts_count, w.total_hours, w.night_shifts, w.weekend_shifts
                );
            }
            0
        }
        Commands::Conflicts {
            month,
            year,
            report,
        } => {
            let schedule = find_schedule(&scheduler, month, year)?;
            let conflicts = scheduler.conflicts_for(&schedule.id);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                for c in &conflicts {
                    eprintln!("[{}] {}", c.severity.as_str(), c.message);
                }
                if let Some(path) = report {
                    io::export_conflicts_csv(path, &conflicts)?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Swap {
            shift_id,
            nurse,
            with,
        } => {
            let sid = ShiftId::new(shift_id);
            let from = nurse_id(&scheduler, &nurse)?;
            let to = nurse_id(&scheduler, &with)?;
            scheduler.swap(&sid, &from, &to)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::Publish { month, year } => {
            let id = find_schedule(&scheduler, month, year)?.id.clone();
            scheduler.publish(&id)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::Archive { month, year } => {
            let id = find_schedule(&scheduler, month, year)?.id.clone();
            scheduler.archive(&id)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::Render { month, year, out } => {
            let text = render_schedule(scheduler.roster(), month, year, &TextCalendar)?;
            match out {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("writing {path}"))?,
                None => print!("{text}"),
            }
            0
        }
    };

    std::process::exit(code);
}

fn find_schedule(scheduler: &Scheduler, month: u32, year: i32) -> Result<&Schedule> {
    scheduler
        .schedule_for(month, year)
        .with_context(|| format!("no schedule for {month:02}/{year}"))
}

fn nurse_id(scheduler: &Scheduler, name: &str) -> Result<NurseId> {
    match scheduler.roster().nurses_named(name).as_slice() {
        [] => bail!("unknown nurse: {}", name),
        [nurse] => Ok(nurse.id.clone()),
        many => bail!("ambiguous nurse name: {} ({} matches)", name, many.len()),
    }
}
