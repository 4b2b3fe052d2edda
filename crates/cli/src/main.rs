use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use surgtrack_core::config::{as_of_from_env_value, records_dir_from_env_value};
use surgtrack_core::constants::{AS_OF_ENV, DATE_FORMAT, RECORDS_DIR_ENV};
use surgtrack_core::{
    CoreConfig, FollowUp, Gender, InitialPresentation, Measurements, OperativeData, Patient,
    PatientId, PatientRegistry, PatientSummary,
};
use surgtrack_records::PatientFile;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "surgtrack")]
#[command(about = "Surgical patient tracker CLI")]
struct Cli {
    /// Directory holding patient record files (overrides SURGTRACK_RECORDS_DIR)
    #[arg(long, global = true)]
    records_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today (overrides SURGTRACK_AS_OF)
    #[arg(long, global = true)]
    as_of: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new patient
    Register {
        first_name: String,
        last_name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        /// Medical record number
        #[arg(long)]
        mrn: Option<String>,
        /// female, male, other or unknown
        #[arg(long)]
        gender: Option<String>,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Record the initial presentation
    Present {
        patient_id: String,
        #[arg(long)]
        diagnosis: Option<String>,
        #[arg(long)]
        complaint: Option<String>,
        /// Presentation date (YYYY-MM-DD); defaults to the current date
        #[arg(long)]
        presented_on: Option<String>,
    },
    /// Record an operative procedure
    Operate {
        patient_id: String,
        procedure_name: String,
        /// Operation date (YYYY-MM-DD)
        date: String,
        #[arg(long)]
        surgeon: Option<String>,
    },
    /// Record a post-operative follow-up
    FollowUp {
        patient_id: String,
        #[arg(long)]
        complications: Option<String>,
        /// Date seen (YYYY-MM-DD)
        #[arg(long)]
        seen_on: Option<String>,
    },
    /// Set the discharge flag and optional length of stay
    Discharge {
        patient_id: String,
        /// Length of stay in days
        #[arg(long)]
        stay: Option<u32>,
        /// Clear the discharge flag instead
        #[arg(long)]
        undo: bool,
    },
    /// Print the derived clinical summary as JSON
    Summary { patient_id: String },
    /// List all patients with their journey stage
    List,
    /// Permanently delete a patient and all attached records
    Purge {
        patient_id: String,
        #[arg(long)]
        confirm: bool,
    },
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))
}

fn parse_id(raw: &str) -> anyhow::Result<PatientId> {
    PatientId::parse(raw).with_context(|| format!("'{raw}' is not a patient id"))
}

/// The explicit presentation date, or the current calendar date. Never the `--as-of` date.
fn presentation_date(raw: Option<&str>, now: DateTime<Utc>) -> anyhow::Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(now.date_naive()),
    }
}

/// Loads every readable record file into a fresh registry.
///
/// A second file claiming an already loaded patient id is logged and skipped.
fn load_registry(cfg: &CoreConfig) -> PatientRegistry {
    let registry = PatientRegistry::new();
    for patient in PatientFile::list(cfg.records_dir()) {
        let id = patient.id();
        if let Err(e) = registry.insert(patient) {
            tracing::warn!(patient_id = %id, "skipping duplicate record file: {e}");
        }
    }
    registry
}

/// Loads, edits and saves one patient record.
fn edit_patient(
    cfg: &CoreConfig,
    raw_id: &str,
    f: impl FnOnce(&mut Patient) -> anyhow::Result<()>,
) -> anyhow::Result<Patient> {
    let id = parse_id(raw_id)?;
    let mut patient = PatientFile::load_by_id(cfg.records_dir(), id)?;
    f(&mut patient)?;
    PatientFile::save(cfg.records_dir(), &patient)?;
    Ok(patient)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("surgtrack=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let records_dir = cli
        .records_dir
        .unwrap_or_else(|| records_dir_from_env_value(std::env::var(RECORDS_DIR_ENV).ok()));
    let as_of = as_of_from_env_value(cli.as_of.or_else(|| std::env::var(AS_OF_ENV).ok()))?;
    let cfg = Arc::new(CoreConfig::new(records_dir, as_of)?);

    let now = Utc::now();

    match cli.command {
        Some(Commands::Register {
            first_name,
            last_name,
            dob,
            mrn,
            gender,
            height,
            weight,
        }) => {
            let date_of_birth = dob.as_deref().map(parse_date).transpose()?;
            let gender = match gender {
                Some(g) => match Gender::parse(&g) {
                    Some(parsed) => Some(parsed),
                    None => bail!("unknown gender '{g}'"),
                },
                None => None,
            };

            let mut patient = Patient::register(first_name, last_name, now);
            patient.edit(now, |f| {
                f.date_of_birth = date_of_birth;
                f.medical_record_number = mrn;
                f.gender = gender;
                f.measurements = Measurements::new(height, weight);
            });

            PatientFile::save(cfg.records_dir(), &patient)?;
            tracing::info!(patient_id = %patient.id(), "registered patient");
            println!("Registered patient with ID: {}", patient.id());
        }
        Some(Commands::Present {
            patient_id,
            diagnosis,
            complaint,
            presented_on,
        }) => {
            let presented_on = presentation_date(presented_on.as_deref(), now)?;
            let patient = edit_patient(&cfg, &patient_id, |p| {
                let mut presentation =
                    InitialPresentation::new(diagnosis).presented_on(presented_on);
                presentation.presenting_complaint = complaint;
                p.set_presentation(presentation, now)?;
                Ok(())
            })?;
            println!("Recorded presentation for {} ({})", patient.id(), patient.journey_stage());
        }
        Some(Commands::Operate {
            patient_id,
            procedure_name,
            date,
            surgeon,
        }) => {
            let operation_date = parse_date(&date)?;
            let patient = edit_patient(&cfg, &patient_id, |p| {
                let mut procedure = OperativeData::new(procedure_name, operation_date);
                procedure.surgeon = surgeon;
                p.attach_procedure(procedure, now)?;
                Ok(())
            })?;
            println!("Recorded procedure for {} ({})", patient.id(), patient.journey_stage());
        }
        Some(Commands::FollowUp {
            patient_id,
            complications,
            seen_on,
        }) => {
            let seen_on = seen_on.as_deref().map(parse_date).transpose()?;
            let patient = edit_patient(&cfg, &patient_id, |p| {
                let mut follow_up = FollowUp::new(complications);
                follow_up.seen_on = seen_on;
                p.attach_follow_up(follow_up, now)?;
                Ok(())
            })?;
            println!("Recorded follow-up for {} ({})", patient.id(), patient.journey_stage());
        }
        Some(Commands::Discharge {
            patient_id,
            stay,
            undo,
        }) => {
            let patient = edit_patient(&cfg, &patient_id, |p| {
                p.set_discharged(!undo, now);
                if stay.is_some() {
                    p.set_length_of_stay(stay, now);
                }
                Ok(())
            })?;
            println!(
                "Discharged: {} for {} ({})",
                patient.is_discharged(),
                patient.id(),
                patient.journey_stage()
            );
        }
        Some(Commands::Summary { patient_id }) => {
            let id = parse_id(&patient_id)?;
            let patient = PatientFile::load_by_id(cfg.records_dir(), id)?;
            let summary = PatientSummary::build(&patient, cfg.today());
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(Commands::List) => {
            let registry = load_registry(&cfg);
            let summaries = registry.summaries(cfg.today())?;
            if summaries.is_empty() {
                println!("No patients found.");
            } else {
                for summary in summaries {
                    println!(
                        "ID: {}, Name: {}, Stage: {}",
                        summary.id, summary.display_name, summary.journey_stage
                    );
                }
            }
        }
        Some(Commands::Purge {
            patient_id,
            confirm,
        }) => {
            let id = parse_id(&patient_id)?;
            if !confirm {
                bail!("purging {id} is irreversible; re-run with --confirm");
            }
            PatientFile::remove(cfg.records_dir(), id)?;
            println!("Purged patient {id}");
        }
        None => {
            println!("Use 'surgtrack --help' for commands");
        }
    }

    Ok(())
}
