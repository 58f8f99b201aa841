//! # PrintPlan — weekly split CLI
//!
//! Seeds, edits and exports the per-week quantity split of print/mail jobs.
//!
//! Usage:
//!   printplan init JOB-1042 --quantity 12,500 --start 2026-01-05 --due 2026-02-01
//!   printplan edit JOB-1042 2 4,000          # lock week 2, later weeks absorb
//!   printplan edit JOB-1042 4 3,000 --confirm # last week: spread into earlier weeks
//!   printplan unlock JOB-1042 1
//!   printplan export JOB-1042                 # { weekly_split, locked_weeks }

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use printplan_core::PrintPlanConfig;
use printplan_split::parse::format_quantity;
use printplan_split::weeks::{date_millis, day_of, week_starts};
use printplan_split::{
    EditOutcome, JobStore, QuantityInput, SplitSeed, SplitStateStore, StoredJob,
};

#[derive(Parser)]
#[command(
    name = "printplan",
    version,
    about = "🗓️ PrintPlan — weekly quantity splits for print & mail jobs"
)]
struct Cli {
    /// Config file (default ~/.printplan/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Job data directory (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a job and split its quantity evenly across its weeks
    Init {
        job: String,
        #[arg(long)]
        quantity: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Replace an existing job
        #[arg(long)]
        force: bool,
    },
    /// Create or replace a job from a seed JSON file
    Import { job: String, seed: PathBuf },
    /// Show a job's split
    Show { job: String },
    /// Set one week (1-based) and lock it
    Edit {
        job: String,
        week: usize,
        value: String,
        /// Accept redistribution into earlier weeks
        #[arg(long)]
        confirm: bool,
        /// Revised value to commit with --confirm
        #[arg(long = "final", requires = "confirm")]
        final_value: Option<String>,
    },
    /// Unlock one or more weeks (1-based)
    Unlock {
        job: String,
        #[arg(required = true)]
        weeks: Vec<usize>,
    },
    /// Change the job's total quantity
    Total { job: String, value: String },
    /// Change the job's dates (only seeds a split that does not exist yet)
    Dates {
        job: String,
        start: String,
        due: String,
    },
    /// Print the split as saved: { weekly_split, locked_weeks }
    Export { job: String },
    /// List stored jobs
    List,
    /// Delete a stored job
    Remove { job: String },
}

struct App {
    store: JobStore,
    separators: String,
    display_separator: Option<char>,
    max_weeks: usize,
}

impl App {
    fn session(&self, seed: &SplitSeed) -> SplitStateStore {
        let mut state = SplitStateStore::new(&self.separators).with_max_weeks(self.max_weeks);
        state.seed(seed);
        state
    }

    fn open(&self, job: &str) -> Result<SplitStateStore> {
        let stored = self.store.load(job)?;
        Ok(self.session(&stored.to_seed()))
    }

    fn save(&self, job: &str, state: &SplitStateStore) -> Result<()> {
        self.store
            .save(&StoredJob::from_state(job, state))
            .with_context(|| format!("saving job '{job}'"))
    }

    fn qty(&self, value: u64) -> String {
        format_quantity(value, self.display_separator)
    }

    fn print_split(&self, job: &str, state: &SplitStateStore) {
        println!("📋 {job}  quantity {}", self.qty(state.total_quantity()));
        if !state.has_split() {
            println!("   (no split yet: needs quantity, start and due date)");
            return;
        }
        let starts = state
            .start_date()
            .map(|s| week_starts(s, state.weeks().len()))
            .unwrap_or_default();
        for (i, slot) in state.weeks().iter().enumerate() {
            let label = starts
                .get(i)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            println!(
                "   W{:<3} {:<10} {:>12} {}",
                i + 1,
                label,
                self.qty(slot.quantity),
                if slot.locked { "🔒" } else { "" }
            );
        }
        let summary = state.summary();
        if summary.is_balanced() {
            println!("   ✅ Split total {}", self.qty(summary.split_total));
        } else {
            println!(
                "   ⚠️  Split total {} ≠ quantity {} (difference {:+})",
                self.qty(summary.split_total),
                self.qty(summary.quantity),
                summary.difference
            );
        }
    }
}

fn parse_date(raw: &str) -> Result<i64> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?;
    date_millis(date).with_context(|| format!("date out of range: {raw}"))
}

fn week_index(week: usize) -> Result<usize> {
    week.checked_sub(1).context("weeks are numbered from 1")
}

/// Shown when `--confirm` was passed but the edit needed no preview.
fn unneeded_confirm_note(week: usize, value: &str, final_value: Option<&str>) -> String {
    match final_value {
        Some(ignored) => format!(
            "W{week} set to {value} without a preview; --confirm not needed, --final {ignored} ignored."
        ),
        None => format!("W{week} set to {value} without a preview; --confirm not needed."),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PrintPlanConfig::load_from(path)?,
        None => PrintPlanConfig::load()?,
    };

    // Initialize logging
    let filter = if cli.verbose {
        "printplan=debug,printplan_split=debug".to_string()
    } else {
        config.log.filter.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = match &cli.data_dir {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
        None => config.store.data_path(),
    };
    tracing::debug!("📂 Data dir: {}", data_dir.display());

    let app = App {
        store: JobStore::new(&data_dir),
        separators: config.split.thousands_separators.clone(),
        display_separator: config.split.display_separator(),
        max_weeks: config.split.max_weeks,
    };

    match cli.command {
        Command::Init {
            job,
            quantity,
            start,
            due,
            force,
        } => {
            if app.store.exists(&job) && !force {
                anyhow::bail!("job '{job}' already exists (use --force to replace it)");
            }
            let seed = SplitSeed {
                quantity: Some(QuantityInput::Text(quantity)),
                start_date: Some(parse_date(&start)?),
                due_date: Some(parse_date(&due)?),
                ..Default::default()
            };
            let state = app.session(&seed);
            app.save(&job, &state)?;
            app.print_split(&job, &state);
        }
        Command::Import { job, seed } => {
            let json = std::fs::read_to_string(&seed)
                .with_context(|| format!("reading {}", seed.display()))?;
            let seed: SplitSeed = serde_json::from_str(&json).context("parsing seed JSON")?;
            let state = app.session(&seed);
            app.save(&job, &state)?;
            app.print_split(&job, &state);
        }
        Command::Show { job } => {
            let state = app.open(&job)?;
            app.print_split(&job, &state);
        }
        Command::Edit {
            job,
            week,
            value,
            confirm,
            final_value,
        } => {
            let mut state = app.open(&job)?;
            let index = week_index(week)?;
            let mut outcome = state.edit_week(index, &value)?;
            let confirmed = confirm && matches!(outcome, EditOutcome::AwaitingConfirmation(_));
            if confirmed {
                outcome = state.confirm_backward(final_value.as_deref())?;
            }

            match outcome {
                EditOutcome::Applied { .. } => {
                    if confirm && !confirmed {
                        println!(
                            "ℹ️  {}",
                            unneeded_confirm_note(week, &value, final_value.as_deref())
                        );
                    }
                    app.save(&job, &state)?;
                    app.print_split(&job, &state);
                }
                EditOutcome::AwaitingConfirmation(preview) => {
                    println!(
                        "⏸️  No later unlocked week can absorb W{week} → {}.",
                        app.qty(preview.value)
                    );
                    println!("   Spreading into earlier weeks would give:");
                    for &t in &preview.targets {
                        println!(
                            "   W{:<3} {:>12} → {:>12}",
                            t + 1,
                            app.qty(state.weeks()[t].quantity),
                            app.qty(preview.quantities[t])
                        );
                    }
                    println!("   Re-run with --confirm (optionally --final <value>) to apply.");
                    state.cancel_backward();
                }
                EditOutcome::Blocked { locked } => {
                    let weeks: Vec<String> =
                        locked.iter().map(|i| format!("W{}", i + 1)).collect();
                    println!("🔒 Cannot redistribute: every other week is locked.");
                    println!("   Locked: {}", weeks.join(", "));
                    println!("   Unlock one with `printplan unlock {job} <week>` and retry.");
                }
            }
        }
        Command::Unlock { job, weeks } => {
            let mut state = app.open(&job)?;
            for week in weeks {
                state.unlock_week(week_index(week)?)?;
            }
            app.save(&job, &state)?;
            app.print_split(&job, &state);
        }
        Command::Total { job, value } => {
            let mut state = app.open(&job)?;
            state.change_total(&value);
            app.save(&job, &state)?;
            app.print_split(&job, &state);
        }
        Command::Dates { job, start, due } => {
            let mut state = app.open(&job)?;
            let had_split = state.has_split();
            state.change_dates(Some(parse_date(&start)?), Some(parse_date(&due)?));
            if had_split {
                println!("ℹ️  Dates updated; the existing split keeps its weeks.");
            }
            app.save(&job, &state)?;
            app.print_split(&job, &state);
        }
        Command::Export { job } => {
            let state = app.open(&job)?;
            println!("{}", serde_json::to_string_pretty(&state.record())?);
        }
        Command::List => {
            let jobs = app.store.list();
            if jobs.is_empty() {
                println!("No jobs in {}", data_dir.display());
            }
            for job in jobs {
                let span = match (job.start_date.and_then(day_of), job.due_date.and_then(day_of)) {
                    (Some(s), Some(d)) => format!("{s} → {d}"),
                    _ => "no dates".to_string(),
                };
                println!(
                    "📋 {:<16} {:>12}  {:>2} weeks  {}",
                    job.job_id,
                    app.qty(job.quantity),
                    job.split.weekly_split.len(),
                    span
                );
            }
        }
        Command::Remove { job } => {
            if app.store.remove(&job)? {
                println!("🗑️  Removed {job}");
            } else {
                println!("⚠️  No job '{job}'");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_index_is_one_based() {
        assert_eq!(week_index(1).unwrap(), 0);
        assert_eq!(week_index(4).unwrap(), 3);
        assert!(week_index(0).is_err());
    }

    #[test]
    fn test_unneeded_confirm_note_names_ignored_final() {
        let note = unneeded_confirm_note(2, "4,000", Some("3,500"));
        assert!(note.contains("W2 set to 4,000 without a preview"));
        assert!(note.contains("--final 3,500 ignored"));

        let note = unneeded_confirm_note(2, "4,000", None);
        assert!(note.contains("--confirm not needed"));
        assert!(!note.contains("--final"));
    }
}
