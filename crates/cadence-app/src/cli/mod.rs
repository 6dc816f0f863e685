//! Subcommands: validate, next, list.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cadence_core::config::Settings;
use cadence_recur::recur::{EngineLimits, OccurrenceCalculator, RecurrenceSpec};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use clap::Subcommand;

use crate::error::{AppError, AppResult};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a rule and print its description
    Validate {
        /// JSON rule document (`-` reads stdin)
        rule: PathBuf,
    },

    /// Print the next occurrence after an instant
    Next {
        /// JSON rule document (`-` reads stdin)
        rule: PathBuf,

        /// Reference instant, RFC 3339 (default: now)
        #[arg(long)]
        after: Option<DateTime<Utc>>,
    },

    /// List occurrences in a window
    List {
        /// JSON rule document (`-` reads stdin)
        rule: PathBuf,

        /// Window start, exclusive (default: just before the rule's start date)
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// Window end, inclusive
        #[arg(long)]
        end: DateTime<Utc>,

        /// Maximum pattern occurrences (default: engine.default_max_count)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print a JSON array instead of one instant per line
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn rule_path(&self) -> &Path {
        match self {
            Self::Validate { rule } | Self::Next { rule, .. } | Self::List { rule, .. } => rule,
        }
    }
}

/// Engine settings shared by every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub calculator: OccurrenceCalculator,
    pub default_max_count: usize,
}

impl Context {
    /// ## Summary
    /// Builds the engine context from loaded settings.
    ///
    /// ## Errors
    /// Returns an error if an engine limit is invalid.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let limits = EngineLimits::from_config(&settings.engine)?;
        Ok(Self {
            calculator: OccurrenceCalculator::new(limits),
            default_max_count: usize::try_from(settings.engine.default_max_count)
                .unwrap_or(usize::MAX),
        })
    }
}

/// ## Summary
/// Reads the command's rule document and runs the command.
///
/// ## Errors
/// Returns an error if the rule cannot be read, parsed or validated, or if
/// writing to `out` fails.
pub fn dispatch(command: &Commands, context: &Context, out: &mut impl Write) -> AppResult<()> {
    let spec = load_rule(command.rule_path())?;
    execute(command, &spec, context, out)
}

/// ## Summary
/// Runs a command against an already validated specification.
///
/// ## Errors
/// Returns an error if writing to `out` fails.
pub fn execute(
    command: &Commands,
    spec: &RecurrenceSpec,
    context: &Context,
    out: &mut impl Write,
) -> AppResult<()> {
    match command {
        Commands::Validate { .. } => {
            writeln!(out, "valid: {spec}")?;
        }
        Commands::Next { after, .. } => {
            let after = after.unwrap_or_else(Utc::now);
            match context.calculator.next_occurrence(spec, after) {
                Some(next) => writeln!(out, "{}", format_instant(next))?,
                None => writeln!(out, "none")?,
            }
        }
        Commands::List {
            start,
            end,
            limit,
            json,
            ..
        } => {
            let start = start.unwrap_or_else(|| {
                spec.start_date
                    .checked_sub_signed(TimeDelta::seconds(1))
                    .unwrap_or(spec.start_date)
            });
            let limit = limit.unwrap_or(context.default_max_count);
            let occurrences = context
                .calculator
                .occurrences_between(spec, start, *end, limit);
            tracing::info!(count = occurrences.len(), "Listed occurrences");

            if *json {
                serde_json::to_writer_pretty(&mut *out, &occurrences)?;
                writeln!(out)?;
            } else {
                for occurrence in occurrences {
                    writeln!(out, "{}", format_instant(occurrence))?;
                }
            }
        }
    }
    Ok(())
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn load_rule(path: &Path) -> AppResult<RecurrenceSpec> {
    let text = if path == Path::new("-") {
        io::read_to_string(io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|source| AppError::ReadError {
        path: path.display().to_string(),
        source,
    })?;

    let spec = RecurrenceSpec::from_json(&text)?;
    tracing::debug!(path = %path.display(), frequency = %spec.frequency(), "Loaded rule");
    Ok(spec)
}
