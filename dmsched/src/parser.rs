/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task-file parser.
//!
//! One task per line, three comma-separated decimals:
//!
//! ```text
//! execution_time, period, relative_deadline
//! ```
//!
//! Parsing is two-pass.  The first pass turns every field into an exact
//! [`Decimal`] and checks signs; the second picks the [`Resolution`]
//! (fixed, or [`Resolution::auto`] over every literal in the file) and scales
//! each value to [`Ticks`].  Any offending line rejects the whole file, so a
//! partial task list is never returned.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::task::TaskSet;
use crate::time::{Decimal, DecimalError, Resolution, Ticks};

// ── Errors ────────────────────────────────────────────────────────────────────

/// The three fields of a task line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Execution,
    Period,
    Deadline,
}

impl Field {
    const ALL: [Field; 3] = [Field::Execution, Field::Period, Field::Deadline];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Execution => "execution_time",
            Field::Period => "period",
            Field::Deadline => "relative_deadline",
        })
    }
}

/// What is wrong with a single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 3 comma-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("{field} {value:?} is not a valid number: {source}")]
    InvalidNumber {
        field: Field,
        value: String,
        source: DecimalError,
    },

    #[error("execution_time must be positive")]
    NonPositiveExecution,

    #[error("relative_deadline must be positive")]
    NonPositiveDeadline,

    #[error("period must not be negative")]
    NegativePeriod,

    #[error("{field} is positive but rounds to zero at {resolution} ticks per unit")]
    BelowResolution { field: Field, resolution: Resolution },

    #[error("{field} does not fit in the tick range at {resolution} ticks per unit")]
    OutOfRange { field: Field, resolution: Resolution },
}

/// Why a task file was rejected.
#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("cannot read task file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Line { line: usize, reason: LineError },
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// A syntactically valid line awaiting scaling.
struct RawTask {
    line: usize,
    fields: [Decimal; 3],
}

fn parse_line(text: &str) -> Result<[Decimal; 3], LineError> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return Err(LineError::FieldCount { found: parts.len() });
    }

    let mut values = Vec::with_capacity(3);
    for (field, part) in Field::ALL.into_iter().zip(&parts) {
        let value: Decimal = part.parse().map_err(|source| LineError::InvalidNumber {
            field,
            value: part.trim().to_string(),
            source,
        })?;
        values.push(value);
    }

    let (execution, period, deadline) = (values[0], values[1], values[2]);
    if execution.is_negative() || execution.is_zero() {
        return Err(LineError::NonPositiveExecution);
    }
    if period.is_negative() {
        return Err(LineError::NegativePeriod);
    }
    if deadline.is_negative() || deadline.is_zero() {
        return Err(LineError::NonPositiveDeadline);
    }
    Ok([execution, period, deadline])
}

fn scale(raw: &RawTask, resolution: Resolution) -> Result<(Ticks, Ticks, Ticks), LineError> {
    let mut ticks = [0; 3];
    for ((slot, field), value) in ticks.iter_mut().zip(Field::ALL).zip(&raw.fields) {
        *slot = value
            .to_ticks(resolution)
            .map_err(|_| LineError::OutOfRange { field, resolution })?;
        if *slot == 0 && !value.is_zero() {
            return Err(LineError::BelowResolution { field, resolution });
        }
        if !value.is_exact_at(resolution) {
            warn!(
                line = raw.line,
                %field,
                %resolution,
                ticks = *slot,
                "value rounded to the configured resolution"
            );
        }
    }
    let [execution, period, deadline] = ticks;
    Ok((execution, period, deadline))
}

/// Parse task-file `text`.
///
/// Blank lines are skipped but still counted, so error line numbers match
/// what an editor shows.  With `resolution == None` the smallest power of ten
/// that represents every literal exactly is used.
///
/// # Errors
/// [`TaskFileError::Line`] for the first offending line.
pub fn parse_tasks(text: &str, resolution: Option<Resolution>) -> Result<TaskSet, TaskFileError> {
    let mut raw = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_line(line).map_err(|reason| TaskFileError::Line {
            line: idx + 1,
            reason,
        })?;
        raw.push(RawTask {
            line: idx + 1,
            fields,
        });
    }

    let resolution = resolution
        .unwrap_or_else(|| Resolution::auto(raw.iter().flat_map(|r| r.fields.iter())));

    let timings = raw
        .iter()
        .map(|r| {
            scale(r, resolution).map_err(|reason| TaskFileError::Line {
                line: r.line,
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (id, (e, p, d)) in timings.iter().enumerate() {
        debug!(task = id, execution = e, period = p, deadline = d, "parsed task");
    }
    info!(task_count = timings.len(), %resolution, "Parsed task file");

    Ok(TaskSet::from_timings(resolution, timings))
}

/// Read and parse the task file at `path`.
///
/// # Errors
/// [`TaskFileError::Io`] if the file cannot be read, otherwise as
/// [`parse_tasks`].
pub fn load_task_file(path: &Path, resolution: Option<Resolution>) -> Result<TaskSet, TaskFileError> {
    info!("Loading task file from: {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| TaskFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks(&text, resolution)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
