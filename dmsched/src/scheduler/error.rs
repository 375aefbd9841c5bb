/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured outcome and error types for schedulability analysis.
//!
//! Two layers, kept strictly apart:
//!
//! * [`MissReason`]: why a task set is **not schedulable**.  This is a
//!   normal verdict, never an error: it travels inside
//!   [`SimOutcome::NotSchedulable`](super::SimOutcome::NotSchedulable).
//! * [`AnalysisError`]: the analysis itself could not be carried out
//!   (horizon overflow, limits exceeded).  Fatal for the run.

use thiserror::Error;

use crate::hyperperiod::HyperperiodError;
use crate::task::TaskId;
use crate::time::Ticks;

// ── Verdict detail ────────────────────────────────────────────────────────────

/// Why the simulation concluded NOT-SCHEDULABLE.
///
/// Every variant carries enough data to emit a fully-qualified `tracing`
/// event.  The result printer ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// Total periodic utilisation exceeds 1; detected before simulating.
    ///
    /// `demand` is the work released in one hyperperiod, `supply` the
    /// hyperperiod length.
    UtilizationExceeded { demand: u128, supply: Ticks },

    /// A job still held work when its absolute deadline arrived.
    DeadlineMissed {
        task: TaskId,
        deadline: Ticks,
        at: Ticks,
    },

    /// A task released a new job while its previous job was unfinished.
    Overload { task: TaskId, at: Ticks },

    /// A job was still unfinished when the horizon was reached.
    IncompleteAtHorizon { task: TaskId, remaining: Ticks },
}

impl MissReason {
    /// The offending task, if the miss is attributable to one.
    pub fn task(&self) -> Option<TaskId> {
        match self {
            MissReason::UtilizationExceeded { .. } => None,
            MissReason::DeadlineMissed { task, .. }
            | MissReason::Overload { task, .. }
            | MissReason::IncompleteAtHorizon { task, .. } => Some(*task),
        }
    }
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissReason::UtilizationExceeded { demand, supply } => write!(
                f,
                "utilization exceeds 1: {} ticks of work released per {} tick hyperperiod",
                demand, supply
            ),

            MissReason::DeadlineMissed { task, deadline, at } => write!(
                f,
                "task {} missed its deadline at t={} (checked at t={})",
                task, deadline, at
            ),

            MissReason::Overload { task, at } => write!(
                f,
                "task {} released a job at t={} while its previous job was unfinished",
                task, at
            ),

            MissReason::IncompleteAtHorizon { task, remaining } => write!(
                f,
                "task {} still had {} ticks of work at the horizon",
                task, remaining
            ),
        }
    }
}

// ── Fatal analysis errors ─────────────────────────────────────────────────────

/// Top-level error returned by
/// [`DmScheduler::analyze()`](super::DmScheduler::analyze).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The hyperperiod / horizon could not be computed.
    #[error(transparent)]
    Hyperperiod(#[from] HyperperiodError),

    /// The horizon is longer than the configured `max_hyperperiod`.
    #[error("simulation horizon of {horizon_units} time units exceeds max_hyperperiod of {limit_units}")]
    HorizonTooLarge { horizon_units: f64, limit_units: u64 },

    /// Simulating the horizon would release more jobs than allowed.
    #[error("simulation would release {releases} jobs, above the limit of {limit}")]
    TooManyReleases { releases: u128, limit: u64 },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
