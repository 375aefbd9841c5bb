/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core task data structures for the Deadline-Monotonic simulator.
//!
//! ```text
//! task file  ──(parser)──►  TaskSet  ──(scheduler)──►  SimOutcome
//!                             ↑ immutable definitions      ↑ verdict + preemptions
//! ```
//!
//! # Ownership model
//! A [`TaskSet`] is built once from parsed input and never mutated.  All
//! per-run mutable state (outstanding jobs, next release instants, preemption
//! counters) lives in the simulator's run context, so the same `TaskSet` can
//! be simulated any number of times with bit-identical results.

use crate::time::{Resolution, Ticks};

/// Stable task index: order of first appearance in the input, from `0`.
pub type TaskId = usize;

// ── Task ──────────────────────────────────────────────────────────────────────

/// Immutable definition of one periodic (or one-shot) task.
///
/// All timing fields are in ticks of the owning [`TaskSet`]'s resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Task {
    pub id: TaskId,

    /// Worst-case execution time of every job.  Always positive.
    pub execution: Ticks,

    /// Release period.  `0` denotes a one-shot task released once at time 0.
    pub period: Ticks,

    /// Relative deadline.  Always positive; may be smaller than, equal to or
    /// larger than the period.
    pub deadline: Ticks,
}

impl Task {
    pub fn new(id: TaskId, execution: Ticks, period: Ticks, deadline: Ticks) -> Self {
        Self {
            id,
            execution,
            period,
            deadline,
        }
    }

    /// `true` for a task released exactly once, at time 0.
    pub fn is_one_shot(&self) -> bool {
        self.period == 0
    }

    /// CPU utilisation fraction: `execution / period`.
    ///
    /// Returns `0.0` for one-shot tasks.  For logging; the schedulability
    /// pre-check uses exact integer arithmetic instead.
    pub fn utilization(&self) -> f64 {
        if self.is_one_shot() {
            0.0
        } else {
            self.execution as f64 / self.period as f64
        }
    }
}

// ── TaskSet ───────────────────────────────────────────────────────────────────

/// Validated, ordered task list together with the resolution its ticks are
/// expressed in.
///
/// Invariant: `tasks()[i].id == i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
    resolution: Resolution,
}

impl TaskSet {
    /// Build a task set from `(execution, period, deadline)` triples, assigning
    /// ids in iteration order.
    pub fn from_timings<I>(resolution: Resolution, timings: I) -> Self
    where
        I: IntoIterator<Item = (Ticks, Ticks, Ticks)>,
    {
        let tasks = timings
            .into_iter()
            .enumerate()
            .map(|(id, (e, p, d))| Task::new(id, e, p, d))
            .collect();
        Self { tasks, resolution }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks with a non-zero period.
    pub fn periodic(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(|t| !t.is_one_shot())
    }

    /// Tasks released exactly once.
    pub fn one_shot(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(|t| t.is_one_shot())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
