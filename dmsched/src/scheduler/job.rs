/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Jobs and the ready queue.
//!
//! The ready queue is a min-ordered map keyed by [`ReadyKey`]
//! (`(priority, task id)`), so "highest-priority ready job" is simply the
//! first entry.  At most one job per task is ever outstanding, which makes
//! the key unique.

use std::collections::BTreeMap;

use crate::task::{Task, TaskId};
use crate::time::Ticks;

use super::priority::Priority;

// ── Job ───────────────────────────────────────────────────────────────────────

/// One release instance of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub task: TaskId,
    pub arrival: Ticks,

    /// `arrival + relative deadline`, fixed at release.
    pub absolute_deadline: Ticks,

    remaining: Ticks,
}

impl Job {
    /// Instantiate the job `task` releases at `arrival`.
    pub fn release(task: &Task, arrival: Ticks) -> Self {
        Self {
            task: task.id,
            arrival,
            // a deadline past u64::MAX is never reached by the simulation
            absolute_deadline: arrival.saturating_add(task.deadline),
            remaining: task.execution,
        }
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Run for up to `elapsed` ticks; returns the ticks actually consumed.
    pub fn execute(&mut self, elapsed: Ticks) -> Ticks {
        let ran = elapsed.min(self.remaining);
        self.remaining -= ran;
        ran
    }

    /// `true` once `now` has reached the absolute deadline with work left:
    /// the job can no longer complete in time.
    pub fn missed_at(&self, now: Ticks) -> bool {
        self.remaining > 0 && now >= self.absolute_deadline
    }
}

// ── ReadyKey ──────────────────────────────────────────────────────────────────

/// Total order over ready jobs: priority first, task id second.
///
/// Field order matters: the derived `Ord` compares `priority` before `task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadyKey {
    pub priority: Priority,
    pub task: TaskId,
}

impl ReadyKey {
    pub fn new(priority: Priority, task: TaskId) -> Self {
        Self { priority, task }
    }
}

// ── ReadyQueue ────────────────────────────────────────────────────────────────

/// Released, unfinished jobs ordered by [`ReadyKey`].
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    jobs: BTreeMap<ReadyKey, Job>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `job`.  Returns `false` (and leaves the queue untouched) if a job
    /// with the same key is already outstanding.
    pub fn admit(&mut self, key: ReadyKey, job: Job) -> bool {
        if self.jobs.contains_key(&key) {
            return false;
        }
        self.jobs.insert(key, job);
        true
    }

    pub fn contains(&self, key: &ReadyKey) -> bool {
        self.jobs.contains_key(key)
    }

    /// Key of the highest-priority ready job.
    pub fn highest(&self) -> Option<ReadyKey> {
        self.jobs.keys().next().copied()
    }

    pub fn get(&self, key: &ReadyKey) -> Option<&Job> {
        self.jobs.get(key)
    }

    pub fn get_mut(&mut self, key: &ReadyKey) -> Option<&mut Job> {
        self.jobs.get_mut(key)
    }

    pub fn remove(&mut self, key: &ReadyKey) -> Option<Job> {
        self.jobs.remove(key)
    }

    /// Earliest absolute deadline among ready jobs.
    pub fn earliest_deadline(&self) -> Option<Ticks> {
        self.jobs.values().map(|j| j.absolute_deadline).min()
    }

    /// Highest-priority job that has missed its deadline at `now`.
    pub fn first_missed(&self, now: Ticks) -> Option<&Job> {
        self.jobs.values().find(|j| j.missed_at(now))
    }

    /// Ready jobs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&ReadyKey, &Job)> + '_ {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
