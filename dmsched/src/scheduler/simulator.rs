/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Event-driven preemptive fixed-priority simulation.
//!
//! The simulator never advances time tick by tick.  From the current instant
//! it jumps straight to the next point where the schedule can change:
//!
//! * the next job release,
//! * completion of the running job,
//! * the earliest absolute deadline among ready jobs,
//! * the horizon.
//!
//! At every such instant it runs one step of the state machine:
//!
//! ```text
//!            ┌──────────── admit releases ◄───────────────┐
//!            ▼                                            │
//!   overload / deadline passed? ──yes──► MISS             │
//!            │ no                                         │
//!            ▼                                            │
//!   pick highest-priority ready job ──► IDLE | RUNNING(task)
//!            │                                            │
//!            ▼                                            │
//!   count preemption, run until next event ───────────────┘
//!            │ horizon reached
//!            ▼
//!   unfinished work? ──yes──► MISS, otherwise DONE
//! ```
//!
//! All mutable state lives in a per-run context created inside
//! [`SchedulingSimulator::run`], so repeated runs over the same task set are
//! bit-identical.

use tracing::{debug, trace};

use crate::task::{TaskId, TaskSet};
use crate::time::Ticks;

use super::error::MissReason;
use super::job::{Job, ReadyKey, ReadyQueue};
use super::priority::PriorityMap;
use super::release::ReleaseStream;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Final verdict of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimOutcome {
    /// Every released job met its deadline.  `preemptions[i]` is the number
    /// of times task `i` was preempted.
    Schedulable { preemptions: Vec<u64> },

    /// The task set is infeasible; preemption counts are meaningless.
    NotSchedulable { reason: MissReason },
}

impl SimOutcome {
    pub fn is_schedulable(&self) -> bool {
        matches!(self, SimOutcome::Schedulable { .. })
    }

    /// Per-task preemption counts, `None` when not schedulable.
    pub fn preemptions(&self) -> Option<&[u64]> {
        match self {
            SimOutcome::Schedulable { preemptions } => Some(preemptions.as_slice()),
            SimOutcome::NotSchedulable { .. } => None,
        }
    }
}

/// State of the scheduling state machine between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// No ready job.
    Idle,
    /// A job of this task is executing.
    Running(TaskId),
    /// Terminal: a deadline was (or will inevitably be) missed.
    Miss,
    /// Terminal: horizon reached with every job complete.
    Done,
}

/// Counters collected during one run, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Instants at which the state machine stepped.
    pub events: u64,
    pub releases: u64,
    pub completions: u64,
    /// Dispatches of a job other than the one that ran in the previous step.
    pub context_switches: u64,
    pub idle_ticks: Ticks,
    /// Instant at which the run stopped.
    pub end_time: Ticks,
}

/// Outcome plus the statistics of the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    pub outcome: SimOutcome,
    pub final_state: SimState,
    pub stats: SimStats,
}

// ── Per-run context ───────────────────────────────────────────────────────────

/// Everything a run mutates.  Created fresh by every [`SchedulingSimulator::run`].
struct RunContext {
    now: Ticks,
    state: SimState,
    ready: ReadyQueue,
    /// Job dispatched in the previous step, if it has not completed.
    running: Option<ReadyKey>,
    preemptions: Vec<u64>,
    stats: SimStats,
}

impl RunContext {
    fn new(task_count: usize) -> Self {
        Self {
            now: 0,
            state: SimState::Idle,
            ready: ReadyQueue::new(),
            running: None,
            preemptions: vec![0; task_count],
            stats: SimStats::default(),
        }
    }

    fn miss(mut self, reason: MissReason) -> SimReport {
        debug!(at = self.now, %reason, "→ MISS");
        self.state = SimState::Miss;
        self.stats.end_time = self.now;
        SimReport {
            outcome: SimOutcome::NotSchedulable { reason },
            final_state: self.state,
            stats: self.stats,
        }
    }

    fn done(mut self) -> SimReport {
        debug!(at = self.now, "→ DONE");
        self.state = SimState::Done;
        self.stats.end_time = self.now;
        SimReport {
            outcome: SimOutcome::Schedulable {
                preemptions: self.preemptions,
            },
            final_state: self.state,
            stats: self.stats,
        }
    }
}

// ── SchedulingSimulator ───────────────────────────────────────────────────────

/// Preemptive fixed-priority simulator over a task set and its priorities.
///
/// Holds only shared references; `run` may be called any number of times.
#[derive(Debug, Clone, Copy)]
pub struct SchedulingSimulator<'a> {
    tasks: &'a TaskSet,
    priorities: &'a PriorityMap,
}

impl<'a> SchedulingSimulator<'a> {
    pub fn new(tasks: &'a TaskSet, priorities: &'a PriorityMap) -> Self {
        debug_assert_eq!(tasks.len(), priorities.len());
        Self { tasks, priorities }
    }

    fn key(&self, task: TaskId) -> ReadyKey {
        ReadyKey::new(self.priorities.of(task), task)
    }

    /// Simulate `[0, horizon)` and return the verdict.
    ///
    /// Stops at the first detected miss.
    pub fn run(&self, horizon: Ticks) -> SimReport {
        let mut ctx = RunContext::new(self.tasks.len());
        let mut releases = ReleaseStream::new(self.tasks, self.priorities, horizon);

        while ctx.now < horizon {
            ctx.stats.events += 1;

            // 1. Admit every release that has arrived.
            while let Some(release) = releases.next_due(ctx.now) {
                let task = &self.tasks.tasks()[release.task];
                let job = Job::release(task, release.time);
                if !ctx.ready.admit(self.key(release.task), job) {
                    return ctx.miss(MissReason::Overload {
                        task: release.task,
                        at: release.time,
                    });
                }
                ctx.stats.releases += 1;
                trace!(task = release.task, at = release.time, "released");
            }

            // 2. Deadline check.
            if let Some(job) = ctx.ready.first_missed(ctx.now) {
                let reason = MissReason::DeadlineMissed {
                    task: job.task,
                    deadline: job.absolute_deadline,
                    at: ctx.now,
                };
                return ctx.miss(reason);
            }

            // 3. Select.
            let selected = ctx.ready.highest();

            // 4. Preemption: the previous job was displaced with work left.
            if let Some(prev) = ctx.running {
                if selected != Some(prev) && ctx.ready.contains(&prev) {
                    ctx.preemptions[prev.task] += 1;
                    debug!(
                        at = ctx.now,
                        preempted = prev.task,
                        by = ?selected.map(|k| k.task),
                        count = ctx.preemptions[prev.task],
                        "preemption"
                    );
                }
            }
            if selected.is_some() && selected != ctx.running {
                ctx.stats.context_switches += 1;
            }
            ctx.running = selected;
            ctx.state = match selected {
                Some(key) => SimState::Running(key.task),
                None => SimState::Idle,
            };
            trace!(at = ctx.now, state = ?ctx.state, "dispatch");

            // 5. Jump to the next event and run the selected job until then.
            let mut next = horizon;
            if let Some(t) = releases.next_time() {
                next = next.min(t);
            }
            if let Some(d) = ctx.ready.earliest_deadline() {
                next = next.min(d);
            }
            if let Some(job) = selected.and_then(|key| ctx.ready.get(&key)) {
                next = next.min(ctx.now.saturating_add(job.remaining()));
            }
            let elapsed = next - ctx.now;

            match selected {
                Some(key) => {
                    let completed = match ctx.ready.get_mut(&key) {
                        Some(job) => {
                            job.execute(elapsed);
                            job.is_complete()
                        }
                        None => false,
                    };
                    if completed {
                        ctx.ready.remove(&key);
                        ctx.running = None;
                        ctx.stats.completions += 1;
                        trace!(task = key.task, at = next, "completed");
                    }
                }
                None => ctx.stats.idle_ticks += elapsed,
            }

            // 6. Advance time.
            ctx.now = next;
        }

        // 7. Horizon: anything still outstanding is a miss.
        let unfinished = ctx.ready.iter().next().map(|(key, job)| {
            MissReason::IncompleteAtHorizon {
                task: key.task,
                remaining: job.remaining(),
            }
        });
        if let Some(reason) = unfinished {
            return ctx.miss(reason);
        }

        ctx.done()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
