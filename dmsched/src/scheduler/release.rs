/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Job release generation.
//!
//! Every periodic task releases at `0, period, 2·period, …` strictly below
//! the horizon; a one-shot task releases once, at `0`.  Releases are produced
//! lazily in `(time, priority, task)` order from a min-heap holding one
//! pending instant per task, so memory stays proportional to the task count
//! however long the horizon is.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::task::{Task, TaskId, TaskSet};
use crate::time::Ticks;

use super::priority::{Priority, PriorityMap};

/// One release instant of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub time: Ticks,
    pub task: TaskId,
}

/// Release instants of a single task in `[0, horizon)`.
pub fn release_instants(task: &Task, horizon: Ticks) -> impl Iterator<Item = Ticks> {
    let period = task.period;
    let mut next = Some(0);
    std::iter::from_fn(move || {
        let t = next.filter(|&t| t < horizon)?;
        next = if period == 0 { None } else { t.checked_add(period) };
        Some(t)
    })
}

/// Number of releases all tasks generate in `[0, horizon)`.
pub fn release_count(tasks: &TaskSet, horizon: Ticks) -> u128 {
    if horizon == 0 {
        return 0;
    }
    tasks
        .tasks()
        .iter()
        .map(|t| {
            if t.is_one_shot() {
                1
            } else {
                u128::from(horizon.div_ceil(t.period))
            }
        })
        .sum()
}

/// Time-ordered stream of every release in `[0, horizon)`.
///
/// Simultaneous releases come out in priority order.
#[derive(Debug, Clone)]
pub struct ReleaseStream<'a> {
    tasks: &'a [Task],
    pending: BinaryHeap<Reverse<(Ticks, Priority, TaskId)>>,
    horizon: Ticks,
}

impl<'a> ReleaseStream<'a> {
    pub fn new(tasks: &'a TaskSet, priorities: &PriorityMap, horizon: Ticks) -> Self {
        let pending = if horizon == 0 {
            BinaryHeap::new()
        } else {
            tasks
                .tasks()
                .iter()
                .map(|t| Reverse((0, priorities.of(t.id), t.id)))
                .collect()
        };
        Self {
            tasks: tasks.tasks(),
            pending,
            horizon,
        }
    }

    /// Instant of the next pending release, if any.
    pub fn next_time(&self) -> Option<Ticks> {
        self.pending.peek().map(|Reverse((t, _, _))| *t)
    }

    /// Pop the next release if it is due at or before `now`.
    pub fn next_due(&mut self, now: Ticks) -> Option<Release> {
        match self.next_time() {
            Some(t) if t <= now => self.next(),
            _ => None,
        }
    }
}

impl Iterator for ReleaseStream<'_> {
    type Item = Release;

    fn next(&mut self) -> Option<Release> {
        let Reverse((time, priority, task)) = self.pending.pop()?;
        let period = self.tasks[task].period;
        if period > 0 {
            if let Some(next) = time.checked_add(period).filter(|&n| n < self.horizon) {
                self.pending.push(Reverse((next, priority, task)));
            }
        }
        Some(Release { time, task })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::priority::assign_priorities;
    use crate::time::Resolution;

    fn set(timings: &[(Ticks, Ticks, Ticks)]) -> TaskSet {
        TaskSet::from_timings(Resolution::MILLIS, timings.iter().copied())
    }

    #[test]
    fn periodic_instants_stop_strictly_before_horizon() {
        let t = Task::new(0, 1, 4, 4);
        assert_eq!(release_instants(&t, 12).collect::<Vec<_>>(), vec![0, 4, 8]);
        assert_eq!(release_instants(&t, 13).collect::<Vec<_>>(), vec![0, 4, 8, 12]);
    }

    #[test]
    fn one_shot_releases_once_at_zero() {
        let t = Task::new(0, 3, 0, 10);
        assert_eq!(release_instants(&t, 100).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn nothing_is_released_with_zero_horizon() {
        let t = Task::new(0, 3, 0, 10);
        assert_eq!(release_instants(&t, 0).count(), 0);
        let tasks = set(&[(1, 4, 4)]);
        let prio = assign_priorities(&tasks);
        assert_eq!(ReleaseStream::new(&tasks, &prio, 0).count(), 0);
    }

    #[test]
    fn stream_is_time_ordered_with_priority_tie_break() {
        // task 1 has the shorter deadline, so it comes first at shared instants
        let tasks = set(&[(2, 6, 6), (1, 4, 4)]);
        let prio = assign_priorities(&tasks);
        let releases: Vec<(Ticks, TaskId)> = ReleaseStream::new(&tasks, &prio, 12)
            .map(|r| (r.time, r.task))
            .collect();
        assert_eq!(releases, vec![(0, 1), (0, 0), (4, 1), (6, 0), (8, 1)]);
    }

    #[test]
    fn stream_matches_per_task_instants() {
        let tasks = set(&[(1, 3, 3), (1, 5, 5), (1, 0, 7)]);
        let prio = assign_priorities(&tasks);
        let all: Vec<Release> = ReleaseStream::new(&tasks, &prio, 15).collect();
        for t in tasks.tasks() {
            let from_stream: Vec<Ticks> =
                all.iter().filter(|r| r.task == t.id).map(|r| r.time).collect();
            let expected: Vec<Ticks> = release_instants(t, 15).collect();
            assert_eq!(from_stream, expected, "task {}", t.id);
        }
        assert_eq!(all.len() as u128, release_count(&tasks, 15));
    }

    #[test]
    fn next_due_only_pops_releases_that_have_arrived() {
        let tasks = set(&[(1, 4, 4)]);
        let prio = assign_priorities(&tasks);
        let mut stream = ReleaseStream::new(&tasks, &prio, 12);
        assert_eq!(stream.next_due(0), Some(Release { time: 0, task: 0 }));
        assert_eq!(stream.next_due(3), None);
        assert_eq!(stream.next_time(), Some(4));
        assert_eq!(stream.next_due(4), Some(Release { time: 4, task: 0 }));
    }

    #[test]
    fn release_count_handles_non_dividing_periods() {
        // 0, 5, 10 below 12
        assert_eq!(release_count(&set(&[(1, 5, 5)]), 12), 3);
        assert_eq!(release_count(&set(&[(1, 4, 4), (1, 0, 9)]), 12), 4);
        assert_eq!(release_count(&set(&[(1, 4, 4)]), 0), 0);
    }
}
