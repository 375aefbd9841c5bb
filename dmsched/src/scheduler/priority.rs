/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Deadline-Monotonic priority assignment.
//!
//! Tasks are ranked by ascending relative deadline; rank `0` is the highest
//! priority.  Equal deadlines fall back to ascending task id, so the ranking
//! is a strict total order regardless of how the input was iterated.

use std::fmt;

use crate::task::{Task, TaskId, TaskSet};

/// Static priority rank.  Smaller is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(usize);

impl Priority {
    pub const HIGHEST: Priority = Priority(0);

    pub fn rank(self) -> usize {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Priority of every task, indexed by [`TaskId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityMap(Vec<Priority>);

impl PriorityMap {
    /// Priority of task `id`.
    ///
    /// # Panics
    /// If `id` is not a task of the set the map was built from.
    pub fn of(&self, id: TaskId) -> Priority {
        self.0[id]
    }

    /// Task ids from highest to lowest priority.
    pub fn in_priority_order(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = (0..self.0.len()).collect();
        ids.sort_by_key(|&id| self.0[id]);
        ids
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Assign Deadline-Monotonic priorities to every task of `tasks`.
pub fn assign_priorities(tasks: &TaskSet) -> PriorityMap {
    let mut order: Vec<&Task> = tasks.tasks().iter().collect();
    order.sort_by_key(|t| (t.deadline, t.id));

    let mut priorities = vec![Priority::HIGHEST; tasks.len()];
    for (rank, task) in order.into_iter().enumerate() {
        priorities[task.id] = Priority(rank);
    }
    PriorityMap(priorities)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
