/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Utilisation-based feasibility analysis.
//!
//! Two checks run before the simulation:
//!
//! * **Exact necessary condition.**  A uniprocessor cannot schedule a
//!   periodic task set whose utilisation exceeds 1.  The test is done in
//!   integer arithmetic over one hyperperiod `H`:
//!
//!   $$\sum_i C_i \cdot \frac{H}{T_i} > H \iff U > 1$$
//!
//!   (`H / T_i` is exact because `H` is a multiple of every period.)  A
//!   failure concludes NOT-SCHEDULABLE without simulating.
//!
//! * **Liu & Layland (1973) sufficient bound**, logged only.  For implicit
//!   deadlines DM coincides with Rate Monotonic, and a set of `n` tasks is
//!   guaranteed schedulable if
//!
//!   $$U \leq n \left(2^{1/n} - 1\right)$$
//!
//! | n | Bound |
//! |---|---|
//! | 1 | 1.000 |
//! | 2 | 0.828 |
//! | 3 | 0.780 |
//! | ∞ | ln(2) ≈ 0.693 |
//!
//! One-shot tasks (`period == 0`) contribute no utilisation.

use crate::task::TaskSet;
use crate::time::Ticks;

/// Work released by periodic tasks in one hyperperiod, in ticks.
///
/// `hyperperiod` must be the LCM of the task set's periods.
pub fn hyperperiod_demand(tasks: &TaskSet, hyperperiod: Ticks) -> u128 {
    if hyperperiod == 0 {
        return 0;
    }
    tasks
        .periodic()
        .map(|t| u128::from(t.execution) * u128::from(hyperperiod / t.period))
        .fold(0u128, u128::saturating_add)
}

/// `Some(demand)` if the periodic utilisation exceeds 1, `None` otherwise.
pub fn check_utilization(tasks: &TaskSet, hyperperiod: Ticks) -> Option<u128> {
    let demand = hyperperiod_demand(tasks, hyperperiod);
    (demand > u128::from(hyperperiod)).then_some(demand)
}

/// Total periodic utilisation as a fraction, for logging.
pub fn total_utilization(tasks: &TaskSet) -> f64 {
    tasks.periodic().map(|t| t.utilization()).sum()
}

/// Liu & Layland utilisation bound for `n` tasks: `n × (2^(1/n) − 1)`.
///
/// `1.0` for `n = 1`, `0.0` for `n = 0`.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

/// `true` if the periodic tasks of `tasks` are within the Liu & Layland bound.
pub fn within_liu_layland(tasks: &TaskSet) -> bool {
    total_utilization(tasks) <= liu_layland_bound(tasks.periodic().count())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Resolution;

    fn set(timings: &[(Ticks, Ticks, Ticks)]) -> TaskSet {
        TaskSet::from_timings(Resolution::MILLIS, timings.iter().copied())
    }

    // ── exact utilisation test ────────────────────────────────────────────────

    #[test]
    fn demand_over_one_hyperperiod() {
        // 1·(12/4) + 2·(12/6) = 7
        assert_eq!(hyperperiod_demand(&set(&[(1, 4, 4), (2, 6, 6)]), 12), 7);
    }

    #[test]
    fn utilization_of_exactly_one_passes() {
        assert_eq!(check_utilization(&set(&[(2, 4, 4), (3, 6, 6)]), 12), None);
    }

    #[test]
    fn utilization_above_one_fails() {
        // 1/2 + 2/3 → demand 7 > 6
        assert_eq!(check_utilization(&set(&[(1, 2, 2), (2, 3, 3)]), 6), Some(7));
    }

    #[test]
    fn one_shot_tasks_are_excluded() {
        let tasks = set(&[(3, 4, 4), (100, 0, 200)]);
        assert_eq!(hyperperiod_demand(&tasks, 4), 3);
        assert_eq!(check_utilization(&tasks, 4), None);
    }

    #[test]
    fn no_periodic_tasks_has_no_demand() {
        assert_eq!(check_utilization(&set(&[(5, 0, 5)]), 0), None);
    }

    // ── Liu & Layland ─────────────────────────────────────────────────────────

    #[test]
    fn bound_zero_tasks_is_zero() {
        assert_eq!(liu_layland_bound(0), 0.0);
    }

    #[test]
    fn bound_one_task_is_one() {
        let b = liu_layland_bound(1);
        assert!((b - 1.0).abs() < 1e-10, "bound(1) should be 1.0, got {b}");
    }

    #[test]
    fn bound_two_tasks_is_approximately_0_828() {
        let b = liu_layland_bound(2);
        assert!((b - 0.8284).abs() < 1e-3, "bound(2) ≈ 0.828, got {b}");
    }

    #[test]
    fn bound_converges_toward_ln2() {
        let b = liu_layland_bound(1000);
        assert!((b - 2.0_f64.ln()).abs() < 1e-3, "got {b}");
    }

    #[test]
    fn classic_three_task_set_is_within_bound() {
        // U = 0.30 + 0.25 + 0.16 = 0.71 ≤ 0.780
        let tasks = set(&[(3, 10, 10), (5, 20, 20), (8, 50, 50)]);
        assert!(within_liu_layland(&tasks));
        assert!((total_utilization(&tasks) - 0.71).abs() < 1e-9);
    }

    #[test]
    fn fully_loaded_pair_exceeds_bound_but_not_one() {
        let tasks = set(&[(2, 4, 4), (3, 6, 6)]);
        assert!(!within_liu_layland(&tasks));
        assert_eq!(check_utilization(&tasks, 12), None);
    }
}
