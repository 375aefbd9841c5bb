//! Deadline-Monotonic schedulability analysis.
//!
//! [`DmScheduler`] wires the pipeline together:
//!
//! ```text
//! TaskSet ─► HyperperiodCalculator ─► horizon
//!    │
//!    ├─────► assign_priorities ─────► PriorityMap
//!    │
//!    └─► utilisation pre-check ─► ReleaseStream ─► SchedulingSimulator ─► SimOutcome
//! ```
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Time | Integer ticks, event-driven jumps, no tick-width approximation |
//! | State | Immutable `TaskSet`; all per-run state local to `SchedulingSimulator::run` |
//! | Ready-queue order | `BTreeMap` keyed by `(priority, task id)` |
//! | Infeasibility | A normal [`SimOutcome`], never an `Err` |
//! | Analysis failure | `Result<_, AnalysisError>` with typed variants |
//!
//! # Example
//! ```rust
//! use dmsched::scheduler::{AnalysisLimits, DmScheduler};
//! use dmsched::task::TaskSet;
//! use dmsched::time::Resolution;
//!
//! let tasks = TaskSet::from_timings(Resolution::MILLIS, [(1, 4, 4), (2, 6, 6)]);
//! let analysis = DmScheduler::new(AnalysisLimits::default()).analyze(&tasks).unwrap();
//! assert_eq!(analysis.hyperperiod.hyperperiod, 12);
//! assert_eq!(analysis.outcome.preemptions(), Some(&[0, 0][..]));
//! ```

pub mod error;
pub mod feasibility;
pub mod job;
pub mod priority;
pub mod release;
pub mod simulator;

pub use error::{AnalysisError, MissReason};
pub use priority::{assign_priorities, Priority, PriorityMap};
pub use simulator::{SchedulingSimulator, SimOutcome, SimReport, SimState, SimStats};

use tracing::{debug, info};

use crate::hyperperiod::{HyperperiodCalculator, HyperperiodError, HyperperiodInfo};
use crate::task::TaskSet;

use feasibility::{check_utilization, liu_layland_bound, total_utilization, within_liu_layland};
use release::release_count;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default cap on the number of job releases one run may simulate.
pub const DEFAULT_MAX_RELEASES: u64 = 50_000_000;

// ── AnalysisLimits ────────────────────────────────────────────────────────────

/// Resource bounds applied before simulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    /// Maximum simulation horizon, in input time units.  `None` simulates
    /// whatever horizon the task set needs.
    pub max_horizon_units: Option<u64>,

    /// Maximum number of job releases over the horizon.
    pub max_releases: u64,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_horizon_units: None,
            max_releases: DEFAULT_MAX_RELEASES,
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Everything one analysis produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub hyperperiod: HyperperiodInfo,
    pub priorities: PriorityMap,
    pub outcome: SimOutcome,

    /// Simulation statistics; `None` when the verdict was reached without
    /// simulating.
    pub stats: Option<SimStats>,
}

// ── DmScheduler ───────────────────────────────────────────────────────────────

/// Stateless Deadline-Monotonic analyser.
#[derive(Debug, Clone, Default)]
pub struct DmScheduler {
    limits: AnalysisLimits,
}

impl DmScheduler {
    pub fn new(limits: AnalysisLimits) -> Self {
        Self { limits }
    }

    /// Decide whether `tasks` is schedulable under preemptive DM.
    ///
    /// # Errors
    /// * [`AnalysisError::Hyperperiod`] – hyperperiod or horizon overflow.
    /// * [`AnalysisError::HorizonTooLarge`] – horizon above
    ///   `max_horizon_units`, when set.
    /// * [`AnalysisError::TooManyReleases`] – the horizon would release more
    ///   than `max_releases` jobs.
    pub fn analyze(&self, tasks: &TaskSet) -> Result<Analysis, AnalysisError> {
        let resolution = tasks.resolution();
        let hyperperiod = match self.limits.max_horizon_units {
            Some(units) => {
                let limit = resolution.units_to_ticks(units).unwrap_or(u64::MAX);
                HyperperiodCalculator::with_limit(limit)
                    .calculate(tasks)
                    .map_err(|e| match e {
                        HyperperiodError::TooLarge { value, .. } => {
                            AnalysisError::HorizonTooLarge {
                                horizon_units: resolution.ticks_to_units(value),
                                limit_units: units,
                            }
                        }
                        other => AnalysisError::Hyperperiod(other),
                    })?
            }
            None => HyperperiodCalculator::new().calculate(tasks)?,
        };
        let priorities = assign_priorities(tasks);

        info!(
            task_count = tasks.len(),
            %resolution,
            hyperperiod = hyperperiod.hyperperiod,
            horizon = hyperperiod.horizon,
            "=== DmScheduler::analyze() ==="
        );
        for id in priorities.in_priority_order() {
            let t = &tasks.tasks()[id];
            debug!(
                task = id,
                priority = %priorities.of(id),
                execution = t.execution,
                period = t.period,
                deadline = t.deadline,
                deadline_units = resolution.ticks_to_units(t.deadline),
                "task"
            );
        }

        // ── Utilisation pre-check ─────────────────────────────────────────────
        let utilization = total_utilization(tasks);
        if !tasks.is_empty() && within_liu_layland(tasks) {
            info!(utilization, "utilization within Liu & Layland bound");
        } else if !tasks.is_empty() {
            info!(
                utilization,
                bound = liu_layland_bound(tasks.periodic().count()),
                "utilization above Liu & Layland bound, simulation decides"
            );
        }

        if let Some(demand) = check_utilization(tasks, hyperperiod.hyperperiod) {
            let reason = MissReason::UtilizationExceeded {
                demand,
                supply: hyperperiod.hyperperiod,
            };
            info!(%reason, "=== NOT schedulable (pre-check) ===");
            return Ok(Analysis {
                hyperperiod,
                priorities,
                outcome: SimOutcome::NotSchedulable { reason },
                stats: None,
            });
        }

        // ── Release budget ────────────────────────────────────────────────────
        let releases = release_count(tasks, hyperperiod.horizon);
        if releases > u128::from(self.limits.max_releases) {
            return Err(AnalysisError::TooManyReleases {
                releases,
                limit: self.limits.max_releases,
            });
        }

        // ── Simulation ────────────────────────────────────────────────────────
        let report = SchedulingSimulator::new(tasks, &priorities).run(hyperperiod.horizon);

        debug!(
            events = report.stats.events,
            releases = report.stats.releases,
            completions = report.stats.completions,
            context_switches = report.stats.context_switches,
            idle_ticks = report.stats.idle_ticks,
            end_time = report.stats.end_time,
            "simulation statistics"
        );
        match &report.outcome {
            SimOutcome::Schedulable { preemptions } => {
                info!(?preemptions, "=== Schedulable ===");
            }
            SimOutcome::NotSchedulable { reason } => {
                info!(task = ?reason.task(), %reason, "=== NOT schedulable ===");
            }
        }

        Ok(Analysis {
            hyperperiod,
            priorities,
            outcome: report.outcome,
            stats: Some(report.stats),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::time::{Resolution, Ticks};
    use proptest::prelude::*;

    const PROPTEST_CASES: u32 = 256;

    /// Small periods keep the hyperperiod at most 24; `0` is a one-shot task.
    const PERIODS: [Ticks; 7] = [0, 2, 3, 4, 6, 8, 12];

    /// Up to five `(execution, period, deadline)` triples with pairwise
    /// distinct deadlines, so priorities depend on content alone.
    fn task_sets() -> impl Strategy<Value = Vec<(Ticks, Ticks, Ticks)>> {
        (0usize..=5)
            .prop_flat_map(|n| {
                (
                    proptest::collection::vec((1u64..=4, proptest::sample::select(PERIODS.to_vec())), n),
                    proptest::collection::btree_set(1u64..=16, n),
                )
            })
            .prop_map(|(ep, deadlines)| {
                ep.into_iter()
                    .zip(deadlines)
                    .map(|((e, p), d)| (e, p, d))
                    .collect::<Vec<_>>()
            })
    }

    fn analyze(timings: &[(Ticks, Ticks, Ticks)]) -> Analysis {
        let tasks = TaskSet::from_timings(Resolution::new(1).unwrap(), timings.iter().copied());
        DmScheduler::default().analyze(&tasks).unwrap()
    }

    /// Σ e·(H/p) over periodic tasks, against H.
    fn exceeds_full_utilization(timings: &[(Ticks, Ticks, Ticks)]) -> bool {
        let periodic: Vec<_> = timings.iter().filter(|t| t.1 > 0).collect();
        let h = periodic
            .iter()
            .fold(1u64, |acc, t| acc / crate::hyperperiod::math::gcd(acc, t.1) * t.1);
        let demand: u64 = periodic.iter().map(|t| t.0 * (h / t.1)).sum();
        !periodic.is_empty() && demand > h
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

        #[test]
        fn utilization_above_one_is_never_schedulable(timings in task_sets()) {
            prop_assume!(exceeds_full_utilization(&timings));
            prop_assert!(!analyze(&timings).outcome.is_schedulable());

            // the simulator reaches the same verdict without the pre-check
            let tasks = TaskSet::from_timings(Resolution::new(1).unwrap(), timings.iter().copied());
            let priorities = assign_priorities(&tasks);
            let horizon = HyperperiodCalculator::new().calculate(&tasks).unwrap().horizon;
            let report = SchedulingSimulator::new(&tasks, &priorities).run(horizon);
            prop_assert!(!report.outcome.is_schedulable());
        }

        #[test]
        fn execution_above_deadline_is_never_schedulable(
            timings in task_sets().prop_filter("non-empty", |t| !t.is_empty()),
            pick in any::<prop::sample::Index>(),
            excess in 1u64..=3,
        ) {
            let mut timings = timings;
            let i = pick.index(timings.len());
            timings[i].0 = timings[i].2 + excess;
            prop_assert!(!analyze(&timings).outcome.is_schedulable());
        }

        #[test]
        fn reordering_keeps_hyperperiod_and_per_task_counts(
            (timings, shuffled) in task_sets()
                .prop_flat_map(|t| (Just(t.clone()), Just(t).prop_shuffle()))
        ) {
            let forward = analyze(&timings);
            let reordered = analyze(&shuffled);

            prop_assert_eq!(forward.hyperperiod.hyperperiod, reordered.hyperperiod.hyperperiod);
            prop_assert_eq!(forward.hyperperiod.horizon, reordered.hyperperiod.horizon);
            prop_assert_eq!(
                forward.outcome.is_schedulable(),
                reordered.outcome.is_schedulable()
            );

            let by_content = |timings: &[(Ticks, Ticks, Ticks)], a: &Analysis| {
                let mut v: Vec<_> = a
                    .outcome
                    .preemptions()
                    .map(|counts| timings.iter().copied().zip(counts.iter().copied()).collect())
                    .unwrap_or_default();
                v.sort_unstable();
                v
            };
            prop_assert_eq!(by_content(&timings, &forward), by_content(&shuffled, &reordered));
        }

        #[test]
        fn repeated_analysis_is_identical(timings in task_sets()) {
            let tasks = TaskSet::from_timings(Resolution::new(1).unwrap(), timings.iter().copied());
            let sched = DmScheduler::default();
            let first = sched.analyze(&tasks).unwrap();
            prop_assert_eq!(sched.analyze(&tasks).unwrap(), first);
        }
    }
}
