//! Hyperperiod and simulation-horizon calculation.
//!
//! The hyperperiod of a set of periodic tasks is the Least Common Multiple
//! (LCM) of their periods: the smallest window after which a synchronous
//! schedule repeats.  Periods are integer [`Ticks`] by the time they reach
//! this module (the parser already scaled every literal to a common
//! resolution), so the LCM is exact and independent of task order.
//!
//! One-shot tasks (`period == 0`) never enter the LCM.  They only shape the
//! simulation horizon:
//!
//! | Task set | Horizon |
//! |---|---|
//! | empty | `0` |
//! | one-shot tasks only | sum of their execution times |
//! | periodic tasks present | hyperperiod, rounded up to a multiple covering every one-shot deadline |

pub mod math;

use tracing::{debug, info, warn};

use crate::task::TaskSet;
use crate::time::Ticks;
use math::{ceil_to_multiple, lcm_of};

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod / horizon calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperperiodError {
    /// Integer arithmetic on two operands overflowed `u64`.
    Overflow { a: Ticks, b: Ticks },

    /// The horizon exceeded the configured limit.
    TooLarge { value: Ticks, limit: Ticks },
}

impl std::fmt::Display for HyperperiodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HyperperiodError::Overflow { a, b } => {
                write!(f, "tick overflow combining {a} and {b}")
            }
            HyperperiodError::TooLarge { value, limit } => {
                write!(f, "simulation horizon {value} ticks exceeds limit {limit} ticks")
            }
        }
    }
}

impl std::error::Error for HyperperiodError {}

// ── HyperperiodInfo ───────────────────────────────────────────────────────────

/// Calculated hyperperiod and horizon for one task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    /// LCM of all non-zero periods; `0` when no task is periodic.
    pub hyperperiod: Ticks,

    /// Length of the simulated window `[0, horizon)`.
    pub horizon: Ticks,

    /// Unique non-zero periods (sorted, deduplicated).
    pub unique_periods: Vec<Ticks>,

    /// Number of tasks with a non-zero period.
    pub periodic_task_count: usize,
}

// ── HyperperiodCalculator ─────────────────────────────────────────────────────

/// Computes [`HyperperiodInfo`] for a [`TaskSet`], rejecting horizons above
/// an optional limit.
#[derive(Debug, Clone, Default)]
pub struct HyperperiodCalculator {
    limit: Option<Ticks>,
}

impl HyperperiodCalculator {
    /// Calculator without a horizon limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator rejecting horizons above `limit` ticks.
    pub fn with_limit(limit: Ticks) -> Self {
        Self { limit: Some(limit) }
    }

    /// # Errors
    /// * [`HyperperiodError::Overflow`] – LCM or horizon exceeded `u64`.
    /// * [`HyperperiodError::TooLarge`] – horizon exceeds the configured limit.
    pub fn calculate(&self, tasks: &TaskSet) -> Result<HyperperiodInfo, HyperperiodError> {
        let unique_periods: Vec<Ticks> = {
            let mut v: Vec<Ticks> = tasks.periodic().map(|t| t.period).collect();
            v.sort_unstable();
            v.dedup();
            v
        };
        let periodic_task_count = tasks.periodic().count();

        let hyperperiod = lcm_of(unique_periods.iter().copied())?;
        let horizon = if hyperperiod == 0 {
            tasks
                .one_shot()
                .try_fold(0, |acc: Ticks, t| {
                    acc.checked_add(t.execution)
                        .ok_or(HyperperiodError::Overflow { a: acc, b: t.execution })
                })?
        } else {
            match tasks.one_shot().map(|t| t.deadline).max() {
                Some(d) if d > hyperperiod => {
                    let stretched = ceil_to_multiple(d, hyperperiod)?;
                    warn!(
                        hyperperiod,
                        horizon = stretched,
                        "One-shot deadline extends the horizon past one hyperperiod"
                    );
                    stretched
                }
                _ => hyperperiod,
            }
        };

        if let Some(limit) = self.limit {
            if horizon > limit {
                warn!(horizon, limit, "Simulation horizon exceeds configured limit");
                return Err(HyperperiodError::TooLarge {
                    value: horizon,
                    limit,
                });
            }
        }

        let resolution = tasks.resolution();
        info!(
            task_count = tasks.len(),
            periodic_task_count,
            unique_count = unique_periods.len(),
            hyperperiod,
            hyperperiod_units = resolution.ticks_to_units(hyperperiod),
            horizon,
            horizon_units = resolution.ticks_to_units(horizon),
            "Calculated hyperperiod"
        );
        for p in &unique_periods {
            debug!(period = p, "  unique period");
        }

        Ok(HyperperiodInfo {
            hyperperiod,
            horizon,
            unique_periods,
            periodic_task_count,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
