/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Integer helpers for horizon arithmetic: GCD, checked LCM and rounding up
//! to a multiple.
//!
//! Free functions so they can be tested independently of
//! [`HyperperiodCalculator`](super::HyperperiodCalculator).

use super::HyperperiodError;
use crate::time::Ticks;

/// Iterative Euclidean GCD.  `gcd(0, x) == x`.
pub fn gcd(mut a: Ticks, mut b: Ticks) -> Ticks {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Checked LCM.  Returns `Ok(0)` when either input is `0`.
///
/// Divides before multiplying (`a / gcd(a, b) * b`); the multiplication is
/// still checked.
pub fn lcm(a: Ticks, b: Ticks) -> Result<Ticks, HyperperiodError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// LCM of every period yielded by `periods`.  `Ok(0)` for an empty input.
///
/// The fold starts from `1` so the result does not depend on which period
/// comes first.
pub fn lcm_of<I>(periods: I) -> Result<Ticks, HyperperiodError>
where
    I: IntoIterator<Item = Ticks>,
{
    let mut iter = periods.into_iter().peekable();
    if iter.peek().is_none() {
        return Ok(0);
    }
    iter.try_fold(1, lcm)
}

/// Smallest multiple of `step` that is `>= value`.  `step` must be non-zero.
pub fn ceil_to_multiple(value: Ticks, step: Ticks) -> Result<Ticks, HyperperiodError> {
    debug_assert!(step > 0);
    value
        .div_ceil(step)
        .checked_mul(step)
        .ok_or(HyperperiodError::Overflow { a: value, b: step })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
