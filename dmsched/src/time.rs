/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fixed-point time representation.
//!
//! Task files carry durations as decimal literals in an arbitrary physical
//! unit (usually seconds).  Nothing downstream of the parser ever sees a
//! floating-point duration: every literal is parsed exactly into a
//! [`Decimal`] and then scaled to integer [`Ticks`] at a per-run
//! [`Resolution`].
//!
//! ```text
//! "0.25"  ──Decimal::from_str──►  25 × 10⁻²  ──to_ticks(1000/unit)──►  250 ticks
//! ```
//!
//! With [`Resolution::auto`] the scale is chosen so that every literal in the
//! file is represented exactly, which removes rounding from the pipeline
//! altogether.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Integer duration / instant at the run's [`Resolution`].
pub type Ticks = u64;

/// Maximum number of significant fractional digits accepted in a literal.
///
/// Caps [`Resolution::auto`] at 10⁹ ticks per unit (nanoseconds when the unit
/// is seconds).
pub const MAX_FRACTION_DIGITS: u32 = 9;

// ── Decimal ───────────────────────────────────────────────────────────────────

/// Why a literal could not be turned into a [`Decimal`] or into [`Ticks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("not a decimal number")]
    Invalid,

    #[error("more than {} significant fractional digits", MAX_FRACTION_DIGITS)]
    TooPrecise,

    #[error("value out of range")]
    OutOfRange,
}

/// An exactly parsed decimal literal: `(-1)^negative × mantissa × 10^-scale`.
///
/// Trailing fractional zeros are dropped while parsing, so `scale` is the
/// number of *significant* fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    negative: bool,
    mantissa: u64,
    scale: u32,
}

impl Decimal {
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Number of significant fractional digits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Scale to integer ticks, rounding half-up when the literal is finer than
    /// the resolution.
    ///
    /// # Errors
    /// [`DecimalError::OutOfRange`] for negative values or when the result
    /// does not fit in [`Ticks`].
    pub fn to_ticks(&self, resolution: Resolution) -> Result<Ticks, DecimalError> {
        if self.negative {
            return Err(DecimalError::OutOfRange);
        }
        // u64 × u64 always fits in u128
        let scaled = u128::from(self.mantissa) * u128::from(resolution.ticks_per_unit());
        let divisor = 10u128.pow(self.scale);
        let ticks = (scaled + divisor / 2) / divisor;
        Ticks::try_from(ticks).map_err(|_| DecimalError::OutOfRange)
    }

    /// `true` if [`to_ticks`](Self::to_ticks) needs no rounding at `resolution`.
    pub fn is_exact_at(&self, resolution: Resolution) -> bool {
        let scaled = u128::from(self.mantissa) * u128::from(resolution.ticks_per_unit());
        scaled % 10u128.pow(self.scale) == 0
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DecimalError::Invalid);
        }
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(DecimalError::Invalid);
        }

        let frac = frac_part.trim_end_matches('0');
        if frac.len() > MAX_FRACTION_DIGITS as usize {
            return Err(DecimalError::TooPrecise);
        }

        let mut mantissa: u64 = 0;
        for b in int_part.bytes().chain(frac.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(u64::from(b - b'0')))
                .ok_or(DecimalError::OutOfRange)?;
        }

        Ok(Decimal {
            // "-0" and "-0.000" are plain zero
            negative: negative && mantissa != 0,
            mantissa,
            scale: frac.len() as u32,
        })
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Number of integer ticks per input time unit.  Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution(u64);

impl Resolution {
    /// One tick per millisecond when the input unit is seconds.
    pub const MILLIS: Resolution = Resolution(1_000);

    /// Returns `None` for a zero resolution.
    pub fn new(ticks_per_unit: u64) -> Option<Self> {
        (ticks_per_unit > 0).then_some(Self(ticks_per_unit))
    }

    /// The smallest power of ten that represents every value exactly.
    ///
    /// An empty input yields one tick per unit.
    pub fn auto<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Self {
        let scale = values.into_iter().map(Decimal::scale).max().unwrap_or(0);
        // scale ≤ MAX_FRACTION_DIGITS, so 10^scale ≤ 10^9
        Self(10u64.pow(scale))
    }

    pub fn ticks_per_unit(self) -> u64 {
        self.0
    }

    /// Convert a whole number of time units to ticks; `None` on overflow.
    pub fn units_to_ticks(self, units: u64) -> Option<Ticks> {
        units.checked_mul(self.0)
    }

    /// Lossy conversion back to time units, for log output only.
    pub fn ticks_to_units(self, ticks: Ticks) -> f64 {
        ticks as f64 / self.0 as f64
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks/unit", self.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    // ── Decimal::from_str ─────────────────────────────────────────────────────

    #[test]
    fn parses_plain_and_fractional_literals() {
        assert_eq!(dec("4").to_ticks(Resolution(1)).unwrap(), 4);
        assert_eq!(dec("0.25").scale(), 2);
        assert_eq!(dec("0.25").to_ticks(Resolution::MILLIS).unwrap(), 250);
    }

    #[test]
    fn accepts_bare_leading_or_trailing_dot() {
        assert_eq!(dec(".5").to_ticks(Resolution(10)).unwrap(), 5);
        assert_eq!(dec("5.").to_ticks(Resolution(1)).unwrap(), 5);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(dec("  3.0 \t").to_ticks(Resolution(1)).unwrap(), 3);
    }

    #[test]
    fn sign_handling() {
        assert!(dec("-1").is_negative());
        assert!(!dec("+1").is_negative());
        // negative zero is zero
        let z = dec("-0.000");
        assert!(z.is_zero());
        assert!(!z.is_negative());
    }

    #[test]
    fn trailing_fraction_zeros_do_not_count_towards_scale() {
        assert_eq!(dec("1.500000000000").scale(), 1);
    }

    #[test]
    fn rejects_non_decimal_input() {
        for bad in ["", " ", "abc", "1e3", "inf", "nan", "1.2.3", "--1", ".", "-", "0x10", "1,5"] {
            assert_eq!(
                bad.parse::<Decimal>(),
                Err(DecimalError::Invalid),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_more_than_nine_fractional_digits() {
        assert_eq!(
            "0.0000000001".parse::<Decimal>(),
            Err(DecimalError::TooPrecise)
        );
    }

    #[test]
    fn rejects_mantissa_overflow() {
        assert_eq!(
            "99999999999999999999999".parse::<Decimal>(),
            Err(DecimalError::OutOfRange)
        );
    }

    // ── to_ticks ──────────────────────────────────────────────────────────────

    #[test]
    fn finer_literals_round_half_up() {
        assert_eq!(dec("0.0005").to_ticks(Resolution::MILLIS).unwrap(), 1);
        assert_eq!(dec("0.0004").to_ticks(Resolution::MILLIS).unwrap(), 0);
        assert_eq!(dec("1.2345").to_ticks(Resolution::MILLIS).unwrap(), 1_235);
    }

    #[test]
    fn non_power_of_ten_resolution() {
        // 0.5 units at 3 ticks/unit = 1.5 → 2
        assert_eq!(dec("0.5").to_ticks(Resolution(3)).unwrap(), 2);
        assert!(!dec("0.5").is_exact_at(Resolution(3)));
        assert!(dec("0.5").is_exact_at(Resolution(4)));
    }

    #[test]
    fn exactness_at_millisecond_resolution() {
        assert!(dec("1.25").is_exact_at(Resolution::MILLIS));
        assert!(dec("7").is_exact_at(Resolution::MILLIS));
        assert!(!dec("1.2345").is_exact_at(Resolution::MILLIS));
    }

    #[test]
    fn tick_overflow_is_an_error() {
        let big = dec("18446744073709551615"); // u64::MAX
        assert_eq!(big.to_ticks(Resolution(1)).unwrap(), u64::MAX);
        assert_eq!(big.to_ticks(Resolution(2)), Err(DecimalError::OutOfRange));
    }

    #[test]
    fn negative_values_never_become_ticks() {
        assert_eq!(dec("-2").to_ticks(Resolution(1)), Err(DecimalError::OutOfRange));
    }

    // ── Resolution ────────────────────────────────────────────────────────────

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(Resolution::new(0).is_none());
        assert_eq!(Resolution::new(1_000), Some(Resolution::MILLIS));
    }

    #[test]
    fn auto_resolution_represents_every_value_exactly() {
        let values = [dec("1"), dec("0.5"), dec("2.125"), dec("4.10")];
        let res = Resolution::auto(&values);
        assert_eq!(res.ticks_per_unit(), 1_000);
        assert_eq!(values[2].to_ticks(res).unwrap(), 2_125);
        assert_eq!(values[3].to_ticks(res).unwrap(), 4_100);
    }

    #[test]
    fn auto_resolution_of_integers_is_one() {
        let values = [dec("4"), dec("6.000")];
        assert_eq!(Resolution::auto(&values).ticks_per_unit(), 1);
        assert_eq!(
            Resolution::auto(std::iter::empty::<&Decimal>()).ticks_per_unit(),
            1
        );
    }

    #[test]
    fn units_to_ticks_checks_overflow() {
        assert_eq!(Resolution::MILLIS.units_to_ticks(3_600), Some(3_600_000));
        assert_eq!(Resolution::MILLIS.units_to_ticks(u64::MAX), None);
    }

    #[test]
    fn ticks_convert_back_to_units() {
        assert_eq!(Resolution::MILLIS.ticks_to_units(2_500), 2.5);
        assert_eq!(Resolution(1).ticks_to_units(4_087), 4_087.0);
    }
}
