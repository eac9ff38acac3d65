//! Duration adjustment for burn and cook timers.
//!
//! Host furnaces store durations as 16-bit signed counters, so every value
//! handed back to the host is clamped to `[MIN_TICKS, MAX_TICKS]`. Modifier
//! strength is scaled by an exact [`Fraction`] to keep results identical on
//! every platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticks are the host's atomic unit of simulated time.
pub type Ticks = i32;

/// Shortest duration ever emitted.
pub const MIN_TICKS: Ticks = 1;

/// Longest duration ever emitted (the host's `i16::MAX`).
pub const MAX_TICKS: Ticks = i16::MAX as Ticks;

// ---------------------------------------------------------------------------
// Fraction
// ---------------------------------------------------------------------------

/// An exact rational in `(0, 1]`, stored reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fraction {
    numerator: u32,
    denominator: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FractionError {
    #[error("denominator must be non-zero")]
    ZeroDenominator,
    #[error("fraction must be greater than zero")]
    NotPositive,
    #[error("fraction {0}/{1} is greater than one")]
    AboveOne(u32, u32),
    #[error("malformed fraction '{0}'")]
    Malformed(String),
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    /// One fifth, the default burn-duration scale.
    pub const ONE_FIFTH: Fraction = Fraction {
        numerator: 1,
        denominator: 5,
    };

    /// One half, the default cook-duration scale.
    pub const ONE_HALF: Fraction = Fraction {
        numerator: 1,
        denominator: 2,
    };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self, FractionError> {
        if denominator == 0 {
            return Err(FractionError::ZeroDenominator);
        }
        if numerator == 0 {
            return Err(FractionError::NotPositive);
        }
        if numerator > denominator {
            return Err(FractionError::AboveOne(numerator, denominator));
        }
        let g = gcd(numerator, denominator);
        Ok(Self {
            numerator: numerator / g,
            denominator: denominator / g,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Parse either `"a/b"` or a decimal such as `"0.2"`.
    fn parse(s: &str) -> Result<Self, FractionError> {
        let malformed = || FractionError::Malformed(s.to_string());
        let s = s.trim();

        if let Some((num, den)) = s.split_once('/') {
            let num = num.trim().parse::<u32>().map_err(|_| malformed())?;
            let den = den.trim().parse::<u32>().map_err(|_| malformed())?;
            return Self::new(num, den);
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        // Nine digits keep 10^k inside u32.
        if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u32>().map_err(|_| malformed())?
        };
        let scale = 10u32.pow(frac.len() as u32);
        let frac_value = if frac.is_empty() {
            0
        } else {
            frac.parse::<u32>().map_err(|_| malformed())?
        };
        let numerator = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac_value))
            .ok_or_else(malformed)?;
        Self::new(numerator, scale)
    }
}

impl FromStr for Fraction {
    type Err = FractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fraction {
    type Error = FractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fraction> for String {
    fn from(value: Fraction) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// ---------------------------------------------------------------------------
// Adjustment
// ---------------------------------------------------------------------------

/// Clamp a raw duration into the host's representable range.
#[inline]
pub fn clamp_ticks(ticks: i64) -> Ticks {
    ticks.clamp(MIN_TICKS as i64, MAX_TICKS as i64) as Ticks
}

/// Apply a modifier level to a base duration without clamping.
///
/// Positive levels shorten: `floor(base / (1 + level * f))`.
/// Negative levels lengthen: `floor(base * (1 + |level| * f))`.
/// Negative bases are treated as zero.
pub fn modified_ticks(base: Ticks, level: i32, fraction: Fraction) -> i64 {
    let base = base.max(0) as i128;
    if level == 0 {
        return base as i64;
    }

    let num = fraction.numerator as i128;
    let den = fraction.denominator as i128;
    let scaled = den + level.unsigned_abs() as i128 * num;

    let result = if level > 0 {
        base * den / scaled
    } else {
        base * scaled / den
    };
    result.min(i64::MAX as i128) as i64
}

/// Apply a modifier level to a base duration and clamp the result.
pub fn adjust(base: Ticks, level: i32, fraction: Fraction) -> Ticks {
    clamp_ticks(modified_ticks(base, level, fraction))
}

/// Burn duration with both burn and cook modifiers applied in sequence.
///
/// A positive burn level extends burning, so it enters `adjust` negated. The
/// cook level then shortens the result to match the faster smelt rate.
/// Rounding from the first step carries into the second.
pub fn compose_burn(
    base: Ticks,
    burn_level: i32,
    cook_level: i32,
    burn_fraction: Fraction,
    cook_fraction: Fraction,
) -> Ticks {
    let burn = adjust(base, burn_level.saturating_neg(), burn_fraction);
    adjust(burn, cook_level, cook_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: u32, d: u32) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn cook_level_two_halves_duration() {
        assert_eq!(adjust(200, 2, Fraction::ONE_HALF), 100);
    }

    #[test]
    fn negative_level_extends_exactly() {
        // 800 * 1.6 with no float drift.
        assert_eq!(adjust(800, -3, Fraction::ONE_FIFTH), 1280);
    }

    #[test]
    fn zero_level_is_identity_before_clamp() {
        assert_eq!(adjust(1600, 0, frac(1, 3)), 1600);
        assert_eq!(modified_ticks(0, 0, frac(1, 3)), 0);
        assert_eq!(adjust(0, 0, frac(1, 3)), MIN_TICKS);
        assert_eq!(adjust(40_000, 0, frac(1, 3)), MAX_TICKS);
    }

    #[test]
    fn zero_base_with_positive_level_clamps_to_one() {
        assert_eq!(adjust(0, 5, Fraction::ONE_HALF), 1);
    }

    #[test]
    fn huge_extension_caps_at_max() {
        assert_eq!(adjust(20_000, -100, Fraction::ONE_FIFTH), MAX_TICKS);
        assert_eq!(adjust(MAX_TICKS, i32::MIN, frac(1, 1)), MAX_TICKS);
    }

    #[test]
    fn huge_acceleration_floors_at_one() {
        assert_eq!(adjust(200, i32::MAX, frac(1, 1)), MIN_TICKS);
    }

    #[test]
    fn floors_fractional_results() {
        // 200 / 1.5 = 133.33
        assert_eq!(adjust(200, 1, Fraction::ONE_HALF), 133);
        // 7 * 1.2 = 8.4
        assert_eq!(adjust(7, -1, Fraction::ONE_FIFTH), 8);
    }

    #[test]
    fn negative_base_is_treated_as_zero() {
        assert_eq!(modified_ticks(-50, -2, Fraction::ONE_FIFTH), 0);
        assert_eq!(adjust(-50, -2, Fraction::ONE_FIFTH), MIN_TICKS);
    }

    #[test]
    fn composition_is_sequential_not_combined() {
        // 4 * 1.2 = 4.8 -> 4, then 4 / 1.5 = 2.67 -> 2.
        // A combined 4 * 1.2 / 1.5 = 3.2 would give 3.
        let burn = compose_burn(4, 1, 1, Fraction::ONE_FIFTH, Fraction::ONE_HALF);
        assert_eq!(burn, 2);
    }

    #[test]
    fn composition_with_only_burn_level() {
        // Coal: 1600 ticks, burn level 1 -> 1920.
        let burn = compose_burn(1600, 1, 0, Fraction::ONE_FIFTH, Fraction::ONE_HALF);
        assert_eq!(burn, 1920);
    }

    #[test]
    fn composition_with_both_levels() {
        let burn = compose_burn(1600, 1, 1, Fraction::ONE_FIFTH, Fraction::ONE_HALF);
        assert_eq!(burn, 1280);
    }

    #[test]
    fn negative_burn_level_shortens() {
        let burn = compose_burn(1000, -1, 0, Fraction::ONE_FIFTH, Fraction::ONE_HALF);
        assert_eq!(burn, 833);
    }

    #[test]
    fn fraction_is_reduced() {
        let f = frac(2, 10);
        assert_eq!(f, Fraction::ONE_FIFTH);
        assert_eq!(f.to_string(), "1/5");
    }

    #[test]
    fn fraction_rejects_out_of_range() {
        assert_eq!(Fraction::new(1, 0), Err(FractionError::ZeroDenominator));
        assert_eq!(Fraction::new(0, 4), Err(FractionError::NotPositive));
        assert_eq!(Fraction::new(5, 4), Err(FractionError::AboveOne(5, 4)));
    }

    #[test]
    fn fraction_parses_decimal_and_ratio() {
        assert_eq!("0.2".parse::<Fraction>().unwrap(), Fraction::ONE_FIFTH);
        assert_eq!(".5".parse::<Fraction>().unwrap(), Fraction::ONE_HALF);
        assert_eq!("1/2".parse::<Fraction>().unwrap(), Fraction::ONE_HALF);
        assert_eq!(" 3 / 9 ".parse::<Fraction>().unwrap(), frac(1, 3));
        assert_eq!("1".parse::<Fraction>().unwrap(), frac(1, 1));
    }

    #[test]
    fn fraction_rejects_garbage() {
        assert!(matches!(
            "abc".parse::<Fraction>(),
            Err(FractionError::Malformed(_))
        ));
        assert!(matches!(
            "0.-2".parse::<Fraction>(),
            Err(FractionError::Malformed(_))
        ));
        assert!(matches!(
            "1.5".parse::<Fraction>(),
            Err(FractionError::AboveOne(15, 10))
        ));
        assert!(matches!(
            "0.0".parse::<Fraction>(),
            Err(FractionError::NotPositive)
        ));
    }

    #[test]
    fn fraction_serde_round_trip() {
        let json = serde_json::to_string(&Fraction::ONE_FIFTH).unwrap();
        assert_eq!(json, "\"1/5\"");
        let back: Fraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Fraction::ONE_FIFTH);
        assert!(serde_json::from_str::<Fraction>("\"2/1\"").is_err());
    }
}
