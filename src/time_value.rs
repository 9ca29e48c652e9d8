// src/time_value.rs

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A logical timestamp or duration.
///
/// Time values:
/// - are expressed in abstract logical units (the clock decides what one
///   unit means externally)
/// - are totally ordered, with `Infinite` greater than every finite value
/// - saturate instead of wrapping
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimeValue {
    Finite(u64),
    Infinite,
}

impl TimeValue {
    pub const ZERO: TimeValue = TimeValue::Finite(0);

    #[inline]
    pub fn from_units(units: u64) -> Self {
        TimeValue::Finite(units)
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self, TimeValue::Infinite)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, TimeValue::Finite(0))
    }

    /// Finite units, or `None` for the infinite sentinel.
    #[inline]
    pub fn units(&self) -> Option<u64> {
        match *self {
            TimeValue::Finite(u) => Some(u),
            TimeValue::Infinite => None,
        }
    }

    /// Clamp into `[lo, hi]`. `hi` may be infinite, in which case only the
    /// lower bound applies.
    #[inline]
    pub fn clamp(self, lo: TimeValue, hi: TimeValue) -> TimeValue {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }

    /// Position of `self` inside `[0, span]` as a ratio in `[0, 1]`.
    ///
    /// An infinite span has no meaningful ratio; callers get 0.
    pub fn ratio_of(&self, span: TimeValue) -> f64 {
        match (self.units(), span.units()) {
            (Some(_), Some(0)) => 0.0,
            (Some(date), Some(span)) => (date as f64 / span as f64).min(1.0),
            _ => 0.0,
        }
    }
}

impl PartialOrd for TimeValue {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TimeValue::Finite(a), TimeValue::Finite(b)) => a.cmp(b),
            (TimeValue::Finite(_), TimeValue::Infinite) => Ordering::Less,
            (TimeValue::Infinite, TimeValue::Finite(_)) => Ordering::Greater,
            (TimeValue::Infinite, TimeValue::Infinite) => Ordering::Equal,
        }
    }
}

impl Add for TimeValue {
    type Output = TimeValue;

    fn add(self, rhs: TimeValue) -> TimeValue {
        match (self, rhs) {
            (TimeValue::Finite(a), TimeValue::Finite(b)) => {
                TimeValue::Finite(a.saturating_add(b))
            }
            _ => TimeValue::Infinite,
        }
    }
}

impl AddAssign for TimeValue {
    fn add_assign(&mut self, rhs: TimeValue) {
        *self = *self + rhs;
    }
}

impl Sub for TimeValue {
    type Output = TimeValue;

    /// Saturating: a finite value never goes below zero, and subtracting
    /// anything from `Infinite` stays infinite.
    fn sub(self, rhs: TimeValue) -> TimeValue {
        match (self, rhs) {
            (TimeValue::Finite(a), TimeValue::Finite(b)) => {
                TimeValue::Finite(a.saturating_sub(b))
            }
            (TimeValue::Infinite, _) => TimeValue::Infinite,
            // Finite minus infinite is undefined in the model; saturate.
            (TimeValue::Finite(_), TimeValue::Infinite) => TimeValue::ZERO,
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Finite(u) => write!(f, "{u}"),
            TimeValue::Infinite => write!(f, "inf"),
        }
    }
}

impl From<u64> for TimeValue {
    #[inline]
    fn from(units: u64) -> Self {
        TimeValue::Finite(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_puts_infinite_last() {
        assert!(TimeValue::Finite(u64::MAX) < TimeValue::Infinite);
        assert!(TimeValue::ZERO < TimeValue::Finite(1));
        assert_eq!(TimeValue::Infinite, TimeValue::Infinite);
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(
            TimeValue::Finite(u64::MAX) + TimeValue::Finite(1),
            TimeValue::Finite(u64::MAX)
        );
        assert_eq!(TimeValue::Finite(3) - TimeValue::Finite(5), TimeValue::ZERO);
        assert_eq!(
            TimeValue::Infinite + TimeValue::Finite(1),
            TimeValue::Infinite
        );
    }

    #[test]
    fn clamp_respects_infinite_upper_bound() {
        let date = TimeValue::Finite(10_000);
        assert_eq!(date.clamp(TimeValue::ZERO, TimeValue::Infinite), date);
        assert_eq!(
            date.clamp(TimeValue::ZERO, TimeValue::Finite(100)),
            TimeValue::Finite(100)
        );
    }

    #[test]
    fn ratio_is_bounded() {
        assert_eq!(TimeValue::Finite(5).ratio_of(TimeValue::Finite(10)), 0.5);
        assert_eq!(TimeValue::Finite(20).ratio_of(TimeValue::Finite(10)), 1.0);
        assert_eq!(TimeValue::Finite(5).ratio_of(TimeValue::Infinite), 0.0);
    }
}
