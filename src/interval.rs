//! SQL intervals and delegated temporal arithmetic.
//!
//! An [`Interval`] is an ordered list of `(amount, unit)` components. The
//! expression engine never does calendar math itself - `+` and `-` on a
//! date, time, or timestamp delegate here, and the dialect compilers render
//! the components as one vendor literal.

use std::fmt;

use chrono::{Days, Duration, Months, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

// =============================================================================
// Units
// =============================================================================

/// Interval component unit.
///
/// Composite units (week, quarter, century, millennium) evaluate at their
/// base granularity: 7 days, 3 months, 100 years, 1000 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Century,
    Millennium,
}

/// Base granularity of a unit, with the multiplier into that base.
pub(crate) enum Granularity {
    Months(i64),
    Days(i64),
    Seconds(i64),
}

impl IntervalUnit {
    /// Standard SQL keyword for this unit.
    pub fn name(&self) -> &'static str {
        match self {
            IntervalUnit::Second => "SECOND",
            IntervalUnit::Minute => "MINUTE",
            IntervalUnit::Hour => "HOUR",
            IntervalUnit::Day => "DAY",
            IntervalUnit::Week => "WEEK",
            IntervalUnit::Month => "MONTH",
            IntervalUnit::Quarter => "QUARTER",
            IntervalUnit::Year => "YEAR",
            IntervalUnit::Century => "CENTURY",
            IntervalUnit::Millennium => "MILLENNIUM",
        }
    }

    pub(crate) fn granularity(&self) -> Granularity {
        match self {
            IntervalUnit::Second => Granularity::Seconds(1),
            IntervalUnit::Minute => Granularity::Seconds(60),
            IntervalUnit::Hour => Granularity::Seconds(3600),
            IntervalUnit::Day => Granularity::Days(1),
            IntervalUnit::Week => Granularity::Days(7),
            IntervalUnit::Month => Granularity::Months(1),
            IntervalUnit::Quarter => Granularity::Months(3),
            IntervalUnit::Year => Granularity::Months(12),
            IntervalUnit::Century => Granularity::Months(1200),
            IntervalUnit::Millennium => Granularity::Months(12000),
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Interval
// =============================================================================

/// An interval literal: ordered `(amount, unit)` components.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    components: Vec<(i64, IntervalUnit)>,
}

/// Errors from delegated interval arithmetic.
#[derive(Debug, Error)]
pub enum IntervalError {
    #[error("{unit} components cannot be applied to a TIME value")]
    UnitOnTime { unit: IntervalUnit },

    #[error("interval arithmetic overflowed the {0} range")]
    Overflow(&'static str),

    #[error("interval arithmetic requires a DATE, TIME, or TIMESTAMP operand")]
    NotTemporal,
}

impl Interval {
    /// A single-component interval.
    pub fn of(amount: i64, unit: IntervalUnit) -> Self {
        Self {
            components: vec![(amount, unit)],
        }
    }

    /// Append another component.
    pub fn and(mut self, amount: i64, unit: IntervalUnit) -> Self {
        self.components.push((amount, unit));
        self
    }

    pub fn components(&self) -> &[(i64, IntervalUnit)] {
        &self.components
    }

    /// Add this interval to a temporal payload.
    ///
    /// A date shifted by a sub-day component is promoted to a midnight
    /// timestamp first; date-granularity components on a TIME value are a
    /// domain error.
    pub fn add_to(&self, value: &Value) -> Result<Value, IntervalError> {
        self.shift(value, 1)
    }

    /// Subtract this interval from a temporal payload.
    pub fn subtract_from(&self, value: &Value) -> Result<Value, IntervalError> {
        self.shift(value, -1)
    }

    fn shift(&self, value: &Value, sign: i64) -> Result<Value, IntervalError> {
        if !matches!(value, Value::Date(_) | Value::Time(_) | Value::Timestamp(_)) {
            return Err(IntervalError::NotTemporal);
        }
        let mut acc = value.clone();
        for (amount, unit) in &self.components {
            let amount = amount
                .checked_mul(sign)
                .ok_or(IntervalError::Overflow("interval component"))?;
            acc = match unit.granularity() {
                Granularity::Months(f) => shift_months(acc, scaled(amount, f)?, *unit)?,
                Granularity::Days(f) => shift_days(acc, scaled(amount, f)?, *unit)?,
                Granularity::Seconds(f) => shift_seconds(acc, scaled(amount, f)?)?,
            };
        }
        Ok(acc)
    }
}

fn scaled(amount: i64, factor: i64) -> Result<i64, IntervalError> {
    amount
        .checked_mul(factor)
        .ok_or(IntervalError::Overflow("interval component"))
}

fn shift_months(value: Value, months: i64, unit: IntervalUnit) -> Result<Value, IntervalError> {
    let delta = u32::try_from(months.unsigned_abs())
        .map_err(|_| IntervalError::Overflow("month count"))?;
    let delta = Months::new(delta);
    match value {
        Value::Date(d) => {
            let shifted = if months >= 0 {
                d.checked_add_months(delta)
            } else {
                d.checked_sub_months(delta)
            };
            Ok(Value::Date(shifted.ok_or(IntervalError::Overflow("DATE"))?))
        }
        Value::Timestamp(ts) => {
            let shifted = if months >= 0 {
                ts.checked_add_months(delta)
            } else {
                ts.checked_sub_months(delta)
            };
            Ok(Value::Timestamp(
                shifted.ok_or(IntervalError::Overflow("TIMESTAMP"))?,
            ))
        }
        Value::Time(_) => Err(IntervalError::UnitOnTime { unit }),
        _ => Err(IntervalError::NotTemporal),
    }
}

fn shift_days(value: Value, days: i64, unit: IntervalUnit) -> Result<Value, IntervalError> {
    let delta = Days::new(days.unsigned_abs());
    match value {
        Value::Date(d) => {
            let shifted = if days >= 0 {
                d.checked_add_days(delta)
            } else {
                d.checked_sub_days(delta)
            };
            Ok(Value::Date(shifted.ok_or(IntervalError::Overflow("DATE"))?))
        }
        Value::Timestamp(ts) => {
            let shifted = if days >= 0 {
                ts.checked_add_days(delta)
            } else {
                ts.checked_sub_days(delta)
            };
            Ok(Value::Timestamp(
                shifted.ok_or(IntervalError::Overflow("TIMESTAMP"))?,
            ))
        }
        Value::Time(_) => Err(IntervalError::UnitOnTime { unit }),
        _ => Err(IntervalError::NotTemporal),
    }
}

fn shift_seconds(value: Value, seconds: i64) -> Result<Value, IntervalError> {
    let delta =
        Duration::try_seconds(seconds).ok_or(IntervalError::Overflow("interval component"))?;
    match value {
        // A date plus a sub-day component becomes a timestamp at midnight.
        Value::Date(d) => shift_seconds(Value::Timestamp(d.and_time(NaiveTime::MIN)), seconds),
        Value::Timestamp(ts) => Ok(Value::Timestamp(
            ts.checked_add_signed(delta)
                .ok_or(IntervalError::Overflow("TIMESTAMP"))?,
        )),
        // TIME wraps around midnight.
        Value::Time(t) => Ok(Value::Time(t.overflowing_add_signed(delta).0)),
        _ => Err(IntervalError::NotTemporal),
    }
}

// =============================================================================
// Tests
// =============================================================================
