// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-day arithmetic.
//!
//! Dates are whole days with no time-of-day or timezone; callers normalise
//! before handing them in. Weeks start on Monday.

use crate::error::DomainError;
use time::{Date, Duration, Weekday};

/// Weekdays in Monday-first order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// Returns whether `date` falls on a Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Lower-case English weekday name.
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

/// Offsets `date` by a signed number of days.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the result leaves the
/// supported calendar range.
pub fn add_days(date: Date, days: i64) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {days} days to {date}"),
        })
}

/// Returns the Monday of the week containing `date`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` at the lower calendar bound.
pub fn week_start(date: Date) -> Result<Date, DomainError> {
    add_days(date, -i64::from(date.weekday().number_days_from_monday()))
}

/// Returns the Monday..=Sunday bounds of the week containing `date`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` at either calendar bound.
pub fn week_bounds(date: Date) -> Result<(Date, Date), DomainError> {
    let start: Date = week_start(date)?;
    let end: Date = add_days(start, 6)?;
    Ok((start, end))
}

/// Lists every calendar day in `start..=end`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` when `end` precedes `start`.
pub fn days_in_range(start: Date, end: Date) -> Result<Vec<Date>, DomainError> {
    if end < start {
        return Err(DomainError::InvalidDateRange { start, end });
    }

    let mut days: Vec<Date> = Vec::new();
    let mut current: Date = start;
    loop {
        days.push(current);
        if current == end {
            break;
        }
        current = current
            .next_day()
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("iterating past {current}"),
            })?;
    }
    Ok(days)
}
