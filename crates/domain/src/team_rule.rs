// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Team-wide mandates on recurring schedules.

use crate::error::DomainError;
use crate::types::{RuleId, UserId, WorkMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::{Date, Weekday};

/// When a team rule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Every week on the given weekday.
    Weekly { day_of_week: Weekday },
    /// Every month on the given day number. Months without that day are skipped.
    Monthly { day_of_month: u8 },
    /// Only on the listed dates.
    SpecificDates { dates: BTreeSet<Date> },
}

impl Recurrence {
    /// Returns whether this recurrence fires on `date`.
    #[must_use]
    pub fn matches(&self, date: Date) -> bool {
        match self {
            Self::Weekly { day_of_week } => date.weekday() == *day_of_week,
            Self::Monthly { day_of_month } => date.day() == *day_of_month,
            Self::SpecificDates { dates } => dates.contains(&date),
        }
    }

    /// Checks that the recurrence can ever fire.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRecurrence` for a day of month outside
    /// 1..=31 or an empty date list.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Weekly { .. } => Ok(()),
            Self::Monthly { day_of_month } if !(1..=31).contains(day_of_month) => {
                Err(DomainError::InvalidRecurrence {
                    reason: format!("day_of_month must be between 1 and 31, got {day_of_month}"),
                })
            }
            Self::Monthly { .. } => Ok(()),
            Self::SpecificDates { dates } if dates.is_empty() => {
                Err(DomainError::InvalidRecurrence {
                    reason: String::from("specific_dates requires at least one date"),
                })
            }
            Self::SpecificDates { .. } => Ok(()),
        }
    }
}

/// The group of users a rule is addressed to.
///
/// Membership lookup belongs to the store; the engine only receives rules
/// already scoped to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RuleScope {
    Organization,
    Team(String),
    Project(String),
}

/// A mandate imposing a work mode on a group of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRule {
    pub id: RuleId,
    pub name: String,
    pub scope: RuleScope,
    pub required_mode: WorkMode,
    pub priority: i32,
    pub is_active: bool,
    #[serde(default)]
    pub exemptions: BTreeSet<UserId>,
    pub recurrence: Recurrence,
}

impl TeamRule {
    /// Returns whether this rule binds `user_id` on `date`.
    ///
    /// A rule binds only when active, not exempting the user, and its
    /// recurrence fires on the date.
    #[must_use]
    pub fn applies_to(&self, user_id: &UserId, date: Date) -> bool {
        self.is_active && !self.exemptions.contains(user_id) && self.recurrence.matches(date)
    }
}

/// Picks the binding rule with the highest priority.
///
/// Equal priorities fall back to the lowest rule id so the choice is stable.
#[must_use]
pub fn winning_rule<'a>(
    rules: &'a [TeamRule],
    user_id: &UserId,
    date: Date,
) -> Option<&'a TeamRule> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(user_id, date))
        .min_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)))
}
