//! Read-only queries over the reference tables.
//!
//! # Responsibility
//! - Compute the visible subsets each view renders.
//! - Resolve period references without failing.
//!
//! # Invariants
//! - Queries never mutate or retain the tables they borrow.
//! - Results preserve table order.
//! - Unknown ids degrade to empty results or `None`, never to errors.

use crate::catalog::{GradeTable, PeriodTable};
use crate::model::event::Event;
use crate::model::grade::GradeNumber;
use crate::model::period::{Period, PeriodId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Sentinel string for "no period filter".
pub const ALL_PERIODS: &str = "all";

/// Period filter applied to the map view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PeriodFilter {
    #[default]
    All,
    Period(PeriodId),
}

impl PeriodFilter {
    /// Parses `"all"` as the sentinel and anything else as a period id.
    ///
    /// The input is taken literally; callers normalize user text first.
    pub fn parse(value: &str) -> Self {
        if value == ALL_PERIODS {
            Self::All
        } else {
            Self::Period(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_PERIODS,
            Self::Period(id) => id.as_str(),
        }
    }

    /// Returns whether an event in `period_id` passes this filter.
    pub fn matches(&self, period_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Period(id) => id == period_id,
        }
    }
}

impl Display for PeriodFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PeriodFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PeriodFilter> for String {
    fn from(value: PeriodFilter) -> Self {
        value.as_str().to_string()
    }
}

/// One period with the events that belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodOverview<'a> {
    pub period: &'a Period,
    pub events: Vec<&'a Event>,
}

impl PeriodOverview<'_> {
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

/// Events visible under `selected`, in original order.
///
/// A filter naming an unknown period yields an empty result.
pub fn filter_events_by_period<'a>(events: &'a [Event], selected: &PeriodFilter) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| selected.matches(&event.period))
        .collect()
}

/// Looks up one period by id.
pub fn resolve_period<'a>(periods: &'a PeriodTable, period_id: &str) -> Option<&'a Period> {
    periods.get(period_id)
}

/// Periods studied by `grade`, in curriculum order.
///
/// References that do not resolve are dropped. An unknown grade yields an
/// empty result.
pub fn periods_for_grade<'a>(
    periods: &'a PeriodTable,
    grades: &GradeTable,
    grade: GradeNumber,
) -> Vec<&'a Period> {
    let Some(grade) = grades.get(grade) else {
        return Vec::new();
    };
    grade
        .periods
        .iter()
        .filter_map(|period_id| resolve_period(periods, period_id))
        .collect()
}

/// Exact-match period filter; `"all"` is treated as an ordinary id.
pub fn events_for_period<'a>(events: &'a [Event], period_id: &str) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| event.period == period_id)
        .collect()
}

/// Every period in table order with its events.
pub fn period_overview<'a>(
    periods: &'a PeriodTable,
    events: &'a [Event],
) -> Vec<PeriodOverview<'a>> {
    periods
        .iter()
        .map(|period| PeriodOverview {
            period,
            events: events_for_period(events, &period.id),
        })
        .collect()
}
