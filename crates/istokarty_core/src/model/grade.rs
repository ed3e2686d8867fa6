//! School grade record.

use crate::model::period::PeriodId;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// School grade number.
pub type GradeNumber = u8;

/// Grades covered by the curriculum.
pub const GRADE_RANGE: RangeInclusive<GradeNumber> = 5..=11;

/// One school grade and the periods it studies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub grade: GradeNumber,
    pub title: String,
    /// Period references in curriculum order. Never empty in loaded data.
    pub periods: Vec<PeriodId>,
    /// Opaque icon tag for the UI.
    pub icon: String,
}
