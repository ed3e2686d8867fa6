//! Map event record.
//!
//! # Invariants
//! - `coordinates` are percentage offsets within `[0, 100]` on both axes.
//! - Negative `year` means "before common era".

use crate::model::period::PeriodId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};

/// Stable string key of an event (`"1"`, `"2"`, ...).
pub type EventId = String;

const COORDINATE_MIN: f64 = 0.0;
const COORDINATE_MAX: f64 = 100.0;

/// Relative position on the 2D map surface, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesRecord")]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
struct CoordinatesRecord {
    x: f64,
    y: f64,
}

impl TryFrom<CoordinatesRecord> for Coordinates {
    type Error = ModelValidationError;

    fn try_from(value: CoordinatesRecord) -> Result<Self, Self::Error> {
        Self::new(value.x, value.y)
    }
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    /// - `CoordinateOutOfRange` when an axis is not finite or outside `[0, 100]`.
    pub fn new(x: f64, y: f64) -> Result<Self, ModelValidationError> {
        check_axis('x', x)?;
        check_axis('y', y)?;
        Ok(Self { x, y })
    }
}

fn check_axis(axis: char, value: f64) -> Result<(), ModelValidationError> {
    if value.is_finite() && (COORDINATE_MIN..=COORDINATE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ModelValidationError::CoordinateOutOfRange { axis, value })
    }
}

/// Calendar era of an event year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    BeforeCommonEra,
    CommonEra,
}

impl Era {
    /// Short label shown next to the absolute year.
    pub fn label(self) -> &'static str {
        match self {
            Self::BeforeCommonEra => "до н.э.",
            Self::CommonEra => "н.э.",
        }
    }
}

/// One historical occurrence placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Signed year; negative values are BCE.
    pub year: i32,
    pub title: String,
    pub description: String,
    pub coordinates: Coordinates,
    /// Owning period reference.
    pub period: PeriodId,
    /// Attached map image reference (URL or data URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_image: Option<String>,
}

impl Event {
    pub fn era(&self) -> Era {
        if self.year < 0 {
            Era::BeforeCommonEra
        } else {
            Era::CommonEra
        }
    }

    /// Renders the year as `<abs year> <era label>`, e.g. `3100 до н.э.`.
    pub fn display_year(&self) -> String {
        format!("{} {}", self.year.unsigned_abs(), self.era().label())
    }
}
