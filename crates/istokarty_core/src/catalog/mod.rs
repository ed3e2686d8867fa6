//! Static reference data: periods, grades and map events.
//!
//! # Responsibility
//! - Parse the embedded reference dataset once per process.
//! - Reject datasets that break identity or cross-table reference rules.
//!
//! # Invariants
//! - Period ids, grade numbers and event ids are unique in their tables.
//! - Every grade period reference and every event period names an existing
//!   period.
//! - Coordinates are validated while deserializing events.

mod table;

pub use table::{EventTable, GradeTable, PeriodTable};

use crate::model::event::Event;
use crate::model::grade::{Grade, GradeNumber};
use crate::model::period::Period;
use crate::query::ALL_PERIODS;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REFERENCE_JSON: &str = include_str!("../../data/reference.json");

static RECORD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid record id regex"));

static BUILTIN_CATALOG: Lazy<Result<Catalog, CatalogError>> =
    Lazy::new(|| Catalog::from_json(REFERENCE_JSON));

/// Reference dataset validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// JSON is malformed or a record failed field-level validation.
    Parse(JsonError),
    InvalidId { table: &'static str, id: String },
    /// Id collides with a sentinel value such as the `all` period filter.
    ReservedId { table: &'static str, id: String },
    DuplicatePeriodId(String),
    DuplicateGrade(GradeNumber),
    GradeOutOfRange(GradeNumber),
    EmptyGradePeriods(GradeNumber),
    DuplicateEventId(String),
    /// `owner` is `grade <n>` or `event <id>`.
    UnknownPeriodReference { owner: String, period: String },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid reference data: {err}"),
            Self::InvalidId { table, id } => write!(f, "invalid id `{id}` in {table}"),
            Self::ReservedId { table, id } => write!(f, "id `{id}` is reserved in {table}"),
            Self::DuplicatePeriodId(id) => write!(f, "duplicate period id: {id}"),
            Self::DuplicateGrade(grade) => write!(f, "duplicate grade: {grade}"),
            Self::GradeOutOfRange(grade) => write!(f, "grade {grade} is outside 5..=11"),
            Self::EmptyGradePeriods(grade) => write!(f, "grade {grade} lists no periods"),
            Self::DuplicateEventId(id) => write!(f, "duplicate event id: {id}"),
            Self::UnknownPeriodReference { owner, period } => {
                write!(f, "{owner} references unknown period `{period}`")
            }
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(JsonError::from(value))
    }
}

/// Cloneable snapshot of a `serde_json` failure with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    message: String,
    line: usize,
    column: usize,
}

impl JsonError {
    /// Full message, including the position suffix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line; `0` when the failure has no position.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl Display for JsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for JsonError {}

impl From<serde_json::Error> for JsonError {
    fn from(value: serde_json::Error) -> Self {
        Self {
            message: value.to_string(),
            line: value.line(),
            column: value.column(),
        }
    }
}

#[derive(Deserialize)]
struct CatalogRecord {
    periods: Vec<Period>,
    grades: Vec<Grade>,
    events: Vec<Event>,
}

/// Validated reference dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    periods: PeriodTable,
    grades: GradeTable,
    events: EventTable,
}

impl Catalog {
    /// Returns the dataset embedded into this build.
    ///
    /// Parsing happens once per process; callers get an owned copy they may
    /// amend (event images) without affecting other callers.
    pub fn builtin() -> Result<Self, CatalogError> {
        BUILTIN_CATALOG.clone()
    }

    /// Parses and validates a JSON dataset with `periods`, `grades` and
    /// `events` arrays.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let record = serde_json::from_str::<CatalogRecord>(json).map_err(|err| {
            warn!("event=catalog_load module=catalog status=error stage=parse");
            CatalogError::from(err)
        })?;
        Self::new(record.periods, record.grades, record.events)
    }

    /// Builds tables and checks cross-table references.
    pub fn new(
        periods: Vec<Period>,
        grades: Vec<Grade>,
        events: Vec<Event>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            periods: PeriodTable::new(periods)?,
            grades: GradeTable::new(grades)?,
            events: EventTable::new(events)?,
        };
        if let Err(err) = catalog.check_references() {
            warn!(
                "event=catalog_load module=catalog status=error stage=references error={}",
                err
            );
            return Err(err);
        }

        info!(
            "event=catalog_load module=catalog status=ok periods={} grades={} events={}",
            catalog.periods.len(),
            catalog.grades.len(),
            catalog.events.len()
        );
        Ok(catalog)
    }

    pub fn periods(&self) -> &PeriodTable {
        &self.periods
    }

    pub fn grades(&self) -> &GradeTable {
        &self.grades
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    /// Splits the catalog into its owned tables.
    pub fn into_parts(self) -> (PeriodTable, GradeTable, EventTable) {
        (self.periods, self.grades, self.events)
    }

    fn check_references(&self) -> Result<(), CatalogError> {
        for grade in self.grades.iter() {
            if let Some(missing) = grade
                .periods
                .iter()
                .find(|period_id| !self.periods.contains(period_id))
            {
                return Err(CatalogError::UnknownPeriodReference {
                    owner: format!("grade {}", grade.grade),
                    period: missing.clone(),
                });
            }
        }
        for event in self.events.iter() {
            if !self.periods.contains(&event.period) {
                return Err(CatalogError::UnknownPeriodReference {
                    owner: format!("event {}", event.id),
                    period: event.period.clone(),
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn is_valid_record_id(value: &str) -> bool {
    RECORD_ID_RE.is_match(value)
}

pub(crate) fn is_reserved_period_id(value: &str) -> bool {
    value == ALL_PERIODS
}
