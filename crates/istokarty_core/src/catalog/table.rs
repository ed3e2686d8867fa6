//! Ordered record tables with key-to-position indexes.
//!
//! # Invariants
//! - Iteration order equals load order.
//! - Index maps are built once at construction and never drift from the
//!   backing `Vec` (records are never added or removed afterwards).

use crate::catalog::{is_reserved_period_id, is_valid_record_id, CatalogError};
use crate::model::event::{Event, EventId};
use crate::model::grade::{Grade, GradeNumber, GRADE_RANGE};
use crate::model::period::Period;
use std::collections::{BTreeMap, HashMap};

/// Periods in display order, indexed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodTable {
    records: Vec<Period>,
    index: HashMap<String, usize>,
}

impl PeriodTable {
    /// Builds the table, rejecting malformed, reserved or duplicate ids.
    ///
    /// `all` is reserved for the "every period" filter.
    pub fn new(records: Vec<Period>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, period) in records.iter().enumerate() {
            if !is_valid_record_id(&period.id) {
                return Err(CatalogError::InvalidId {
                    table: "periods",
                    id: period.id.clone(),
                });
            }
            if is_reserved_period_id(&period.id) {
                return Err(CatalogError::ReservedId {
                    table: "periods",
                    id: period.id.clone(),
                });
            }
            if index.insert(period.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicatePeriodId(period.id.clone()));
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, id: &str) -> Option<&Period> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn records(&self) -> &[Period] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Grades in display order, indexed by grade number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeTable {
    records: Vec<Grade>,
    index: BTreeMap<GradeNumber, usize>,
}

impl GradeTable {
    /// Builds the table.
    ///
    /// # Errors
    /// - Grade number outside `5..=11` or repeated.
    /// - Grade without any period reference.
    pub fn new(records: Vec<Grade>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, grade) in records.iter().enumerate() {
            if !GRADE_RANGE.contains(&grade.grade) {
                return Err(CatalogError::GradeOutOfRange(grade.grade));
            }
            if grade.periods.is_empty() {
                return Err(CatalogError::EmptyGradePeriods(grade.grade));
            }
            if index.insert(grade.grade, position).is_some() {
                return Err(CatalogError::DuplicateGrade(grade.grade));
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, grade: GradeNumber) -> Option<&Grade> {
        self.index.get(&grade).map(|&position| &self.records[position])
    }

    pub fn contains(&self, grade: GradeNumber) -> bool {
        self.index.contains_key(&grade)
    }

    pub fn records(&self) -> &[Grade] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Grade> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Map events in chronological display order, indexed by id.
///
/// Only `map_image` of an existing record can change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    records: Vec<Event>,
    index: HashMap<EventId, usize>,
}

impl EventTable {
    /// Builds the table, rejecting malformed or duplicate ids.
    pub fn new(records: Vec<Event>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, event) in records.iter().enumerate() {
            if !is_valid_record_id(&event.id) {
                return Err(CatalogError::InvalidId {
                    table: "events",
                    id: event.id.clone(),
                });
            }
            if index.insert(event.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateEventId(event.id.clone()));
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn records(&self) -> &[Event] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces `map_image` of one event in place.
    ///
    /// Returns `false` when `id` is unknown; the table is unchanged then.
    pub(crate) fn replace_map_image(&mut self, id: &str, image: String) -> bool {
        match self.index.get(id) {
            Some(&position) => {
                self.records[position].map_image = Some(image);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventTable, GradeTable, PeriodTable};
    use crate::catalog::CatalogError;
    use crate::model::event::{Coordinates, Event};
    use crate::model::grade::Grade;
    use crate::model::period::Period;

    fn period(id: &str) -> Period {
        Period {
            id: id.to_string(),
            name: id.to_uppercase(),
            years: "years".to_string(),
            color: "bg-primary".to_string(),
            description: "description".to_string(),
            map_image: None,
        }
    }

    fn grade(number: u8, periods: &[&str]) -> Grade {
        Grade {
            grade: number,
            title: format!("{number} класс"),
            periods: periods.iter().map(|id| id.to_string()).collect(),
            icon: "Scroll".to_string(),
        }
    }

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            year: 1,
            title: "title".to_string(),
            description: "description".to_string(),
            coordinates: Coordinates::new(1.0, 1.0).expect("valid coordinates"),
            period: "ancient".to_string(),
            map_image: None,
        }
    }

    #[test]
    fn period_table_keeps_order_and_indexes_ids() {
        let table = PeriodTable::new(vec![period("b"), period("a")]).expect("valid table");
        let ids = table.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(table.get("a").map(|p| p.name.as_str()), Some("A"));
        assert!(table.get("c").is_none());
    }

    #[test]
    fn period_table_rejects_duplicates_and_bad_ids() {
        let err = PeriodTable::new(vec![period("a"), period("a")]).expect_err("duplicate id");
        assert_eq!(err, CatalogError::DuplicatePeriodId("a".to_string()));

        let err = PeriodTable::new(vec![period("all")]).expect_err("reserved id");
        assert_eq!(
            err,
            CatalogError::ReservedId {
                table: "periods",
                id: "all".to_string()
            }
        );

        let err = PeriodTable::new(vec![period("Bad Id")]).expect_err("invalid id");
        assert_eq!(
            err,
            CatalogError::InvalidId {
                table: "periods",
                id: "Bad Id".to_string()
            }
        );
    }

    #[test]
    fn grade_table_enforces_range_uniqueness_and_non_empty_periods() {
        assert_eq!(
            GradeTable::new(vec![grade(4, &["a"])]).expect_err("grade 4 is out of range"),
            CatalogError::GradeOutOfRange(4)
        );
        assert_eq!(
            GradeTable::new(vec![grade(5, &[])]).expect_err("empty periods"),
            CatalogError::EmptyGradePeriods(5)
        );
        assert_eq!(
            GradeTable::new(vec![grade(5, &["a"]), grade(5, &["b"])]).expect_err("duplicate"),
            CatalogError::DuplicateGrade(5)
        );
    }

    #[test]
    fn event_table_replaces_map_image_in_place() {
        let mut table = EventTable::new(vec![event("1"), event("2")]).expect("valid table");

        assert!(table.replace_map_image("2", "data:image/png;base64,AA==".to_string()));
        assert!(!table.replace_map_image("3", "ignored".to_string()));

        assert_eq!(table.get("1").and_then(|e| e.map_image.as_deref()), None);
        assert_eq!(
            table.get("2").and_then(|e| e.map_image.as_deref()),
            Some("data:image/png;base64,AA==")
        );
        assert_eq!(table.records()[1].id, "2");
    }
}
