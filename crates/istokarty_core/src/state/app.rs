//! Application store: reference tables plus the live selection.

use crate::catalog::{Catalog, CatalogError, EventTable, GradeTable, PeriodTable};
use crate::media::{attach_image, AttachError, ImageRef};
use crate::model::event::Event;
use crate::model::grade::GradeNumber;
use crate::model::period::Period;
use crate::query::{
    filter_events_by_period, period_overview, periods_for_grade, resolve_period, PeriodFilter,
    PeriodOverview,
};
use crate::state::{Action, ActiveView, Selection, SelectionError};
use log::{debug, info, warn};

/// Single owner of all mutable application data.
///
/// Queries borrow the tables read-only; only `dispatch` and the upload
/// entry points mutate.
#[derive(Debug, Clone)]
pub struct AppState {
    periods: PeriodTable,
    grades: GradeTable,
    events: EventTable,
    selection: Selection,
}

impl AppState {
    /// Creates a store in the initial selection state.
    pub fn new(catalog: Catalog) -> Self {
        let (periods, grades, events) = catalog.into_parts();
        Self {
            periods,
            grades,
            events,
            selection: Selection::default(),
        }
    }

    /// Creates a store over the embedded reference dataset.
    pub fn with_builtin_catalog() -> Result<Self, CatalogError> {
        Catalog::builtin().map(Self::new)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
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

    /// Applies one user action.
    ///
    /// # Errors
    /// Unknown period, grade or event ids are rejected and the selection is
    /// left exactly as it was.
    pub fn dispatch(&mut self, action: Action) -> Result<(), SelectionError> {
        let action_name = action.name();
        let result = self.apply(action);
        match &result {
            Ok(()) => debug!(
                "event=selection_change module=state status=ok action={} view={} period={} grade={:?} upload_target={:?}",
                action_name,
                self.selection.active_view.as_str(),
                self.selection.selected_period,
                self.selection.selected_grade,
                self.selection.upload_target
            ),
            Err(err) => warn!(
                "event=selection_change module=state status=error action={} error={}",
                action_name, err
            ),
        }
        result
    }

    fn apply(&mut self, action: Action) -> Result<(), SelectionError> {
        match action {
            Action::ShowView(view) => {
                self.selection.active_view = view;
            }
            Action::SelectPeriod(filter) => {
                self.check_period_filter(&filter)?;
                self.selection.selected_period = filter;
            }
            Action::SelectGrade(grade) => {
                self.check_grade(grade)?;
                self.selection.selected_grade = Some(grade);
            }
            Action::ClearGrade => {
                self.selection.selected_grade = None;
            }
            Action::OpenPeriodMap(period_id) => {
                let filter = PeriodFilter::Period(period_id);
                self.check_period_filter(&filter)?;
                self.selection.selected_period = filter;
                self.selection.active_view = ActiveView::Maps;
            }
            Action::OpenGrade(grade) => {
                self.check_grade(grade)?;
                self.selection.selected_grade = Some(grade);
                self.selection.active_view = ActiveView::Grades;
            }
            Action::BeginUpload(event_id) => {
                if !self.events.contains(&event_id) {
                    return Err(SelectionError::UnknownEvent(event_id));
                }
                self.selection.upload_target = Some(event_id);
            }
            Action::CancelUpload => {
                self.selection.upload_target = None;
            }
        }
        Ok(())
    }

    fn check_period_filter(&self, filter: &PeriodFilter) -> Result<(), SelectionError> {
        match filter {
            PeriodFilter::All => Ok(()),
            PeriodFilter::Period(id) if self.periods.contains(id) => Ok(()),
            PeriodFilter::Period(id) => Err(SelectionError::UnknownPeriod(id.clone())),
        }
    }

    fn check_grade(&self, grade: GradeNumber) -> Result<(), SelectionError> {
        if self.grades.contains(grade) {
            Ok(())
        } else {
            Err(SelectionError::UnknownGrade(grade))
        }
    }

    /// Events shown on the map under the current period filter.
    pub fn visible_events(&self) -> Vec<&Event> {
        filter_events_by_period(self.events.records(), &self.selection.selected_period)
    }

    /// Periods of the selected grade; empty when no grade is selected.
    pub fn selected_grade_periods(&self) -> Vec<&Period> {
        match self.selection.selected_grade {
            Some(grade) => periods_for_grade(&self.periods, &self.grades, grade),
            None => Vec::new(),
        }
    }

    pub fn upload_target_event(&self) -> Option<&Event> {
        self.selection
            .upload_target
            .as_deref()
            .and_then(|id| self.events.get(id))
    }

    pub fn period_overview(&self) -> Vec<PeriodOverview<'_>> {
        period_overview(&self.periods, self.events.records())
    }

    /// Resolves the period an event belongs to.
    pub fn period_of(&self, event: &Event) -> Option<&Period> {
        resolve_period(&self.periods, &event.period)
    }

    /// Validates, encodes and attaches an upload synchronously.
    ///
    /// On success the upload target is cleared when it names `event_id`.
    /// On failure nothing changes so the user can retry.
    pub fn attach_upload(
        &mut self,
        event_id: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<&Event, AttachError> {
        self.events = attach_image(&self.events, event_id, bytes, mime_type)?;
        self.clear_upload_target(event_id);
        self.events
            .get(event_id)
            .ok_or_else(|| AttachError::EventNotFound(event_id.to_string()))
    }

    /// Applies the outcome of an asynchronous image read.
    ///
    /// A successful read replaces the event's `map_image` in place; a failed
    /// read is returned unchanged and leaves event data untouched.
    pub fn finish_upload(
        &mut self,
        event_id: &str,
        outcome: Result<ImageRef, AttachError>,
    ) -> Result<&Event, AttachError> {
        let image = match outcome {
            Ok(image) => image,
            Err(err) => {
                warn!(
                    "event=upload_finish module=state status=error code={} event_id={}",
                    err.code(),
                    event_id
                );
                return Err(err);
            }
        };

        let mime_type = image.mime_type().to_string();
        if !self.events.replace_map_image(event_id, image.into_string()) {
            warn!(
                "event=upload_finish module=state status=error code=event_not_found event_id={}",
                event_id
            );
            return Err(AttachError::EventNotFound(event_id.to_string()));
        }
        self.clear_upload_target(event_id);
        info!(
            "event=upload_finish module=state status=ok event_id={} mime_type={}",
            event_id, mime_type
        );

        self.events
            .get(event_id)
            .ok_or_else(|| AttachError::EventNotFound(event_id.to_string()))
    }

    fn clear_upload_target(&mut self, event_id: &str) {
        if self.selection.upload_target.as_deref() == Some(event_id) {
            self.selection.upload_target = None;
        }
    }
}
