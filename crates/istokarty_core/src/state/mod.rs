//! Selection state and the application store that owns it.
//!
//! # Responsibility
//! - Model which view, period filter, grade and upload target are active.
//! - Provide the only mutation entry points for that state.
//!
//! # Invariants
//! - Initial state is `home / all / none / none`.
//! - Transitions happen only through `AppState::dispatch` and upload
//!   completion; nothing changes in the background.

mod app;

pub use app::AppState;

use crate::model::event::EventId;
use crate::model::grade::GradeNumber;
use crate::model::period::PeriodId;
use crate::query::PeriodFilter;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top-level view of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Home,
    Grades,
    Maps,
    Periods,
}

/// View id for the landing page.
pub const VIEW_HOME: &str = "home";
/// View id for the grade curriculum page.
pub const VIEW_GRADES: &str = "grades";
/// View id for the interactive map page.
pub const VIEW_MAPS: &str = "maps";
/// View id for the period overview page.
pub const VIEW_PERIODS: &str = "periods";

impl ActiveView {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => VIEW_HOME,
            Self::Grades => VIEW_GRADES,
            Self::Maps => VIEW_MAPS,
            Self::Periods => VIEW_PERIODS,
        }
    }

    /// Parses a stable view id.
    pub fn parse(value: &str) -> Result<Self, SelectionError> {
        match value.trim() {
            VIEW_HOME => Ok(Self::Home),
            VIEW_GRADES => Ok(Self::Grades),
            VIEW_MAPS => Ok(Self::Maps),
            VIEW_PERIODS => Ok(Self::Periods),
            other => Err(SelectionError::UnknownView(other.to_string())),
        }
    }
}

/// Current user selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub active_view: ActiveView,
    pub selected_period: PeriodFilter,
    pub selected_grade: Option<GradeNumber>,
    pub upload_target: Option<EventId>,
}

/// User actions that move the selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowView(ActiveView),
    SelectPeriod(PeriodFilter),
    SelectGrade(GradeNumber),
    ClearGrade,
    /// Select one period and switch to the map.
    OpenPeriodMap(PeriodId),
    /// Select one grade and switch to the grade page.
    OpenGrade(GradeNumber),
    /// Choose the event that the next upload will attach to.
    BeginUpload(EventId),
    CancelUpload,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::ShowView(_) => "show_view",
            Self::SelectPeriod(_) => "select_period",
            Self::SelectGrade(_) => "select_grade",
            Self::ClearGrade => "clear_grade",
            Self::OpenPeriodMap(_) => "open_period_map",
            Self::OpenGrade(_) => "open_grade",
            Self::BeginUpload(_) => "begin_upload",
            Self::CancelUpload => "cancel_upload",
        }
    }
}

/// Rejected selection actions. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    UnknownView(String),
    UnknownPeriod(PeriodId),
    UnknownGrade(GradeNumber),
    UnknownEvent(EventId),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownView(value) => write!(f, "unknown view: {value}"),
            Self::UnknownPeriod(value) => write!(f, "period not found: {value}"),
            Self::UnknownGrade(value) => write!(f, "grade not found: {value}"),
            Self::UnknownEvent(value) => write!(f, "event not found: {value}"),
        }
    }
}

impl Error for SelectionError {}
