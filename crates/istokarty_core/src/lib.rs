//! Core domain logic for the IstoKarty history atlas.
//! This crate owns the reference data, the queries the views render, the
//! image upload flow and the selection state.

pub mod catalog;
pub mod logging;
pub mod media;
pub mod model;
pub mod query;
pub mod state;

pub use catalog::{Catalog, CatalogError, EventTable, GradeTable, JsonError, PeriodTable};
pub use logging::{default_log_level, init_logging, logging_status};
pub use media::{
    attach_image, encode_image, load_image, validate_mime_type, AttachError, ImageRef,
    IMAGE_MIME_PREFIX,
};
pub use model::event::{Coordinates, Era, Event, EventId};
pub use model::grade::{Grade, GradeNumber, GRADE_RANGE};
pub use model::period::{Period, PeriodId};
pub use model::ModelValidationError;
pub use query::{
    events_for_period, filter_events_by_period, period_overview, periods_for_grade,
    resolve_period, PeriodFilter, PeriodOverview, ALL_PERIODS,
};
pub use state::{Action, ActiveView, AppState, Selection, SelectionError};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
