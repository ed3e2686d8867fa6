//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Own the single process-wide `AppState` and expose its actions/queries.
//! - Flatten core records into plain DTOs with stable string fields.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported in envelopes (`ok=false` or `message`), never thrown.
//! - The state lock is never held across an `.await`.

use istokarty_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, load_image,
    ping as ping_inner, Action, ActiveView, AppState, AttachError, Event, Period, PeriodFilter,
    SelectionError,
};
use log::warn;
use std::sync::{Mutex, OnceLock};

static APP_STATE: OnceLock<Result<Mutex<AppState>, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Period card data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodItem {
    pub id: String,
    pub name: String,
    pub years: String,
    /// Display tag for period styling.
    pub color: String,
    pub description: String,
    pub map_image: Option<String>,
}

/// Grade card data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeItem {
    pub grade: u8,
    pub title: String,
    pub period_ids: Vec<String>,
    pub icon: String,
}

/// Map pin / event card data.
#[derive(Debug, Clone, PartialEq)]
pub struct EventItem {
    pub id: String,
    pub year: i32,
    /// Absolute year plus era label, e.g. `3100 до н.э.`.
    pub year_label: String,
    pub title: String,
    pub description: String,
    /// Horizontal offset in percent.
    pub x: f64,
    /// Vertical offset in percent.
    pub y: f64,
    pub period_id: String,
    /// `None` when the period does not resolve; render without styling.
    pub period_name: Option<String>,
    pub period_color: Option<String>,
    pub map_image: Option<String>,
}

/// One period with its key events.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodOverviewItem {
    pub period: PeriodItem,
    pub events: Vec<EventItem>,
}

/// Current selection in string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// `home|grades|maps|periods`.
    pub active_view: String,
    /// `all` or a period id.
    pub selected_period: String,
    pub selected_grade: Option<u8>,
    pub upload_target: Option<String>,
}

/// Period list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodListResponse {
    pub items: Vec<PeriodItem>,
    pub message: String,
}

/// Grade list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeListResponse {
    pub items: Vec<GradeItem>,
    pub message: String,
}

/// Event list envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EventListResponse {
    pub items: Vec<EventItem>,
    pub message: String,
}

/// Period overview envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodOverviewResponse {
    pub items: Vec<PeriodOverviewItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Stable error code for UI branching (`unsupported_file_type`, ...).
    pub error_code: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }
}

/// Lists all periods in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_periods() -> PeriodListResponse {
    match with_app_state(|state| state.periods().iter().map(to_period_item).collect()) {
        Ok(items) => PeriodListResponse {
            items,
            message: String::new(),
        },
        Err(message) => PeriodListResponse {
            items: Vec::new(),
            message,
        },
    }
}

/// Lists all grades in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_grades() -> GradeListResponse {
    let result = with_app_state(|state| {
        state
            .grades()
            .iter()
            .map(|grade| GradeItem {
                grade: grade.grade,
                title: grade.title.clone(),
                period_ids: grade.periods.clone(),
                icon: grade.icon.clone(),
            })
            .collect()
    });
    match result {
        Ok(items) => GradeListResponse {
            items,
            message: String::new(),
        },
        Err(message) => GradeListResponse {
            items: Vec::new(),
            message,
        },
    }
}

/// Returns the current selection.
///
/// Falls back to the initial selection when state is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn selection_snapshot() -> SelectionSnapshot {
    let selection = with_app_state(|state| state.selection().clone()).unwrap_or_default();
    SelectionSnapshot {
        active_view: selection.active_view.as_str().to_string(),
        selected_period: selection.selected_period.as_str().to_string(),
        selected_grade: selection.selected_grade,
        upload_target: selection.upload_target,
    }
}

/// Switches the active view (`home|grades|maps|periods`).
#[flutter_rust_bridge::frb(sync)]
pub fn show_view(view: String) -> ActionResponse {
    match ActiveView::parse(&view) {
        Ok(view) => dispatch(Action::ShowView(view)),
        Err(err) => selection_failure(&err),
    }
}

/// Sets the map period filter (`all` or a period id).
#[flutter_rust_bridge::frb(sync)]
pub fn select_period(period: String) -> ActionResponse {
    dispatch(Action::SelectPeriod(PeriodFilter::parse(period.trim())))
}

/// Selects a grade, or clears the selection with `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn select_grade(grade: Option<u8>) -> ActionResponse {
    match grade {
        Some(grade) => dispatch(Action::SelectGrade(grade)),
        None => dispatch(Action::ClearGrade),
    }
}

/// Selects a period and switches to the map view.
#[flutter_rust_bridge::frb(sync)]
pub fn open_period_map(period_id: String) -> ActionResponse {
    dispatch(Action::OpenPeriodMap(period_id.trim().to_string()))
}

/// Selects a grade and switches to the grade view.
#[flutter_rust_bridge::frb(sync)]
pub fn open_grade(grade: u8) -> ActionResponse {
    dispatch(Action::OpenGrade(grade))
}

/// Marks the event the next upload targets.
#[flutter_rust_bridge::frb(sync)]
pub fn begin_upload(event_id: String) -> ActionResponse {
    dispatch(Action::BeginUpload(event_id.trim().to_string()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn cancel_upload() -> ActionResponse {
    dispatch(Action::CancelUpload)
}

/// Events visible on the map under the current period filter.
#[flutter_rust_bridge::frb(sync)]
pub fn visible_events() -> EventListResponse {
    event_list(|state| {
        state
            .visible_events()
            .into_iter()
            .map(|event| to_event_item(state, event))
            .collect()
    })
}

/// Events of one period, for the period detail listing.
#[flutter_rust_bridge::frb(sync)]
pub fn period_events(period_id: String) -> EventListResponse {
    event_list(|state| {
        istokarty_core::events_for_period(state.events().records(), period_id.trim())
            .into_iter()
            .map(|event| to_event_item(state, event))
            .collect()
    })
}

/// Periods studied by one grade, in curriculum order.
#[flutter_rust_bridge::frb(sync)]
pub fn grade_periods(grade: u8) -> PeriodListResponse {
    let result = with_app_state(|state| {
        istokarty_core::periods_for_grade(state.periods(), state.grades(), grade)
            .into_iter()
            .map(to_period_item)
            .collect::<Vec<_>>()
    });
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                format!("No periods for grade {grade}.")
            } else {
                String::new()
            };
            PeriodListResponse { items, message }
        }
        Err(message) => PeriodListResponse {
            items: Vec::new(),
            message,
        },
    }
}

/// Every period with its key events.
#[flutter_rust_bridge::frb(sync)]
pub fn period_overview() -> PeriodOverviewResponse {
    let result = with_app_state(|state| {
        let state = &*state;
        state
            .period_overview()
            .into_iter()
            .map(|entry| PeriodOverviewItem {
                period: to_period_item(entry.period),
                events: entry
                    .events
                    .into_iter()
                    .map(|event| to_event_item(state, event))
                    .collect(),
            })
            .collect()
    });
    match result {
        Ok(items) => PeriodOverviewResponse {
            items,
            message: String::new(),
        },
        Err(message) => PeriodOverviewResponse {
            items: Vec::new(),
            message,
        },
    }
}

/// Attaches file bytes already read by the host.
///
/// # FFI contract
/// - Sync call; encodes in memory.
/// - Non-image MIME types and corrupt payloads leave event data unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn attach_image(event_id: String, bytes: Vec<u8>, mime_type: String) -> ActionResponse {
    let event_id = event_id.trim();
    let result = with_app_state(|state| {
        state
            .attach_upload(event_id, &bytes, mime_type.trim())
            .map(|_| ())
    });
    upload_response(event_id, result)
}

/// Reads a local image file and attaches it to an event.
///
/// # FFI contract
/// - Async call; the file read does not hold the state lock, so other
///   calls (including uploads for other events) proceed meanwhile.
pub async fn attach_image_file(
    event_id: String,
    path: String,
    mime_type: String,
) -> ActionResponse {
    let event_id = event_id.trim().to_string();
    let outcome = load_image(path.trim(), mime_type.trim()).await;
    let result = with_app_state(|state| state.finish_upload(&event_id, outcome).map(|_| ()));
    upload_response(&event_id, result)
}

fn upload_response(
    event_id: &str,
    result: Result<Result<(), AttachError>, String>,
) -> ActionResponse {
    match result {
        Ok(Ok(())) => ActionResponse::success(format!("Image attached to event {event_id}.")),
        Ok(Err(err)) => ActionResponse::failure(err.code(), err.to_string()),
        Err(message) => ActionResponse::failure("state_unavailable", message),
    }
}

fn dispatch(action: Action) -> ActionResponse {
    match with_app_state(|state| state.dispatch(action)) {
        Ok(Ok(())) => ActionResponse::success("ok"),
        Ok(Err(err)) => selection_failure(&err),
        Err(message) => ActionResponse::failure("state_unavailable", message),
    }
}

fn selection_failure(err: &SelectionError) -> ActionResponse {
    let code = match err {
        SelectionError::UnknownView(_) => "unknown_view",
        SelectionError::UnknownPeriod(_) => "period_not_found",
        SelectionError::UnknownGrade(_) => "grade_not_found",
        SelectionError::UnknownEvent(_) => "event_not_found",
    };
    ActionResponse::failure(code, err.to_string())
}

fn event_list(f: impl FnOnce(&AppState) -> Vec<EventItem>) -> EventListResponse {
    match with_app_state(|state| f(state)) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No events.".to_string()
            } else {
                format!("Found {} event(s).", items.len())
            };
            EventListResponse { items, message }
        }
        Err(message) => EventListResponse {
            items: Vec::new(),
            message,
        },
    }
}

fn with_app_state<T>(f: impl FnOnce(&mut AppState) -> T) -> Result<T, String> {
    let state = APP_STATE
        .get_or_init(|| {
            AppState::with_builtin_catalog()
                .map(Mutex::new)
                .map_err(|err| err.to_string())
        })
        .as_ref()
        .map_err(|err| format!("reference data unavailable: {err}"))?;
    let mut guard = state.lock().map_err(|_| {
        warn!("event=state_lock module=ffi status=error reason=poisoned");
        "app state lock poisoned".to_string()
    })?;
    Ok(f(&mut guard))
}

fn to_period_item(period: &Period) -> PeriodItem {
    PeriodItem {
        id: period.id.clone(),
        name: period.name.clone(),
        years: period.years.clone(),
        color: period.color.clone(),
        description: period.description.clone(),
        map_image: period.map_image.clone(),
    }
}

fn to_event_item(state: &AppState, event: &Event) -> EventItem {
    let period = state.period_of(event);
    EventItem {
        id: event.id.clone(),
        year: event.year,
        year_label: event.display_year(),
        title: event.title.clone(),
        description: event.description.clone(),
        x: event.coordinates.x,
        y: event.coordinates.y,
        period_id: event.period.clone(),
        period_name: period.map(|period| period.name.clone()),
        period_color: period.map(|period| period.color.clone()),
        map_image: event.map_image.clone(),
    }
}
