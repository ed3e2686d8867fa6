//! Reference data model for periods, grades and map events.
//!
//! # Responsibility
//! - Define the canonical records shared by every view of the atlas.
//! - Validate record-local invariants (coordinates, id shape) at the edge.
//!
//! # Invariants
//! - Record identity (`id` / `grade`) never changes after load.
//! - Only `Event::map_image` may change at runtime.
//!
//! # See also
//! - crate::catalog for cross-table reference checks.

pub mod event;
pub mod grade;
pub mod period;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-local validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Coordinate axis outside `[0, 100]` or not finite.
    CoordinateOutOfRange { axis: char, value: f64 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoordinateOutOfRange { axis, value } => write!(
                f,
                "coordinate {axis} ({value}) must be within [0, 100]"
            ),
        }
    }
}

impl Error for ModelValidationError {}
