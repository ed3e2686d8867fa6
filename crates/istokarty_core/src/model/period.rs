//! Historical period record.

use serde::{Deserialize, Serialize};

/// Stable string key of a period (`ancient`, `medieval`, ...).
pub type PeriodId = String;

/// One named historical era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    /// Display label.
    pub name: String,
    /// Display range, e.g. `V-XV вв.`.
    pub years: String,
    /// Opaque display tag used by the UI for period styling.
    pub color: String,
    pub description: String,
    /// Optional overview map image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_image: Option<String>,
}
