//! Shared query parameter structs for API handlers.
//!
//! List endpoints take the calendar filter
//! [`DateRangeFilter`](haccp_core::date_range::DateRangeFilter)
//! (`?year=&month=&day=`) directly.

use serde::Deserialize;

/// Query parameters for the daily status endpoints.
///
/// Both bounds are optional; see
/// [`flexible_range`](haccp_core::date_range::flexible_range) for the
/// defaults applied when one or both are absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
