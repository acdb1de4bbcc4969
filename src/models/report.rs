//! Report models.
//!
//! A [`Report`] is a chart-agnostic collection of named numeric series that
//! share one category axis.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One named series of values, aligned with the report's categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSeries {
    /// The series name (e.g. "Landed cost").
    pub name: String,
    /// One value per category; `None` marks a value that does not exist.
    pub data: Vec<Option<Decimal>>,
}

/// A labeled-series report derived from cost breakdowns.
///
/// # Example
///
/// ```
/// use landed_cost_engine::models::Report;
///
/// let report = Report::default();
/// assert!(report.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The shared category axis.
    pub categories: Vec<String>,
    /// The series plotted against the categories.
    pub series: Vec<ReportSeries>,
}

impl Report {
    /// Returns true if the report has no categories and no series.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.series.is_empty()
    }

    /// Looks up a series by name.
    pub fn series(&self, name: &str) -> Option<&ReportSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}
