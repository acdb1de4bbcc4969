//! Report builder.

use rust_decimal::Decimal;

use crate::models::{CostBreakdown, Report, ReportSeries};

/// Name of the acquisition cost series.
pub const SERIES_UNIT_COST: &str = "Unit cost";
/// Name of the per-unit duty series.
pub const SERIES_DUTY: &str = "Duty";
/// Name of the per-unit allocated overhead series.
pub const SERIES_OVERHEAD: &str = "Overhead";
/// Name of the landed unit cost series.
pub const SERIES_LANDED_COST: &str = "Landed cost";
/// Name of the sale price series.
pub const SERIES_SALE_PRICE: &str = "Sale price";

/// Builds a labeled-series report from cost breakdowns.
///
/// Categories are the item labels: the item's name when present and not
/// blank, otherwise `Item {n}` for the item's 1-based position. Every series
/// is per unit and aligned with the categories. Values are copied as-is; the
/// sale price of an item with an invalid margin is `None`, and an item that
/// overflowed leaves `None` from the failed figure onwards.
///
/// An empty slice yields an empty report with no categories and no series.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::report::build_report;
///
/// let report = build_report(&[]);
/// assert!(report.categories.is_empty());
/// assert!(report.series.is_empty());
/// ```
pub fn build_report(breakdowns: &[CostBreakdown]) -> Report {
    if breakdowns.is_empty() {
        return Report::default();
    }

    let categories = breakdowns.iter().map(CostBreakdown::label).collect();

    let series = vec![
        series(SERIES_UNIT_COST, breakdowns, |b| Some(b.unit_cost)),
        series(SERIES_DUTY, breakdowns, |b| b.duty),
        series(SERIES_OVERHEAD, breakdowns, |b| b.overhead_per_unit),
        series(SERIES_LANDED_COST, breakdowns, |b| b.landed_unit_cost),
        series(SERIES_SALE_PRICE, breakdowns, |b| b.sale_price),
    ];

    Report { categories, series }
}

fn series<F>(name: &str, breakdowns: &[CostBreakdown], value: F) -> ReportSeries
where
    F: Fn(&CostBreakdown) -> Option<Decimal>,
{
    ReportSeries {
        name: name.to_string(),
        data: breakdowns.iter().map(value).collect(),
    }
}
