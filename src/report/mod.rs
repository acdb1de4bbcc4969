//! Report building for the Landed Cost Engine.
//!
//! This module reshapes per-item cost breakdowns into a chart-agnostic
//! labeled-series [`Report`](crate::models::Report).

mod builder;

pub use builder::{
    SERIES_DUTY, SERIES_LANDED_COST, SERIES_OVERHEAD, SERIES_SALE_PRICE, SERIES_UNIT_COST,
    build_report,
};
