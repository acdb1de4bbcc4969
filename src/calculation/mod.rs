//! Calculation logic for the Landed Cost Engine.
//!
//! This module contains the allocator/pricer: grouping shared shipment costs
//! into weight- and value-proportional pools, allocating those pools across
//! line items, applying import duty, computing landed unit costs, and
//! inverting the target margin into a sale price.

mod allocation;
mod duty;
mod importation;
mod landed_cost;
mod overhead;
mod sale_price;

pub use allocation::{OverheadAllocationResult, allocate_overhead, allocate_proportionally};
pub use duty::{DutyResult, calculate_duty};
pub use importation::{
    ARITHMETIC_OVERFLOW, VALUE_OVERHEAD_UNALLOCATED, WEIGHT_OVERHEAD_UNALLOCATED,
    calculate_importation,
};
pub use landed_cost::{LandedCostResult, calculate_landed_unit_cost};
pub use overhead::{OverheadPools, OverheadPoolsResult, calculate_overhead_pools};
pub use sale_price::{MARGIN_OUT_OF_RANGE, SalePriceResult, calculate_sale_price};
