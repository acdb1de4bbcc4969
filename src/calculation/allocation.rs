//! Overhead allocation functionality.
//!
//! This module distributes the shipment's overhead pools across line items:
//! freight in proportion to each item's total weight, administrative costs in
//! proportion to each item's total acquisition cost.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, LineItem, OverheadShares, ShipmentTotals};

use super::overhead::OverheadPools;

/// The result of allocating overhead to one item, including the audit step.
#[derive(Debug, Clone)]
pub struct OverheadAllocationResult {
    /// The item's share of each pool, for its whole quantity.
    pub shares: OverheadShares,
    /// Sum of the weight-proportional shares.
    pub weight_share: Decimal,
    /// Sum of the value-proportional shares.
    pub value_share: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Allocates `amount` in proportion to `basis / total_basis`.
///
/// Returns zero when `total_basis` is zero, so a shipment with no weight (or
/// no value) allocates nothing instead of dividing by zero. Returns `None`
/// only when the share itself does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::calculation::allocate_proportionally;
/// use rust_decimal::Decimal;
///
/// let share = allocate_proportionally(Decimal::from(90), Decimal::from(1), Decimal::from(3));
/// assert_eq!(share, Some(Decimal::from(30)));
///
/// let none = allocate_proportionally(Decimal::from(90), Decimal::ZERO, Decimal::ZERO);
/// assert_eq!(none, Some(Decimal::ZERO));
/// ```
pub fn allocate_proportionally(
    amount: Decimal,
    basis: Decimal,
    total_basis: Decimal,
) -> Option<Decimal> {
    if total_basis.is_zero() {
        return Some(Decimal::ZERO);
    }
    // Multiply first to keep the quotient's precision for small bases; fall
    // back to the ratio when the intermediate product is out of range.
    amount
        .checked_mul(basis)
        .and_then(|product| product.checked_div(total_basis))
        .or_else(|| basis.checked_div(total_basis)?.checked_mul(amount))
}

/// Allocates the overhead pools to a single line item.
///
/// # Arguments
///
/// * `item` - The line item receiving the allocation
/// * `item_index` - The item's position in the shipment
/// * `pools` - The shipment-level overhead pools
/// * `totals` - The shipment's total weight and cost
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the item's totals or shares
/// do not fit in a `Decimal`.
pub fn allocate_overhead(
    item: &LineItem,
    item_index: usize,
    pools: &OverheadPools,
    totals: &ShipmentTotals,
    step_number: u32,
) -> EngineResult<OverheadAllocationResult> {
    let overflow = || EngineError::overflow(format!("Overhead allocation for item {}", item_index));

    let item_weight = item.total_weight().ok_or_else(overflow)?;
    let item_cost = item.total_cost().ok_or_else(overflow)?;

    let by_weight = |amount| {
        allocate_proportionally(amount, item_weight, totals.total_weight).ok_or_else(overflow)
    };
    let by_value = |amount| {
        allocate_proportionally(amount, item_cost, totals.total_cost).ok_or_else(overflow)
    };

    let shares = OverheadShares {
        weight_freight: by_weight(pools.weight_freight)?,
        origin_fleet: by_weight(pools.origin_fleet)?,
        local_fleet: by_weight(pools.local_fleet)?,
        bank_expenses: by_value(pools.bank_expenses)?,
        customs_agent: by_value(pools.customs_agent)?,
        import_procedure: by_value(pools.import_procedure)?,
        origin_taxes: by_value(pools.origin_taxes)?,
    };

    let weight_share = shares.weight_share().ok_or_else(overflow)?;
    let value_share = shares.value_share().ok_or_else(overflow)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "overhead_allocation".to_string(),
        rule_name: "Overhead Allocation".to_string(),
        item_index: Some(item_index),
        input: serde_json::json!({
            "item_weight": item_weight.normalize().to_string(),
            "total_weight": totals.total_weight.normalize().to_string(),
            "weight_pool": pools.weight_total.normalize().to_string(),
            "item_cost": item_cost.normalize().to_string(),
            "total_cost": totals.total_cost.normalize().to_string(),
            "value_pool": pools.value_total.normalize().to_string()
        }),
        output: serde_json::json!({
            "weight_share": weight_share.normalize().to_string(),
            "value_share": value_share.normalize().to_string()
        }),
        reasoning: format!(
            "Weight share: {} / {} of ${} = ${}; value share: ${} / ${} of ${} = ${}",
            item_weight.normalize(),
            totals.total_weight.normalize(),
            pools.weight_total.normalize(),
            weight_share.normalize(),
            item_cost.normalize(),
            totals.total_cost.normalize(),
            pools.value_total.normalize(),
            value_share.normalize()
        ),
    };

    Ok(OverheadAllocationResult {
        shares,
        weight_share,
        value_share,
        audit_step,
    })
}
