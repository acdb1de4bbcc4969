//! Landed unit cost calculation functionality.
//!
//! The landed cost of one unit is its acquisition cost plus duty plus its
//! slice of the overhead allocated to the item.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, LineItem, OverheadShares};

/// The result of calculating a landed unit cost, including the audit step.
#[derive(Debug, Clone)]
pub struct LandedCostResult {
    /// Allocated overhead per unit.
    pub overhead_per_unit: Decimal,
    /// Landed cost per unit.
    pub landed_unit_cost: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the landed cost of one unit of a line item.
///
/// The allocated shares are totals for the item's whole quantity, so they are
/// divided by quantity to give a per-unit figure. An item with zero quantity
/// has no allocation and lands at `unit_cost + duty`.
///
/// # Arguments
///
/// * `item` - The line item
/// * `item_index` - The item's position in the shipment
/// * `duty` - Duty per unit
/// * `shares` - The item's allocated overhead shares
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use landed_cost_engine::calculation::calculate_landed_unit_cost;
/// use landed_cost_engine::models::{LineItem, OverheadShares};
/// use rust_decimal::Decimal;
///
/// let item = LineItem {
///     quantity: Decimal::from(2),
///     unit_cost: Decimal::from(100),
///     ..LineItem::default()
/// };
/// let shares = OverheadShares {
///     origin_fleet: Decimal::from(30),
///     bank_expenses: Decimal::from(10),
///     ..OverheadShares::default()
/// };
///
/// let result = calculate_landed_unit_cost(&item, 0, Decimal::from(10), &shares, 1).unwrap();
/// assert_eq!(result.overhead_per_unit, Decimal::from(20));
/// assert_eq!(result.landed_unit_cost, Decimal::from(130));
/// ```
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the per-unit overhead or the
/// landed cost does not fit in a `Decimal`. A tiny fractional quantity can
/// push the per-unit overhead out of range.
pub fn calculate_landed_unit_cost(
    item: &LineItem,
    item_index: usize,
    duty: Decimal,
    shares: &OverheadShares,
    step_number: u32,
) -> EngineResult<LandedCostResult> {
    let overflow = || EngineError::overflow(format!("Landed cost for item {}", item_index));

    let allocated = shares.total().ok_or_else(overflow)?;
    let overhead_per_unit = if item.quantity.is_zero() {
        Decimal::ZERO
    } else {
        allocated.checked_div(item.quantity).ok_or_else(overflow)?
    };
    let landed_unit_cost = item
        .unit_cost
        .checked_add(duty)
        .and_then(|cost| cost.checked_add(overhead_per_unit))
        .ok_or_else(overflow)?;

    let reasoning = if item.quantity.is_zero() {
        format!(
            "${} + ${} duty = ${} (zero quantity, no overhead allocated)",
            item.unit_cost.normalize(),
            duty.normalize(),
            landed_unit_cost.normalize()
        )
    } else {
        format!(
            "${} + ${} duty + ${} / {} overhead = ${}",
            item.unit_cost.normalize(),
            duty.normalize(),
            allocated.normalize(),
            item.quantity.normalize(),
            landed_unit_cost.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "landed_unit_cost".to_string(),
        rule_name: "Landed Unit Cost".to_string(),
        item_index: Some(item_index),
        input: serde_json::json!({
            "unit_cost": item.unit_cost.normalize().to_string(),
            "duty": duty.normalize().to_string(),
            "allocated_overhead": allocated.normalize().to_string(),
            "quantity": item.quantity.normalize().to_string()
        }),
        output: serde_json::json!({
            "overhead_per_unit": overhead_per_unit.normalize().to_string(),
            "landed_unit_cost": landed_unit_cost.normalize().to_string()
        }),
        reasoning,
    };

    Ok(LandedCostResult {
        overhead_per_unit,
        landed_unit_cost,
        audit_step,
    })
}
