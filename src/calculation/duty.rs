//! Import duty calculation functionality.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, LineItem};

/// The result of calculating duty for an item, including the audit step.
#[derive(Debug, Clone)]
pub struct DutyResult {
    /// Duty per unit.
    pub duty: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the per-unit import duty for a line item.
///
/// Duty is `unit_cost × tariff_rate`. It is already a per-unit figure and is
/// never divided by quantity.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::calculation::calculate_duty;
/// use landed_cost_engine::models::LineItem;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let item = LineItem {
///     unit_cost: Decimal::from(100),
///     tariff_rate: Decimal::from_str("0.1").unwrap(),
///     quantity: Decimal::from(5),
///     ..LineItem::default()
/// };
///
/// let result = calculate_duty(&item, 0, 1).unwrap();
/// assert_eq!(result.duty, Decimal::from(10));
/// ```
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the duty does not fit in a
/// `Decimal`.
pub fn calculate_duty(
    item: &LineItem,
    item_index: usize,
    step_number: u32,
) -> EngineResult<DutyResult> {
    let duty = item
        .unit_cost
        .checked_mul(item.tariff_rate)
        .ok_or_else(|| EngineError::overflow(format!("Duty for item {}", item_index)))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "import_duty".to_string(),
        rule_name: "Import Duty".to_string(),
        item_index: Some(item_index),
        input: serde_json::json!({
            "unit_cost": item.unit_cost.normalize().to_string(),
            "tariff_rate": item.tariff_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "duty": duty.normalize().to_string()
        }),
        reasoning: format!(
            "${} x {} = ${} duty per unit",
            item.unit_cost.normalize(),
            item.tariff_rate.normalize(),
            duty.normalize()
        ),
    };

    Ok(DutyResult { duty, audit_step })
}
