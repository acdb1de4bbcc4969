//! Sale price calculation functionality.
//!
//! This module inverts the target margin to turn a landed unit cost into a
//! sale price: `price = landed / (1 - margin)`.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, UnitPrice};

/// Warning code for items whose margin leaves the sale price undefined.
pub const MARGIN_OUT_OF_RANGE: &str = "MARGIN_OUT_OF_RANGE";

/// The result of pricing an item, including the audit step.
#[derive(Debug, Clone)]
pub struct SalePriceResult {
    /// The priced outcome, or the invalid margin.
    pub price: UnitPrice,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// A warning raised when the margin is 1 or more.
    pub warning: Option<AuditWarning>,
}

/// Calculates the sale price that yields `margin` on `landed_unit_cost`.
///
/// A margin of 1 or more makes the divisor zero or negative. That item is
/// reported as [`UnitPrice::InvalidMargin`] with a warning; the caller keeps
/// pricing the remaining items.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::calculation::calculate_sale_price;
/// use landed_cost_engine::models::UnitPrice;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let margin = Decimal::from_str("0.2").unwrap();
/// let result = calculate_sale_price(Decimal::from(127), margin, 0, 1).unwrap();
/// assert_eq!(result.price, UnitPrice::Priced { amount: Decimal::from_str("158.75").unwrap() });
///
/// let result = calculate_sale_price(Decimal::from(127), Decimal::ONE, 0, 1).unwrap();
/// assert_eq!(result.price, UnitPrice::InvalidMargin { margin: Decimal::ONE });
/// assert!(result.warning.is_some());
/// ```
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the price does not fit in a
/// `Decimal`, which happens when the margin is just below 1.
pub fn calculate_sale_price(
    landed_unit_cost: Decimal,
    margin: Decimal,
    item_index: usize,
    step_number: u32,
) -> EngineResult<SalePriceResult> {
    let input = serde_json::json!({
        "landed_unit_cost": landed_unit_cost.normalize().to_string(),
        "margin": margin.normalize().to_string()
    });

    if margin >= Decimal::ONE {
        let audit_step = AuditStep {
            step_number,
            rule_id: "sale_price".to_string(),
            rule_name: "Sale Price".to_string(),
            item_index: Some(item_index),
            input,
            output: serde_json::json!({
                "priced": false
            }),
            reasoning: format!(
                "Margin {} is not below 1 - sale price is undefined",
                margin.normalize()
            ),
        };

        let warning = AuditWarning {
            code: MARGIN_OUT_OF_RANGE.to_string(),
            message: format!(
                "Item {} has margin {}; no sale price can be computed",
                item_index,
                margin.normalize()
            ),
            severity: "high".to_string(),
        };

        return Ok(SalePriceResult {
            price: UnitPrice::InvalidMargin { margin },
            audit_step,
            warning: Some(warning),
        });
    }

    let amount = Decimal::ONE
        .checked_sub(margin)
        .and_then(|divisor| landed_unit_cost.checked_div(divisor))
        .ok_or_else(|| EngineError::overflow(format!("Sale price for item {}", item_index)))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "sale_price".to_string(),
        rule_name: "Sale Price".to_string(),
        item_index: Some(item_index),
        input,
        output: serde_json::json!({
            "priced": true,
            "sale_price": amount.normalize().to_string()
        }),
        reasoning: format!(
            "${} / (1 - {}) = ${}",
            landed_unit_cost.normalize(),
            margin.normalize(),
            amount.normalize()
        ),
    };

    Ok(SalePriceResult {
        price: UnitPrice::Priced { amount },
        audit_step,
        warning: None,
    })
}
