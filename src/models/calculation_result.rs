//! Calculation result models for the Landed Cost Engine.
//!
//! This module contains the [`ImportationResult`] type and its associated
//! structures that capture all outputs from a landed cost calculation,
//! including per-item prices, cost breakdowns, shipment totals and the audit
//! trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::LineItem;
use super::line_item::item_label;

/// The computed sale price for one line item.
///
/// An item whose margin is 1 or more has no representable sale price; it is
/// reported as [`UnitPrice::InvalidMargin`] rather than clamped. An item whose
/// figures grow past the `Decimal` range is reported as
/// [`UnitPrice::Overflow`]. Neither affects the other items.
///
/// # Example
///
/// ```
/// use landed_cost_engine::models::UnitPrice;
/// use rust_decimal::Decimal;
///
/// let price = UnitPrice::Priced { amount: Decimal::from(42) };
/// assert_eq!(price.amount(), Some(Decimal::from(42)));
///
/// let invalid = UnitPrice::InvalidMargin { margin: Decimal::ONE };
/// assert_eq!(invalid.amount(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitPrice {
    /// A sale price was computed.
    Priced {
        /// The sale price per unit.
        amount: Decimal,
    },
    /// The margin is 1 or more, so no sale price exists.
    InvalidMargin {
        /// The offending margin.
        margin: Decimal,
    },
    /// A step for this item produced a value outside the `Decimal` range.
    Overflow {
        /// Rule id of the step that overflowed (e.g. `sale_price`).
        stage: String,
    },
}

impl UnitPrice {
    /// Returns the sale price, if one was computed.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            UnitPrice::Priced { amount } => Some(*amount),
            UnitPrice::InvalidMargin { .. } | UnitPrice::Overflow { .. } => None,
        }
    }

    /// Returns true if a sale price was computed.
    pub fn is_priced(&self) -> bool {
        matches!(self, UnitPrice::Priced { .. })
    }
}

/// An item's allocated share of each shared shipment cost.
///
/// Shares are totals for the item's whole quantity, not per-unit figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverheadShares {
    /// Share of `fleet_cost_per_weight_unit × total_weight`.
    pub weight_freight: Decimal,
    /// Share of `origin_fleet`.
    pub origin_fleet: Decimal,
    /// Share of `local_fleet`.
    pub local_fleet: Decimal,
    /// Share of `bank_expenses`.
    pub bank_expenses: Decimal,
    /// Share of `customs_agent`.
    pub customs_agent: Decimal,
    /// Share of `import_procedure`.
    pub import_procedure: Decimal,
    /// Share of `origin_taxes`.
    pub origin_taxes: Decimal,
}

impl OverheadShares {
    /// Sum of the weight-proportional shares, `None` on overflow.
    pub fn weight_share(&self) -> Option<Decimal> {
        self.weight_freight
            .checked_add(self.origin_fleet)?
            .checked_add(self.local_fleet)
    }

    /// Sum of the value-proportional shares, `None` on overflow.
    pub fn value_share(&self) -> Option<Decimal> {
        self.bank_expenses
            .checked_add(self.customs_agent)?
            .checked_add(self.import_procedure)?
            .checked_add(self.origin_taxes)
    }

    /// Sum of every share, `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.weight_share()?.checked_add(self.value_share()?)
    }
}

/// The derived cost breakdown for a single line item.
///
/// Recomputed on every calculation and never persisted on its own. Derived
/// figures are filled step by step; when a step overflows, it and every later
/// figure are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Position of the item in the shipment.
    pub item_index: usize,
    /// The item's optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of units imported.
    pub quantity: Decimal,
    /// Acquisition cost per unit.
    pub unit_cost: Decimal,
    /// Target margin used for pricing.
    pub margin: Decimal,
    /// Allocated share of each shared cost, for the whole quantity.
    pub overhead_shares: Option<OverheadShares>,
    /// Sum of the weight-proportional shares.
    pub weight_share: Option<Decimal>,
    /// Sum of the value-proportional shares.
    pub value_share: Option<Decimal>,
    /// Duty per unit (`unit_cost × tariff_rate`).
    pub duty: Option<Decimal>,
    /// Allocated overhead per unit (zero when quantity is zero).
    pub overhead_per_unit: Option<Decimal>,
    /// Landed cost per unit (`unit_cost + duty + overhead_per_unit`).
    pub landed_unit_cost: Option<Decimal>,
    /// Sale price per unit, `None` when the margin is 1 or more.
    pub sale_price: Option<Decimal>,
}

impl CostBreakdown {
    /// Starts a breakdown for `item` with no derived figures yet.
    pub fn for_item(item: &LineItem, item_index: usize) -> Self {
        Self {
            item_index,
            name: item.name.clone(),
            quantity: item.quantity,
            unit_cost: item.unit_cost,
            margin: item.margin,
            overhead_shares: None,
            weight_share: None,
            value_share: None,
            duty: None,
            overhead_per_unit: None,
            landed_unit_cost: None,
            sale_price: None,
        }
    }

    /// Returns the category label for this breakdown.
    pub fn label(&self) -> String {
        item_label(self.name.as_deref(), self.item_index)
    }
}

/// Aggregate figures for a shipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentTotals {
    /// Number of line items.
    pub item_count: usize,
    /// `Σ unit_weight × quantity`.
    pub total_weight: Decimal,
    /// `Σ unit_cost × quantity`.
    pub total_cost: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The item the step applies to, `None` for shipment-level steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a landed cost calculation.
///
/// `unit_prices` and `breakdowns` have the same length and order as the
/// shipment's items; position is the row identity callers use to merge
/// prices back into the item list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportationResult {
    /// One price outcome per item, in item order.
    pub unit_prices: Vec<UnitPrice>,
    /// One cost breakdown per item, in item order.
    pub breakdowns: Vec<CostBreakdown>,
    /// Aggregate shipment weight and cost.
    pub totals: ShipmentTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl ImportationResult {
    /// Returns the indices of items left without a sale price.
    pub fn unpriced_items(&self) -> Vec<usize> {
        self.unit_prices
            .iter()
            .enumerate()
            .filter(|(_, price)| !price.is_priced())
            .map(|(index, _)| index)
            .collect()
    }

    /// Extracts plain sale prices, failing on the first unpriced item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMargin`] naming the first item whose
    /// margin is 1 or more, or [`EngineError::CalculationError`] for an item
    /// that overflowed.
    pub fn into_prices(self) -> EngineResult<Vec<Decimal>> {
        self.unit_prices
            .into_iter()
            .enumerate()
            .map(|(item_index, price)| match price {
                UnitPrice::Priced { amount } => Ok(amount),
                UnitPrice::InvalidMargin { margin } => {
                    Err(EngineError::InvalidMargin { item_index, margin })
                }
                UnitPrice::Overflow { stage } => Err(EngineError::overflow(format!(
                    "Item {} {}",
                    item_index, stage
                ))),
            })
            .collect()
    }
}
