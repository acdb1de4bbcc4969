//! Shipment-level landed cost calculation.
//!
//! This module runs the full allocator/pricer over a shipment: totals,
//! overhead pools, and then allocation, duty, landed cost and sale price for
//! each item in order.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CostBreakdown, ImportationResult, LineItem, Shipment,
    ShipmentTotals, UnitPrice,
};

use super::allocation::allocate_overhead;
use super::duty::calculate_duty;
use super::landed_cost::calculate_landed_unit_cost;
use super::overhead::{OverheadPools, calculate_overhead_pools};
use super::sale_price::{SalePriceResult, calculate_sale_price};

/// Warning code for weight-proportional overhead with no weight to carry it.
pub const WEIGHT_OVERHEAD_UNALLOCATED: &str = "WEIGHT_OVERHEAD_UNALLOCATED";

/// Warning code for value-proportional overhead with no value to carry it.
pub const VALUE_OVERHEAD_UNALLOCATED: &str = "VALUE_OVERHEAD_UNALLOCATED";

/// Warning code for an item whose figures left the `Decimal` range.
pub const ARITHMETIC_OVERFLOW: &str = "ARITHMETIC_OVERFLOW";

/// Calculates landed unit prices and cost breakdowns for every item.
///
/// The shipment is only read. Outputs have the same length and order as
/// `shipment.items`. An empty item list yields empty outputs; zero total
/// weight or cost yields zero shares. Items with a margin of 1 or more, and
/// items whose own figures overflow, are reported individually and do not
/// affect the others.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`](crate::error::EngineError) when
/// a shipment-level figure (total weight, total cost, or an overhead pool)
/// does not fit in a `Decimal`. Every item depends on those figures.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::calculation::calculate_importation;
/// use landed_cost_engine::models::{LineItem, Shipment, ShipmentSettings};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let mut shipment = Shipment::new(ShipmentSettings {
///     bank_expenses: dec("10"),
///     customs_agent: dec("5"),
///     fleet_cost_per_weight_unit: dec("2"),
///     ..ShipmentSettings::default()
/// });
/// shipment.add_item(LineItem {
///     name: None,
///     quantity: dec("1"),
///     unit_weight: dec("1"),
///     unit_cost: dec("100"),
///     tariff_rate: dec("0.1"),
///     margin: dec("0.2"),
///     unit_price: Decimal::ZERO,
/// });
///
/// let result = calculate_importation(&shipment).unwrap();
/// assert_eq!(result.breakdowns[0].landed_unit_cost, Some(dec("127")));
/// assert_eq!(result.unit_prices[0].amount(), Some(dec("158.75")));
/// ```
pub fn calculate_importation(shipment: &Shipment) -> EngineResult<ImportationResult> {
    let totals = shipment.totals()?;
    let mut audit_steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    if shipment.items.is_empty() {
        debug!("Shipment has no items, nothing to allocate");
        return Ok(ImportationResult {
            totals,
            ..ImportationResult::default()
        });
    }

    audit_steps.push(totals_audit_step(&totals, next_step(&audit_steps)));

    let pools_result =
        calculate_overhead_pools(&shipment.settings, &totals, next_step(&audit_steps))?;
    let pools = pools_result.pools;
    audit_steps.push(pools_result.audit_step);

    warnings.extend(unallocated_overhead_warnings(&pools, &totals));

    let mut unit_prices = Vec::with_capacity(shipment.items.len());
    let mut breakdowns = Vec::with_capacity(shipment.items.len());

    for (index, item) in shipment.items.iter().enumerate() {
        let mut breakdown = CostBreakdown::for_item(item, index);
        let mut pricing = ItemPricing {
            item,
            index,
            pools: &pools,
            totals: &totals,
            audit_steps: &mut audit_steps,
        };

        let price = match pricing.run(&mut breakdown) {
            Ok((price, warning)) => {
                if let Some(warning) = warning {
                    warn!(
                        item_index = index,
                        margin = %item.margin,
                        "Item margin leaves sale price undefined"
                    );
                    warnings.push(warning);
                }
                breakdown.sale_price = price.amount();
                price
            }
            Err(failure) => {
                warn!(
                    item_index = index,
                    stage = failure.stage,
                    error = %failure.error,
                    "Item figures overflowed"
                );
                warnings.push(AuditWarning {
                    code: ARITHMETIC_OVERFLOW.to_string(),
                    message: format!("Item {} was not priced: {}", index, failure.error),
                    severity: "high".to_string(),
                });
                UnitPrice::Overflow {
                    stage: failure.stage.to_string(),
                }
            }
        };

        breakdowns.push(breakdown);
        unit_prices.push(price);
    }

    debug!(
        items = totals.item_count,
        total_weight = %totals.total_weight,
        total_cost = %totals.total_cost,
        weight_pool = %pools.weight_total,
        value_pool = %pools.value_total,
        warnings = warnings.len(),
        "Importation calculated"
    );

    Ok(ImportationResult {
        unit_prices,
        breakdowns,
        totals,
        audit_trace: AuditTrace {
            steps: audit_steps,
            warnings,
        },
    })
}

/// Number for the next step appended to `steps`.
fn next_step(steps: &[AuditStep]) -> u32 {
    steps.len() as u32 + 1
}

/// A per-item step that overflowed, with the rule id of the step.
struct ItemFailure {
    stage: &'static str,
    error: EngineError,
}

impl ItemFailure {
    fn at(stage: &'static str) -> impl FnOnce(EngineError) -> ItemFailure {
        move |error| ItemFailure { stage, error }
    }
}

/// Runs the four per-item steps against shared shipment figures.
struct ItemPricing<'a> {
    item: &'a LineItem,
    index: usize,
    pools: &'a OverheadPools,
    totals: &'a ShipmentTotals,
    audit_steps: &'a mut Vec<AuditStep>,
}

impl ItemPricing<'_> {
    /// Fills `breakdown` as each step succeeds and stops at the first overflow.
    fn run(
        &mut self,
        breakdown: &mut CostBreakdown,
    ) -> Result<(UnitPrice, Option<AuditWarning>), ItemFailure> {
        let allocation = allocate_overhead(
            self.item,
            self.index,
            self.pools,
            self.totals,
            next_step(self.audit_steps),
        )
        .map_err(ItemFailure::at("overhead_allocation"))?;
        self.audit_steps.push(allocation.audit_step);
        breakdown.overhead_shares = Some(allocation.shares);
        breakdown.weight_share = Some(allocation.weight_share);
        breakdown.value_share = Some(allocation.value_share);

        let duty = calculate_duty(self.item, self.index, next_step(self.audit_steps))
            .map_err(ItemFailure::at("import_duty"))?;
        self.audit_steps.push(duty.audit_step);
        breakdown.duty = Some(duty.duty);

        let landed = calculate_landed_unit_cost(
            self.item,
            self.index,
            duty.duty,
            &allocation.shares,
            next_step(self.audit_steps),
        )
        .map_err(ItemFailure::at("landed_unit_cost"))?;
        self.audit_steps.push(landed.audit_step);
        breakdown.overhead_per_unit = Some(landed.overhead_per_unit);
        breakdown.landed_unit_cost = Some(landed.landed_unit_cost);

        let SalePriceResult {
            price,
            audit_step,
            warning,
        } = calculate_sale_price(
            landed.landed_unit_cost,
            self.item.margin,
            self.index,
            next_step(self.audit_steps),
        )
        .map_err(ItemFailure::at("sale_price"))?;
        self.audit_steps.push(audit_step);

        Ok((price, warning))
    }
}

fn totals_audit_step(totals: &ShipmentTotals, step_number: u32) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "shipment_totals".to_string(),
        rule_name: "Shipment Totals".to_string(),
        item_index: None,
        input: serde_json::json!({
            "item_count": totals.item_count
        }),
        output: serde_json::json!({
            "total_weight": totals.total_weight.normalize().to_string(),
            "total_cost": totals.total_cost.normalize().to_string()
        }),
        reasoning: format!(
            "{} items weigh {} in total and cost ${}",
            totals.item_count,
            totals.total_weight.normalize(),
            totals.total_cost.normalize()
        ),
    }
}

/// Flags overhead that cannot be allocated because its basis total is zero.
fn unallocated_overhead_warnings(
    pools: &OverheadPools,
    totals: &ShipmentTotals,
) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    if totals.total_weight.is_zero() && pools.weight_total > Decimal::ZERO {
        warnings.push(AuditWarning {
            code: WEIGHT_OVERHEAD_UNALLOCATED.to_string(),
            message: format!(
                "Shipment has no weight; ${} of freight was not allocated",
                pools.weight_total.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    if totals.total_cost.is_zero() && pools.value_total > Decimal::ZERO {
        warnings.push(AuditWarning {
            code: VALUE_OVERHEAD_UNALLOCATED.to_string(),
            message: format!(
                "Shipment has no value; ${} of administrative costs was not allocated",
                pools.value_total.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::MARGIN_OUT_OF_RANGE;
    use crate::models::{LineItem, ShipmentSettings, UnitPrice};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn reference_settings() -> ShipmentSettings {
        ShipmentSettings {
            bank_expenses: dec("10"),
            customs_agent: dec("5"),
            fleet_cost_per_weight_unit: dec("2"),
            ..ShipmentSettings::default()
        }
    }

    fn create_item(name: &str, quantity: &str, weight: &str, cost: &str, margin: &str) -> LineItem {
        LineItem {
            name: Some(name.to_string()),
            quantity: dec(quantity),
            unit_weight: dec(weight),
            unit_cost: dec(cost),
            tariff_rate: dec("0.1"),
            margin: dec(margin),
            unit_price: dec("-1"),
        }
    }

    fn within_tolerance(actual: Decimal, expected: Decimal) -> bool {
        let tolerance = expected.abs() * dec("0.000000001") + dec("0.000000000001");
        (actual - expected).abs() <= tolerance
    }

    /// IM-001: reference single-item shipment
    #[test]
    fn test_reference_example() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("crate", "1", "1", "100", "0.2"));

        let result = calculate_importation(&shipment).unwrap();
        let breakdown = &result.breakdowns[0];

        assert_eq!(breakdown.weight_share, Some(dec("2")));
        assert_eq!(breakdown.value_share, Some(dec("15")));
        assert_eq!(breakdown.duty, Some(dec("10")));
        assert_eq!(breakdown.landed_unit_cost, Some(dec("127")));
        assert_eq!(breakdown.sale_price, Some(dec("158.75")));
        assert_eq!(
            result.unit_prices,
            vec![UnitPrice::Priced {
                amount: dec("158.75")
            }]
        );
    }

    /// IM-002: empty shipment yields empty outputs
    #[test]
    fn test_empty_shipment_yields_empty_outputs() {
        let shipment = Shipment::new(reference_settings());
        let result = calculate_importation(&shipment).unwrap();

        assert!(result.unit_prices.is_empty());
        assert!(result.breakdowns.is_empty());
        assert!(result.audit_trace.steps.is_empty());
        assert_eq!(result.totals.item_count, 0);
    }

    /// IM-003: shares of every pool sum to the pool
    #[test]
    fn test_overhead_is_conserved_across_items() {
        let mut shipment = Shipment::new(ShipmentSettings {
            bank_expenses: dec("17.31"),
            customs_agent: dec("250"),
            fleet_cost_per_weight_unit: dec("1.7"),
            import_procedure: dec("99.99"),
            local_fleet: dec("120"),
            origin_fleet: dec("310.5"),
            origin_taxes: dec("42"),
        });
        shipment.add_item(create_item("a", "3", "1.1", "7", "0.3"));
        shipment.add_item(create_item("b", "7", "0.35", "13.13", "0.25"));
        shipment.add_item(create_item("c", "11", "2.9", "3.01", "0.5"));

        let result = calculate_importation(&shipment).unwrap();
        let total_weight = dec("3") * dec("1.1") + dec("7") * dec("0.35") + dec("11") * dec("2.9");
        let weight_pool = dec("1.7") * total_weight + dec("120") + dec("310.5");
        let value_pool = dec("17.31") + dec("250") + dec("99.99") + dec("42");

        let weight_sum: Decimal = result.breakdowns.iter().filter_map(|b| b.weight_share).sum();
        let value_sum: Decimal = result.breakdowns.iter().filter_map(|b| b.value_share).sum();

        assert!(within_tolerance(weight_sum, weight_pool));
        assert!(within_tolerance(value_sum, value_pool));
    }

    /// IM-004: zero-weight items get zero weight shares
    #[test]
    fn test_zero_weight_items_get_zero_weight_share() {
        let mut shipment = Shipment::new(ShipmentSettings {
            origin_fleet: dec("100"),
            ..reference_settings()
        });
        shipment.add_item(create_item("a", "5", "0", "10", "0.2"));
        shipment.add_item(create_item("b", "0", "3", "10", "0.2"));

        let result = calculate_importation(&shipment).unwrap();

        assert!(result.breakdowns.iter().all(|b| b.weight_share == Some(Decimal::ZERO)));
        assert!(
            result
                .audit_trace
                .warnings
                .iter()
                .any(|w| w.code == WEIGHT_OVERHEAD_UNALLOCATED)
        );
    }

    /// IM-005: invalid margin is scoped to its item
    #[test]
    fn test_invalid_margin_is_scoped_to_item() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("a", "1", "1", "100", "0.2"));
        shipment.add_item(create_item("b", "1", "1", "100", "1"));
        shipment.add_item(create_item("c", "1", "1", "100", "0"));

        let result = calculate_importation(&shipment).unwrap();

        assert!(result.unit_prices[0].is_priced());
        assert_eq!(
            result.unit_prices[1],
            UnitPrice::InvalidMargin { margin: dec("1") }
        );
        assert!(result.unit_prices[2].is_priced());
        assert_eq!(result.breakdowns[1].sale_price, None);
        assert!(result.breakdowns[1].landed_unit_cost > Some(Decimal::ZERO));
        assert_eq!(result.unpriced_items(), vec![1]);
        assert_eq!(
            result
                .audit_trace
                .warnings
                .iter()
                .filter(|w| w.code == MARGIN_OUT_OF_RANGE)
                .count(),
            1
        );
    }

    /// IM-006: output order follows input order
    #[test]
    fn test_output_order_follows_items() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("first", "1", "1", "10", "0.1"));
        shipment.add_item(create_item("second", "2", "2", "20", "0.2"));
        shipment.add_item(create_item("third", "3", "3", "30", "0.3"));

        let result = calculate_importation(&shipment).unwrap();
        let names: Vec<_> = result
            .breakdowns
            .iter()
            .map(|b| b.name.as_deref().unwrap())
            .collect();

        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(result.unit_prices.len(), 3);
        for (index, breakdown) in result.breakdowns.iter().enumerate() {
            assert_eq!(breakdown.item_index, index);
            assert_eq!(breakdown.sale_price, result.unit_prices[index].amount());
        }
    }

    /// IM-007: input shipment is not modified
    #[test]
    fn test_input_is_not_modified() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("a", "1", "1", "100", "0.2"));
        let before = shipment.clone();

        let _ = calculate_importation(&shipment).unwrap();

        assert_eq!(shipment, before);
    }

    #[test]
    fn test_audit_trace_has_four_steps_per_item() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("a", "1", "1", "100", "0.2"));
        shipment.add_item(create_item("b", "2", "1", "50", "0.2"));

        let result = calculate_importation(&shipment).unwrap();
        let steps = &result.audit_trace.steps;

        assert_eq!(steps.len(), 2 + 4 * 2);
        assert_eq!(steps[0].rule_id, "shipment_totals");
        assert_eq!(steps[1].rule_id, "overhead_pools");
        assert_eq!(steps[2].rule_id, "overhead_allocation");
        assert_eq!(steps[5].rule_id, "sale_price");
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
    }

    #[test]
    fn test_zero_value_shipment_warns_about_admin_costs() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("free sample", "2", "1", "0", "0"));

        let result = calculate_importation(&shipment).unwrap();

        assert_eq!(result.breakdowns[0].value_share, Some(Decimal::ZERO));
        assert!(
            result
                .audit_trace
                .warnings
                .iter()
                .any(|w| w.code == VALUE_OVERHEAD_UNALLOCATED)
        );
    }

    /// IM-008: an item whose sale price overflows is reported on its own
    #[test]
    fn test_margin_just_below_one_overflows_single_item() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("a", "1", "1", "100", "0.2"));
        shipment.add_item(create_item("b", "1", "0", "100000000", "0.9999999999999999999999"));
        shipment.add_item(create_item("c", "2", "1", "50", "0.1"));

        let result = calculate_importation(&shipment).unwrap();

        assert!(result.unit_prices[0].is_priced());
        assert_eq!(
            result.unit_prices[1],
            UnitPrice::Overflow {
                stage: "sale_price".to_string()
            }
        );
        assert!(result.unit_prices[2].is_priced());
        assert_eq!(result.unpriced_items(), vec![1]);

        let overflowed = &result.breakdowns[1];
        assert!(overflowed.landed_unit_cost.is_some());
        assert_eq!(overflowed.sale_price, None);

        let warning = result
            .audit_trace
            .warnings
            .iter()
            .find(|w| w.code == ARITHMETIC_OVERFLOW)
            .unwrap();
        assert_eq!(warning.severity, "high");
        assert!(warning.message.starts_with("Item 1 was not priced"));
    }

    /// IM-009: duty overflow stops the item before its landed cost
    #[test]
    fn test_duty_overflow_leaves_partial_breakdown() {
        let mut shipment = Shipment::new(ShipmentSettings::default());
        let mut huge = create_item("huge", "1", "0", "0", "0.2");
        huge.unit_cost = Decimal::MAX;
        huge.tariff_rate = dec("2");
        shipment.add_item(create_item("small", "1", "1", "0", "0.2"));
        shipment.add_item(huge);

        let result = calculate_importation(&shipment).unwrap();

        assert!(result.unit_prices[0].is_priced());
        assert_eq!(
            result.unit_prices[1],
            UnitPrice::Overflow {
                stage: "import_duty".to_string()
            }
        );
        let breakdown = &result.breakdowns[1];
        assert_eq!(breakdown.unit_cost, Decimal::MAX);
        assert!(breakdown.overhead_shares.is_some());
        assert_eq!(breakdown.duty, None);
        assert_eq!(breakdown.landed_unit_cost, None);
        assert_eq!(breakdown.sale_price, None);
    }

    /// IM-010: shipment-wide freight overflow fails the whole calculation
    #[test]
    fn test_weight_freight_overflow_is_a_calculation_error() {
        let mut shipment = Shipment::new(ShipmentSettings {
            fleet_cost_per_weight_unit: dec("1000"),
            ..ShipmentSettings::default()
        });
        shipment.add_item(create_item("a", "1", "1", "10", "0.2"));
        let mut heavy = create_item("bulk", "1", "1", "1", "0.2");
        heavy.quantity = Decimal::from(100_000_000_000_000i64);
        heavy.unit_weight = Decimal::from(1_000_000_000_000i64);
        shipment.add_item(heavy);

        let err = calculate_importation(&shipment).unwrap_err();

        assert!(matches!(err, EngineError::CalculationError { .. }));
        assert!(err.to_string().contains("Weight freight"));
    }

    #[test]
    fn test_step_numbers_stay_sequential_after_item_overflow() {
        let mut shipment = Shipment::new(reference_settings());
        shipment.add_item(create_item("big", "1", "0", "100000000", "0.9999999999999999999999"));
        shipment.add_item(create_item("b", "1", "1", "10", "0.2"));

        let result = calculate_importation(&shipment).unwrap();
        let steps = &result.audit_trace.steps;

        assert_eq!(steps.len(), 2 + 3 + 4);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
    }
}
