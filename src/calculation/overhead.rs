//! Overhead pool calculation functionality.
//!
//! This module groups the seven shared shipment costs into the two pools the
//! allocator distributes: freight that scales with physical weight, and
//! administrative costs that scale with shipment value.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ShipmentSettings, ShipmentTotals};

/// Shipment-level amounts of each shared cost, ready for allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverheadPools {
    /// `fleet_cost_per_weight_unit × total_weight`.
    pub weight_freight: Decimal,
    /// Freight to the port of departure.
    pub origin_fleet: Decimal,
    /// Freight from the port of entry.
    pub local_fleet: Decimal,
    /// Bank charges.
    pub bank_expenses: Decimal,
    /// Customs broker fee.
    pub customs_agent: Decimal,
    /// Import procedure cost.
    pub import_procedure: Decimal,
    /// Taxes paid at origin.
    pub origin_taxes: Decimal,
    /// Total overhead allocated in proportion to weight.
    pub weight_total: Decimal,
    /// Total overhead allocated in proportion to acquisition cost.
    pub value_total: Decimal,
}

/// The result of building the overhead pools, including the audit step.
#[derive(Debug, Clone)]
pub struct OverheadPoolsResult {
    /// The pools to allocate.
    pub pools: OverheadPools,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Builds the weight- and value-proportional overhead pools for a shipment.
///
/// The per-weight freight rate is multiplied by the shipment's total weight;
/// every other setting is a flat shipment-level amount.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::calculation::calculate_overhead_pools;
/// use landed_cost_engine::models::{ShipmentSettings, ShipmentTotals};
/// use rust_decimal::Decimal;
///
/// let settings = ShipmentSettings {
///     bank_expenses: Decimal::from(10),
///     customs_agent: Decimal::from(5),
///     fleet_cost_per_weight_unit: Decimal::from(2),
///     ..ShipmentSettings::default()
/// };
/// let totals = ShipmentTotals {
///     item_count: 1,
///     total_weight: Decimal::ONE,
///     total_cost: Decimal::from(100),
/// };
///
/// let result = calculate_overhead_pools(&settings, &totals, 1).unwrap();
/// assert_eq!(result.pools.weight_total, Decimal::from(2));
/// assert_eq!(result.pools.value_total, Decimal::from(15));
/// ```
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the weight freight or either
/// pool total does not fit in a `Decimal`. The pools are shared by every
/// item, so no item can be priced without them.
pub fn calculate_overhead_pools(
    settings: &ShipmentSettings,
    totals: &ShipmentTotals,
    step_number: u32,
) -> EngineResult<OverheadPoolsResult> {
    let weight_freight = settings
        .fleet_cost_per_weight_unit
        .checked_mul(totals.total_weight)
        .ok_or_else(|| EngineError::overflow("Weight freight"))?;
    let weight_total = settings
        .fixed_freight_total()
        .and_then(|fixed| fixed.checked_add(weight_freight))
        .ok_or_else(|| EngineError::overflow("Weight pool"))?;
    let value_total = settings
        .value_proportional_total()
        .ok_or_else(|| EngineError::overflow("Value pool"))?;

    let pools = OverheadPools {
        weight_freight,
        origin_fleet: settings.origin_fleet,
        local_fleet: settings.local_fleet,
        bank_expenses: settings.bank_expenses,
        customs_agent: settings.customs_agent,
        import_procedure: settings.import_procedure,
        origin_taxes: settings.origin_taxes,
        weight_total,
        value_total,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "overhead_pools".to_string(),
        rule_name: "Overhead Pools".to_string(),
        item_index: None,
        input: serde_json::json!({
            "fleet_cost_per_weight_unit": settings.fleet_cost_per_weight_unit.normalize().to_string(),
            "total_weight": totals.total_weight.normalize().to_string(),
            "origin_fleet": settings.origin_fleet.normalize().to_string(),
            "local_fleet": settings.local_fleet.normalize().to_string(),
            "bank_expenses": settings.bank_expenses.normalize().to_string(),
            "customs_agent": settings.customs_agent.normalize().to_string(),
            "import_procedure": settings.import_procedure.normalize().to_string(),
            "origin_taxes": settings.origin_taxes.normalize().to_string()
        }),
        output: serde_json::json!({
            "weight_freight": pools.weight_freight.normalize().to_string(),
            "weight_total": weight_total.normalize().to_string(),
            "value_total": value_total.normalize().to_string()
        }),
        reasoning: format!(
            "Weight pool: ${} x {} + ${} + ${} = ${}; value pool: ${} + ${} + ${} + ${} = ${}",
            settings.fleet_cost_per_weight_unit.normalize(),
            totals.total_weight.normalize(),
            settings.origin_fleet.normalize(),
            settings.local_fleet.normalize(),
            weight_total.normalize(),
            settings.bank_expenses.normalize(),
            settings.customs_agent.normalize(),
            settings.import_procedure.normalize(),
            settings.origin_taxes.normalize(),
            value_total.normalize()
        ),
    };

    Ok(OverheadPoolsResult { pools, audit_step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_settings() -> ShipmentSettings {
        ShipmentSettings {
            bank_expenses: dec("10"),
            customs_agent: dec("5"),
            fleet_cost_per_weight_unit: dec("2"),
            import_procedure: dec("7.5"),
            local_fleet: dec("30"),
            origin_fleet: dec("45"),
            origin_taxes: dec("2.5"),
        }
    }

    fn totals(weight: &str, cost: &str) -> ShipmentTotals {
        ShipmentTotals {
            item_count: 2,
            total_weight: dec(weight),
            total_cost: dec(cost),
        }
    }

    /// OP-001: freight scales with total weight
    #[test]
    fn test_weight_freight_scales_with_total_weight() {
        let result = calculate_overhead_pools(&create_settings(), &totals("12.5", "100"), 1).unwrap();

        assert_eq!(result.pools.weight_freight, dec("25"));
        assert_eq!(result.pools.weight_total, dec("100"));
    }

    /// OP-002: value pool sums administrative costs
    #[test]
    fn test_value_pool_sums_administrative_costs() {
        let result = calculate_overhead_pools(&create_settings(), &totals("12.5", "100"), 1).unwrap();

        assert_eq!(result.pools.value_total, dec("25"));
    }

    /// OP-003: zero weight leaves only fixed freight in the weight pool
    #[test]
    fn test_zero_weight_leaves_fixed_freight() {
        let result = calculate_overhead_pools(&create_settings(), &totals("0", "0"), 1).unwrap();

        assert_eq!(result.pools.weight_freight, Decimal::ZERO);
        assert_eq!(result.pools.weight_total, dec("75"));
    }

    /// OP-004: freight too large for a Decimal is an error, not a panic
    #[test]
    fn test_weight_freight_overflow_is_an_error() {
        let settings = ShipmentSettings {
            fleet_cost_per_weight_unit: dec("1000"),
            ..ShipmentSettings::default()
        };
        // 1e14 units x 1e12 weight
        let heavy = totals("100000000000000000000000000", "1");

        match calculate_overhead_pools(&settings, &heavy, 1) {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("Weight freight"));
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_value_pool_overflow_is_an_error() {
        let settings = ShipmentSettings {
            bank_expenses: Decimal::MAX,
            origin_taxes: Decimal::MAX,
            ..ShipmentSettings::default()
        };

        assert!(matches!(
            calculate_overhead_pools(&settings, &totals("1", "1"), 1),
            Err(EngineError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_audit_step_records_pools() {
        let result = calculate_overhead_pools(&create_settings(), &totals("12.5", "100"), 2).unwrap();

        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_id, "overhead_pools");
        assert_eq!(result.audit_step.item_index, None);
        assert_eq!(
            result.audit_step.output["weight_total"].as_str().unwrap(),
            "100"
        );
        assert_eq!(
            result.audit_step.output["value_total"].as_str().unwrap(),
            "25"
        );
        assert!(result.audit_step.reasoning.contains("$2 x 12.5"));
    }
}
