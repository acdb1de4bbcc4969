//! Shipment settings model.
//!
//! This module defines [`ShipmentSettings`], the shared costs incurred once
//! for a whole shipment and distributed across its line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shared, non-allocable costs incurred once for the whole shipment.
///
/// The engine groups these into two pools: freight costs that scale with
/// physical weight, and administrative costs that scale with shipment value.
///
/// # Example
///
/// ```
/// use landed_cost_engine::models::ShipmentSettings;
/// use rust_decimal::Decimal;
///
/// let settings = ShipmentSettings {
///     bank_expenses: Decimal::from(10),
///     customs_agent: Decimal::from(5),
///     fleet_cost_per_weight_unit: Decimal::from(2),
///     ..ShipmentSettings::default()
/// };
/// assert_eq!(settings.value_proportional_total(), Some(Decimal::from(15)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentSettings {
    /// Bank charges for the international transfer.
    #[serde(default)]
    pub bank_expenses: Decimal,
    /// Fee charged by the customs broker.
    #[serde(default)]
    pub customs_agent: Decimal,
    /// Freight rate charged per unit of shipment weight.
    #[serde(default)]
    pub fleet_cost_per_weight_unit: Decimal,
    /// Flat cost of the import procedure paperwork.
    #[serde(default)]
    pub import_procedure: Decimal,
    /// Freight from the port of entry to the destination.
    #[serde(default)]
    pub local_fleet: Decimal,
    /// Freight from the supplier to the port of departure.
    #[serde(default)]
    pub origin_fleet: Decimal,
    /// Taxes paid in the country of origin.
    #[serde(default)]
    pub origin_taxes: Decimal,
}

impl ShipmentSettings {
    /// Returns the fixed part of the weight-proportional pool
    /// (`origin_fleet + local_fleet`), excluding the per-weight freight.
    ///
    /// `None` if the sum does not fit in a `Decimal`.
    pub fn fixed_freight_total(&self) -> Option<Decimal> {
        self.origin_fleet.checked_add(self.local_fleet)
    }

    /// Returns the value-proportional pool:
    /// `bank_expenses + customs_agent + import_procedure + origin_taxes`.
    ///
    /// `None` if the sum does not fit in a `Decimal`.
    pub fn value_proportional_total(&self) -> Option<Decimal> {
        self.bank_expenses
            .checked_add(self.customs_agent)?
            .checked_add(self.import_procedure)?
            .checked_add(self.origin_taxes)
    }

    /// Returns every field paired with its snake_case name, in declaration order.
    pub fn fields(&self) -> [(&'static str, Decimal); 7] {
        [
            ("bank_expenses", self.bank_expenses),
            ("customs_agent", self.customs_agent),
            ("fleet_cost_per_weight_unit", self.fleet_cost_per_weight_unit),
            ("import_procedure", self.import_procedure),
            ("local_fleet", self.local_fleet),
            ("origin_fleet", self.origin_fleet),
            ("origin_taxes", self.origin_taxes),
        ]
    }
}
