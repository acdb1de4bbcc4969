//! Line item model.
//!
//! This module defines [`LineItem`], one imported article within a shipment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents one imported article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Optional display label for the article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of units imported.
    pub quantity: Decimal,
    /// Weight of a single unit.
    pub unit_weight: Decimal,
    /// Acquisition cost of a single unit.
    pub unit_cost: Decimal,
    /// Duty rate applied to the unit cost (e.g. 0.1 for 10%).
    pub tariff_rate: Decimal,
    /// Target fraction of the sale price that is profit.
    pub margin: Decimal,
    /// Computed sale price per unit. Holds a placeholder until calculated.
    #[serde(default)]
    pub unit_price: Decimal,
}

impl LineItem {
    /// Total weight contributed by this item (`unit_weight × quantity`).
    ///
    /// `None` if the product does not fit in a `Decimal`.
    pub fn total_weight(&self) -> Option<Decimal> {
        self.unit_weight.checked_mul(self.quantity)
    }

    /// Total acquisition cost of this item (`unit_cost × quantity`).
    ///
    /// `None` if the product does not fit in a `Decimal`.
    pub fn total_cost(&self) -> Option<Decimal> {
        self.unit_cost.checked_mul(self.quantity)
    }

    /// Returns the display label for this item.
    ///
    /// The name is used when it is present and contains something other than
    /// whitespace; otherwise the label falls back to the item's 1-based
    /// position.
    ///
    /// # Examples
    ///
    /// ```
    /// use landed_cost_engine::models::LineItem;
    ///
    /// let mut item = LineItem::default();
    /// assert_eq!(item.label(2), "Item 3");
    ///
    /// item.name = Some("Ceramic tiles".to_string());
    /// assert_eq!(item.label(2), "Ceramic tiles");
    /// ```
    pub fn label(&self, index: usize) -> String {
        item_label(self.name.as_deref(), index)
    }
}

/// Resolves an item label from an optional name and the item's position.
pub(crate) fn item_label(name: Option<&str>, index: usize) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        Some(_) | None => format!("Item {}", index + 1),
    }
}
