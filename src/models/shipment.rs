//! Shipment model and editing operations.
//!
//! A [`Shipment`] is the full record a caller hands to the engine: the shared
//! settings, the ordered line items and free-form notes. The editing helpers
//! here back a front end that adds and removes rows between calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{LineItem, ShipmentSettings, ShipmentTotals, UnitPrice};

/// A shipment of imported goods.
///
/// The order of `items` is meaningful: position is the row identity used to
/// merge calculated prices back into the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Shared costs for the whole shipment.
    pub settings: ShipmentSettings,
    /// The imported articles, in row order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Free-form notes attached to the shipment.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Shipment {
    /// Creates an empty shipment with the given settings.
    pub fn new(settings: ShipmentSettings) -> Self {
        Self {
            settings,
            items: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Returns the shipment's item count, total weight and total cost.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CalculationError`] if an item's total or the
    /// shipment sum does not fit in a `Decimal`.
    ///
    /// # Examples
    ///
    /// ```
    /// use landed_cost_engine::models::{LineItem, Shipment, ShipmentSettings};
    /// use rust_decimal::Decimal;
    ///
    /// let mut shipment = Shipment::new(ShipmentSettings::default());
    /// shipment.add_item(LineItem {
    ///     quantity: Decimal::from(3),
    ///     unit_weight: Decimal::from(2),
    ///     unit_cost: Decimal::from(10),
    ///     ..LineItem::default()
    /// });
    ///
    /// let totals = shipment.totals().unwrap();
    /// assert_eq!(totals.total_weight, Decimal::from(6));
    /// assert_eq!(totals.total_cost, Decimal::from(30));
    /// ```
    pub fn totals(&self) -> EngineResult<ShipmentTotals> {
        let mut total_weight = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;

        for (index, item) in self.items.iter().enumerate() {
            total_weight = item
                .total_weight()
                .and_then(|weight| total_weight.checked_add(weight))
                .ok_or_else(|| EngineError::overflow(format!("Total weight at item {}", index)))?;
            total_cost = item
                .total_cost()
                .and_then(|cost| total_cost.checked_add(cost))
                .ok_or_else(|| EngineError::overflow(format!("Total cost at item {}", index)))?;
        }

        Ok(ShipmentTotals {
            item_count: self.items.len(),
            total_weight,
            total_cost,
        })
    }

    /// Appends a line item.
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`, shifting later rows up.
    pub fn remove_item(&mut self, index: usize) -> EngineResult<LineItem> {
        if index >= self.items.len() {
            return Err(EngineError::ItemNotFound {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Appends a note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Removes and returns the note at `index`.
    pub fn remove_note(&mut self, index: usize) -> EngineResult<String> {
        if index >= self.notes.len() {
            return Err(EngineError::NoteNotFound {
                index,
                len: self.notes.len(),
            });
        }
        Ok(self.notes.remove(index))
    }

    /// Merges calculated prices back into the items by position.
    ///
    /// Priced rows get their `unit_price` replaced. Unpriced rows (invalid
    /// margin or arithmetic overflow) keep their previous value. Returns the number of rows updated.
    pub fn apply_prices(&mut self, prices: &[UnitPrice]) -> usize {
        let mut updated = 0;
        for (item, price) in self.items.iter_mut().zip(prices) {
            if let Some(amount) = price.amount() {
                item.unit_price = amount;
                updated += 1;
            }
        }
        updated
    }
}
