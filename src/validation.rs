//! Shipment validation.
//!
//! The engine assumes its numeric inputs are non-negative and does not check
//! them itself. These functions perform that shape check up front, before a
//! shipment reaches [`calculate_importation`](crate::calculation::calculate_importation).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Shipment;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Path of the offending field, e.g. `items[2].margin`.
    pub field: String,
    /// What is wrong with the field.
    pub message: String,
}

/// Checks every settings field and every item's numeric fields for
/// non-negativity.
///
/// `unit_price` is an output placeholder and is not checked.
///
/// # Examples
///
/// ```
/// use landed_cost_engine::models::{LineItem, Shipment, ShipmentSettings};
/// use landed_cost_engine::validation::validate_shipment;
/// use rust_decimal::Decimal;
///
/// let mut shipment = Shipment::new(ShipmentSettings::default());
/// shipment.add_item(LineItem {
///     quantity: Decimal::from(-1),
///     ..LineItem::default()
/// });
///
/// let issues = validate_shipment(&shipment);
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].field, "items[0].quantity");
/// ```
pub fn validate_shipment(shipment: &Shipment) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, value) in shipment.settings.fields() {
        check_non_negative(&mut issues, format!("settings.{}", name), value);
    }

    for (index, item) in shipment.items.iter().enumerate() {
        let fields = [
            ("quantity", item.quantity),
            ("unit_weight", item.unit_weight),
            ("unit_cost", item.unit_cost),
            ("tariff_rate", item.tariff_rate),
            ("margin", item.margin),
        ];
        for (name, value) in fields {
            check_non_negative(&mut issues, format!("items[{}].{}", index, name), value);
        }
    }

    issues
}

/// Validates a shipment, returning the first issue as an error.
pub fn validate_or_error(shipment: &Shipment) -> EngineResult<()> {
    match validate_shipment(shipment).into_iter().next() {
        Some(issue) => Err(EngineError::InvalidShipment {
            field: issue.field,
            message: issue.message,
        }),
        None => Ok(()),
    }
}

/// Ensures a shipment is complete enough to be submitted.
///
/// A submitted shipment must pass validation and contain at least one item.
pub fn ensure_submittable(shipment: &Shipment) -> EngineResult<()> {
    validate_or_error(shipment)?;
    if shipment.items.is_empty() {
        return Err(EngineError::EmptyShipment);
    }
    Ok(())
}

fn check_non_negative(issues: &mut Vec<ValidationIssue>, field: String, value: Decimal) {
    if value < Decimal::ZERO {
        issues.push(ValidationIssue {
            field,
            message: "must be greater than or equal to 0".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, ShipmentSettings};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn valid_item() -> LineItem {
        LineItem {
            name: Some("valve".to_string()),
            quantity: dec("3"),
            unit_weight: dec("0.4"),
            unit_cost: dec("12"),
            tariff_rate: dec("0.15"),
            margin: dec("0.3"),
            unit_price: dec("-1"),
        }
    }

    fn valid_shipment() -> Shipment {
        let mut shipment = Shipment::new(ShipmentSettings {
            bank_expenses: dec("10"),
            ..ShipmentSettings::default()
        });
        shipment.add_item(valid_item());
        shipment
    }

    #[test]
    fn test_valid_shipment_has_no_issues() {
        assert!(validate_shipment(&valid_shipment()).is_empty());
        assert!(validate_or_error(&valid_shipment()).is_ok());
    }

    #[test]
    fn test_negative_placeholder_price_is_allowed() {
        let mut shipment = valid_shipment();
        shipment.items[0].unit_price = dec("-99");
        assert!(validate_shipment(&shipment).is_empty());
    }

    #[test]
    fn test_negative_settings_field_is_reported() {
        let mut shipment = valid_shipment();
        shipment.settings.customs_agent = dec("-0.01");

        let issues = validate_shipment(&shipment);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "settings.customs_agent");
    }

    #[test]
    fn test_every_negative_item_field_is_reported() {
        let mut shipment = valid_shipment();
        shipment.add_item(LineItem {
            quantity: dec("-1"),
            unit_weight: dec("-1"),
            unit_cost: dec("-1"),
            tariff_rate: dec("-1"),
            margin: dec("-1"),
            ..valid_item()
        });

        let fields: Vec<_> = validate_shipment(&shipment)
            .into_iter()
            .map(|issue| issue.field)
            .collect();

        assert_eq!(
            fields,
            vec![
                "items[1].quantity",
                "items[1].unit_weight",
                "items[1].unit_cost",
                "items[1].tariff_rate",
                "items[1].margin"
            ]
        );
    }

    #[test]
    fn test_margin_above_one_passes_validation() {
        let mut shipment = valid_shipment();
        shipment.items[0].margin = dec("1.5");
        assert!(validate_shipment(&shipment).is_empty());
    }

    #[test]
    fn test_validate_or_error_returns_first_issue() {
        let mut shipment = valid_shipment();
        shipment.settings.bank_expenses = dec("-5");
        shipment.items[0].margin = dec("-1");

        match validate_or_error(&shipment) {
            Err(EngineError::InvalidShipment { field, .. }) => {
                assert_eq!(field, "settings.bank_expenses");
            }
            other => panic!("Expected InvalidShipment, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_shipment_is_not_submittable() {
        let shipment = Shipment::default();
        assert!(matches!(
            ensure_submittable(&shipment),
            Err(EngineError::EmptyShipment)
        ));
        assert!(ensure_submittable(&valid_shipment()).is_ok());
    }
}
