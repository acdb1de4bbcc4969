//! Shared state for the landed cost API.
//!
//! Calculations run on the shipment carried by each request, so the only
//! thing handlers share is the calculator configuration: the shipment a
//! reset restores and the row template used when an item is added.

use std::sync::Arc;

use crate::config::ConfigLoader;

use super::response::ShipmentTemplate;

/// Read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    calculator: Arc<ConfigLoader>,
}

impl AppState {
    /// Wraps the loaded calculator configuration for sharing across handlers.
    pub fn new(calculator: ConfigLoader) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }

    /// The calculator configuration.
    pub fn calculator(&self) -> &ConfigLoader {
        &self.calculator
    }

    /// Fresh copies of the initial shipment and the new-row template.
    pub fn shipment_template(&self) -> ShipmentTemplate {
        ShipmentTemplate {
            shipment: self.calculator.initial_shipment(),
            new_item: self.calculator.new_item(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_state() -> AppState {
        AppState::new(ConfigLoader::load("./config/default").expect("Failed to load config"))
    }

    #[test]
    fn test_state_can_be_shared_by_axum() {
        fn assert_shareable<T: Clone + Send + Sync + 'static>() {}
        assert_shareable::<AppState>();
    }

    #[test]
    fn test_clones_share_one_configuration() {
        let state = create_state();
        let clone = state.clone();

        assert!(std::ptr::eq(state.calculator(), clone.calculator()));
    }

    #[test]
    fn test_template_edits_do_not_leak_between_requests() {
        let state = create_state();

        let mut first = state.shipment_template();
        first.new_item.quantity = Decimal::from(5);
        first.shipment.notes.push("edited".to_string());

        let second = state.shipment_template();
        assert_eq!(second.new_item.quantity, Decimal::ZERO);
        assert!(second.shipment.notes.is_empty());
    }
}
