//! Built-in schedules used when the account has none, or the fetch fails.

use super::fee::{FeeConfig, FeeType, Supplier, SupplierSharing, TransactionFeeRow};
use serde::{Deserialize, Serialize};

/// Currencies that always exist after initialization.
pub const DEFAULT_CURRENCIES: [&str; 2] = ["KHR", "USD"];

pub const FALLBACK_SUPPLIER_ID: &str = "self";
pub const FALLBACK_SUPPLIER_NAME: &str = "Self";

/// The non-removable "self" entry placed in every default allocation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSupplier {
    pub id: String,
    pub name: String,
}

impl DefaultSupplier {
    /// Blank or missing values fall back to the built-in id and name.
    pub fn new(id: Option<&str>, name: Option<&str>) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            id: pick(id, FALLBACK_SUPPLIER_ID),
            name: pick(name, FALLBACK_SUPPLIER_NAME),
        }
    }
}

impl Default for DefaultSupplier {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Single catch-all row charging nothing.
pub fn default_row(supplier: &DefaultSupplier) -> TransactionFeeRow {
    TransactionFeeRow {
        start_amount: 0.0,
        end_amount: None,
        fee_amount: 0.0,
        fee_type: FeeType::Percentage,
        unlimited: true,
        supplier_sharings: vec![SupplierSharing {
            id: supplier.id.clone(),
            value: 0.0,
        }],
        supplier_rate: 0.0,
        customer_rate: 0.0,
    }
}

pub fn currency_template(currency: &str, supplier: &DefaultSupplier) -> FeeConfig {
    FeeConfig {
        currency: currency.to_string(),
        transaction_fees: vec![default_row(supplier)],
        allocate_details: vec![Supplier {
            id: supplier.id.clone(),
            name: supplier.name.clone(),
            is_disabled: true,
        }],
    }
}

/// Hardcoded template for one of [`DEFAULT_CURRENCIES`], if `currency` is one.
pub fn builtin_template(currency: &str, supplier: &DefaultSupplier) -> Option<FeeConfig> {
    DEFAULT_CURRENCIES
        .contains(&currency)
        .then(|| currency_template(currency, supplier))
}

pub fn default_configs(supplier: &DefaultSupplier) -> Vec<FeeConfig> {
    DEFAULT_CURRENCIES
        .iter()
        .map(|currency| currency_template(currency, supplier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_supplier_fallbacks() {
        assert_eq!(
            DefaultSupplier::new(None, Some("  ")),
            DefaultSupplier {
                id: "self".to_string(),
                name: "Self".to_string(),
            }
        );

        let custom = DefaultSupplier::new(Some("acq-1"), Some("Acme Bank"));
        assert_eq!(custom.id, "acq-1");
        assert_eq!(custom.name, "Acme Bank");
    }

    #[test]
    fn test_default_configs_shape() {
        let configs = default_configs(&DefaultSupplier::default());
        let currencies: Vec<_> = configs.iter().map(|c| c.currency.as_str()).collect();
        assert_eq!(currencies, vec!["KHR", "USD"]);

        for config in &configs {
            assert_eq!(config.transaction_fees.len(), 1);
            let row = &config.transaction_fees[0];
            assert!(row.unlimited);
            assert_eq!(row.fee_amount, 0.0);
            assert_eq!(row.fee_type, FeeType::Percentage);
            assert_eq!(row.sharing("self").map(|s| s.value), Some(0.0));

            assert_eq!(config.allocate_details.len(), 1);
            assert!(config.allocate_details[0].is_disabled);
        }
    }

    #[test]
    fn test_builtin_template_only_for_default_currencies() {
        let supplier = DefaultSupplier::default();
        assert!(builtin_template("KHR", &supplier).is_some());
        assert!(builtin_template("EUR", &supplier).is_none());
        assert!(builtin_template("usd", &supplier).is_none());
    }
}
