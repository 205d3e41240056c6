//! Fee schedule data model.
//!
//! Field names follow the management API payload. Numeric fields are decoded
//! leniently because upstream records mix numbers, numeric strings and nulls.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    #[default]
    Percentage,
    Fixed,
}

impl Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FeeType::Percentage => "percentage",
                FeeType::Fixed => "fixed",
            }
        )
    }
}

/// Share of a row's computed fee allocated to one supplier, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierSharing {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number_or_nan")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "isDisabled", default, deserialize_with = "lenient::null_as_default")]
    pub is_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFeeRow {
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub start_amount: f64,
    /// `None` means the range has no upper bound.
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub end_amount: Option<f64>,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number_or_nan")]
    pub fee_amount: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub fee_type: FeeType,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub unlimited: bool,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub supplier_sharings: Vec<SupplierSharing>,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub supplier_rate: f64,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub customer_rate: f64,
}

impl TransactionFeeRow {
    /// A zero-valued, bounded row with one zero share per supplier.
    pub fn zeroed(suppliers: &[Supplier]) -> Self {
        Self {
            start_amount: 0.0,
            end_amount: Some(0.0),
            fee_amount: 0.0,
            fee_type: FeeType::Percentage,
            unlimited: false,
            supplier_sharings: suppliers
                .iter()
                .map(|s| SupplierSharing {
                    id: s.id.clone(),
                    value: 0.0,
                })
                .collect(),
            supplier_rate: 0.0,
            customer_rate: 0.0,
        }
    }

    /// Whether `amount` falls in `[start_amount, end_amount]`. Unlimited rows
    /// match every amount.
    pub fn matches(&self, amount: f64) -> bool {
        self.unlimited
            || (amount >= self.start_amount && self.end_amount.is_none_or(|end| amount <= end))
    }

    /// Raw fee for `amount`; may be NaN when the row is malformed.
    pub fn fee_for(&self, amount: f64) -> f64 {
        match self.fee_type {
            FeeType::Percentage => amount * self.fee_amount / 100.0,
            FeeType::Fixed => self.fee_amount,
        }
    }

    pub fn sharing(&self, supplier_id: &str) -> Option<&SupplierSharing> {
        self.supplier_sharings.iter().find(|s| s.id == supplier_id)
    }

    pub fn sharing_mut(&mut self, supplier_id: &str) -> Option<&mut SupplierSharing> {
        self.supplier_sharings
            .iter_mut()
            .find(|s| s.id == supplier_id)
    }

    /// Sum of all shares on this row. Not expected to be exactly 100.
    pub fn total_share(&self) -> f64 {
        self.supplier_sharings
            .iter()
            .map(|s| zero_if_nan(s.value))
            .sum()
    }
}

/// Fee schedule and allocation table for a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub transaction_fees: Vec<TransactionFeeRow>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub allocate_details: Vec<Supplier>,
}

impl FeeConfig {
    /// Stable ascending sort on `start_amount`; NaN starts go last.
    pub fn sort_transaction_fees(&mut self) {
        self.transaction_fees
            .sort_by(|a, b| a.start_amount.total_cmp(&b.start_amount));
    }

    pub fn is_sorted(&self) -> bool {
        self.transaction_fees
            .windows(2)
            .all(|w| w[0].start_amount.total_cmp(&w[1].start_amount).is_le())
    }

    /// First row, in stored order, that applies to `amount`.
    pub fn matching_row(&self, amount: f64) -> Option<&TransactionFeeRow> {
        self.transaction_fees.iter().find(|row| row.matches(amount))
    }

    pub fn supplier(&self, supplier_id: &str) -> Option<&Supplier> {
        self.allocate_details.iter().find(|s| s.id == supplier_id)
    }

    /// Names are compared with surrounding whitespace ignored.
    pub fn has_supplier_named(&self, name: &str) -> bool {
        let name = name.trim();
        self.allocate_details.iter().any(|s| s.name.trim() == name)
    }
}

/// Result of applying a schedule to one transaction amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeeCalculation {
    pub transaction_fee: f64,
    /// Supplier name to allocated amount.
    pub distribution: BTreeMap<String, f64>,
}

/// Partial edit of an existing row; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct RowUpdate {
    pub start_amount: Option<f64>,
    pub end_amount: Option<Option<f64>>,
    pub fee_amount: Option<f64>,
    pub fee_type: Option<FeeType>,
    pub unlimited: Option<bool>,
}

impl RowUpdate {
    pub fn apply(&self, row: &mut TransactionFeeRow) {
        if let Some(start) = self.start_amount {
            row.start_amount = start;
        }
        if let Some(end) = self.end_amount {
            row.end_amount = end;
        }
        if let Some(fee) = self.fee_amount {
            row.fee_amount = fee;
        }
        if let Some(fee_type) = self.fee_type {
            row.fee_type = fee_type;
        }
        if let Some(unlimited) = self.unlimited {
            row.unlimited = unlimited;
        }
    }
}

pub(crate) fn zero_if_nan(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    impl Raw {
        fn to_f64(&self) -> f64 {
            match self {
                Raw::Number(n) => *n,
                Raw::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            }
        }
    }

    /// `null` decodes like an absent field.
    pub fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    pub fn nan() -> f64 {
        f64::NAN
    }

    pub fn number_or_nan<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<Raw>::deserialize(d)?.map_or(f64::NAN, |raw| raw.to_f64()))
    }

    pub fn number_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<Raw>::deserialize(d)?.map_or(0.0, |raw| raw.to_f64()))
    }

    pub fn optional_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Raw>::deserialize(d)?.map(|raw| raw.to_f64()))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match RawId::deserialize(d)? {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        })
    }
}
