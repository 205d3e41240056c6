use super::defaults::{self, DEFAULT_CURRENCIES, DefaultSupplier};
use super::error::{FeeError, Result};
use super::fee::{
    FeeCalculation, FeeConfig, RowUpdate, Supplier, SupplierSharing, TransactionFeeRow,
    zero_if_nan,
};
use super::source::FeeConfigSource;
use anyhow::anyhow;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-currency fee schedules and supplier allocation tables.
///
/// Owned by a single session. Every operation except [`initialize`] and
/// [`has_currency`] fails with [`FeeError::NotInitialized`] until the
/// bootstrap has run.
///
/// [`initialize`]: FeeConfigurationEngine::initialize
/// [`has_currency`]: FeeConfigurationEngine::has_currency
pub struct FeeConfigurationEngine {
    source: Arc<dyn FeeConfigSource>,
    fetch_timeout: Duration,
    configs: Vec<FeeConfig>,
    default_supplier: DefaultSupplier,
    initialized: bool,
}

impl FeeConfigurationEngine {
    pub fn new(source: Arc<dyn FeeConfigSource>) -> Self {
        Self {
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            configs: Vec::new(),
            default_supplier: DefaultSupplier::default(),
            initialized: false,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn default_supplier(&self) -> &DefaultSupplier {
        &self.default_supplier
    }

    /// Loads the schedules once. Calling it again is a no-op.
    ///
    /// The fetch is attempted a single time. An error, a timeout or an empty
    /// result all leave the engine with the built-in KHR and USD schedules;
    /// nothing is propagated to the caller.
    pub async fn initialize(&mut self, supplier_id: Option<&str>, supplier_name: Option<&str>) {
        if self.initialized {
            debug!("Fee configuration already initialized");
            return;
        }

        self.default_supplier = DefaultSupplier::new(supplier_id, supplier_name);

        let mut configs = match self.fetch_configs().await {
            Ok(fetched) if !fetched.is_empty() => self.merge_with_defaults(fetched),
            Ok(_) => {
                info!("No fee configurations returned, using defaults");
                defaults::default_configs(&self.default_supplier)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch fee configurations, using defaults");
                defaults::default_configs(&self.default_supplier)
            }
        };

        for config in &mut configs {
            config.sort_transaction_fees();
        }

        self.configs = configs;
        self.initialized = true;
        info!(
            currencies = ?self.configs.iter().map(|c| c.currency.as_str()).collect::<Vec<_>>(),
            "Fee configuration initialized"
        );
    }

    async fn fetch_configs(&self) -> anyhow::Result<Vec<FeeConfig>> {
        debug!(timeout = ?self.fetch_timeout, "Fetching fee configurations");
        tokio::time::timeout(self.fetch_timeout, self.source.fetch_all())
            .await
            .map_err(|_| {
                anyhow!(
                    "Fee configuration fetch timed out after {:?}",
                    self.fetch_timeout
                )
            })?
    }

    fn merge_with_defaults(&self, fetched: Vec<FeeConfig>) -> Vec<FeeConfig> {
        let mut configs: Vec<FeeConfig> = Vec::with_capacity(fetched.len() + 2);
        for config in fetched {
            if configs.iter().any(|c| c.currency == config.currency) {
                warn!(currency = %config.currency, "Ignoring duplicate fee configuration");
                continue;
            }
            configs.push(config);
        }

        for currency in DEFAULT_CURRENCIES {
            if !configs.iter().any(|c| c.currency == currency) {
                warn!(currency, "Currency missing from fetched configurations, using default");
                configs.push(defaults::currency_template(
                    currency,
                    &self.default_supplier,
                ));
            }
        }
        configs
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(FeeError::NotInitialized)
        }
    }

    fn position(&self, currency: &str) -> Option<usize> {
        self.configs.iter().position(|c| c.currency == currency)
    }

    /// Index of `currency`, materializing it from a template when absent.
    fn resolve(&mut self, currency: &str) -> Result<usize> {
        self.ensure_initialized()?;
        if let Some(index) = self.position(currency) {
            return Ok(index);
        }

        if let Some(template) = defaults::builtin_template(currency, &self.default_supplier) {
            debug!(currency, "Adopting built-in fee template");
            self.configs.push(template);
            return Ok(self.configs.len() - 1);
        }

        self.initialize_currency(currency)?;
        self.position(currency)
            .ok_or_else(|| FeeError::UnsupportedCurrency(currency.to_string()))
    }

    fn config_mut(&mut self, currency: &str) -> Result<&mut FeeConfig> {
        let index = self.resolve(currency)?;
        Ok(&mut self.configs[index])
    }

    pub fn all_config_fees(&self) -> Result<&[FeeConfig]> {
        self.ensure_initialized()?;
        Ok(&self.configs)
    }

    /// Schedule for `currency`, created from the default template if needed.
    pub fn currency_fees(&mut self, currency: &str) -> Result<&FeeConfig> {
        let index = self.resolve(currency)?;
        Ok(&self.configs[index])
    }

    /// False before initialization.
    pub fn has_currency(&self, currency: &str) -> bool {
        self.position(currency).is_some()
    }

    /// Adds `currency` with the default template unless it already exists.
    pub fn initialize_currency(&mut self, currency: &str) -> Result<()> {
        self.ensure_initialized()?;
        if currency.trim().is_empty() {
            return Err(FeeError::UnsupportedCurrency(currency.to_string()));
        }
        if self.has_currency(currency) {
            return Ok(());
        }

        debug!(currency, "Initializing currency with default template");
        self.configs
            .push(defaults::currency_template(currency, &self.default_supplier));
        Ok(())
    }

    /// Fee for `amount` and its split between suppliers.
    ///
    /// Rows are scanned in stored order and the first one that applies wins.
    /// Suppliers appear in the distribution, keyed by name, only when the
    /// matched row has a sharing entry for them, even if that share is zero.
    pub fn calculate_fees(&mut self, currency: &str, amount: f64) -> Result<FeeCalculation> {
        let config = self.currency_fees(currency)?;
        Ok(compute(config, amount))
    }

    pub fn add_row(&mut self, currency: &str) -> Result<()> {
        let config = self.config_mut(currency)?;
        let row = TransactionFeeRow::zeroed(&config.allocate_details);
        config.transaction_fees.push(row);
        Ok(())
    }

    pub fn update_row(&mut self, currency: &str, index: usize, update: &RowUpdate) -> Result<()> {
        let config = self.config_mut(currency)?;
        match config.transaction_fees.get_mut(index) {
            Some(row) => update.apply(row),
            None => debug!(currency, index, "Row index out of range, ignoring update"),
        }
        Ok(())
    }

    /// Leaves at least one row in place.
    pub fn remove_transaction_row(&mut self, currency: &str, index: usize) -> Result<()> {
        let config = self.config_mut(currency)?;
        if config.transaction_fees.len() > 1 && index < config.transaction_fees.len() {
            config.transaction_fees.remove(index);
        }
        Ok(())
    }

    pub fn sort_transaction_fees(&mut self, currency: &str) -> Result<()> {
        self.config_mut(currency)?.sort_transaction_fees();
        Ok(())
    }

    pub fn add_supplier(
        &mut self,
        currency: &str,
        supplier_id: &str,
        supplier_name: &str,
    ) -> Result<()> {
        self.ensure_initialized()?;
        let name = supplier_name.trim();
        if name.is_empty() {
            return Err(FeeError::EmptySupplierName);
        }

        let config = self.config_mut(currency)?;
        if config.has_supplier_named(name) {
            return Err(FeeError::DuplicateSupplierName {
                currency: currency.to_string(),
                name: name.to_string(),
            });
        }

        config.allocate_details.push(Supplier {
            id: supplier_id.to_string(),
            name: name.to_string(),
            is_disabled: false,
        });
        Ok(())
    }

    /// Drops the supplier and every share that references it.
    pub fn remove_supplier(&mut self, currency: &str, supplier_id: &str) -> Result<()> {
        let config = self.config_mut(currency)?;
        config.allocate_details.retain(|s| s.id != supplier_id);
        for row in &mut config.transaction_fees {
            row.supplier_sharings.retain(|s| s.id != supplier_id);
        }
        Ok(())
    }

    /// Sets, or inserts, a supplier's share on one row.
    pub fn update_supplier_fee(
        &mut self,
        currency: &str,
        row_index: usize,
        supplier_id: &str,
        value: f64,
    ) -> Result<()> {
        let config = self.config_mut(currency)?;
        let Some(row) = config.transaction_fees.get_mut(row_index) else {
            debug!(currency, row_index, "Row index out of range, ignoring share update");
            return Ok(());
        };

        match row.sharing_mut(supplier_id) {
            Some(sharing) => sharing.value = value,
            None => row.supplier_sharings.push(SupplierSharing {
                id: supplier_id.to_string(),
                value,
            }),
        }
        Ok(())
    }

    pub fn supplier_total_share(&mut self, currency: &str, row_index: usize) -> Result<Option<f64>> {
        let config = self.currency_fees(currency)?;
        Ok(config
            .transaction_fees
            .get(row_index)
            .map(TransactionFeeRow::total_share))
    }
}

fn compute(config: &FeeConfig, amount: f64) -> FeeCalculation {
    let Some(row) = config.matching_row(amount) else {
        debug!(currency = %config.currency, amount, "No fee row matches amount");
        return FeeCalculation::default();
    };

    let transaction_fee = zero_if_nan(row.fee_for(amount));
    let distribution = config
        .allocate_details
        .iter()
        .filter_map(|supplier| {
            row.sharing(&supplier.id).map(|sharing| {
                (
                    supplier.name.clone(),
                    zero_if_nan(transaction_fee * sharing.value / 100.0),
                )
            })
        })
        .collect();

    FeeCalculation {
        transaction_fee,
        distribution,
    }
}
