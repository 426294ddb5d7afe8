//! Pricing configuration loaded from environment variables.
//!
//! Shipping thresholds, tax rate and promo codes are inputs to the cart
//! engine rather than constants baked into it.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MAISON_CURRENCY` - ISO 4217 code (default: USD)
//! - `MAISON_FREE_SHIPPING_THRESHOLD` - Subtotal at which shipping is free (default: 100.00)
//! - `MAISON_FLAT_SHIPPING_FEE` - Shipping fee below the threshold (default: 10.00)
//! - `MAISON_TAX_RATE` - Tax rate applied after discount (default: 0.10)
//! - `MAISON_PROMO_CODES` - `CODE=rate` list (default: `SAVE20=0.20,SAVE10=0.10,WELCOME=0.05`)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use maison_core::CurrencyCode;

use crate::promo::{PromoRuleError, PromoRuleTable};

const DEFAULT_PROMO_CODES: &str = "SAVE20=0.20,SAVE10=0.10,WELCOME=0.05";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid promo table: {0}")]
    Promo(#[from] PromoRuleError),
}

/// Parameters of the cart pricing model.
///
/// Deserialized documents are checked like [`PricingConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PricingDocument")]
pub struct PricingConfig {
    /// Currency every catalog price is expressed in
    pub currency: CurrencyCode,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Decimal,
    /// Shipping fee charged below the threshold
    pub flat_shipping_fee: Decimal,
    /// Tax rate applied to the discounted subtotal
    pub tax_rate: Decimal,
    /// Known promo codes
    pub promos: PromoRuleTable,
}

/// Unvalidated form of [`PricingConfig`].
#[derive(Deserialize)]
struct PricingDocument {
    #[serde(default)]
    currency: CurrencyCode,
    free_shipping_threshold: Decimal,
    flat_shipping_fee: Decimal,
    tax_rate: Decimal,
    #[serde(default)]
    promos: PromoRuleTable,
}

impl TryFrom<PricingDocument> for PricingConfig {
    type Error = ConfigError;

    fn try_from(doc: PricingDocument) -> Result<Self, Self::Error> {
        Ok(Self::new(
            doc.currency,
            doc.free_shipping_threshold,
            doc.flat_shipping_fee,
            doc.tax_rate,
        )?
        .with_promos(doc.promos))
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        let promos = PromoRuleTable::from_rules([
            ("SAVE20", Decimal::new(20, 2)),
            ("SAVE10", Decimal::new(10, 2)),
            ("WELCOME", Decimal::new(5, 2)),
        ])
        .unwrap_or_default();

        Self {
            currency: CurrencyCode::USD,
            free_shipping_threshold: Decimal::new(100, 0),
            flat_shipping_fee: Decimal::new(10, 0),
            tax_rate: Decimal::new(10, 2),
            promos,
        }
    }
}

impl PricingConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` naming the offending field if an
    /// amount is negative or the tax rate is outside `[0, 1]`.
    pub fn new(
        currency: CurrencyCode,
        free_shipping_threshold: Decimal,
        flat_shipping_fee: Decimal,
        tax_rate: Decimal,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            currency,
            free_shipping_threshold,
            flat_shipping_fee,
            tax_rate,
            promos: PromoRuleTable::new(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the promo table.
    #[must_use]
    pub fn with_promos(mut self, promos: PromoRuleTable) -> Self {
        self.promos = promos;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. Every
    /// variable is optional and falls back to [`PricingConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let currency = Self::currency_from_lookup(&lookup)?;
        let free_shipping_threshold = decimal_or(
            &lookup,
            "MAISON_FREE_SHIPPING_THRESHOLD",
            defaults.free_shipping_threshold,
        )?;
        let flat_shipping_fee =
            decimal_or(&lookup, "MAISON_FLAT_SHIPPING_FEE", defaults.flat_shipping_fee)?;
        let tax_rate = decimal_or(&lookup, "MAISON_TAX_RATE", defaults.tax_rate)?;
        let promos = PromoRuleTable::parse_list(
            &lookup("MAISON_PROMO_CODES").unwrap_or_else(|| DEFAULT_PROMO_CODES.to_string()),
        )?;

        let config = Self::new(currency, free_shipping_threshold, flat_shipping_fee, tax_rate)?
            .with_promos(promos);
        tracing::debug!(
            currency = %config.currency,
            threshold = %config.free_shipping_threshold,
            fee = %config.flat_shipping_fee,
            tax_rate = %config.tax_rate,
            promo_codes = config.promos.len(),
            "Loaded pricing configuration"
        );
        Ok(config)
    }

    /// Read only `MAISON_CURRENCY`, for callers that format prices but never
    /// price a cart.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an unknown currency code.
    pub fn currency_from_env() -> Result<CurrencyCode, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::currency_from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Read only `MAISON_CURRENCY` through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an unknown currency code.
    pub fn currency_from_lookup<F>(lookup: &F) -> Result<CurrencyCode, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("MAISON_CURRENCY").map_or(Ok(CurrencyCode::default()), |raw| {
            raw.parse::<CurrencyCode>()
                .map_err(|e| invalid("MAISON_CURRENCY", &e.to_string()))
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.free_shipping_threshold < Decimal::ZERO {
            return Err(invalid("MAISON_FREE_SHIPPING_THRESHOLD", "must not be negative"));
        }
        if self.flat_shipping_fee < Decimal::ZERO {
            return Err(invalid("MAISON_FLAT_SHIPPING_FEE", "must not be negative"));
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(invalid("MAISON_TAX_RATE", "must be between 0 and 1"));
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Parse a decimal variable, falling back to `default` when absent.
fn decimal_or<F>(lookup: &F, key: &str, default: Decimal) -> Result<Decimal, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
