//! Currency codes and amount formatting.
//!
//! Amounts are plain `Decimal`s kept at full precision; rounding to the
//! currency's two minor digits happens only in [`format_amount`].

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of minor-unit digits shown for every supported currency.
pub const MINOR_DIGITS: u32 = 2;

/// Format an amount for display, e.g. `$19.99` or `4.99 €`.
#[must_use]
pub fn format_amount(amount: Decimal, currency: CurrencyCode) -> String {
    let value = round_minor(amount);
    if currency.symbol_leads() {
        format!("{}{value:.2}", currency.symbol())
    } else {
        format!("{value:.2} {}", currency.symbol())
    }
}

/// Round a decimal amount to the display precision.
#[must_use]
pub fn round_minor(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Whether the symbol is written before the amount (`$5.00` vs `5.00 €`).
    #[must_use]
    pub const fn symbol_leads(&self) -> bool {
        !matches!(self, Self::EUR)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rounds_only_the_output() {
        let amount = Decimal::new(9999, 3);
        assert_eq!(format_amount(amount, CurrencyCode::USD), "$10.00");
        assert_eq!(amount, Decimal::new(9999, 3));
    }

    #[test]
    fn test_format_pads_minor_digits() {
        assert_eq!(format_amount(Decimal::from(5), CurrencyCode::USD), "$5.00");
        assert_eq!(format_amount(Decimal::new(499, 2), CurrencyCode::EUR), "4.99 €");
        assert_eq!(format_amount(Decimal::new(12, 0), CurrencyCode::GBP), "£12.00");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_minor(Decimal::new(1005, 3)), Decimal::new(101, 2));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
