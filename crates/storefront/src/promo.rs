//! Promo code table.
//!
//! Maps a promo code to the fraction of the subtotal it takes off. Codes are
//! matched case-insensitively and only one code is ever active on a cart.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a [`PromoRuleTable`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromoRuleError {
    /// The code is empty or whitespace.
    #[error("promo code cannot be empty")]
    EmptyCode,
    /// The rate is outside `[0, 1]`.
    #[error("discount rate for {code} must be between 0 and 1 (got {rate})")]
    InvalidRate {
        /// Offending code.
        code: String,
        /// Offending rate.
        rate: Decimal,
    },
    /// An entry of a `CODE=rate` list could not be parsed.
    #[error("malformed promo entry: {0}")]
    Malformed(String),
}

/// Static mapping from promo code to discount rate.
///
/// Deserializes from a `{"CODE": "rate"}` map through the same validation as
/// [`PromoRuleTable::insert`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Decimal>",
    into = "BTreeMap<String, Decimal>"
)]
pub struct PromoRuleTable {
    rules: BTreeMap<String, Decimal>,
}

impl PromoRuleTable {
    /// An empty table: every code is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(code, rate)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a code is empty or a rate is outside `[0, 1]`.
    pub fn from_rules<I, S>(rules: I) -> Result<Self, PromoRuleError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (code, rate) in rules {
            table.insert(code.as_ref(), rate)?;
        }
        Ok(table)
    }

    /// Parse a `CODE=rate,CODE=rate` list, as used by `MAISON_PROMO_CODES`.
    ///
    /// # Errors
    ///
    /// Returns [`PromoRuleError::Malformed`] for entries without `=` or with
    /// a rate that is not a decimal number.
    pub fn parse_list(list: &str) -> Result<Self, PromoRuleError> {
        let mut table = Self::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, rate) = entry
                .split_once('=')
                .ok_or_else(|| PromoRuleError::Malformed(entry.to_string()))?;
            let rate = rate
                .trim()
                .parse::<Decimal>()
                .map_err(|_| PromoRuleError::Malformed(entry.to_string()))?;
            table.insert(code, rate)?;
        }
        Ok(table)
    }

    /// Add or replace a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or the rate is outside `[0, 1]`.
    pub fn insert(&mut self, code: &str, rate: Decimal) -> Result<(), PromoRuleError> {
        let code = normalize(code);
        if code.is_empty() {
            return Err(PromoRuleError::EmptyCode);
        }
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(PromoRuleError::InvalidRate { code, rate });
        }
        self.rules.insert(code, rate);
        Ok(())
    }

    /// Look up a code, ignoring case and surrounding whitespace.
    ///
    /// Returns the canonical (upper-case) code together with its rate.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<(&str, Decimal)> {
        self.rules
            .get_key_value(&normalize(code))
            .map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Rate for a code, zero when the code is unknown.
    #[must_use]
    pub fn rate(&self, code: &str) -> Decimal {
        self.lookup(code).map_or(Decimal::ZERO, |(_, rate)| rate)
    }

    /// All known codes, in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Decimal>> for PromoRuleTable {
    type Error = PromoRuleError;

    fn try_from(rules: BTreeMap<String, Decimal>) -> Result<Self, Self::Error> {
        Self::from_rules(rules)
    }
}

impl From<PromoRuleTable> for BTreeMap<String, Decimal> {
    fn from(table: PromoRuleTable) -> Self {
        table.rules
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table() -> PromoRuleTable {
        PromoRuleTable::from_rules([
            ("SAVE20", Decimal::new(20, 2)),
            ("save10", Decimal::new(10, 2)),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let t = table();
        assert_eq!(t.lookup("save20"), Some(("SAVE20", Decimal::new(20, 2))));
        assert_eq!(t.lookup(" Save10 "), Some(("SAVE10", Decimal::new(10, 2))));
    }

    #[test]
    fn test_unknown_code_rate_is_zero() {
        let t = table();
        assert!(t.lookup("FREESTUFF").is_none());
        assert_eq!(t.rate("FREESTUFF"), Decimal::ZERO);
    }

    #[test]
    fn test_rate_bounds() {
        let mut t = PromoRuleTable::new();
        assert!(matches!(
            t.insert("BAD", Decimal::new(15, 1)),
            Err(PromoRuleError::InvalidRate { .. })
        ));
        assert!(matches!(
            t.insert("NEG", Decimal::new(-1, 2)),
            Err(PromoRuleError::InvalidRate { .. })
        ));
        assert!(t.insert("ALL", Decimal::ONE).is_ok());
        assert!(t.insert("NONE", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_empty_code_rejected() {
        let mut t = PromoRuleTable::new();
        assert_eq!(t.insert("  ", Decimal::ONE), Err(PromoRuleError::EmptyCode));
    }

    #[test]
    fn test_parse_list() {
        let t = PromoRuleTable::parse_list("SAVE20=0.20, welcome=0.05,").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rate("WELCOME"), Decimal::new(5, 2));
        assert_eq!(t.codes().collect::<Vec<_>>(), vec!["SAVE20", "WELCOME"]);
    }

    #[test]
    fn test_parse_list_malformed() {
        assert!(matches!(
            PromoRuleTable::parse_list("SAVE20"),
            Err(PromoRuleError::Malformed(_))
        ));
        assert!(matches!(
            PromoRuleTable::parse_list("SAVE20=lots"),
            Err(PromoRuleError::Malformed(_))
        ));
    }

    #[test]
    fn test_deserialize_normalizes_codes() {
        let json = r#"{"save20": "0.2", " Welcome ": "0.05"}"#;
        let t: PromoRuleTable = serde_json::from_str(json).unwrap();
        assert_eq!(t.lookup("SAVE20"), Some(("SAVE20", Decimal::new(2, 1))));
        assert_eq!(t.rate("welcome"), Decimal::new(5, 2));
    }

    #[test]
    fn test_deserialize_rejects_invalid_rate() {
        let json = r#"{"SAVE20": "0.2", "HUGE": "1.5"}"#;
        let err = serde_json::from_str::<PromoRuleTable>(json).unwrap_err();
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let json = serde_json::to_string(&table()).unwrap();
        assert_eq!(json, r#"{"SAVE10":"0.10","SAVE20":"0.20"}"#);
    }
}
