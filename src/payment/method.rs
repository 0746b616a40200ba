use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FeesError, Result};

/// Closed set of accepted payment methods.
///
/// Upstream data carries free-text variants ("momo", "mtn_withdrawal", ...);
/// normalization happens once at the boundary via [`PaymentMethod::parse`]
/// instead of string matching scattered through the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    MobileMoney,
}

impl PaymentMethod {
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "cash" | "especes" | "espèces" => Ok(Self::Cash),
            "mobile_money" | "momo" | "mtn" | "mtn_withdrawal" | "orange_money" | "om" => {
                Ok(Self::MobileMoney)
            }
            _ => Err(FeesError::UnknownPaymentMethod(input.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::MobileMoney => write!(f, "mobile_money"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cash_variants() {
        assert_eq!(PaymentMethod::parse("cash").unwrap(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse("CASH").unwrap(), PaymentMethod::Cash);
        assert_eq!(
            PaymentMethod::parse("espèces").unwrap(),
            PaymentMethod::Cash
        );
    }

    #[test]
    fn parses_mobile_money_variants() {
        for input in [
            "mobile-money",
            "mobile_money",
            "momo",
            "mtn_withdrawal",
            "MTN",
            "orange money",
            "om",
        ] {
            assert_eq!(
                PaymentMethod::parse(input).unwrap(),
                PaymentMethod::MobileMoney,
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_unknown_methods() {
        assert!(matches!(
            PaymentMethod::parse("cheque"),
            Err(FeesError::UnknownPaymentMethod(_))
        ));
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileMoney).unwrap(),
            "\"mobile_money\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
    }
}
