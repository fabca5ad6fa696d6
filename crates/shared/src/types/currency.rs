//! Currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this type only labels them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies and indexation units an entry may be denominated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Chilean peso.
    #[default]
    Clp,
    /// Unidad de Fomento (inflation-indexed unit).
    Uf,
    /// US Dollar.
    Usd,
}

impl Currency {
    /// Number of decimal places amounts carry in this currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Clp => 0,
            Self::Uf | Self::Usd => 2,
        }
    }

    /// Rounds an amount to this currency's precision (banker's rounding).
    #[must_use]
    pub fn round(self, amount: Decimal) -> Decimal {
        amount.round_dp(self.minor_units())
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clp => write!(f, "CLP"),
            Self::Uf => write!(f, "UF"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CLP" => Ok(Self::Clp),
            "UF" | "CLF" => Ok(Self::Uf),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
