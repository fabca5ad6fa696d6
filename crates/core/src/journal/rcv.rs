//! Registro de Compras y Ventas (RCV) summaries.
//!
//! The register is aggregated upstream. The engine only sees the totals per
//! register and per counterparty.

use conciliador_shared::types::{Period, Rut};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the register a summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcvRegister {
    /// Registro de compras.
    Purchases,
    /// Registro de ventas.
    Sales,
}

impl RcvRegister {
    /// Spanish label used in entry descriptions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Purchases => "compras",
            Self::Sales => "ventas",
        }
    }
}

/// Aggregated amounts of a set of RCV documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcvTotals {
    /// Number of documents aggregated.
    pub document_count: u32,
    /// Monto exento.
    pub exempt_amount: Decimal,
    /// Monto neto.
    pub net_amount: Decimal,
    /// IVA.
    pub iva_amount: Decimal,
    /// Monto total as declared on the documents.
    pub total_amount: Decimal,
    /// Total recomputed by the upstream analysis.
    pub calculated_amount: Decimal,
}

impl RcvTotals {
    /// `total - (exempt + net + IVA)`. Zero for a well-formed summary.
    #[must_use]
    pub fn decomposition_delta(&self) -> Decimal {
        self.total_amount - (self.exempt_amount + self.net_amount + self.iva_amount)
    }

    /// `total - calculated`. Zero when upstream agrees with the declaration.
    #[must_use]
    pub fn calculated_delta(&self) -> Decimal {
        self.total_amount - self.calculated_amount
    }
}

impl std::ops::Add for RcvTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            document_count: self.document_count.saturating_add(rhs.document_count),
            exempt_amount: self.exempt_amount + rhs.exempt_amount,
            net_amount: self.net_amount + rhs.net_amount,
            iva_amount: self.iva_amount + rhs.iva_amount,
            total_amount: self.total_amount + rhs.total_amount,
            calculated_amount: self.calculated_amount + rhs.calculated_amount,
        }
    }
}

impl std::iter::Sum for RcvTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, t| acc + t)
    }
}

/// Totals for one supplier (purchases) or client (sales).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcvEntitySummary {
    /// Counterparty RUT.
    pub rut: Rut,
    /// Counterparty name (razón social).
    pub name: String,
    /// The counterparty's amounts.
    pub amounts: RcvTotals,
}

/// Aggregated RCV register for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcvSummary {
    /// Purchases or sales.
    pub register: RcvRegister,
    /// Tax period of the documents.
    pub period: Period,
    /// Global totals.
    pub totals: RcvTotals,
    /// Per-counterparty totals. May be empty.
    #[serde(default)]
    pub entities: Vec<RcvEntitySummary>,
}

impl RcvSummary {
    /// Sum of the per-counterparty amounts.
    #[must_use]
    pub fn entity_totals(&self) -> RcvTotals {
        self.entities.iter().map(|e| e.amounts).sum()
    }

    /// `global total - sum of counterparty totals`, or `None` without entity rows.
    #[must_use]
    pub fn entity_delta(&self) -> Option<Decimal> {
        if self.entities.is_empty() {
            return None;
        }
        Some(self.totals.total_amount - self.entity_totals().total_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amounts(net: Decimal, iva: Decimal, total: Decimal) -> RcvTotals {
        RcvTotals {
            document_count: 1,
            exempt_amount: dec!(0),
            net_amount: net,
            iva_amount: iva,
            total_amount: total,
            calculated_amount: net + iva,
        }
    }

    #[test]
    fn test_decomposition_delta() {
        assert_eq!(
            amounts(dec!(7176471), dec!(1363529), dec!(8540000)).decomposition_delta(),
            dec!(0)
        );
        let broken = amounts(dec!(7176471), dec!(1363529), dec!(8400000));
        assert_eq!(broken.decomposition_delta(), dec!(-140000));
        assert_eq!(broken.calculated_delta(), dec!(-140000));
    }

    #[test]
    fn test_entity_totals() {
        let summary = RcvSummary {
            register: RcvRegister::Purchases,
            period: Period::new(2024, 3).unwrap(),
            totals: amounts(dec!(300), dec!(57), dec!(357)),
            entities: vec![
                RcvEntitySummary {
                    rut: Rut::parse("76.086.428-5").unwrap(),
                    name: "Proveedor Uno SpA".to_string(),
                    amounts: amounts(dec!(100), dec!(19), dec!(119)),
                },
                RcvEntitySummary {
                    rut: Rut::parse("10.000.013-K").unwrap(),
                    name: "Proveedor Dos Ltda".to_string(),
                    amounts: amounts(dec!(100), dec!(19), dec!(119)),
                },
            ],
        };

        let totals = summary.entity_totals();
        assert_eq!(totals.document_count, 2);
        assert_eq!(totals.total_amount, dec!(238));
        assert_eq!(summary.entity_delta(), Some(dec!(119)));
    }

    #[test]
    fn test_summary_deserializes_with_defaults() {
        let json = r#"{
            "register": "sales",
            "period": "2024-03",
            "totals": {"net_amount": "100", "iva_amount": "19", "total_amount": "119"}
        }"#;
        let summary: RcvSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.register, RcvRegister::Sales);
        assert_eq!(summary.totals.exempt_amount, dec!(0));
        assert_eq!(summary.entity_delta(), None);
    }
}
