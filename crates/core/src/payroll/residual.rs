//! Residual absorption.
//!
//! An authoritative total is reconciled against a set of itemized components
//! by putting whatever the items do not explain into a catch-all bucket. The
//! bucket never goes negative; the signed difference is kept alongside it so
//! callers can see when the items overshoot the total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of absorbing the unexplained part of a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residual {
    /// Catch-all amount: `max(0, delta)`.
    pub amount: Decimal,
    /// Unclamped `authoritative - known`. Negative when the items exceed the
    /// authoritative total.
    pub delta: Decimal,
}

impl Residual {
    /// Absorbs `authoritative - sum(known)` into a non-negative residual.
    #[must_use]
    pub fn absorb<I>(authoritative: Decimal, known: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let known_sum: Decimal = known.into_iter().sum();
        Self::from_delta(authoritative - known_sum)
    }

    /// Builds a residual from an already computed delta.
    #[must_use]
    pub fn from_delta(delta: Decimal) -> Self {
        Self {
            amount: delta.max(Decimal::ZERO),
            delta,
        }
    }

    /// True when the clamp discarded part of the delta.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        self.delta < Decimal::ZERO
    }

    /// How much the itemized components exceed the authoritative total.
    #[must_use]
    pub fn excess(&self) -> Option<Decimal> {
        self.is_clamped().then(|| -self.delta)
    }
}
