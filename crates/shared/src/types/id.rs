//! Typed IDs for type-safe entity references.
//!
//! A `CompanyId` can never be passed where a `PayrollBookId` is expected, which
//! matters because every core call is scoped explicitly by company.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a typed UUID wrapper.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new time-ordered ID (UUID v7).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company (the tenant of every record).");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(ContractId, "Unique identifier for an employment contract.");
typed_id!(PayrollBookId, "Unique identifier for a payroll book (libro de remuneraciones).");
typed_id!(PayrollBookDetailId, "Unique identifier for a payroll book row.");
typed_id!(LiquidationId, "Unique identifier for a liquidation record (liquidación de sueldo).");
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(LedgerId, "Unique identifier for a general ledger (libro diario).");
