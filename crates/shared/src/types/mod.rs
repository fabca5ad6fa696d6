//! Common types used across the application.

pub mod currency;
pub mod id;
pub mod period;
pub mod rut;

pub use currency::Currency;
pub use id::*;
pub use period::{Period, PeriodError};
pub use rut::{Rut, RutError};
