//! Core business logic for Conciliador.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All I/O goes through the [`store::RecordStore`] trait.
//!
//! # Modules
//!
//! - `payroll` - Payroll book / liquidation reconciliation and book generation
//! - `journal` - RCV journal proposals and gated posting
//! - `store` - Record store seam and an in-memory implementation

pub mod journal;
pub mod payroll;
pub mod store;
