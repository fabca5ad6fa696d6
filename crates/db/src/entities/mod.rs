//! `SeaORM` entities.

pub mod contracts;
pub mod employees;
pub mod journal_entries;
pub mod journal_lines;
pub mod liquidations;
pub mod payroll_book_details;
pub mod payroll_books;
pub mod sea_orm_active_enums;
