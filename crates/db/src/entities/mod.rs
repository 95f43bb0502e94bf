//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod chart_of_accounts;
pub mod journal_entries;
pub mod journal_entry_details;
pub mod sea_orm_active_enums;
pub mod users;
