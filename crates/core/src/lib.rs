//! Core bookkeeping logic for Bukubesar.
//!
//! This crate contains pure business logic with no web or database dependencies.
//! Storage hands in what it looked up and receives a decision or a report.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal rules and balance polarity
//! - `chart` - Chart of accounts rules
//! - `reports` - Ledger, trial balance, profit & loss and balance sheet assembly
//! - `auth` - Password hashing and user roles

pub mod auth;
pub mod chart;
pub mod ledger;
pub mod reports;
