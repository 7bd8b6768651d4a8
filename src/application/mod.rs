//! Application layer containing the banking operations.
//!
//! [`bank::Bank`] is the entry point: it wires the ledger, loan, account,
//! client and card services over one set of shared stores and one per-account lock
//! table, so every balance mutation in the process is serialized per account.

pub mod accounts;
pub mod bank;
pub mod cards;
pub mod clients;
pub mod ledger;
pub mod loans;
pub mod locks;
