//! Domain layer: entities, value objects and the storage ports they flow
//! through.

pub mod account;
pub mod card;
pub mod client;
pub mod loan;
pub mod ports;
pub mod transaction;
