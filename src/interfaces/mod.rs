//! Outer adapters driving the application from batch input.

pub mod batch;
pub mod csv;
