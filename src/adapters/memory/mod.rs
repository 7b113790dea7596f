//! In-memory adapters - Non-persistent implementations of the
//! family-group ports.
//!
//! This module provides:
//! - `InMemoryFamilyStore` - One shared state behind every persistence
//!   port, with snapshot transactions

mod family_store;

pub use family_store::InMemoryFamilyStore;
