//! Family Groups - Shared subscription membership service
//!
//! This crate implements family-group subscription sharing: owners of a
//! family plan invite members by email, members accept or decline, and
//! the group set on the owner's subscription tracks who is covered.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
