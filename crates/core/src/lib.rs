//! Harborfront Core - Shared domain types.
//!
//! This crate provides the types shared between Harborfront components.
//! It contains only types and their invariants - no I/O, no database
//! access, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles, and the order status machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
