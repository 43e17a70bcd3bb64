//! Core types for Harborfront.
//!
//! Type-safe wrappers for the domain concepts shared across the workspace.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::UserRole;
pub use status::{OrderStatus, StatusParseError};
