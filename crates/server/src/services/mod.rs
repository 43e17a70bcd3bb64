//! Domain services: auth primitives, authorization checks, and order
//! pricing/transition rules. Pure logic lives here so it can be tested
//! without a database; handlers orchestrate these with the repositories.

pub mod auth;
pub mod authz;
pub mod orders;
