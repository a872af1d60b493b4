//! Command handlers.

pub mod install;
pub mod purge;
