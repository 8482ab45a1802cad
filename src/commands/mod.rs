//! Commands module - CLI command implementations.

pub mod migrate;
pub mod promote;
pub mod serve;
