//! CLI command handlers.

pub mod corpus;
pub mod predict;
