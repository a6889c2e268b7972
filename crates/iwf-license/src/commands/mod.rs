//! Command handlers: bridge CLI args -> core reconciliation -> output.

pub mod config_cmd;
pub mod member;
