//! CLI command implementations.

pub mod analyse;
pub mod auth;
pub mod chat;
pub mod common;
pub mod contract;
pub mod estimate;
pub mod history;
pub mod submit;
pub mod tps;
pub mod version;
pub mod wallet;
