//! API endpoint handlers.

pub mod analyse;
pub mod auth;
pub mod chat;
pub mod contract;
pub mod estimate;
pub mod health;
pub mod jobs;
pub mod network;
pub mod stats;
pub mod wallet;
