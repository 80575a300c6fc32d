//! QuantumChain Dashboard - web interface for logging quantum jobs on an EVM ledger.
//!
//! The dashboard lets a logged-in user:
//!
//! - Estimate time and cost of a job for a given provider
//! - Analyse QASM or a prompt with the text-generation model
//! - Log the job to the ledger contract from the service account
//! - Browse the job history, filtered by role and connected wallet
//! - Chat with the assistant
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qchain_ai::StaticGenerator;
//! use qchain_core::{Address, QchainConfig};
//! use qchain_dashboard::{AppState, create_router};
//! use qchain_ledger::MemoryLedger;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = QchainConfig::default();
//!     let submitter = Address::from_bytes([0xaa; 20]);
//!     let state = Arc::new(AppState::new(
//!         config.clone(),
//!         Arc::new(MemoryLedger::new(submitter)),
//!         Arc::new(StaticGenerator::unavailable()),
//!     ));
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address().unwrap()).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod auth;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;
pub mod tracing_config;

pub use auth::CurrentSession;
pub use dto::{HealthResponse, JobListResponse, JobView, SubmitJobRequest, SubmitJobResponse};
pub use error::ApiError;
pub use server::create_router;
pub use state::{AppState, Session};
pub use tracing_config::{TracingConfig, TracingFormat, init_tracing};
