//! QuantumChain core domain.
//!
//! This crate holds everything about QuantumChain that does not talk to the
//! network: the job record model, the estimation heuristic shown next to the
//! submission form, role/address based history filtering, the demo user
//! directory and the workspace-wide configuration.
//!
//! # Overview
//!
//! - [`JobRecord`] and [`JobPayload`] model what the ledger returns
//! - [`estimate`] computes the time/cost display for a provider and input
//! - [`JobFilter`] and [`attach_analysis`] shape the history view
//! - [`UserDirectory`] and [`SessionStore`] replace browser local storage
//! - [`QchainConfig`] loads YAML + `.env` + `QCHAIN_*` overrides
//!
//! # Example
//!
//! ```
//! use qchain_core::{Address, JobFilter, Role, estimate};
//!
//! let est = estimate("IBM Quantum", 0, None);
//! assert_eq!(est.time_display(), "25 - 38 seconds");
//!
//! let wallet = Address::parse("0x00000000000000000000000000000000000000aa").unwrap();
//! let filter = JobFilter::new(Role::User, false, Some(wallet));
//! assert!(filter.restricts_to_address());
//! ```

pub mod address;
pub mod analysis;
pub mod config;
pub mod error;
pub mod estimate;
pub mod filter;
pub mod job;
pub mod network;
pub mod session;

pub use address::Address;
pub use analysis::{AnalysisRequest, AnalysisResult};
pub use config::{
    AiSettings, ConfigError, LedgerSettings, LoggingSettings, QchainConfig, QueryMode,
    ServerSettings,
};
pub use error::{CoreError, CoreResult};
pub use estimate::{Estimate, ProviderProfile, estimate, estimate_display};
pub use filter::{JobFilter, attach_analysis};
pub use job::{JobPayload, JobRecord, JobSubmission, SubmissionType};
pub use network::NetworkConfig;
pub use session::{
    Credential, LatestAnalysis, Role, SessionStore, SessionUser, StoredSession, UserDirectory,
};
