//! QuantumChain ledger access.
//!
//! Job receipts live in a small logger contract on an EVM test network. This
//! crate reads and writes that contract without a full Ethereum stack: plain
//! JSON-RPC over reqwest, a minimal ABI codec, RLP, and EIP-155 signing with
//! k256.
//!
//! # Overview
//!
//! - [`Ledger`] is what the rest of the workspace programs against
//! - [`ContractLedger`] talks to the chain, reading history either from
//!   `JobLogged` events or from the `getAllJobs()` view
//! - [`MemoryLedger`] keeps everything in process
//! - [`WalletSession`] and [`ExplorerClient`] back the wallet and network widgets
//!
//! # Example
//!
//! ```
//! use qchain_core::Address;
//! use qchain_ledger::{Ledger, MemoryLedger};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let me = Address::parse("0x00000000000000000000000000000000000000aa").unwrap();
//!     let ledger = MemoryLedger::new(me);
//!     ledger.log_job("Untitled Job", "[IBM Quantum | prompt] Factor 15").await.unwrap();
//!     assert_eq!(ledger.fetch_jobs().await.unwrap().len(), 1);
//! });
//! ```

pub mod abi;
pub mod error;
pub mod explorer;
pub mod ledger;
pub mod rlp;
pub mod rpc;
pub mod signer;
pub mod wallet;

pub use error::{LedgerError, LedgerResult};
pub use explorer::ExplorerClient;
pub use ledger::{ContractLedger, Ledger, MemoryLedger, TxReceipt};
pub use rpc::{HttpTransport, JsonRpcClient, RpcTransport};
pub use signer::{LegacyTransaction, LocalSigner, SignedTransaction};
pub use wallet::{WalletSession, format_units};
