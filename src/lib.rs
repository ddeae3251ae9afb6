//! Client core for an on-chain voting dapp.
//!
//! The deployed voting contract is the source of truth for questions,
//! votes, and deposit balances; this crate is the layer a front end sits
//! on to talk to it honestly. Three roles collaborate:
//!
//! - [`wallet::WalletConnector`] negotiates the user's signing identity
//!   against a [`provider::WalletProvider`] (concretely, the JSON-RPC
//!   transport in [`rpc`]).
//! - [`gateway::Gateway`] translates application intents into the
//!   contract's remote calls: count-then-index listing, snapshot
//!   assembly, and submit → await-confirmation → refetch for every write.
//! - [`sync`] holds the per-view state machines (`Idle → Loading →
//!   {Ready, Failed}`) that drive the gateway from lifecycle events and
//!   reconcile results into renderable state, with [`views`] supplying
//!   the pure filter/sort/proportion helpers.
//!
//! Data flow: connector produces an account → gateway reads question and
//! vote state or submits transactions with it → the synchronizer consumes
//! gateway results and refetches after any confirmed write. Reads are
//! point-in-time snapshots that can be stale immediately; other accounts
//! vote concurrently and there is no client-side way to lock the chain,
//! so the views accept mildly torn snapshots instead of pretending to a
//! consistency the remote side never offered.

use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod rpc;
pub mod sync;
pub mod types;
pub mod views;
pub mod wallet;

pub use error::Error;

/// Installs the global tracing subscriber, filtered by `RUST_LOG`.
/// Harmless to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
