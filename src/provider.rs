//! Trait seams for the two remote counterparties: the wallet provider and
//! the deployed voting contract.
//!
//! The rest of the crate only ever talks to these traits, so a JSON-RPC
//! node, a browser bridge, or an in-memory simulation all plug in the
//! same way. Both counterparties are non-deterministic; every method can
//! fail and callers treat results as snapshots, never as locked state.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Address, Amount, QuestionId};

/// Transport-level failure taxonomy. The gateway maps these into the
/// user-facing [`crate::Error`]; keeping them separate lets each call
/// site decide what "not found" or "rejected" means in context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("not found")]
    NotFound,

    #[error("reverted: {0}")]
    Reverted(String),

    #[error("transport: {0}")]
    Transport(String),
}

/// Handle for a submitted, not-yet-durable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

/// Returned once a transaction is confirmed on chain. Creation receipts
/// carry the id the contract assigned to the new question.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx: TxHash,
    pub created_id: Option<QuestionId>,
}

/// Raw question detail as the contract returns it, before the gateway
/// joins in per-option counts and the viewer's vote flag.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDetail {
    pub title: String,
    pub options: Vec<String>,
    pub is_active: bool,
}

/// The user's signing identity: address disclosure and balance reads.
/// Signing itself happens implicitly inside the contract's write calls.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the provider for account access. `Unreachable` means no
    /// provider is installed/listening; `Rejected` means the user said no.
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;

    async fn get_balance(&self, account: &Address) -> Result<Amount, RpcError>;
}

/// The deployed contract's remote interface, verbatim. Write methods
/// return a pending handle; nothing is durable until [`confirm`] resolves.
///
/// [`confirm`]: VotingContract::confirm
#[async_trait]
pub trait VotingContract: Send + Sync {
    async fn question_count(&self) -> Result<u64, RpcError>;

    async fn question_id_at(&self, index: u64) -> Result<QuestionId, RpcError>;

    async fn get_question(&self, id: &QuestionId) -> Result<QuestionDetail, RpcError>;

    async fn vote_count(&self, id: &QuestionId, option: &str) -> Result<u64, RpcError>;

    async fn has_voted(&self, id: &QuestionId, account: &Address) -> Result<bool, RpcError>;

    async fn deposit_of(&self, account: &Address, id: &QuestionId) -> Result<Amount, RpcError>;

    async fn submit_create(&self, title: &str, options: &[String]) -> Result<TxHash, RpcError>;

    /// Payable: `deposit` rides along as the transaction value.
    async fn submit_vote(
        &self,
        id: &QuestionId,
        option: &str,
        deposit: Amount,
    ) -> Result<TxHash, RpcError>;

    async fn submit_withdraw(&self, account: &Address) -> Result<TxHash, RpcError>;

    /// Resolves when the transaction is durable on chain, or with
    /// `Reverted` if the contract rejected it. May hang indefinitely on a
    /// stalled chain; the gateway bounds the wait.
    async fn confirm(&self, tx: &TxHash) -> Result<TxReceipt, RpcError>;
}
