use std::time::Duration;

use thiserror::Error;

use crate::provider::RpcError;
use crate::types::QuestionId;

/// Everything that can go wrong between the user and the chain.
///
/// Validation variants are raised before any remote call; transaction
/// variants only after a submission, with the confirmed/unconfirmed
/// distinction preserved so callers never assume durability.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no wallet provider detected; install a wallet or point BALLOT_RPC_URL at a node")]
    NoProvider,

    #[error("wallet authorization rejected by the user")]
    ConnectRejected,

    #[error("no account connected")]
    NotConnected,

    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),

    #[error("question title must not be empty")]
    EmptyTitle,

    #[error("a question needs at least two options")]
    TooFewOptions,

    #[error("option labels must not be empty")]
    EmptyOption,

    #[error("\"{0}\" is not an option of question {1}")]
    UnknownOption(String, QuestionId),

    #[error("deposit must be a positive amount")]
    NonPositiveDeposit,

    #[error("not a valid amount: {0:?}")]
    InvalidAmount(String),

    #[error("already voted on question {0}")]
    AlreadyVoted(QuestionId),

    #[error("nothing deposited, nothing to withdraw")]
    NothingToWithdraw,

    #[error("transaction rejected in the wallet: {0}")]
    TxDeclined(String),

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("transaction not confirmed within {0:?}")]
    ConfirmTimeout(Duration),

    #[error("rpc transport failure: {0}")]
    Transport(String),
}

impl Error {
    /// Retrying the identical call may succeed. Reversions and validation
    /// failures are excluded: those fail the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::ConfirmTimeout(_))
    }

    /// Caught before any remote call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyTitle
                | Error::TooFewOptions
                | Error::EmptyOption
                | Error::UnknownOption(..)
                | Error::NonPositiveDeposit
                | Error::InvalidAmount(_)
                | Error::AlreadyVoted(_)
                | Error::NothingToWithdraw
        )
    }
}

impl From<RpcError> for Error {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Rejected(detail) => Error::TxDeclined(detail),
            RpcError::Reverted(reason) => Error::Reverted(reason),
            RpcError::NotFound => Error::Transport("not found".into()),
            RpcError::Unreachable(detail) | RpcError::Transport(detail) => Error::Transport(detail),
        }
    }
}
