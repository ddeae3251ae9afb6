use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Error;
use crate::provider::{RpcError, WalletProvider};
use crate::types::{Address, Amount};

/// Session-scoped wallet identity. Holds at most one connected account;
/// populated on an explicit connect, cleared on disconnect, never
/// persisted beyond the session.
pub struct WalletConnector {
    provider: Arc<dyn WalletProvider>,
    account: Option<Address>,
}

impl WalletConnector {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            account: None,
        }
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Requests account access and adopts the first authorized address.
    ///
    /// A missing provider and a user refusal surface as distinct errors
    /// ([`Error::NoProvider`] vs [`Error::ConnectRejected`]); neither
    /// panics. There is no automatic retry: the caller re-invokes this on
    /// the next explicit connect action.
    pub async fn connect(&mut self) -> Result<Address, Error> {
        let accounts = self.provider.request_accounts().await.map_err(|e| match e {
            RpcError::Unreachable(detail) => {
                warn!("wallet provider unreachable: {detail}");
                Error::NoProvider
            }
            RpcError::Rejected(_) => Error::ConnectRejected,
            other => Error::Transport(other.to_string()),
        })?;

        let account = accounts.into_iter().next().ok_or(Error::ConnectRejected)?;
        info!("wallet connected: {}", account.short());
        self.account = Some(account.clone());
        Ok(account)
    }

    pub fn disconnect(&mut self) {
        if self.account.take().is_some() {
            info!("wallet disconnected");
        }
    }

    /// Chain balance of the connected account.
    pub async fn wallet_balance(&self) -> Result<Amount, Error> {
        let account = self.account.as_ref().ok_or(Error::NotConnected)?;
        Ok(self.provider.get_balance(account).await?)
    }
}
