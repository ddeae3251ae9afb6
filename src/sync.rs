//! View-state synchronization: drives gateway fetches off lifecycle
//! events and reconciles the results into renderable state.
//!
//! Each view follows the same machine: `Idle → Loading → {Ready, Failed}`,
//! with any refresh trigger looping back through `Loading`. `Failed` is
//! never terminal; re-running the same fetch recovers it. A confirmed
//! write always refetches the whole affected aggregate instead of
//! patching locally, because the contract computes the authoritative
//! numbers and an optimistic patch cannot be trusted to match them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::types::{Address, Amount, Question, QuestionId, VotingStatus};
use crate::views::{self, Filters};
use crate::wallet::WalletConnector;

/// Per-view fetch lifecycle.
#[derive(Debug)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(Error),
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            ViewState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

/// The list/detail/vote view model: one snapshot of all questions for the
/// current viewer, plus the ephemeral list controls.
pub struct QuestionBoard {
    gateway: Arc<Gateway>,
    viewer: Option<Address>,
    pub filters: Filters,
    state: ViewState<Vec<Question>>,
    fetched_at: Option<Instant>,
    max_age: Duration,
}

impl QuestionBoard {
    pub fn new(gateway: Arc<Gateway>, max_age: Duration) -> Self {
        Self {
            gateway,
            viewer: None,
            filters: Filters::default(),
            state: ViewState::Idle,
            fetched_at: None,
            max_age,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Question>> {
        &self.state
    }

    /// The `Ready` snapshot with filters and sort applied; empty while
    /// loading, failed, or idle.
    pub fn visible(&self) -> Vec<&Question> {
        match &self.state {
            ViewState::Ready(questions) => views::apply(&self.filters, questions),
            _ => Vec::new(),
        }
    }

    /// An account change always invalidates whatever was on screen.
    pub async fn set_account(&mut self, viewer: Option<Address>) {
        self.viewer = viewer;
        self.fetched_at = None;
        if self.viewer.is_some() {
            self.refresh().await;
        } else {
            self.state = ViewState::Idle;
        }
    }

    /// Unconditional refetch of the whole aggregate.
    pub async fn refresh(&mut self) {
        let Some(viewer) = self.viewer.clone() else {
            self.state = ViewState::Idle;
            return;
        };
        self.state = ViewState::Loading;
        match self.gateway.fetch_all(&viewer).await {
            Ok(questions) => {
                self.fetched_at = Some(Instant::now());
                self.state = ViewState::Ready(questions);
            }
            Err(e) => {
                warn!("question fetch failed: {e}");
                self.fetched_at = None;
                self.state = ViewState::Failed(e);
            }
        }
    }

    /// Suppresses redundant refetches on rapid re-renders only: data
    /// younger than the configured max age is reused. Anything that
    /// changed remote state goes through [`refresh`] instead, so this
    /// window never masks a post-write refetch.
    ///
    /// [`refresh`]: QuestionBoard::refresh
    pub async fn ensure_fresh(&mut self) {
        if let (ViewState::Ready(_), Some(at)) = (&self.state, self.fetched_at) {
            if at.elapsed() < self.max_age {
                return;
            }
        }
        self.refresh().await;
    }

    /// Votes through the board: snapshot guards first, then the gateway
    /// write, then an unconditional refetch once confirmed. On failure
    /// the current snapshot is left untouched.
    pub async fn vote(
        &mut self,
        id: &QuestionId,
        option: &str,
        deposit: Amount,
    ) -> Result<(), Error> {
        let question = self
            .state
            .data()
            .and_then(|questions| questions.iter().find(|q| &q.id == id))
            .cloned()
            .ok_or_else(|| Error::QuestionNotFound(id.clone()))?;

        self.gateway.vote(&question, option, deposit).await?;
        self.fetched_at = None;
        self.refresh().await;
        Ok(())
    }

    /// Creates a question and refetches so the new entry shows up with
    /// contract-assigned data rather than a local guess.
    pub async fn create(&mut self, title: &str, options: &[String]) -> Result<QuestionId, Error> {
        let id = self.gateway.create_question(title, options).await?;
        self.fetched_at = None;
        self.refresh().await;
        Ok(id)
    }
}

/// The create-question form: a title plus a growable option list that
/// never shrinks below two rows.
#[derive(Debug, Default)]
pub struct CreateQuestionForm {
    pub title: String,
    options: Vec<String>,
}

impl CreateQuestionForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            options: vec![String::new(); 2],
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Removal is refused at the two-row minimum.
    pub fn remove_option(&mut self, index: usize) {
        if self.options.len() > 2 && index < self.options.len() {
            self.options.remove(index);
        }
    }

    pub fn set_option(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.options.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Inline validation; a form that fails here never reaches the chain.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }
        if self.options.len() < 2 {
            return Err(Error::TooFewOptions);
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(Error::EmptyOption);
        }
        Ok(())
    }

    /// Submits and, on confirmed success, resets the form. A failed
    /// submission leaves the user's input intact for another attempt.
    pub async fn submit(&mut self, gateway: &Gateway) -> Result<QuestionId, Error> {
        self.validate()?;
        let id = gateway.create_question(&self.title, &self.options).await?;
        self.title.clear();
        self.options = vec![String::new(); 2];
        Ok(id)
    }
}

/// Everything the profile screen shows for the connected account.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub account: Address,
    pub wallet_balance: Amount,
    pub statuses: Vec<VotingStatus>,
}

impl ProfileData {
    pub fn participation_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.has_voted).count()
    }

    pub fn deposited_total(&self) -> Amount {
        self.statuses
            .iter()
            .fold(Amount::ZERO, |sum, s| sum.saturating_add(s.deposit))
    }
}

/// Profile/balance view: wallet balance plus per-question standing.
pub struct ProfileView {
    gateway: Arc<Gateway>,
    state: ViewState<ProfileData>,
}

impl ProfileView {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState<ProfileData> {
        &self.state
    }

    pub async fn refresh(&mut self, wallet: &WalletConnector) {
        let Some(account) = wallet.account().cloned() else {
            self.state = ViewState::Idle;
            return;
        };
        self.state = ViewState::Loading;

        let fetched = async {
            let wallet_balance = wallet.wallet_balance().await?;
            let statuses = self.gateway.fetch_statuses(&account).await?;
            Ok::<_, Error>(ProfileData {
                account: account.clone(),
                wallet_balance,
                statuses,
            })
        }
        .await;

        match fetched {
            Ok(data) => self.state = ViewState::Ready(data),
            Err(e) => {
                warn!("profile fetch failed: {e}");
                self.state = ViewState::Failed(e);
            }
        }
    }

    /// Withdraws the account's deposits, refusing on the spot when the
    /// current snapshot shows nothing deposited so a pointless
    /// transaction never reaches the wallet. Requires a `Ready` profile.
    pub async fn withdraw(&mut self, wallet: &WalletConnector) -> Result<(), Error> {
        let (account, deposited) = match &self.state {
            ViewState::Ready(data) => (data.account.clone(), data.deposited_total()),
            _ => return Err(Error::NotConnected),
        };

        self.gateway.withdraw(&account, deposited).await?;
        self.refresh(wallet).await;
        Ok(())
    }
}
