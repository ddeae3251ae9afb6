//! Typed façade over the contract's remote interface.
//!
//! Reads assemble snapshots out of several sequential-in-time calls; the
//! chain offers no transactional view, so a snapshot is best-effort and
//! accepted as such. Writes all follow the same discipline:
//! validate locally, submit, await confirmation under a bound, and let
//! the caller refetch rather than trust the submission result.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::error::Error;
use crate::provider::{RpcError, TxHash, TxReceipt, VotingContract};
use crate::types::{Address, Amount, NetworkStats, Question, QuestionId, VotingStatus};

pub struct Gateway {
    contract: Arc<dyn VotingContract>,
    confirm_timeout: Duration,
}

impl Gateway {
    pub fn new(contract: Arc<dyn VotingContract>, confirm_timeout: Duration) -> Self {
        Self {
            contract,
            confirm_timeout,
        }
    }

    pub async fn question_count(&self) -> Result<u64, Error> {
        Ok(self.contract.question_count().await?)
    }

    /// Count-then-index listing. The count is only valid as of the moment
    /// it was read; if a slot disappears mid-loop because the set changed
    /// under us, the listing ends early with whatever it has rather than
    /// failing.
    pub async fn list_question_ids(&self) -> Result<Vec<QuestionId>, Error> {
        let count = self.contract.question_count().await?;
        let mut ids = Vec::with_capacity(count as usize);
        for index in 0..count {
            match self.contract.question_id_at(index).await {
                Ok(id) => ids.push(id),
                Err(RpcError::NotFound) => {
                    warn!(
                        "question count changed during listing, stopping at {} of {count}",
                        ids.len()
                    );
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(ids)
    }

    /// Assembles the full snapshot for one question: detail, the viewer's
    /// vote flag, and per-option counts fetched concurrently. The reads
    /// land at slightly different times; the result is a snapshot, not a
    /// consistent view.
    pub async fn fetch_question(
        &self,
        id: &QuestionId,
        viewer: &Address,
    ) -> Result<Question, Error> {
        let detail = match self.contract.get_question(id).await {
            Ok(detail) => detail,
            Err(RpcError::NotFound) => return Err(Error::QuestionNotFound(id.clone())),
            Err(e) => return Err(e.into()),
        };
        let has_voted = self.contract.has_voted(id, viewer).await?;
        let vote_counts = try_join_all(
            detail
                .options
                .iter()
                .map(|option| self.vote_count(id, option)),
        )
        .await?;

        Ok(Question {
            id: id.clone(),
            title: detail.title,
            options: detail.options,
            vote_counts,
            is_active: detail.is_active,
            has_voted,
        })
    }

    /// An option nobody voted for reads as zero, never as an error.
    pub async fn vote_count(&self, id: &QuestionId, option: &str) -> Result<u64, Error> {
        match self.contract.vote_count(id, option).await {
            Ok(count) => Ok(count),
            Err(RpcError::NotFound) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn has_voted(&self, id: &QuestionId, account: &Address) -> Result<bool, Error> {
        Ok(self.contract.has_voted(id, account).await?)
    }

    pub async fn deposit_of(&self, account: &Address, id: &QuestionId) -> Result<Amount, Error> {
        Ok(self.contract.deposit_of(account, id).await?)
    }

    /// All question snapshots, in id-listing (creation) order. A question
    /// deleted between listing and fetching is skipped, same race
    /// tolerance as the listing itself.
    pub async fn fetch_all(&self, viewer: &Address) -> Result<Vec<Question>, Error> {
        let ids = self.list_question_ids().await?;
        let mut questions = Vec::with_capacity(ids.len());
        let results = join_all(ids.iter().map(|id| self.fetch_question(id, viewer))).await;
        for result in results {
            match result {
                Ok(question) => questions.push(question),
                Err(Error::QuestionNotFound(id)) => {
                    warn!("question {id} vanished between listing and fetch");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(questions)
    }

    /// The account's standing on every question.
    pub async fn fetch_statuses(&self, account: &Address) -> Result<Vec<VotingStatus>, Error> {
        let ids = self.list_question_ids().await?;
        let statuses = try_join_all(ids.into_iter().map(|id| async move {
            let has_voted = self.contract.has_voted(&id, account).await?;
            let deposit = self.contract.deposit_of(account, &id).await?;
            Ok::<_, Error>(VotingStatus {
                question_id: id,
                has_voted,
                deposit,
            })
        }))
        .await?;
        Ok(statuses)
    }

    pub async fn network_stats(&self, viewer: &Address) -> Result<NetworkStats, Error> {
        let questions = self.fetch_all(viewer).await?;
        Ok(NetworkStats {
            question_count: questions.len() as u64,
            total_votes: questions.iter().map(Question::total_votes).sum(),
        })
    }

    /// Creates a question and returns the id the contract assigned once
    /// the transaction is confirmed. Validation happens before anything
    /// goes over the wire; any failure leaves no local trace.
    pub async fn create_question(
        &self,
        title: &str,
        options: &[String],
    ) -> Result<QuestionId, Error> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let options: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
        if options.len() < 2 {
            return Err(Error::TooFewOptions);
        }
        if options.iter().any(|o| o.is_empty()) {
            return Err(Error::EmptyOption);
        }

        let tx = self.contract.submit_create(title, &options).await?;
        let receipt = self.await_confirmation(&tx).await?;
        let id = receipt
            .created_id
            .ok_or_else(|| Error::Transport("confirmation carried no question id".into()))?;
        info!("question {id} created");
        Ok(id)
    }

    /// Casts a vote with a positive deposit riding along.
    ///
    /// The already-voted guard reads from the caller's snapshot to save
    /// the round trip; the contract still enforces it authoritatively if
    /// the snapshot was stale, and that surfaces as [`Error::Reverted`].
    pub async fn vote(
        &self,
        question: &Question,
        option: &str,
        deposit: Amount,
    ) -> Result<(), Error> {
        if question.has_voted {
            return Err(Error::AlreadyVoted(question.id.clone()));
        }
        if !question.has_option(option) {
            return Err(Error::UnknownOption(
                option.to_string(),
                question.id.clone(),
            ));
        }
        if deposit.is_zero() {
            return Err(Error::NonPositiveDeposit);
        }

        let tx = self
            .contract
            .submit_vote(&question.id, option, deposit)
            .await?;
        self.await_confirmation(&tx).await?;
        info!("vote on question {} confirmed", question.id);
        Ok(())
    }

    /// Reclaims the account's deposits. `deposited` is the caller's
    /// latest snapshot of its total; a zero balance is refused here,
    /// before any remote call is issued.
    pub async fn withdraw(&self, account: &Address, deposited: Amount) -> Result<(), Error> {
        if deposited.is_zero() {
            return Err(Error::NothingToWithdraw);
        }
        let tx = self.contract.submit_withdraw(account).await?;
        self.await_confirmation(&tx).await?;
        info!("withdrawal for {} confirmed", account.short());
        Ok(())
    }

    /// Bounded wait for durability. A wait that outlives the configured
    /// timeout reports [`Error::ConfirmTimeout`], which is not the same
    /// thing as a reversion: the transaction may still land later.
    async fn await_confirmation(&self, tx: &TxHash) -> Result<TxReceipt, Error> {
        match timeout(self.confirm_timeout, self.contract.confirm(tx)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::ConfirmTimeout(self.confirm_timeout)),
        }
    }
}
