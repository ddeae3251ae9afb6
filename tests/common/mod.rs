//! In-memory stand-ins for the wallet and the deployed contract, with
//! fault injection for the failure paths the client has to survive.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use ballot::provider::{
    QuestionDetail, RpcError, TxHash, TxReceipt, VotingContract, WalletProvider,
};
use ballot::types::{Address, Amount, QuestionId};

pub enum WalletMode {
    Working,
    Absent,
    Rejecting,
}

pub struct MockWallet {
    accounts: Vec<Address>,
    balances: HashMap<Address, Amount>,
    mode: WalletMode,
}

impl MockWallet {
    pub fn with_account(account: Address, balance: Amount) -> Self {
        let mut balances = HashMap::new();
        balances.insert(account.clone(), balance);
        Self {
            accounts: vec![account],
            balances,
            mode: WalletMode::Working,
        }
    }

    pub fn absent() -> Self {
        Self {
            accounts: Vec::new(),
            balances: HashMap::new(),
            mode: WalletMode::Absent,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accounts: Vec::new(),
            balances: HashMap::new(),
            mode: WalletMode::Rejecting,
        }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        match self.mode {
            WalletMode::Absent => Err(RpcError::Unreachable("connection refused".into())),
            WalletMode::Rejecting => Err(RpcError::Rejected("user denied account access".into())),
            WalletMode::Working => Ok(self.accounts.clone()),
        }
    }

    async fn get_balance(&self, account: &Address) -> Result<Amount, RpcError> {
        Ok(self.balances.get(account).copied().unwrap_or(Amount::ZERO))
    }
}

enum PendingTx {
    Create { title: String, options: Vec<String> },
    Vote {
        id: QuestionId,
        option: String,
        deposit: Amount,
    },
    Withdraw,
}

#[derive(Default)]
struct ChainState {
    questions: Vec<(QuestionId, QuestionDetail)>,
    votes: HashMap<(QuestionId, String), u64>,
    voted: HashSet<(QuestionId, Address)>,
    deposits: HashMap<(Address, QuestionId), Amount>,
    pending: HashMap<TxHash, PendingTx>,
    next_tx: u64,
    next_question: u64,
    submissions: u64,
    count_reads: u64,
    vanish_from: Option<u64>,
    stall_confirmations: bool,
    fail_reads: bool,
    revert_next: Option<String>,
}

/// Simulated voting contract. Writes are two-phase like the real thing:
/// `submit_*` parks the transaction, `confirm` applies it atomically or
/// rejects it, so nothing is visible to reads before confirmation.
pub struct MockChain {
    /// The identity write submissions are signed with.
    sender: Address,
    state: Mutex<ChainState>,
}

impl MockChain {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Installs a question directly, bypassing the transaction flow.
    pub fn seed_question(&self, title: &str, options: &[&str]) -> QuestionId {
        let mut state = self.state.lock().unwrap();
        let id = QuestionId::new(format!("0x{:064x}", state.next_question));
        state.next_question += 1;
        state.questions.push((
            id.clone(),
            QuestionDetail {
                title: title.to_string(),
                options: options.iter().map(|s| s.to_string()).collect(),
                is_active: true,
            },
        ));
        id
    }

    /// Records a confirmed vote directly; models other accounts or
    /// preexisting state.
    pub fn record_vote(&self, id: &QuestionId, option: &str, account: &Address, deposit: Amount) {
        let mut state = self.state.lock().unwrap();
        *state
            .votes
            .entry((id.clone(), option.to_string()))
            .or_insert(0) += 1;
        state.voted.insert((id.clone(), account.clone()));
        let entry = state
            .deposits
            .entry((account.clone(), id.clone()))
            .or_insert(Amount::ZERO);
        *entry = entry.saturating_add(deposit);
    }

    /// Id slots at or past `index` start answering "not found", as if the
    /// question set shrank after the count was read.
    pub fn vanish_from(&self, index: u64) {
        self.state.lock().unwrap().vanish_from = Some(index);
    }

    /// Confirmations never resolve from now on.
    pub fn stall_confirmations(&self) {
        self.state.lock().unwrap().stall_confirmations = true;
    }

    /// The next confirmation reverts with `reason` and drops the
    /// transaction without applying it.
    pub fn revert_next(&self, reason: &str) {
        self.state.lock().unwrap().revert_next = Some(reason.to_string());
    }

    pub fn set_fail_reads(&self, on: bool) {
        self.state.lock().unwrap().fail_reads = on;
    }

    /// How many write transactions were ever submitted.
    pub fn submissions(&self) -> u64 {
        self.state.lock().unwrap().submissions
    }

    /// How many times the question count was read; a proxy for "did the
    /// client actually refetch".
    pub fn count_reads(&self) -> u64 {
        self.state.lock().unwrap().count_reads
    }

    fn submit(&self, pending: PendingTx) -> Result<TxHash, RpcError> {
        let mut state = self.state.lock().unwrap();
        let tx = TxHash(format!("0x{:x}", state.next_tx));
        state.next_tx += 1;
        state.submissions += 1;
        state.pending.insert(tx.clone(), pending);
        Ok(tx)
    }
}

#[async_trait]
impl VotingContract for MockChain {
    async fn question_count(&self) -> Result<u64, RpcError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(RpcError::Transport("node unavailable".into()));
        }
        state.count_reads += 1;
        Ok(state.questions.len() as u64)
    }

    async fn question_id_at(&self, index: u64) -> Result<QuestionId, RpcError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(RpcError::Transport("node unavailable".into()));
        }
        if state.vanish_from.is_some_and(|from| index >= from) {
            return Err(RpcError::NotFound);
        }
        state
            .questions
            .get(index as usize)
            .map(|(id, _)| id.clone())
            .ok_or(RpcError::NotFound)
    }

    async fn get_question(&self, id: &QuestionId) -> Result<QuestionDetail, RpcError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(RpcError::Transport("node unavailable".into()));
        }
        state
            .questions
            .iter()
            .find(|(qid, _)| qid == id)
            .map(|(_, detail)| detail.clone())
            .ok_or(RpcError::NotFound)
    }

    async fn vote_count(&self, id: &QuestionId, option: &str) -> Result<u64, RpcError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .votes
            .get(&(id.clone(), option.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn has_voted(&self, id: &QuestionId, account: &Address) -> Result<bool, RpcError> {
        let state = self.state.lock().unwrap();
        Ok(state.voted.contains(&(id.clone(), account.clone())))
    }

    async fn deposit_of(&self, account: &Address, id: &QuestionId) -> Result<Amount, RpcError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .deposits
            .get(&(account.clone(), id.clone()))
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    async fn submit_create(&self, title: &str, options: &[String]) -> Result<TxHash, RpcError> {
        self.submit(PendingTx::Create {
            title: title.to_string(),
            options: options.to_vec(),
        })
    }

    async fn submit_vote(
        &self,
        id: &QuestionId,
        option: &str,
        deposit: Amount,
    ) -> Result<TxHash, RpcError> {
        self.submit(PendingTx::Vote {
            id: id.clone(),
            option: option.to_string(),
            deposit,
        })
    }

    async fn submit_withdraw(&self, _account: &Address) -> Result<TxHash, RpcError> {
        self.submit(PendingTx::Withdraw)
    }

    async fn confirm(&self, tx: &TxHash) -> Result<TxReceipt, RpcError> {
        let stalled = self.state.lock().unwrap().stall_confirmations;
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.revert_next.take() {
            state.pending.remove(tx);
            return Err(RpcError::Reverted(reason));
        }

        let pending = state.pending.remove(tx).ok_or(RpcError::NotFound)?;
        match pending {
            PendingTx::Create { title, options } => {
                let id = QuestionId::new(format!("0x{:064x}", state.next_question));
                state.next_question += 1;
                state.questions.push((
                    id.clone(),
                    QuestionDetail {
                        title,
                        options,
                        is_active: true,
                    },
                ));
                Ok(TxReceipt {
                    tx: tx.clone(),
                    created_id: Some(id),
                })
            }
            PendingTx::Vote {
                id,
                option,
                deposit,
            } => {
                if !state.questions.iter().any(|(qid, _)| qid == &id) {
                    return Err(RpcError::Reverted("unknown question".into()));
                }
                let voter = self.sender.clone();
                if state.voted.contains(&(id.clone(), voter.clone())) {
                    return Err(RpcError::Reverted("already voted".into()));
                }
                *state.votes.entry((id.clone(), option)).or_insert(0) += 1;
                state.voted.insert((id.clone(), voter.clone()));
                let entry = state.deposits.entry((voter, id)).or_insert(Amount::ZERO);
                *entry = entry.saturating_add(deposit);
                Ok(TxReceipt {
                    tx: tx.clone(),
                    created_id: None,
                })
            }
            PendingTx::Withdraw => {
                state.deposits.retain(|(account, _), _| account != &self.sender);
                Ok(TxReceipt {
                    tx: tx.clone(),
                    created_id: None,
                })
            }
        }
    }
}
