//! The pool ledger: the single serialization point for pool state.
//!
//! # Thread Safety
//!
//! The state sits behind one `parking_lot::RwLock`.  Every submission holds
//! the write lock for its whole validate-then-apply step, so mutations are
//! totally ordered and never interleave.  Queries share the read lock and
//! always see a state between two submissions.
//!
//! ```text
//!   submit / submit_raw ──▶ write lock ──▶ processor ──▶ Receipt | PoolError
//!   query / accessors   ──▶ read lock  ──▶ QueryResponse
//! ```

use {
    crate::{
        config::{ConfigError, LedgerConfig},
        error::PoolError,
        instruction::{PoolInstruction, PoolQuery, QueryResponse, Submission},
        processor::{process_query, process_submission, Receipt},
        state::{PoolState, VoteTally},
        strategy::Strategy,
    },
    log::*,
    parking_lot::RwLock,
    solana_pubkey::Pubkey,
    std::sync::atomic::{AtomicU64, Ordering},
    thiserror::Error,
};

/// Errors from constructing a ledger out of a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] PoolError),
}

/// Submission counters, readable without taking the state lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub accepted: u64,
    pub rejected: u64,
}

/// Owns a [`PoolState`] and serialises every access to it.
#[derive(Debug)]
pub struct PoolLedger {
    state: RwLock<PoolState>,
    config: LedgerConfig,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl PoolLedger {
    /// Genesis: a new pool owned by `owner`.
    pub fn new(owner: Pubkey, config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!("yield pool created, owner {owner}");
        Ok(Self::with_state(PoolState::genesis(owner), config))
    }

    /// Resume from a serialised snapshot produced by [`PoolLedger::snapshot_bytes`].
    ///
    /// Snapshots whose aggregates do not add up are refused.
    pub fn from_snapshot(data: &[u8], config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let state = PoolState::deserialize(data).map_err(|err| {
            warn!("refusing undecodable pool snapshot: {err}");
            PoolError::InvalidStateData
        })?;
        if !state.aggregates_consistent() {
            warn!("refusing pool snapshot with inconsistent aggregates");
            return Err(PoolError::InvalidStateData.into());
        }
        Ok(Self::with_state(state, config))
    }

    fn with_state(state: PoolState, config: LedgerConfig) -> Self {
        Self {
            state: RwLock::new(state),
            config,
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Submission interface
    // -----------------------------------------------------------------------

    /// Apply one submission atomically.
    pub fn submit(&self, submission: &Submission) -> Result<Receipt, PoolError> {
        let result = {
            let mut state = self.state.write();
            process_submission(&mut state, &self.config, submission)
        };
        self.record(&result);
        result
    }

    /// Decode bincode instruction data and apply it as a submission.
    pub fn submit_raw(
        &self,
        caller: Pubkey,
        attached_value: u64,
        data: &[u8],
    ) -> Result<Receipt, PoolError> {
        let instruction = match PoolInstruction::decode(data, self.config.max_instruction_data_len)
        {
            Ok(instruction) => instruction,
            Err(err) => {
                debug!("undecodable instruction ({} bytes) from {caller}", data.len());
                self.rejected.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };
        self.submit(&Submission::new(caller, attached_value, instruction))
    }

    pub fn deposit(&self, caller: Pubkey, amount: u64) -> Result<Receipt, PoolError> {
        self.submit(&Submission::deposit(caller, amount))
    }

    pub fn withdraw(&self, caller: Pubkey, amount: u64) -> Result<Receipt, PoolError> {
        self.submit(&Submission::withdraw(caller, amount))
    }

    pub fn vote(&self, caller: Pubkey, strategy: Strategy) -> Result<Receipt, PoolError> {
        self.submit(&Submission::vote(caller, strategy.name()))
    }

    pub fn execute_strategy(&self, caller: Pubkey) -> Result<Receipt, PoolError> {
        self.submit(&Submission::execute_strategy(caller))
    }

    pub fn reset_voting(&self, caller: Pubkey) -> Result<Receipt, PoolError> {
        self.submit(&Submission::reset_voting(caller))
    }

    fn record(&self, result: &Result<Receipt, PoolError>) {
        let counter = if result.is_ok() {
            &self.accepted
        } else {
            &self.rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    // -----------------------------------------------------------------------
    // Query interface
    // -----------------------------------------------------------------------

    pub fn query(&self, query: &PoolQuery) -> QueryResponse {
        process_query(&self.state.read(), query)
    }

    pub fn total_deposits(&self) -> u64 {
        self.state.read().total_deposits
    }

    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.state.read().balance_of(account)
    }

    pub fn votes(&self) -> VoteTally {
        self.state.read().votes
    }

    pub fn vote_of(&self, account: &Pubkey) -> Option<Strategy> {
        self.state.read().vote_of(account)
    }

    pub fn is_voting_active(&self) -> bool {
        self.state.read().voting_active
    }

    /// Value physically custodied by the pool.
    pub fn contract_balance(&self) -> u64 {
        self.state.read().vault_lamports
    }

    pub fn owner(&self) -> Pubkey {
        self.state.read().owner
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> PoolState {
        self.state.read().clone()
    }

    /// Serialised snapshot (discriminator + borsh).
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, PoolError> {
        self.state
            .read()
            .serialize()
            .map_err(|_| PoolError::InvalidStateData)
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
