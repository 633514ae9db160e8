//! Instruction and query definitions for the Yield Pool program.
//!
//! Instructions are serialised / deserialised via `bincode` (fixed-width
//! integers, the layout Agave built-in programs use).  A strategy travels as
//! its wire name so that hosts speaking only strings can vote; the processor
//! is the single place where the name is parsed.

use {
    crate::{
        error::PoolError,
        state::{PoolState, VoteTally},
        strategy::Strategy,
    },
    bincode::Options,
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

/// State-changing instructions supported by the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolInstruction {
    /// Credit the attached value to the caller's balance.
    ///
    /// The amount is the submission's `attached_value`; this variant carries
    /// no data.
    Deposit,

    /// Pay `amount` of the caller's balance back to the caller.
    Withdraw { amount: u64 },

    /// Put the caller's current balance behind `strategy`, moving it off any
    /// strategy the caller voted for earlier in the round.
    ///
    /// `strategy` must be one of `"Safe"`, `"Risky"`, `"Charity"`.
    Vote { strategy: String },

    /// Owner only.  Pick the winning strategy, credit its yield to the pool
    /// aggregate and close voting.
    ExecuteStrategy,

    /// Owner only.  Clear every vote and reopen voting.
    ResetVoting,
}

impl PoolInstruction {
    /// Whether this instruction accepts attached value.
    pub fn is_payable(&self) -> bool {
        matches!(self, PoolInstruction::Deposit)
    }

    /// Whether only the pool owner may submit this instruction.
    pub fn is_owner_only(&self) -> bool {
        matches!(
            self,
            PoolInstruction::ExecuteStrategy | PoolInstruction::ResetVoting
        )
    }

    /// Encode for [`crate::ledger::PoolLedger::submit_raw`].
    pub fn encode(&self) -> Result<Vec<u8>, PoolError> {
        bincode_options(u64::MAX)
            .serialize(self)
            .map_err(|_| PoolError::InvalidInstructionData)
    }

    /// Decode instruction data, refusing anything longer than `limit` bytes.
    pub fn decode(data: &[u8], limit: usize) -> Result<Self, PoolError> {
        if data.len() > limit {
            return Err(PoolError::InvalidInstructionData);
        }
        bincode_options(limit as u64)
            .deserialize(data)
            .map_err(|_| PoolError::InvalidInstructionData)
    }
}

fn bincode_options(limit: u64) -> impl Options {
    bincode::options()
        .with_limit(limit)
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

/// A call submitted to the pool: who is calling, what value they attach and
/// which instruction to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub caller: Pubkey,
    pub attached_value: u64,
    pub instruction: PoolInstruction,
}

impl Submission {
    pub fn new(caller: Pubkey, attached_value: u64, instruction: PoolInstruction) -> Self {
        Self {
            caller,
            attached_value,
            instruction,
        }
    }

    pub fn deposit(caller: Pubkey, amount: u64) -> Self {
        Self::new(caller, amount, PoolInstruction::Deposit)
    }

    pub fn withdraw(caller: Pubkey, amount: u64) -> Self {
        Self::new(caller, 0, PoolInstruction::Withdraw { amount })
    }

    pub fn vote(caller: Pubkey, strategy: impl Into<String>) -> Self {
        Self::new(
            caller,
            0,
            PoolInstruction::Vote {
                strategy: strategy.into(),
            },
        )
    }

    pub fn execute_strategy(caller: Pubkey) -> Self {
        Self::new(caller, 0, PoolInstruction::ExecuteStrategy)
    }

    pub fn reset_voting(caller: Pubkey) -> Self {
        Self::new(caller, 0, PoolInstruction::ResetVoting)
    }
}

/// Read-only queries.  None of them can fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolQuery {
    /// Pool aggregate including credited yield.
    TotalDeposits,
    /// Balance of `user` (0 if unknown).
    UserBalance { user: Pubkey },
    /// Weighted tally for every strategy.
    Votes,
    /// Strategy `user` voted for this round, if any.
    UserVoteChoice { user: Pubkey },
    /// Wire names of every recognised strategy.
    AvailableStrategies,
    /// Whether votes are currently accepted.
    IsVotingActive,
    /// Value physically custodied by the pool.
    ContractBalance,
    /// The pool owner.
    Owner,
    /// Strategy that would win if executed now.
    LeadingStrategy,
    /// Full copy of the pool state.
    Snapshot,
}

/// Answer to a [`PoolQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryResponse {
    Amount(u64),
    Votes(VoteTally),
    VoteChoice(Option<Strategy>),
    Strategies(Vec<String>),
    Flag(bool),
    Owner(Pubkey),
    Strategy(Strategy),
    Snapshot(Box<PoolState>),
}
