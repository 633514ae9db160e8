//! Instruction processing logic for the Yield Pool program.
//!
//! Every handler validates all of its preconditions before touching the
//! state, so a rejected instruction leaves the pool exactly as it was.

use {
    crate::{
        config::LedgerConfig,
        error::PoolError,
        instruction::{PoolInstruction, PoolQuery, QueryResponse, Submission},
        state::{PoolState, VoteTally},
        strategy::{available_strategies, yield_amount, Strategy},
    },
    log::*,
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

/// Value leaving the pool as the result of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub recipient: Pubkey,
    pub amount: u64,
}

/// Acknowledgement of a successfully applied instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Receipt {
    Deposited {
        depositor: Pubkey,
        amount: u64,
        new_balance: u64,
    },
    Withdrawn {
        /// The host must transfer this amount to the recipient.
        payout: Payout,
        new_balance: u64,
    },
    Voted {
        voter: Pubkey,
        strategy: Strategy,
        weight: u64,
        previous: Option<Strategy>,
    },
    Executed {
        winner: Strategy,
        yield_percentage: u64,
        yield_amount: u64,
        total_deposits: u64,
    },
    VotingReset {
        round: u64,
    },
}

impl Receipt {
    /// Outbound transfer the host has to perform, if any.
    pub fn payout(&self) -> Option<Payout> {
        match self {
            Receipt::Withdrawn { payout, .. } => Some(*payout),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entrypoint
// ---------------------------------------------------------------------------

/// Apply one submission to `state`.
pub fn process_submission(
    state: &mut PoolState,
    config: &LedgerConfig,
    submission: &Submission,
) -> Result<Receipt, PoolError> {
    let Submission {
        caller,
        attached_value,
        instruction,
    } = submission;

    trace!("yield pool process_instruction: {instruction:?} from {caller}");

    // Owner-only instructions report `Unauthorized` to non-owners before any
    // other check, attached value included.
    if instruction.is_owner_only() && !state.is_owner(caller) {
        debug!("{instruction:?} from {caller} rejected: not the pool owner");
        return Err(PoolError::Unauthorized);
    }

    if *attached_value > 0 && !instruction.is_payable() && config.reject_value_on_non_payable {
        debug!("{instruction:?}: {attached_value} attached to a non-payable instruction");
        return Err(PoolError::NonPayable);
    }

    let result = match instruction {
        PoolInstruction::Deposit => process_deposit(state, caller, *attached_value),
        PoolInstruction::Withdraw { amount } => process_withdraw(state, caller, *amount),
        PoolInstruction::Vote { strategy } => process_vote(state, caller, strategy),
        PoolInstruction::ExecuteStrategy => process_execute_strategy(state, caller),
        PoolInstruction::ResetVoting => process_reset_voting(state, caller),
    };

    if let Err(err) = &result {
        debug!("{instruction:?} from {caller} rejected: {err}");
    }
    result
}

// ---------------------------------------------------------------------------
// Instruction handlers
// ---------------------------------------------------------------------------

/// `Deposit` with `amount` attached.
///
/// Voting weight already cast by the depositor is not increased.
pub fn process_deposit(
    state: &mut PoolState,
    caller: &Pubkey,
    amount: u64,
) -> Result<Receipt, PoolError> {
    if amount == 0 {
        return Err(PoolError::InvalidAmount);
    }

    let new_balance = state
        .balance_of(caller)
        .checked_add(amount)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let total_deposits = state
        .total_deposits
        .checked_add(amount)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let vault_lamports = state
        .vault_lamports
        .checked_add(amount)
        .ok_or(PoolError::ArithmeticOverflow)?;

    state.balances.insert(*caller, new_balance);
    state.total_deposits = total_deposits;
    state.vault_lamports = vault_lamports;

    Ok(Receipt::Deposited {
        depositor: *caller,
        amount,
        new_balance,
    })
}

/// `Withdraw { amount }`
///
/// Voting weight already cast by the caller is not reduced.
pub fn process_withdraw(
    state: &mut PoolState,
    caller: &Pubkey,
    amount: u64,
) -> Result<Receipt, PoolError> {
    if amount == 0 {
        return Err(PoolError::InvalidAmount);
    }

    let new_balance = state
        .balance_of(caller)
        .checked_sub(amount)
        .ok_or(PoolError::InsufficientBalance)?;
    // Both aggregates contain the caller's balance, so neither can underflow
    // while the aggregate invariants hold.
    let total_deposits = state
        .total_deposits
        .checked_sub(amount)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let vault_lamports = state
        .vault_lamports
        .checked_sub(amount)
        .ok_or(PoolError::ArithmeticOverflow)?;

    if new_balance == 0 {
        state.balances.remove(caller);
    } else {
        state.balances.insert(*caller, new_balance);
    }
    state.total_deposits = total_deposits;
    state.vault_lamports = vault_lamports;

    Ok(Receipt::Withdrawn {
        payout: Payout {
            recipient: *caller,
            amount,
        },
        new_balance,
    })
}

/// `Vote { strategy }`
///
/// The caller's current balance is debited from their previous strategy (if
/// any) and credited to the new one, even when both are the same.
pub fn process_vote(
    state: &mut PoolState,
    caller: &Pubkey,
    strategy_name: &str,
) -> Result<Receipt, PoolError> {
    if !state.voting_active {
        return Err(PoolError::VotingClosed);
    }
    let strategy: Strategy = strategy_name.parse()?;
    let weight = state.balance_of(caller);
    if weight == 0 {
        return Err(PoolError::NoDeposit);
    }

    let previous = state.vote_of(caller);
    let mut votes = state.votes;
    if let Some(old) = previous {
        votes
            .debit(old, weight)
            .ok_or(PoolError::ArithmeticOverflow)?;
    }
    votes
        .credit(strategy, weight)
        .ok_or(PoolError::ArithmeticOverflow)?;

    state.votes = votes;
    state.user_votes.insert(*caller, strategy);

    Ok(Receipt::Voted {
        voter: *caller,
        strategy,
        weight,
        previous,
    })
}

/// `ExecuteStrategy`
///
/// Credits the winner's yield to `total_deposits` only; individual balances
/// are left as they are.
pub fn process_execute_strategy(
    state: &mut PoolState,
    caller: &Pubkey,
) -> Result<Receipt, PoolError> {
    if !state.is_owner(caller) {
        return Err(PoolError::Unauthorized);
    }
    if !state.voting_active {
        return Err(PoolError::AlreadyExecuted);
    }
    if state.total_deposits == 0 {
        return Err(PoolError::NoDeposits);
    }

    let winner = state.votes.leader();
    let yield_percentage = winner.yield_percentage();
    let yield_amount = yield_amount(state.total_deposits, yield_percentage)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let total_deposits = state
        .total_deposits
        .checked_add(yield_amount)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let accrued_yield = state
        .accrued_yield
        .checked_add(yield_amount)
        .ok_or(PoolError::ArithmeticOverflow)?;

    state.total_deposits = total_deposits;
    state.accrued_yield = accrued_yield;
    state.voting_active = false;

    info!(
        "ExecuteStrategy: {winner} won (safe={}, risky={}, charity={}), {yield_percentage}% \
         yield = {yield_amount}, total deposits now {total_deposits}",
        state.votes.get(Strategy::Safe),
        state.votes.get(Strategy::Risky),
        state.votes.get(Strategy::Charity),
    );

    Ok(Receipt::Executed {
        winner,
        yield_percentage,
        yield_amount,
        total_deposits,
    })
}

/// `ResetVoting`
///
/// Allowed whether or not the pool has been executed.
pub fn process_reset_voting(state: &mut PoolState, caller: &Pubkey) -> Result<Receipt, PoolError> {
    if !state.is_owner(caller) {
        return Err(PoolError::Unauthorized);
    }

    state.votes = VoteTally::default();
    state.user_votes.clear();
    state.voting_active = true;
    state.round = state.round.saturating_add(1);

    info!("ResetVoting: round {} open", state.round);

    Ok(Receipt::VotingReset { round: state.round })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Answer a read-only query against `state`.
pub fn process_query(state: &PoolState, query: &PoolQuery) -> QueryResponse {
    match query {
        PoolQuery::TotalDeposits => QueryResponse::Amount(state.total_deposits),
        PoolQuery::UserBalance { user } => QueryResponse::Amount(state.balance_of(user)),
        PoolQuery::Votes => QueryResponse::Votes(state.votes),
        PoolQuery::UserVoteChoice { user } => QueryResponse::VoteChoice(state.vote_of(user)),
        PoolQuery::AvailableStrategies => QueryResponse::Strategies(
            available_strategies()
                .into_iter()
                .map(str::to_string)
                .collect(),
        ),
        PoolQuery::IsVotingActive => QueryResponse::Flag(state.voting_active),
        PoolQuery::ContractBalance => QueryResponse::Amount(state.vault_lamports),
        PoolQuery::Owner => QueryResponse::Owner(state.owner),
        PoolQuery::LeadingStrategy => QueryResponse::Strategy(state.votes.leader()),
        PoolQuery::Snapshot => QueryResponse::Snapshot(Box::new(state.clone())),
    }
}
