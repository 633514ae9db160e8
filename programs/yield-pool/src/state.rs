//! Pool state types for the Yield Pool program.

use {
    crate::{
        constants::POOL_STATE_DISCRIMINATOR,
        strategy::{select_winner, Strategy},
    },
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
    std::collections::BTreeMap,
};

// ---------------------------------------------------------------------------
// VoteTally
// ---------------------------------------------------------------------------

/// Weighted vote totals, one slot per [`Strategy`].
///
/// Every strategy is always present; a strategy nobody voted for reads as 0.
/// Slots are signed: a re-vote debits the voter's *current* balance from the
/// old strategy, which can exceed what that voter originally credited, and
/// the resulting negative weight carries into later credits and the winner
/// comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct VoteTally {
    weights: [i128; 3],
}

impl VoteTally {
    /// Current weight behind `strategy`.  May be negative.
    pub fn get(&self, strategy: Strategy) -> i128 {
        self.weights[strategy.index()]
    }

    /// Add `weight` to `strategy`.  Returns `None` on overflow, leaving the
    /// tally untouched.
    pub fn credit(&mut self, strategy: Strategy, weight: u64) -> Option<i128> {
        let slot = &mut self.weights[strategy.index()];
        *slot = slot.checked_add(i128::from(weight))?;
        Some(*slot)
    }

    /// Subtract `weight` from `strategy`, going below zero if needed.
    /// Returns `None` on overflow, leaving the tally untouched.
    pub fn debit(&mut self, strategy: Strategy, weight: u64) -> Option<i128> {
        let slot = &mut self.weights[strategy.index()];
        *slot = slot.checked_sub(i128::from(weight))?;
        Some(*slot)
    }

    /// Sum of all strategy weights.
    pub fn total(&self) -> i128 {
        self.weights
            .iter()
            .fold(0i128, |acc, w| acc.saturating_add(*w))
    }

    /// The strategy that would win if the pool were executed now.
    pub fn leader(&self) -> Strategy {
        select_winner(
            self.get(Strategy::Safe),
            self.get(Strategy::Risky),
            self.get(Strategy::Charity),
        )
    }

    /// `(strategy, weight)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, i128)> + '_ {
        Strategy::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// The tally as a strategy → weight map.
    pub fn to_map(&self) -> BTreeMap<Strategy, i128> {
        self.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// PoolState
// ---------------------------------------------------------------------------

/// The authoritative state of a yield pool.
///
/// Created once by [`PoolState::genesis`] and only ever changed through the
/// handlers in [`crate::processor`].
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct PoolState {
    /// Account that created the pool.  Only it may execute or reset.
    pub owner: Pubkey,

    /// Pool aggregate: live balances plus any yield credited by executions.
    pub total_deposits: u64,

    /// Per-depositor balances.  Zero balances are not stored.
    pub balances: BTreeMap<Pubkey, u64>,

    /// Weighted votes per strategy.
    pub votes: VoteTally,

    /// Strategy each voter most recently chose in the current round.
    pub user_votes: BTreeMap<Pubkey, Strategy>,

    /// `true` until the pool is executed, then `false` until reset.
    pub voting_active: bool,

    /// Cumulative yield credited to `total_deposits`.
    ///
    /// Yield is never attributed to individual balances, so this is the gap
    /// between `total_deposits` and the sum of balances.
    pub accrued_yield: u64,

    /// Value physically held by the pool: deposits in, withdrawals out.
    pub vault_lamports: u64,

    /// Number of times voting has been reset.
    pub round: u64,
}

impl PoolState {
    /// Fresh pool owned by `owner`: no balances, all tallies zero, voting open.
    pub fn genesis(owner: Pubkey) -> Self {
        Self {
            owner,
            total_deposits: 0,
            balances: BTreeMap::new(),
            votes: VoteTally::default(),
            user_votes: BTreeMap::new(),
            voting_active: true,
            accrued_yield: 0,
            vault_lamports: 0,
            round: 0,
        }
    }

    /// Balance of `account`, or 0 if it never deposited.
    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Strategy `account` voted for this round, if any.
    pub fn vote_of(&self, account: &Pubkey) -> Option<Strategy> {
        self.user_votes.get(account).copied()
    }

    pub fn is_owner(&self, account: &Pubkey) -> bool {
        self.owner == *account
    }

    /// Sum of all stored balances.
    pub fn sum_balances(&self) -> u128 {
        self.balances.values().map(|b| u128::from(*b)).sum()
    }

    /// Sum of the current balances of every account with an active vote.
    pub fn voter_balances(&self) -> u128 {
        self.user_votes
            .keys()
            .map(|voter| u128::from(self.balance_of(voter)))
            .sum()
    }

    /// `total_deposits == sum(balances) + accrued_yield` and the vault holds
    /// exactly the live balances.
    pub fn aggregates_consistent(&self) -> bool {
        let balances = self.sum_balances();
        u128::from(self.total_deposits) == balances + u128::from(self.accrued_yield)
            && u128::from(self.vault_lamports) == balances
    }

    /// Tally equals the live balances of all voters.
    ///
    /// Voting weight is captured when a vote is cast, so this only holds while
    /// no voter has deposited or withdrawn since voting.
    pub fn tally_matches_voter_balances(&self) -> bool {
        i128::try_from(self.voter_balances())
            .is_ok_and(|balances| balances == self.votes.total())
    }

    /// Serialised size of this state (discriminator + borsh payload).
    pub fn serialized_size(&self) -> Result<usize, std::io::Error> {
        Ok(1 + borsh::object_length(self)?)
    }

    /// Deserialise from raw data (expects leading discriminator byte).
    pub fn deserialize(data: &[u8]) -> Result<Self, std::io::Error> {
        if data.is_empty() || data[0] != POOL_STATE_DISCRIMINATOR {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "missing or invalid pool state discriminator",
            ));
        }
        borsh::from_slice(&data[1..])
    }

    /// Serialise into a fresh buffer (prepends discriminator byte).
    pub fn serialize(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut data = Vec::with_capacity(self.serialized_size()?);
        data.push(POOL_STATE_DISCRIMINATOR);
        BorshSerialize::serialize(self, &mut data)?;
        Ok(data)
    }
}
