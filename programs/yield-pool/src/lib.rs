//! TRv1 Yield Pool Program
//!
//! A small custodial pool where depositors steer a one-shot yield decision.
//! Every depositor's balance doubles as their voting weight; they vote for
//! one of a fixed set of strategies, and the pool owner executes the winning
//! strategy, which credits a fixed percentage to the pool aggregate and
//! closes voting until the owner resets it.
//!
//! ## Lifecycle
//!
//! ```text
//!            deposit / withdraw / vote
//!               ┌──────────┐
//!               ▼          │
//!   genesis ─▶ Open ───────┘
//!               │  ▲
//!   execute     │  │ reset_voting (owner)
//!   (owner)     ▼  │
//!             Executed ◀──┐
//!               │         │
//!               └─────────┘
//!            deposit / withdraw
//! ```
//!
//! ## Strategies
//!
//! | Strategy | Yield |
//! |----------|:-----:|
//! | Safe     | 5%    |
//! | Risky    | 15%   |
//! | Charity  | 3%    |
//!
//! Ties are broken in favour of Safe, then Risky, then Charity.
//!
//! ## Instructions
//!
//! | Instruction      | Caller | Description                                   |
//! |------------------|--------|-----------------------------------------------|
//! | Deposit          | anyone | Move the attached value into the pool         |
//! | Withdraw         | anyone | Pay part of the caller's balance back out     |
//! | Vote             | anyone | Weight a strategy with the caller's balance   |
//! | ExecuteStrategy  | owner  | Apply the winning yield and close voting      |
//! | ResetVoting      | owner  | Clear all votes and reopen voting             |
//!
//! The authoritative state lives in a [`ledger::PoolLedger`], which funnels
//! every mutation through a single write lock.

#![allow(clippy::arithmetic_side_effects)]

pub mod config;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod ledger;
pub mod processor;
pub mod state;
pub mod strategy;


pub use {
    config::LedgerConfig,
    error::PoolError,
    instruction::{PoolInstruction, PoolQuery, QueryResponse, Submission},
    ledger::{LedgerError, PoolLedger},
    processor::{Payout, Receipt},
    state::{PoolState, VoteTally},
    strategy::Strategy,
};
