//! Yield strategies and winner selection.
//!
//! The set of strategies is closed.  Each strategy carries a fixed yield that
//! is applied to the whole pool when it wins an execution.
//!
//! ## Yield table
//!
//! | Strategy | Wire name  | Yield |
//! |----------|------------|:-----:|
//! | Safe     | `"Safe"`   | 5%    |
//! | Risky    | `"Risky"`  | 15%   |
//! | Charity  | `"Charity"`| 3%    |

use {
    crate::{
        constants::{
            CHARITY_NAME, CHARITY_YIELD_PCT, DEFAULT_YIELD_PCT, PERCENT_DENOMINATOR, RISKY_NAME,
            RISKY_YIELD_PCT, SAFE_NAME, SAFE_YIELD_PCT,
        },
        error::PoolError,
    },
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// A strategy depositors can vote for.
///
/// Declaration order is also tie-break priority: on equal tallies the
/// earlier variant wins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[borsh(use_discriminant = true)]
pub enum Strategy {
    Safe = 0,
    Risky = 1,
    Charity = 2,
}

impl Strategy {
    /// Every recognised strategy, in tie-break priority order.
    pub const ALL: [Strategy; 3] = [Strategy::Safe, Strategy::Risky, Strategy::Charity];

    /// Wire name of the strategy.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Safe => SAFE_NAME,
            Strategy::Risky => RISKY_NAME,
            Strategy::Charity => CHARITY_NAME,
        }
    }

    /// Yield applied to the pool when this strategy wins, in whole percent.
    pub const fn yield_percentage(self) -> u64 {
        match self {
            Strategy::Safe => SAFE_YIELD_PCT,
            Strategy::Risky => RISKY_YIELD_PCT,
            Strategy::Charity => CHARITY_YIELD_PCT,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = PoolError;

    /// Names are matched exactly; `"safe"` is not a strategy.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            SAFE_NAME => Ok(Strategy::Safe),
            RISKY_NAME => Ok(Strategy::Risky),
            CHARITY_NAME => Ok(Strategy::Charity),
            _ => Err(PoolError::InvalidStrategy),
        }
    }
}

/// Wire names of every recognised strategy, in priority order.
pub fn available_strategies() -> Vec<&'static str> {
    Strategy::ALL.iter().map(|s| s.name()).collect()
}

/// Name-based yield lookup.
///
/// Unknown names fall back to [`DEFAULT_YIELD_PCT`] instead of failing.  The
/// vote path never lets an unknown name reach the tally, so this default only
/// matters for callers using the lookup on its own.
pub fn yield_percentage_for_name(name: &str) -> u64 {
    name.parse::<Strategy>()
        .map(Strategy::yield_percentage)
        .unwrap_or(DEFAULT_YIELD_PCT)
}

/// Pick the winning strategy from the three tallies.
///
/// Safe wins if it is at least as large as both others; otherwise Risky wins
/// if it is at least as large as Charity; otherwise Charity wins.  Tallies
/// may be negative.
pub fn select_winner(safe: i128, risky: i128, charity: i128) -> Strategy {
    if safe >= risky && safe >= charity {
        Strategy::Safe
    } else if risky >= charity {
        Strategy::Risky
    } else {
        Strategy::Charity
    }
}

/// Yield produced by applying `percentage` to `principal`, rounded down.
///
/// Returns `None` only if the result does not fit in a `u64`, which needs a
/// percentage above 100.
pub fn yield_amount(principal: u64, percentage: u64) -> Option<u64> {
    let scaled = u128::from(principal).checked_mul(u128::from(percentage))?;
    u64::try_from(scaled / u128::from(PERCENT_DENOMINATOR)).ok()
}
