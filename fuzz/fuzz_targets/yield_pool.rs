//! Fuzz the yield pool state machine with arbitrary submission sequences.
//!
//! Goals:
//! - Find panics or overflows in deposit, withdraw, vote and execute paths.
//! - Verify the pool aggregate always equals balances plus accrued yield.
//! - Verify the vault always equals deposits minus payouts.
//! - Verify execution is owner-only and cannot run twice in a round.
//! - Verify rejected submissions never mutate state.

#![no_main]

use {
    arbitrary::{Arbitrary, Unstructured},
    libfuzzer_sys::fuzz_target,
    solana_pubkey::Pubkey,
    trv1_yield_pool_program::{
        LedgerConfig, PoolError, PoolLedger, Receipt, Submission,
    },
};

const OWNER: Pubkey = Pubkey::new_from_array([0xAA; 32]);
const NUM_USERS: u8 = 6;

const STRATEGY_NAMES: &[&str] = &["Safe", "Risky", "Charity", "safe", "", "Yolo"];

fn user(index: u8) -> Pubkey {
    Pubkey::new_from_array([index % NUM_USERS + 1; 32])
}

#[derive(Debug)]
enum FuzzAction {
    Deposit { user: u8, amount: u64 },
    Withdraw { user: u8, amount: u64 },
    Vote { user: u8, name_idx: u8 },
    Execute { as_owner: bool, user: u8 },
    Reset { as_owner: bool, user: u8 },
    /// A non-deposit instruction with value attached.
    PayNonPayable { user: u8, value: u64 },
}

impl<'a> Arbitrary<'a> for FuzzAction {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let variant = u.int_in_range(0..=5)?;
        match variant {
            0 => Ok(FuzzAction::Deposit {
                user: u.arbitrary()?,
                amount: u.arbitrary()?,
            }),
            1 => Ok(FuzzAction::Withdraw {
                user: u.arbitrary()?,
                amount: u.arbitrary()?,
            }),
            2 => Ok(FuzzAction::Vote {
                user: u.arbitrary()?,
                name_idx: u.arbitrary()?,
            }),
            3 => Ok(FuzzAction::Execute {
                as_owner: u.arbitrary()?,
                user: u.arbitrary()?,
            }),
            4 => Ok(FuzzAction::Reset {
                as_owner: u.arbitrary()?,
                user: u.arbitrary()?,
            }),
            5 => Ok(FuzzAction::PayNonPayable {
                user: u.arbitrary()?,
                value: u.int_in_range(1..=u64::MAX)?,
            }),
            _ => unreachable!(),
        }
    }
}

impl FuzzAction {
    fn submission(&self) -> Submission {
        match *self {
            FuzzAction::Deposit { user: u, amount } => Submission::deposit(user(u), amount),
            FuzzAction::Withdraw { user: u, amount } => Submission::withdraw(user(u), amount),
            FuzzAction::Vote { user: u, name_idx } => Submission::vote(
                user(u),
                STRATEGY_NAMES[name_idx as usize % STRATEGY_NAMES.len()],
            ),
            FuzzAction::Execute { as_owner, user: u } => {
                Submission::execute_strategy(if as_owner { OWNER } else { user(u) })
            }
            FuzzAction::Reset { as_owner, user: u } => {
                Submission::reset_voting(if as_owner { OWNER } else { user(u) })
            }
            FuzzAction::PayNonPayable { user: u, value } => {
                let mut submission = Submission::withdraw(user(u), 1);
                submission.attached_value = value;
                submission
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    let Ok(ledger) = PoolLedger::new(OWNER, LedgerConfig::default()) else {
        return;
    };
    let mut deposited: u128 = 0;
    let mut paid_out: u128 = 0;

    let num_actions: usize = match u.int_in_range(1..=200) {
        Ok(n) => n,
        Err(_) => return,
    };

    for _ in 0..num_actions {
        let action: FuzzAction = match u.arbitrary() {
            Ok(a) => a,
            Err(_) => break,
        };

        let before = ledger.snapshot();
        match ledger.submit(&action.submission()) {
            Ok(Receipt::Deposited { amount, .. }) => deposited += amount as u128,
            Ok(Receipt::Withdrawn { payout, .. }) => paid_out += payout.amount as u128,
            Ok(Receipt::Executed {
                yield_percentage,
                yield_amount,
                total_deposits,
                ..
            }) => {
                let expected = before.total_deposits as u128 * yield_percentage as u128 / 100;
                assert_eq!(yield_amount as u128, expected, "yield rounding");
                assert_eq!(
                    total_deposits as u128,
                    before.total_deposits as u128 + expected
                );
                assert_eq!(
                    ledger.execute_strategy(OWNER),
                    Err(PoolError::AlreadyExecuted),
                    "execution ran twice in one round"
                );
            }
            Ok(Receipt::Voted { weight, .. }) => assert!(weight > 0),
            Ok(Receipt::VotingReset { .. }) => {
                assert!(ledger.is_voting_active());
                assert_eq!(ledger.votes().total(), 0);
            }
            Err(err) => {
                assert_eq!(ledger.snapshot(), before, "{err} mutated state");
                if let FuzzAction::PayNonPayable { .. } = action {
                    assert_eq!(err, PoolError::NonPayable);
                }
            }
        }

        let state = ledger.snapshot();
        assert!(state.aggregates_consistent(), "aggregates out of balance");
        assert_eq!(
            state.vault_lamports as u128,
            deposited - paid_out,
            "vault does not match value flow"
        );
        assert_eq!(
            ledger.execute_strategy(user(0)),
            Err(PoolError::Unauthorized)
        );
    }
});
