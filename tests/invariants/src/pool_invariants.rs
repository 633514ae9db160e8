//! Property-based tests for the yield pool.
//!
//! Properties tested:
//! 1. total_deposits == sum(balances) + accrued_yield, vault == sum(balances)
//! 2. Vault equals everything deposited minus everything paid out
//! 3. Tallies equal voter balances when balances settle before voting
//! 4. Execution is one-shot per round and owner-only
//! 5. A rejected submission never changes state
//! 6. Yield is floor(total * pct / 100) of the pre-execution aggregate

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        solana_pubkey::Pubkey,
        std::collections::BTreeMap,
        trv1_yield_pool_program::{
            processor::process_submission, LedgerConfig, PoolError, PoolLedger, PoolState,
            Receipt, Strategy as YieldStrategy, Submission,
        },
    };

    const OWNER: Pubkey = Pubkey::new_from_array([1; 32]);
    const NUM_USERS: u8 = 4;

    fn user(index: u8) -> Pubkey {
        Pubkey::new_from_array([index + 2; 32])
    }

    // ── Operation generators ──

    #[derive(Debug, Clone)]
    enum Op {
        Deposit { user: u8, amount: u64 },
        Withdraw { user: u8, amount: u64 },
        Vote { user: u8, strategy: String },
        Execute { as_owner: bool, user: u8 },
        Reset { as_owner: bool, user: u8 },
    }

    impl Op {
        fn submission(&self) -> Submission {
            match self {
                Op::Deposit { user: u, amount } => Submission::deposit(user(*u), *amount),
                Op::Withdraw { user: u, amount } => Submission::withdraw(user(*u), *amount),
                Op::Vote { user: u, strategy } => Submission::vote(user(*u), strategy.clone()),
                Op::Execute { as_owner, user: u } => {
                    Submission::execute_strategy(if *as_owner { OWNER } else { user(*u) })
                }
                Op::Reset { as_owner, user: u } => {
                    Submission::reset_voting(if *as_owner { OWNER } else { user(*u) })
                }
            }
        }
    }

    fn strategy_name() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => prop::sample::select(vec!["Safe", "Risky", "Charity"]).prop_map(String::from),
            1 => "[a-zA-Z]{0,8}",
        ]
    }

    fn balance_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0..NUM_USERS, 0..=1_000_000u64).prop_map(|(user, amount)| Op::Deposit { user, amount }),
            2 => (0..NUM_USERS, 0..=1_000_000u64).prop_map(|(user, amount)| Op::Withdraw { user, amount }),
        ]
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            5 => balance_op(),
            3 => (0..NUM_USERS, strategy_name()).prop_map(|(user, strategy)| Op::Vote { user, strategy }),
            1 => (any::<bool>(), 0..NUM_USERS).prop_map(|(as_owner, user)| Op::Execute { as_owner, user }),
            1 => (any::<bool>(), 0..NUM_USERS).prop_map(|(as_owner, user)| Op::Reset { as_owner, user }),
        ]
    }

    fn ledger() -> PoolLedger {
        PoolLedger::new(OWNER, LedgerConfig::default()).unwrap()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1–2. Aggregate accounting and conservation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn aggregates_hold_after_any_sequence(ops in prop::collection::vec(any_op(), 0..64)) {
            let ledger = ledger();
            let mut deposited: u128 = 0;
            let mut paid_out: u128 = 0;

            for op in &ops {
                match ledger.submit(&op.submission()) {
                    Ok(Receipt::Deposited { amount, .. }) => deposited += amount as u128,
                    Ok(receipt) => {
                        if let Some(payout) = receipt.payout() {
                            paid_out += payout.amount as u128;
                        }
                    }
                    Err(_) => {}
                }

                let state = ledger.snapshot();
                // ── INVARIANT: aggregates add up ──
                prop_assert!(state.aggregates_consistent(), "after {:?}: {:?}", op, state);
                prop_assert_eq!(
                    state.total_deposits as u128,
                    state.sum_balances() + state.accrued_yield as u128
                );
                prop_assert_eq!(state.vault_lamports as u128, state.sum_balances());
                // ── INVARIANT: value conservation ──
                prop_assert_eq!(state.vault_lamports as u128, deposited - paid_out);
                // ── INVARIANT: no zero balances are stored ──
                prop_assert!(state.balances.values().all(|b| *b > 0));
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Tally correctness
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Balances settle first, then any number of (re-)votes.
        #[test]
        fn tally_matches_voter_balances(
            balance_ops in prop::collection::vec(balance_op(), 0..32),
            votes in prop::collection::vec((0..NUM_USERS, 0..3usize), 0..32),
        ) {
            let ledger = ledger();
            for op in &balance_ops {
                let _ = ledger.submit(&op.submission());
            }
            for (u, s) in &votes {
                let _ = ledger.vote(user(*u), YieldStrategy::ALL[*s]);
            }

            let state = ledger.snapshot();
            prop_assert!(state.tally_matches_voter_balances());

            let mut expected: BTreeMap<YieldStrategy, i128> = BTreeMap::new();
            for (voter, strategy) in &state.user_votes {
                *expected.entry(*strategy).or_default() += i128::from(state.balance_of(voter));
            }
            for strategy in YieldStrategy::ALL {
                prop_assert_eq!(
                    state.votes.get(strategy),
                    expected.get(&strategy).copied().unwrap_or(0)
                );
            }
            // ── INVARIANT: every recorded voter has a deposit ──
            prop_assert!(state.user_votes.keys().all(|v| state.balance_of(v) > 0));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Execution control
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn second_execute_is_always_rejected(
            ops in prop::collection::vec(any_op(), 0..48),
            seed in 1..=1_000_000u64,
        ) {
            let ledger = ledger();
            for op in &ops {
                let _ = ledger.submit(&op.submission());
            }
            ledger.deposit(user(0), seed).unwrap();
            let _ = ledger.reset_voting(OWNER);
            ledger.execute_strategy(OWNER).unwrap();

            let before = ledger.snapshot();
            prop_assert_eq!(ledger.execute_strategy(OWNER), Err(PoolError::AlreadyExecuted));
            prop_assert_eq!(ledger.snapshot(), before);
        }

        #[test]
        fn non_owner_is_always_unauthorized(
            ops in prop::collection::vec(any_op(), 0..48),
            caller in 0..NUM_USERS,
        ) {
            let ledger = ledger();
            for op in &ops {
                let _ = ledger.submit(&op.submission());
                prop_assert_eq!(
                    ledger.execute_strategy(user(caller)),
                    Err(PoolError::Unauthorized)
                );
                prop_assert_eq!(ledger.reset_voting(user(caller)), Err(PoolError::Unauthorized));
            }
            prop_assert_eq!(ledger.owner(), OWNER);
        }

        #[test]
        fn yield_is_floor_of_winning_percentage(
            balance_ops in prop::collection::vec(balance_op(), 1..32),
            votes in prop::collection::vec((0..NUM_USERS, 0..3usize), 0..16),
        ) {
            let ledger = ledger();
            for op in &balance_ops {
                let _ = ledger.submit(&op.submission());
            }
            for (u, s) in &votes {
                let _ = ledger.vote(user(*u), YieldStrategy::ALL[*s]);
            }
            let total = ledger.total_deposits();
            let leader = ledger.votes().leader();

            match ledger.execute_strategy(OWNER) {
                Ok(Receipt::Executed { winner, yield_percentage, yield_amount, total_deposits }) => {
                    prop_assert_eq!(winner, leader);
                    prop_assert_eq!(yield_percentage, winner.yield_percentage());
                    let expected = (total as u128 * yield_percentage as u128 / 100) as u64;
                    prop_assert_eq!(yield_amount, expected);
                    prop_assert_eq!(total_deposits, total + expected);
                    prop_assert!(!ledger.is_voting_active());
                }
                Err(err) => {
                    prop_assert_eq!(err, PoolError::NoDeposits);
                    prop_assert_eq!(total, 0);
                }
                Ok(other) => prop_assert!(false, "unexpected receipt {:?}", other),
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 5. Atomic rejection
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn rejected_submission_leaves_state_untouched(
            ops in prop::collection::vec(any_op(), 0..64),
            attached in prop_oneof![3 => Just(0u64), 1 => 1..=100u64],
        ) {
            let config = LedgerConfig::default();
            let mut state = PoolState::genesis(OWNER);
            for op in &ops {
                let mut submission = op.submission();
                if !matches!(op, Op::Deposit { .. }) {
                    submission.attached_value = attached;
                }
                let before = state.clone();
                match process_submission(&mut state, &config, &submission) {
                    Ok(_) => prop_assert!(state.aggregates_consistent()),
                    Err(err) => {
                        prop_assert_eq!(&state, &before, "{:?} mutated state", err);
                    }
                }
            }
        }
    }
}
