//! TRv1 Property-Based Invariant Tests
//!
//! Uses proptest to verify the yield pool's invariants across arbitrary
//! sequences of deposits, withdrawals, votes, executions and resets:
//! - Aggregate accounting and value conservation
//! - Vote tally correctness
//! - Owner-only control and one-shot execution

pub mod pool_invariants;
