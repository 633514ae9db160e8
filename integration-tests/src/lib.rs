//! TRv1 Integration Tests
//!
//! Integration test suite for the yield pool program, driven through the
//! same bincode wire path a host uses.
//!
//! # Scenarios Tested
//!
//! 1. **Yield rounds** — deposit, vote, execute, reset, and compounding
//! 2. **Voting** — tie-breaks, re-votes, stale weights after withdrawal
//! 3. **Access control** — owner-only execute/reset in every pool state
//! 4. **Value conservation** — wallets plus the vault never change in sum
//! 5. **Wire handling** — malformed, oversized, and non-payable submissions

pub mod harness;
