//! Fuzz the bincode instruction decoder through `PoolLedger::submit_raw`.
//!
//! Goals:
//! - Find panics or unbounded allocations on hostile instruction data.
//! - Verify anything that decodes also re-encodes to a prefix of the input.
//! - Verify undecodable data is always `InvalidInstructionData` and leaves
//!   the pool untouched.

#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    solana_pubkey::Pubkey,
    trv1_yield_pool_program::{LedgerConfig, PoolError, PoolInstruction, PoolLedger},
};

const OWNER: Pubkey = Pubkey::new_from_array([0xAA; 32]);
const CALLER: Pubkey = Pubkey::new_from_array([0x01; 32]);

fuzz_target!(|data: &[u8]| {
    let config = LedgerConfig::default();
    let limit = config.max_instruction_data_len;
    let Ok(ledger) = PoolLedger::new(OWNER, config) else {
        return;
    };
    // Seed a balance so votes and withdrawals can get past their guards.
    if ledger.deposit(CALLER, 1_000).is_err() {
        return;
    }
    let before = ledger.snapshot();

    match PoolInstruction::decode(data, limit) {
        Ok(instruction) => {
            let encoded = instruction.encode().expect("decoded instruction re-encodes");
            assert!(data.starts_with(&encoded), "re-encoding is not a prefix");
            let _ = ledger.submit_raw(CALLER, 0, data);
            assert!(ledger.snapshot().aggregates_consistent());
        }
        Err(err) => {
            assert_eq!(err, PoolError::InvalidInstructionData);
            assert_eq!(
                ledger.submit_raw(CALLER, 0, data),
                Err(PoolError::InvalidInstructionData)
            );
            assert_eq!(ledger.snapshot(), before);
        }
    }
});
