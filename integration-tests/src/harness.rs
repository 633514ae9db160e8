//! TRv1 Yield Pool Test Harness
//!
//! Wraps a [`PoolLedger`] together with a set of keypair-backed depositors
//! and a simulated wallet balance for each of them.  Every call goes over the
//! bincode wire path (`submit_raw`) the way a host would submit it, and the
//! harness settles value movements itself:
//!
//! - a successful `Deposit` debits the caller's wallet by the attached value;
//! - a `Withdrawn` receipt credits the payout to the recipient's wallet.
//!
//! That makes value conservation observable: wallets plus the pool vault
//! always add up to what the harness minted.

use {
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    std::collections::HashMap,
    trv1_yield_pool_program::{
        LedgerConfig, PoolError, PoolInstruction, PoolLedger, Receipt, Strategy,
    },
};

// ─── Constants ───────────────────────────────────────────────────────────────

/// One SOL in lamports.
pub const SOL: u64 = 1_000_000_000;

/// Wallet balance each test depositor starts with.
pub const DEFAULT_WALLET_LAMPORTS: u64 = 1_000 * SOL;

/// Default number of depositors.
pub const DEFAULT_DEPOSITOR_COUNT: usize = 4;

/// Install `env_logger` once so `RUST_LOG=trace` shows processor output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ─── Test depositor ──────────────────────────────────────────────────────────

/// A depositor identity plus its off-pool wallet.
#[derive(Debug)]
pub struct TestDepositor {
    pub keypair: Keypair,
    /// Lamports held outside the pool.
    pub wallet: u64,
}

impl TestDepositor {
    pub fn new(wallet: u64) -> Self {
        Self {
            keypair: Keypair::new(),
            wallet,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

// ─── Test harness ────────────────────────────────────────────────────────────

/// A pool plus its owner and depositors.
pub struct YieldPoolTestHarness {
    pub ledger: PoolLedger,
    pub owner: Keypair,
    pub depositors: Vec<TestDepositor>,
    /// Total lamports minted into wallets.
    pub minted: u64,
}

impl Default for YieldPoolTestHarness {
    fn default() -> Self {
        Self::new(DEFAULT_DEPOSITOR_COUNT)
    }
}

impl YieldPoolTestHarness {
    /// Create a pool with `n` depositors, each holding `DEFAULT_WALLET_LAMPORTS`.
    pub fn new(num_depositors: usize) -> Self {
        Self::with_config(num_depositors, LedgerConfig::default())
    }

    pub fn with_config(num_depositors: usize, config: LedgerConfig) -> Self {
        init_logging();
        let owner = Keypair::new();
        let ledger = PoolLedger::new(owner.pubkey(), config).expect("valid ledger config");
        let depositors: Vec<TestDepositor> = (0..num_depositors)
            .map(|_| TestDepositor::new(DEFAULT_WALLET_LAMPORTS))
            .collect();
        let minted = DEFAULT_WALLET_LAMPORTS * num_depositors as u64;

        Self {
            ledger,
            owner,
            depositors,
            minted,
        }
    }

    pub fn owner_pubkey(&self) -> Pubkey {
        self.owner.pubkey()
    }

    pub fn depositor(&self, index: usize) -> Pubkey {
        self.depositors[index].pubkey()
    }

    pub fn wallet(&self, index: usize) -> u64 {
        self.depositors[index].wallet
    }

    /// Submit `instruction` for `caller` over the wire and settle any value
    /// movement against the simulated wallets.
    pub fn submit(
        &mut self,
        caller: Pubkey,
        attached_value: u64,
        instruction: &PoolInstruction,
    ) -> Result<Receipt, PoolError> {
        let data = instruction.encode()?;
        let receipt = self.ledger.submit_raw(caller, attached_value, &data)?;

        if let Receipt::Deposited { amount, .. } = &receipt {
            let wallet = self.wallet_mut(&caller).expect("depositor wallet");
            *wallet = wallet.checked_sub(*amount).expect("wallet covers deposit");
        }
        if let Some(payout) = receipt.payout() {
            let wallet = self.wallet_mut(&payout.recipient).expect("recipient wallet");
            *wallet += payout.amount;
        }
        Ok(receipt)
    }

    pub fn deposit(&mut self, index: usize, amount: u64) -> Result<Receipt, PoolError> {
        let caller = self.depositor(index);
        self.submit(caller, amount, &PoolInstruction::Deposit)
    }

    pub fn withdraw(&mut self, index: usize, amount: u64) -> Result<Receipt, PoolError> {
        let caller = self.depositor(index);
        self.submit(caller, 0, &PoolInstruction::Withdraw { amount })
    }

    pub fn vote(&mut self, index: usize, strategy: &str) -> Result<Receipt, PoolError> {
        let caller = self.depositor(index);
        self.submit(
            caller,
            0,
            &PoolInstruction::Vote {
                strategy: strategy.to_string(),
            },
        )
    }

    pub fn execute_as(&mut self, caller: Pubkey) -> Result<Receipt, PoolError> {
        self.submit(caller, 0, &PoolInstruction::ExecuteStrategy)
    }

    pub fn reset_as(&mut self, caller: Pubkey) -> Result<Receipt, PoolError> {
        self.submit(caller, 0, &PoolInstruction::ResetVoting)
    }

    pub fn execute(&mut self) -> Result<Receipt, PoolError> {
        self.execute_as(self.owner_pubkey())
    }

    pub fn reset(&mut self) -> Result<Receipt, PoolError> {
        self.reset_as(self.owner_pubkey())
    }

    /// Lamports in wallets plus lamports custodied by the pool.
    pub fn circulating(&self) -> u64 {
        let wallets: u64 = self.depositors.iter().map(|d| d.wallet).sum();
        wallets + self.ledger.contract_balance()
    }

    pub fn tally(&self, strategy: Strategy) -> i128 {
        self.ledger.votes().get(strategy)
    }

    fn wallet_mut(&mut self, account: &Pubkey) -> Option<&mut u64> {
        self.depositors
            .iter_mut()
            .find(|d| d.pubkey() == *account)
            .map(|d| &mut d.wallet)
    }

    /// Map of depositor pubkey → wallet lamports.
    pub fn wallets(&self) -> HashMap<Pubkey, u64> {
        self.depositors
            .iter()
            .map(|d| (d.pubkey(), d.wallet))
            .collect()
    }
}
