//! Constants for the TRv1 Yield Pool program.

/// Percentage denominator (100 = 100%).
pub const PERCENT_DENOMINATOR: u64 = 100;

// ---------------------------------------------------------------------------
// Strategy yields (whole percent, applied once per execution)
// ---------------------------------------------------------------------------

/// Safe strategy: 5%.
pub const SAFE_YIELD_PCT: u64 = 5;

/// Risky strategy: 15%.
pub const RISKY_YIELD_PCT: u64 = 15;

/// Charity strategy: 3%.
pub const CHARITY_YIELD_PCT: u64 = 3;

/// Yield applied by the name-based lookup for anything it does not recognise.
pub const DEFAULT_YIELD_PCT: u64 = 3;

// ---------------------------------------------------------------------------
// Wire names
// ---------------------------------------------------------------------------

pub const SAFE_NAME: &str = "Safe";
pub const RISKY_NAME: &str = "Risky";
pub const CHARITY_NAME: &str = "Charity";

// ---------------------------------------------------------------------------
// Account layout
// ---------------------------------------------------------------------------

/// Discriminator byte written at the start of every serialised pool state
/// to distinguish it from uninitialised or foreign data.
pub const POOL_STATE_DISCRIMINATOR: u8 = 1;
