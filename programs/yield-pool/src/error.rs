//! Custom errors for the Yield Pool program.

use {
    num_derive::{FromPrimitive, ToPrimitive},
    num_traits::{FromPrimitive as _, ToPrimitive as _},
    thiserror::Error,
};

/// Every way a pool call can be rejected.
///
/// A rejected call never mutates the pool. Discriminants are stable and are
/// what [`PoolError::code`] reports to hosts that only carry integer errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum PoolError {
    #[error("Amount must be greater than zero")]
    InvalidAmount = 0,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Voting is not active")]
    VotingClosed,

    #[error("Invalid strategy")]
    InvalidStrategy,

    #[error("Must have deposits to vote")]
    NoDeposit,

    #[error("Caller is not the pool owner")]
    Unauthorized,

    #[error("Voting already executed")]
    AlreadyExecuted,

    #[error("No deposits to execute on")]
    NoDeposits,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Instruction data is invalid or exceeds the size limit")]
    InvalidInstructionData,

    #[error("Value attached to a non-payable instruction")]
    NonPayable,

    #[error("Pool state data is invalid or corrupted")]
    InvalidStateData,
}

impl PoolError {
    /// Stable numeric code for this error.
    pub fn code(self) -> u32 {
        // Fieldless enum with explicit discriminants; always representable.
        self.to_u32().unwrap_or(u32::MAX)
    }

    /// Inverse of [`PoolError::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

impl From<PoolError> for u32 {
    fn from(error: PoolError) -> Self {
        error.code()
    }
}
