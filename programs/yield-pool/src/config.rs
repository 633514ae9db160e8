//! Ledger service configuration.
//!
//! Strategy yields are fixed by the program and are deliberately not part of
//! this configuration; it only shapes how submissions are accepted.

use {
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// Configuration for a [`crate::ledger::PoolLedger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Upper bound on encoded instruction size accepted by
    /// [`crate::ledger::PoolLedger::submit_raw`].
    /// Default: `PACKET_DATA_SIZE` (1232 bytes).
    pub max_instruction_data_len: usize,

    /// Reject value attached to any instruction other than `Deposit`.
    /// When `false` the value is ignored instead.
    /// Default: `true`.
    pub reject_value_on_non_payable: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_instruction_data_len: solana_packet::PACKET_DATA_SIZE,
            reject_value_on_non_payable: true,
        }
    }
}

impl LedgerConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_instruction_data_len == 0 {
            return Err(ConfigError::ZeroInstructionLimit);
        }
        Ok(())
    }
}

/// Errors from [`LedgerConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_instruction_data_len must be greater than zero")]
    ZeroInstructionLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.max_instruction_data_len, 1232);
        assert!(cfg.reject_value_on_non_payable);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let cfg = LedgerConfig {
            max_instruction_data_len: 0,
            ..LedgerConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroInstructionLimit));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg: LedgerConfig =
            serde_json::from_str(r#"{ "reject_value_on_non_payable": false }"#).unwrap();
        assert_eq!(cfg.max_instruction_data_len, 1232);
        assert!(!cfg.reject_value_on_non_payable);
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = LedgerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let decoded: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, decoded);
    }
}
