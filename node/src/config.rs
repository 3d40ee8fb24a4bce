//! Voter configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use arbiter_consensus::ConsensusConfig;
use arbiter_crypto::keypair_from_seed;
use arbiter_ledger::GenesisConfig;
use arbiter_types::{AccountId, KeyPair};

use crate::{LogFormat, NodeError};

/// Configuration for one voter.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every voter of a network must
/// share `genesis` and `consensus`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Relay address, `host:port`.
    #[serde(default = "default_relay")]
    pub relay: String,

    /// Directory holding this voter's LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Hex of the 32-byte Ed25519 seed the voter signs with.
    pub key_seed: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter, e.g. "info" or "debug,arbiter_consensus=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Account state at ledger 0.
    pub genesis: GenesisConfig,

    /// Fee, round thresholds and round duration.
    #[serde(default)]
    pub consensus: ConsensusConfig,
}

fn default_relay() -> String {
    "127.0.0.1:9000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./arbiter_data")
}

fn default_map_size_mb() -> usize {
    64
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NodeConfig {
    /// A config with defaults for everything but the key and genesis.
    pub fn new(key_seed: &[u8; 32], genesis: GenesisConfig) -> Self {
        Self {
            relay: default_relay(),
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            key_seed: hex::encode(key_seed),
            genesis,
            consensus: ConsensusConfig::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        self.seed()?;
        self.genesis.validate()?;
        self.consensus
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))?;
        self.log_format()?;
        Ok(())
    }

    fn seed(&self) -> Result<[u8; 32], NodeError> {
        let bytes = hex::decode(&self.key_seed)
            .map_err(|e| NodeError::Config(format!("key_seed: {e}")))?;
        bytes
            .try_into()
            .map_err(|_| NodeError::Config("key_seed must be 32 bytes".into()))
    }

    pub fn keypair(&self) -> Result<KeyPair, NodeError> {
        Ok(keypair_from_seed(&self.seed()?))
    }

    pub fn account_id(&self) -> Result<AccountId, NodeError> {
        Ok(arbiter_crypto::derive_account_id(&self.keypair()?.public))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        match self.log_format.as_str() {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(NodeError::Config(format!("unknown log format {other:?}"))),
        }
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        key_seed = "0101010101010101010101010101010101010101010101010101010101010101"

        [genesis]
        account_id = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        stake = 1000000
    "#;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str(MINIMAL).expect("should parse");
        assert_eq!(config.relay, "127.0.0.1:9000");
        assert_eq!(config.log_format, "human");
        assert_eq!(config.consensus, ConsensusConfig::default());
        assert_eq!(config.genesis.stake, 1_000_000);
        assert_eq!(config.map_size_bytes(), 64 * 1024 * 1024);
    }

    #[test]
    fn partial_consensus_table_overrides() {
        let toml = format!(
            "{MINIMAL}\n[consensus]\ntransaction_fee = 10\nround_duration_ms = 250\n"
        );
        let config = NodeConfig::from_toml_str(&toml).expect("should parse");
        assert_eq!(config.consensus.transaction_fee, 10);
        assert_eq!(config.consensus.round_duration_ms, 250);
        assert_eq!(config.consensus.round_count(), 5);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = NodeConfig::from_toml_str(MINIMAL).unwrap();
        let parsed = NodeConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed.key_seed, config.key_seed);
        assert_eq!(parsed.genesis, config.genesis);
    }

    #[test]
    fn bad_values_are_config_errors() {
        let short_seed = MINIMAL.replace("01010101010101010101010101010101", "");
        assert!(matches!(NodeConfig::from_toml_str(&short_seed), Err(NodeError::Config(_))));

        let bad_thresholds = format!("{MINIMAL}\n[consensus]\nround_thresholds_bps = [5000]\n");
        assert!(matches!(NodeConfig::from_toml_str(&bad_thresholds), Err(NodeError::Config(_))));

        let bad_format = format!("log_format = \"xml\"\n{MINIMAL}");
        assert!(NodeConfig::from_toml_str(&bad_format).is_err());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file(Path::new("/nonexistent/arbiter.toml"));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn account_id_follows_the_seed() {
        let config = NodeConfig::from_toml_str(MINIMAL).unwrap();
        let expected = arbiter_crypto::derive_account_id(&keypair_from_seed(&[1; 32]).public);
        assert_eq!(config.account_id().unwrap(), expected);
    }
}
