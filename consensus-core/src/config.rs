use serde::{Deserialize, Serialize};

use btc_types::network::{Network, NetworkParams};

/// The configuration surface an embedding node populates, loaded from TOML
/// the way the donor relayer's own `Config::new` loads its settings file.
/// This core never touches the filesystem itself; `NodeConfig::from_toml_str`
/// is provided purely as a convenience for the embedder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    pub network: Network,
    #[serde(default)]
    pub strict_aux_parent_hash: bool,
    #[serde(default)]
    pub full_retarget_start: u64,
}

impl NodeConfig {
    #[must_use]
    pub fn network_params(&self) -> NetworkParams {
        let mut params = NetworkParams::new(self.network);
        params.strict_aux_parent_hash = self.strict_aux_parent_hash;
        params.full_retarget_start = self.full_retarget_start;
        params
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let raw = r#"
            network = "Mainnet"
        "#;
        let cfg = NodeConfig::from_toml_str(raw).unwrap();
        assert!(!cfg.strict_aux_parent_hash);
        assert_eq!(cfg.full_retarget_start, 0);
    }

    #[test]
    fn strict_flag_and_retarget_knob_flow_into_params() {
        let raw = r#"
            network = "AltChainAuxPow"
            strict_aux_parent_hash = true
            full_retarget_start = 500000
        "#;
        let cfg = NodeConfig::from_toml_str(raw).unwrap();
        let params = cfg.network_params();
        assert!(params.strict_aux_parent_hash);
        assert_eq!(params.full_retarget_start, 500000);
    }
}
