use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    /// An AuxPoW-capable alt chain (merge-mined against a foreign parent
    /// chain), with its own difficulty schedule.
    AltChainAuxPow,
}

/// Consensus parameters varying per network, gathered from the fields
/// actually consumed by retarget and AuxPoW checking across mainnet,
/// testnet, and merge-mined alt chains.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct NetworkParams {
    pub target_timespan_secs: u64,
    pub target_spacing_secs: u64,
    pub min_diff_bits: u32,
    pub is_testnet: bool,
    /// Whether this chain accepts AuxPoW blocks at all.
    pub alt_chain: bool,
    /// Version-bit mask identifying an AuxPoW block (`version & aux_pow_flag != 0`).
    pub aux_pow_flag: u32,
    /// Chain id this network expects in `version`'s high 16 bits for AuxPoW blocks.
    pub aux_pow_chain_id: u32,
    /// Off-by-one correction knob for the retarget anchor lookup.
    pub full_retarget_start: u64,
    /// Whether an AuxPoW parent-hash mismatch is treated as fatal (false
    /// preserves the lenient, logged-only legacy behavior).
    pub strict_aux_parent_hash: bool,
}

impl NetworkParams {
    #[must_use]
    pub fn blocks_per_adjustment(&self) -> u64 {
        self.target_timespan_secs / self.target_spacing_secs
    }

    #[must_use]
    pub fn mainnet() -> Self {
        NetworkParams {
            target_timespan_secs: 2016 * 600,
            target_spacing_secs: 600,
            min_diff_bits: 0x1d00_ffff,
            is_testnet: false,
            alt_chain: false,
            aux_pow_flag: 0,
            aux_pow_chain_id: 0,
            full_retarget_start: 0,
            strict_aux_parent_hash: false,
        }
    }

    #[must_use]
    pub fn testnet() -> Self {
        NetworkParams {
            is_testnet: true,
            ..NetworkParams::mainnet()
        }
    }

    /// Parameters for a merge-mined alt chain: AuxPoW flag bit 0x0100 in
    /// `version` (the conventional Namecoin/Dogecoin-style bit), and the
    /// lenient parent-hash-mismatch behavior preserved by default.
    #[must_use]
    pub fn alt_chain_aux_pow(target_spacing_secs: u64, min_diff_bits: u32, chain_id: u32) -> Self {
        NetworkParams {
            target_timespan_secs: 2016 * target_spacing_secs,
            target_spacing_secs,
            min_diff_bits,
            is_testnet: false,
            alt_chain: true,
            aux_pow_flag: 0x0100,
            aux_pow_chain_id: chain_id,
            full_retarget_start: 0,
            strict_aux_parent_hash: false,
        }
    }

    #[must_use]
    pub fn new(network: Network) -> Self {
        match network {
            Network::Mainnet => NetworkParams::mainnet(),
            Network::Testnet => NetworkParams::testnet(),
            Network::AltChainAuxPow => NetworkParams::alt_chain_aux_pow(600, 0x1e0f_ffff, 0x0062),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_interval_is_2016() {
        assert_eq!(NetworkParams::mainnet().blocks_per_adjustment(), 2016);
    }

    #[test]
    fn testnet_inherits_mainnet_parameters_except_the_flag() {
        let t = NetworkParams::testnet();
        let m = NetworkParams::mainnet();
        assert!(t.is_testnet);
        assert!(!m.is_testnet);
        assert_eq!(t.target_timespan_secs, m.target_timespan_secs);
    }
}
