use serde::{Deserialize, Serialize};

use crate::hash::{double_sha256, H256};

/// The reserved previous-output index a coinbase input's outpoint carries.
pub const COINBASE_OUTPOINT_INDEX: u32 = 0xFFFF_FFFF;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub version: u32,
    pub lock_time: u32,
    pub ins: Vec<TxIn>,
    pub outs: Vec<TxOut>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub previous_tx_hash: H256,
    pub previous_output_index: u32,
    pub script: Vec<u8>,
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: u64,
    pub script_pub_key: Vec<u8>,
}

impl Tx {
    /// Serializes `(version, lock_time, ins, outs)` and hashes with H2.
    /// A full wire-accurate transaction codec (varints, witness data) is
    /// out of scope for this core; this is sufficient for Merkle-root
    /// bookkeeping over transactions the core itself constructs.
    #[must_use]
    pub fn get_hash(&self) -> H256 {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.lock_time.to_le_bytes());
        for txin in &self.ins {
            buf.extend_from_slice(&txin.previous_tx_hash.0);
            buf.extend_from_slice(&txin.previous_output_index.to_le_bytes());
            buf.extend_from_slice(&txin.script);
            buf.extend_from_slice(&txin.sequence.to_le_bytes());
        }
        for txout in &self.outs {
            buf.extend_from_slice(&txout.value.to_le_bytes());
            buf.extend_from_slice(&txout.script_pub_key);
        }
        double_sha256(&buf)
    }

    /// A coinbase has exactly one input, spending the all-zero hash at the
    /// reserved output index.
    #[must_use]
    pub fn is_coinbase(&self) -> bool {
        self.ins.len() == 1
            && self.ins[0].previous_tx_hash == H256([0u8; 32])
            && self.ins[0].previous_output_index == COINBASE_OUTPOINT_INDEX
    }

    pub fn coinbase(beneficiary_script: Vec<u8>, value: u64) -> Tx {
        Tx {
            version: 1,
            lock_time: 0,
            ins: vec![TxIn {
                previous_tx_hash: H256([0u8; 32]),
                previous_output_index: COINBASE_OUTPOINT_INDEX,
                script: Vec::new(),
                sequence: 0xFFFF_FFFF,
            }],
            outs: vec![TxOut {
                value,
                script_pub_key: beneficiary_script,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coinbase_constructor_is_classified_as_coinbase() {
        let cb = Tx::coinbase(vec![0xab], 5_000_000_000);
        assert!(cb.is_coinbase());
    }

    #[test]
    fn non_coinbase_tx_is_not_classified_as_coinbase() {
        let spend = Tx {
            version: 1,
            lock_time: 0,
            ins: vec![TxIn {
                previous_tx_hash: H256([1u8; 32]),
                previous_output_index: 0,
                script: vec![],
                sequence: 0xFFFF_FFFF,
            }],
            outs: vec![],
        };
        assert!(!spend.is_coinbase());
    }
}
