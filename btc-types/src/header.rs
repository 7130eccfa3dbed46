use serde::{Deserialize, Serialize};

use crate::{
    hash::{double_sha256, H256},
    u256::U256,
};

pub type Target = U256;
pub type Work = U256;

/// The fixed 80-byte block header. Every integer field is little-endian on
/// the wire; `version`'s high 16 bits carry the merge-mining chain id on an
/// AuxPoW-capable alt chain, with the low bits holding the AuxPoW flag bit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_hash: H256,
    pub merkle_root: H256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Serialized length of (version, prev_hash, merkle_root, time, bits, nonce).
    pub const SIZE: usize = 4 + 32 + 32 + 4 + 4 + 4; // 80

    /// `LE32(version) || prev_hash || merkle_root || LE32(time) || LE32(bits) || LE32(nonce)`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_hash.0);
        out[36..68].copy_from_slice(&self.merkle_root.0);
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    #[must_use]
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        BlockHeader {
            version: u32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            prev_hash: H256(bytes[4..36].try_into().unwrap()),
            merkle_root: H256(bytes[36..68].try_into().unwrap()),
            time: u32::from_le_bytes(bytes[68..72].try_into().unwrap()),
            bits: u32::from_le_bytes(bytes[72..76].try_into().unwrap()),
            nonce: u32::from_le_bytes(bytes[76..80].try_into().unwrap()),
        }
    }

    /// `H2(header80)`. Always recomputes; callers that want the cached
    /// value should go through `Block::get_hash`/`Block::check_hash`.
    #[must_use]
    pub fn calc_hash(&self) -> H256 {
        double_sha256(&self.to_bytes())
    }

    /// Target decoded the way PoW comparisons do (sign bit set ⇒ zero target).
    #[must_use]
    pub fn target_unsigned(&self) -> Target {
        Target::from_compact_unsigned(self.bits)
    }

    /// Target decoded the way retarget arithmetic does (sign bit stripped,
    /// never zeroed).
    #[must_use]
    pub fn target_signed(&self) -> Target {
        Target::from_compact_signed(self.bits)
    }

    /// `work(bits) = floor(2^256 / (decode_unsigned(bits) + 1))`.
    #[must_use]
    pub fn work(&self) -> Work {
        self.target_unsigned().inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_roundtrip() {
        let h = BlockHeader {
            version: 1,
            prev_hash: H256([0u8; 32]),
            merkle_root: H256([0u8; 32]),
            time: 1_231_006_505,
            bits: 0x1d00ffff,
            nonce: 2_083_236_893,
        };
        let bytes = h.to_bytes();
        assert_eq!(BlockHeader::from_bytes(&bytes), h);
    }

    #[test]
    fn genesis_header_hashes_to_the_known_genesis_hash() {
        let h = BlockHeader {
            version: 1,
            prev_hash: H256([0u8; 32]),
            merkle_root: "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a"
                .parse()
                .unwrap(),
            time: 1_231_006_505,
            bits: 0x1d00ffff,
            nonce: 2_083_236_893,
        };
        let hash = h.calc_hash();
        // Internal (non-reversed) byte order, matching how this hash is stored.
        assert_eq!(
            hash.to_hex(),
            "6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000"
        );
    }
}
