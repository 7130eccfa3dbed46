use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::aux::AuxPow;
use crate::hash::H256;
use crate::header::{BlockHeader, Work};
use crate::tx::Tx;
use crate::u256::U256;

/// A block, immutable apart from its lazy hash cache and the chain-
/// attachment fields (`height`, `chain_work`) latched by [`Block::attach_to`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub height: u64,
    /// Cumulative work of the chain up to and including this block.
    pub chain_work: U256,
    /// Present iff this block carries its own transaction set (as opposed
    /// to being header-only, e.g. an AuxPoW parent header).
    pub txs: Option<Vec<Tx>>,
    /// Present iff alt-chain config and the AuxPoW flag bit are set in
    /// `header.version`.
    pub aux: Option<AuxPow>,
    #[serde(skip, default)]
    hash: Cell<Option<H256>>,
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.height == other.height
            && self.chain_work == other.chain_work
            && self.txs == other.txs
            && self.aux == other.aux
    }
}
impl Eq for Block {}

impl Block {
    /// Constructs a genesis-like, unattached block (`height = 0`,
    /// `chain_work = work(header)`), with no cached hash yet.
    #[must_use]
    pub fn from_header(header: BlockHeader) -> Self {
        let chain_work = header.work();
        Block {
            header,
            height: 0,
            chain_work,
            txs: None,
            aux: None,
            hash: Cell::new(None),
        }
    }

    #[must_use]
    pub fn calc_hash(&self) -> H256 {
        self.header.calc_hash()
    }

    /// Returns the cached hash, computing and latching it lazily. The
    /// cache is written idempotently: repeated calls yield identical bytes.
    pub fn get_hash(&self) -> H256 {
        if let Some(h) = self.hash.get() {
            return h;
        }
        let h = self.calc_hash();
        self.hash.set(Some(h));
        h
    }

    /// Whether the stored hash matches `calc_hash`. Absence of a stored
    /// hash is a failure, not a recompute — callers must call `get_hash`
    /// (or latch one explicitly) before this check is meaningful.
    #[must_use]
    pub fn check_hash(&self) -> bool {
        matches!(self.hash.get(), Some(h) if h == self.calc_hash())
    }

    /// Explicitly latches a hash value, e.g. after the builder's `solve`
    /// supplies a winning nonce.
    pub fn set_hash(&self, hash: H256) {
        self.hash.set(Some(hash));
    }

    /// `work(bits) = floor(2^256 / (decode_unsigned(bits) + 1))`.
    #[must_use]
    pub fn work(&self) -> Work {
        self.header.work()
    }

    /// Sets `height` and `chain_work` relative to `parent`, per the
    /// invariant `chain_work = parent.chain_work + work(self)`.
    pub fn attach_to(&mut self, parent: &Block) {
        self.height = parent.height + 1;
        let (sum, overflow) = parent.chain_work.overflowing_add(self.work());
        debug_assert!(!overflow, "chain work accumulator overflowed 256 bits");
        self.chain_work = sum;
    }

    /// Comparison primitive a block-store would use for fork choice (the
    /// choice itself is out of scope here).
    #[must_use]
    pub fn has_more_work_than(&self, other: &Block) -> bool {
        self.chain_work > other.chain_work
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            version: 1,
            prev_hash: H256([0u8; 32]),
            merkle_root: H256([0u8; 32]),
            time: 1_231_006_505,
            bits: 0x1d00ffff,
            nonce: 2_083_236_893,
        }
    }

    #[test]
    fn hash_cache_is_idempotent() {
        let b = Block::from_header(sample_header());
        let first = b.get_hash();
        let second = b.get_hash();
        assert_eq!(first, second);
    }

    #[test]
    fn check_hash_fails_when_absent() {
        let b = Block::from_header(sample_header());
        assert!(!b.check_hash());
    }

    #[test]
    fn check_hash_succeeds_after_latching() {
        let b = Block::from_header(sample_header());
        b.get_hash();
        assert!(b.check_hash());
    }

    #[test]
    fn attach_to_accumulates_height_and_work() {
        let genesis = Block::from_header(sample_header());
        let mut child = Block::from_header(sample_header());
        child.attach_to(&genesis);
        assert_eq!(child.height, 1);
        assert_eq!(
            child.chain_work,
            genesis.chain_work.overflowing_add(child.work()).0
        );
        assert!(child.has_more_work_than(&genesis) || child.chain_work == genesis.chain_work);
    }
}
