use bitcoin::consensus::deserialize;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::hash::H256;

/// Merge-mining (AuxPoW) linkage: proves that a block of this chain was
/// accepted by embedding its hash in a foreign parent chain's coinbase,
/// and that the parent chain's own PoW met this chain's target.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuxPow {
    /// Raw wire bytes of the parent chain's coinbase transaction.
    pub coinbase: Vec<u8>,
    /// Merkle proof that `coinbase` is included in the parent block.
    pub coinbase_branch: Vec<H256>,
    pub coinbase_branch_mask: u32,
    /// The parent chain's header, recursively a `Block` but never itself
    /// carrying an `aux` (merge mining is not chained).
    pub parent: Box<Block>,
    /// Claimed hash of `parent`; validated against `parent.calc_hash()`.
    pub parent_hash: H256,
    /// Merkle proof aggregating multiple merge-mined chains into the single
    /// scalar embedded in the coinbase script.
    pub blockchain_branch: Vec<H256>,
    pub blockchain_branch_mask: u32,
}

impl AuxPow {
    /// Parses the embedded parent-chain coinbase with the real Bitcoin wire
    /// codec; it is always foreign-chain data, never this chain's own
    /// transaction model.
    pub fn coinbase_tx(
        &self,
    ) -> Result<bitcoin::blockdata::transaction::Transaction, bitcoin::consensus::encode::Error>
    {
        deserialize(&self.coinbase)
    }
}
