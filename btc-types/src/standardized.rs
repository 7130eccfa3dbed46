use serde::Serialize;

use crate::block::Block;

/// Display projection with canonical field names, all hashes rendered in
/// reversed (big-endian) hex. Mirrors a block explorer / RPC `getblock`
/// style response rather than the internal wire representation.
#[derive(Serialize)]
pub struct StandardizedBlock {
    pub hash: String,
    pub version: u32,
    pub prev_block: String,
    pub mrkl_root: String,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_tx: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrkl_tree: Option<Vec<String>>,
}

impl StandardizedBlock {
    /// `size = 80 + varint(n_tx) + sum(tx.size)`. This core's [`crate::tx::Tx`]
    /// has no wire-accurate byte length of its own (see its doc comment), so
    /// the per-tx size used here is each tx's own serialized byte count as
    /// produced by `Tx::get_hash`'s preimage buffer.
    #[must_use]
    pub fn from_block(block: &Block, mrkl_tree: Option<&[crate::hash::H256]>) -> Self {
        let hash = block.get_hash();
        let (n_tx, size, tx) = match &block.txs {
            Some(txs) => {
                let tx_hex: Vec<String> =
                    txs.iter().map(|t| t.get_hash().to_reversed_hex()).collect();
                let varint_len = varint_size(txs.len() as u64);
                let tx_bytes: usize = txs.iter().map(tx_preimage_len).sum();
                (
                    Some(txs.len()),
                    Some(crate::header::BlockHeader::SIZE + varint_len + tx_bytes),
                    Some(tx_hex),
                )
            }
            None => (None, None, None),
        };

        StandardizedBlock {
            hash: hash.to_reversed_hex(),
            version: block.header.version,
            prev_block: block.header.prev_hash.to_reversed_hex(),
            mrkl_root: block.header.merkle_root.to_reversed_hex(),
            time: block.header.time,
            bits: block.header.bits,
            nonce: block.header.nonce,
            height: block.height,
            n_tx,
            size,
            tx,
            mrkl_tree: mrkl_tree
                .map(|levels| levels.iter().map(|h| h.to_reversed_hex()).collect()),
        }
    }
}

fn tx_preimage_len(tx: &crate::tx::Tx) -> usize {
    let mut len = 4 + 4;
    for txin in &tx.ins {
        len += 32 + 4 + txin.script.len() + 4;
    }
    for txout in &tx.outs {
        len += 8 + txout.script_pub_key.len();
    }
    len
}

fn varint_size(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}
