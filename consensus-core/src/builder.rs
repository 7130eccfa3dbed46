use std::time::{SystemTime, UNIX_EPOCH};

use btc_types::header::BlockHeader;
use btc_types::network::NetworkParams;
use btc_types::{Block, Tx, U256};

use crate::chain_store::ChainStore;
use crate::miner::Miner;
use crate::retarget::{get_median_time_past, get_next_work};

const COIN: u64 = 100_000_000;
const HALVING_INTERVAL: u64 = 210_000;

/// Block subsidy at `height`, halving every [`HALVING_INTERVAL`] blocks
/// down to zero once the subsidy has halved past the width of a `u64`.
#[must_use]
pub fn block_value(height: u64) -> u64 {
    let halvings = height / HALVING_INTERVAL;
    if halvings >= 64 {
        return 0;
    }
    (50 * COIN) >> halvings
}

/// Assembles the next candidate block on top of `tip`: a coinbase paying
/// `block_value` to `beneficiary_script`, the matching single-leaf Merkle
/// root, and the difficulty this core requires at `timestamp`. The header's
/// `nonce` is left at zero; callers run it through `solve` before announcing it.
///
/// `timestamp` of `None` resolves to `max(median_time_past + 1, wall_clock_seconds())`,
/// the same default a miner assembling its own candidate block would pick.
pub async fn prepare_next_block(
    store: &impl ChainStore,
    tip: &Block,
    timestamp: Option<u32>,
    beneficiary_script: Vec<u8>,
    params: &NetworkParams,
) -> anyhow::Result<Block> {
    let timestamp = match timestamp {
        Some(timestamp) => timestamp,
        None => {
            let median = get_median_time_past(store, tip).await?;
            let wall_clock = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock is before the Unix epoch")
                .as_secs() as u32;
            (median + 1).max(wall_clock)
        }
    };

    let bits = get_next_work(store, tip, timestamp, params).await?;
    let coinbase = Tx::coinbase(beneficiary_script, block_value(tip.height + 1));
    let merkle_root = merkle_tools::merkle_root(&[coinbase.get_hash()]);

    let version = if params.alt_chain {
        params.aux_pow_flag | (params.aux_pow_chain_id << 16)
    } else {
        1
    };

    let header = BlockHeader {
        version,
        prev_hash: tip.get_hash(),
        merkle_root,
        time: timestamp,
        bits,
        nonce: 0,
    };

    let mut block = Block::from_header(header);
    block.txs = Some(vec![coinbase]);
    block.attach_to(tip);
    Ok(block)
}

/// Delegates the proof-of-work search for `header` to `miner`, decoding its
/// target the same way a received block's proof of work is checked.
pub async fn solve(miner: &impl Miner, header: &BlockHeader) -> anyhow::Result<u32> {
    let target = U256::from_compact_unsigned(header.bits);
    miner.solve(header, target).await
}

/// `prepare_next_block` followed by `solve`, with the winning nonce and
/// resulting hash latched onto the returned block.
pub async fn mine_next_block(
    store: &impl ChainStore,
    miner: &impl Miner,
    tip: &Block,
    timestamp: Option<u32>,
    beneficiary_script: Vec<u8>,
    params: &NetworkParams,
) -> anyhow::Result<Block> {
    let mut block = prepare_next_block(store, tip, timestamp, beneficiary_script, params).await?;
    let nonce = solve(miner, &block.header).await?;
    block.header.nonce = nonce;
    block.set_hash(block.calc_hash());
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsidy_starts_at_fifty_coins() {
        assert_eq!(block_value(0), 50 * COIN);
        assert_eq!(block_value(HALVING_INTERVAL - 1), 50 * COIN);
    }

    #[test]
    fn subsidy_halves_at_the_interval_boundary() {
        assert_eq!(block_value(HALVING_INTERVAL), 25 * COIN);
        assert_eq!(block_value(HALVING_INTERVAL * 2), 12 * COIN + 50_000_000);
    }

    #[test]
    fn subsidy_is_zero_once_fully_halved_away() {
        assert_eq!(block_value(HALVING_INTERVAL * 64), 0);
    }
}
