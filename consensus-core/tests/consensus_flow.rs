use btc_types::hash::H256;
use btc_types::header::BlockHeader;
use btc_types::network::NetworkParams;
use btc_types::{Block, U256};

use consensus_core::builder::{mine_next_block, prepare_next_block};
use consensus_core::miner::Miner;
use consensus_core::retarget::verify_child;
use consensus_core::test_support::MemoryChainStore;
use consensus_core::validator::check_block;
use consensus_core::VerificationError;

/// A regtest-style easy target: brute forces nonces starting at zero, which
/// virtually always satisfies `0x207fffff` on the first or second try.
struct TrivialMiner;

impl Miner for TrivialMiner {
    async fn solve(&self, header: &BlockHeader, target: U256) -> anyhow::Result<u32> {
        let mut candidate = header.clone();
        for nonce in 0..1_000_000u32 {
            candidate.nonce = nonce;
            let mut bytes = candidate.calc_hash().0;
            bytes.reverse();
            if U256::from_be_bytes(&bytes) <= target {
                return Ok(nonce);
            }
        }
        anyhow::bail!("no solution found in search range")
    }
}

const EASY_BITS: u32 = 0x207f_ffff;

fn genesis_at(time: u32) -> Block {
    let header = BlockHeader {
        version: 1,
        prev_hash: H256([0u8; 32]),
        merkle_root: H256([0u8; 32]),
        time,
        bits: EASY_BITS,
        nonce: 0,
    };
    let block = Block::from_header(header);
    block.get_hash();
    block
}

#[tokio::test]
async fn a_mined_child_extends_and_validates_against_its_parent() {
    let _ = env_logger::try_init();
    let params = NetworkParams::mainnet();
    let store = MemoryChainStore::new();
    let genesis = genesis_at(1_700_000_000);
    store.insert(genesis.clone());

    let child = mine_next_block(
        &store,
        &TrivialMiner,
        &genesis,
        Some(genesis.header.time + 600),
        vec![0xab],
        &params,
    )
    .await
    .unwrap();

    assert_eq!(child.height, 1);
    assert!(check_block(&child, &params, child.header.time + 10).is_ok());
    assert!(verify_child(&store, &genesis, &child, &params).await.is_ok());
}

#[tokio::test]
async fn a_block_whose_hash_was_never_latched_fails_check_hash() {
    let _ = env_logger::try_init();
    let params = NetworkParams::mainnet();
    let header = BlockHeader {
        version: 1,
        prev_hash: H256([0u8; 32]),
        merkle_root: H256([0u8; 32]),
        time: 1_700_000_000,
        bits: EASY_BITS,
        nonce: 0,
    };
    let unlatched = Block::from_header(header);

    let err = check_block(&unlatched, &params, unlatched.header.time + 10).unwrap_err();
    assert_eq!(err, VerificationError::BadHash);
}

#[tokio::test]
async fn a_child_carrying_the_wrong_difficulty_is_rejected() {
    let _ = env_logger::try_init();
    let params = NetworkParams::mainnet();
    let store = MemoryChainStore::new();
    let genesis = genesis_at(1_700_000_000);
    store.insert(genesis.clone());

    let mut child = mine_next_block(
        &store,
        &TrivialMiner,
        &genesis,
        Some(genesis.header.time + 600),
        vec![0xab],
        &params,
    )
    .await
    .unwrap();

    // Mainnet at this height is not a retarget boundary, so bits must equal
    // the parent's; force a mismatch.
    child.header.bits = 0x1d00ffff;
    child.set_hash(child.calc_hash());

    let err = verify_child(&store, &genesis, &child, &params)
        .await
        .unwrap_err()
        .downcast::<VerificationError>()
        .unwrap();
    assert_eq!(err, VerificationError::WrongDifficulty);
}

#[tokio::test]
async fn a_child_timestamped_at_the_median_is_rejected() {
    let _ = env_logger::try_init();
    let params = NetworkParams::mainnet();
    let store = MemoryChainStore::new();
    let genesis = genesis_at(1_700_000_000);
    store.insert(genesis.clone());

    let mut child = mine_next_block(
        &store,
        &TrivialMiner,
        &genesis,
        Some(genesis.header.time),
        vec![0xab],
        &params,
    )
    .await
    .unwrap();
    child.header.time = genesis.header.time;
    child.set_hash(child.calc_hash());

    let err = verify_child(&store, &genesis, &child, &params)
        .await
        .unwrap_err()
        .downcast::<VerificationError>()
        .unwrap();
    assert_eq!(err, VerificationError::TimestampTooEarly);
}

#[tokio::test]
async fn a_block_prepared_without_an_explicit_timestamp_falls_back_past_the_median() {
    let _ = env_logger::try_init();
    let params = NetworkParams::mainnet();
    let store = MemoryChainStore::new();
    let genesis = genesis_at(1_700_000_000);
    store.insert(genesis.clone());

    let block = prepare_next_block(&store, &genesis, None, vec![0xab], &params)
        .await
        .unwrap();

    assert!(block.header.time > genesis.header.time);
}
