use btc_types::hash::H256;
use btc_types::network::NetworkParams;
use btc_types::{Block, U256};
use merkle_tools::{self, build_tree};

use crate::errors::VerificationError;

const MERGE_MINING_TAG: [u8; 4] = [0xFA, 0xBE, 0x6D, 0x6D];
const MAX_FUTURE_DRIFT_SECS: u32 = 2 * 60 * 60;
const LCG_MULTIPLIER: u32 = 1_103_515_245;
const LCG_INCREMENT: u32 = 12_345;

/// Runs every check in `check_block` against `now` and returns the first
/// violation, matching the order `check_hash -> check_proof_of_work ->
/// check_timestamp -> [aux checks] -> [tx checks]`.
pub fn check_block(
    block: &Block,
    params: &NetworkParams,
    now: u32,
) -> Result<(), VerificationError> {
    check_hash(block)?;
    check_proof_of_work(block, params)?;
    check_timestamp(block, now)?;

    if aux_pow_in_effect(block, params) {
        check_merkle_link(block)?;
        check_aux_coinbase(block, params)?;
    }

    if let Some(txs) = &block.txs {
        if txs.is_empty() {
            return Err(VerificationError::NoTransactions);
        }
        if !txs[0].is_coinbase() {
            return Err(VerificationError::FirstTxNotCoinbase);
        }
        if txs[1..].iter().any(|t| t.is_coinbase()) {
            return Err(VerificationError::NonFirstTxIsCoinbase);
        }

        let leaves: Vec<H256> = txs.iter().map(|t| t.get_hash()).collect();
        let tree = build_tree(&leaves);
        let calculated_root = *tree.last().ok_or(VerificationError::NoMerkleRoot)?;

        // The donor's equivalent check threw when the computed root
        // equalled the header's merkle root (an inverted condition). The
        // correct rule fails when they are NOT equal.
        if calculated_root != block.header.merkle_root {
            return Err(VerificationError::MerkleRootMismatch);
        }
    }

    Ok(())
}

fn check_hash(block: &Block) -> Result<(), VerificationError> {
    if block.check_hash() {
        Ok(())
    } else {
        Err(VerificationError::BadHash)
    }
}

fn aux_pow_in_effect(block: &Block, params: &NetworkParams) -> bool {
    params.alt_chain && (block.header.version & params.aux_pow_flag != 0)
}

/// Reverses internal byte order to big-endian so lexicographic comparison
/// of the bytes matches numeric comparison against a decoded target.
fn hash_as_u256(h: &H256) -> U256 {
    let mut bytes = h.0;
    bytes.reverse();
    U256::from_be_bytes(&bytes)
}

fn check_proof_of_work(block: &Block, params: &NetworkParams) -> Result<(), VerificationError> {
    let target = U256::from_compact_unsigned(block.header.bits);

    let pow_hash = if aux_pow_in_effect(block, params) {
        let chain_id = block.header.version >> 16;
        if chain_id != params.aux_pow_chain_id {
            return Err(VerificationError::PowWrongAuxChain);
        }
        let aux = block.aux.as_ref().ok_or(VerificationError::PowWrongAuxChain)?;
        let recomputed_parent_hash = aux.parent.calc_hash();
        if recomputed_parent_hash != aux.parent_hash {
            if params.strict_aux_parent_hash {
                return Err(VerificationError::BadHash);
            }
            log::warn!(
                target: "consensus_core::validator",
                "AuxPoW parent hash mismatch tolerated (lenient mode): claimed {}, recomputed {}",
                aux.parent_hash,
                recomputed_parent_hash,
            );
        }
        recomputed_parent_hash
    } else {
        block.calc_hash()
    };

    if hash_as_u256(&pow_hash) > target {
        return Err(VerificationError::PowBelowTarget);
    }
    Ok(())
}

fn check_timestamp(block: &Block, now: u32) -> Result<(), VerificationError> {
    if block.header.time > now.saturating_add(MAX_FUTURE_DRIFT_SECS) {
        return Err(VerificationError::TimestampTooFarFuture);
    }
    Ok(())
}

fn check_merkle_link(block: &Block) -> Result<(), VerificationError> {
    let aux = block.aux.as_ref().ok_or(VerificationError::AuxPowMerkleLink)?;
    let coinbase_tx = aux
        .coinbase_tx()
        .map_err(|_| VerificationError::AuxPowMerkleLink)?;
    let coinbase_hash = H256(coinbase_tx.compute_txid().to_byte_array());
    let computed =
        merkle_tools::verify_branch(coinbase_hash, &aux.coinbase_branch, aux.coinbase_branch_mask);
    if computed != aux.parent.header.merkle_root {
        return Err(VerificationError::AuxPowMerkleLink);
    }
    Ok(())
}

fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }
    (0..=haystack.len() - needle.len())
        .filter(|&i| &haystack[i..i + needle.len()] == needle)
        .collect()
}

fn read_u32_le(bytes: &[u8], pos: usize) -> Option<u32> {
    bytes
        .get(pos..pos + 4)
        .map(|s| u32::from_le_bytes(s.try_into().unwrap()))
}

fn check_aux_coinbase(block: &Block, params: &NetworkParams) -> Result<(), VerificationError> {
    let aux = block
        .aux
        .as_ref()
        .ok_or(VerificationError::AuxPowHashNotInScript)?;
    let coinbase_tx = aux
        .coinbase_tx()
        .map_err(|_| VerificationError::AuxPowHashNotInScript)?;
    let script: Vec<u8> = coinbase_tx.input[0].script_sig.to_bytes();

    let expected_hash: H256 = if !aux.blockchain_branch.is_empty() {
        let folded = merkle_tools::verify_branch(
            block.calc_hash(),
            &aux.blockchain_branch,
            aux.blockchain_branch_mask,
        );
        let mut bytes = folded.0;
        bytes.reverse();
        H256(bytes)
    } else {
        let mut bytes = block.calc_hash().0;
        bytes.reverse();
        H256(bytes)
    };

    let tag_positions = find_all(&script, &MERGE_MINING_TAG);
    let hash_positions = find_all(&script, &expected_hash.0);
    if hash_positions.is_empty() {
        return Err(VerificationError::AuxPowHashNotInScript);
    }

    let pos_e = if !tag_positions.is_empty() {
        if tag_positions.len() > 1 {
            return Err(VerificationError::AuxPowHeaderDuplicated);
        }
        let expected_pos = tag_positions[0] + MERGE_MINING_TAG.len();
        if !hash_positions.contains(&expected_pos) {
            return Err(VerificationError::AuxPowHashNotAfterHeader);
        }
        expected_pos
    } else {
        let pos = hash_positions[0];
        if pos >= 20 {
            return Err(VerificationError::AuxPowLegacyOffset);
        }
        pos
    };

    let size = read_u32_le(&script, pos_e + 32).ok_or(VerificationError::AuxPowSizeMismatch)?;
    let nonce = read_u32_le(&script, pos_e + 36).ok_or(VerificationError::AuxPowSizeMismatch)?;

    let expected_size = 1u32
        .checked_shl(aux.blockchain_branch.len() as u32)
        .ok_or(VerificationError::AuxPowSizeMismatch)?;
    if size != expected_size {
        return Err(VerificationError::AuxPowSizeMismatch);
    }

    // Exact 32-bit wraparound LCG; widening to 64 bits would be a
    // consensus bug (it would silently accept a different mask value).
    let mut rand = nonce;
    rand = rand
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
    rand = rand.wrapping_add(params.aux_pow_chain_id);
    rand = rand
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
    let expected_mask = rand % size;

    if aux.blockchain_branch_mask != expected_mask {
        return Err(VerificationError::AuxPowMaskMismatch);
    }

    Ok(())
}
