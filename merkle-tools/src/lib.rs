pub use btc_types::hash::{double_sha256, H256};

/// Builds the full Merkle tree over `leaves`, flattened level-by-level
/// (leaves first, root last). An empty leaf set yields a single zero-hash
/// "tree" of one element.
pub fn build_tree(leaves: &[H256]) -> Vec<H256> {
    if leaves.is_empty() {
        return vec![H256([0u8; 32])];
    }

    let mut flattened: Vec<H256> = leaves.to_vec();
    let mut level: Vec<H256> = leaves.to_vec();

    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(*level.last().unwrap());
        }
        let mut next = Vec::with_capacity(level.len() / 2);
        for pair in level.chunks(2) {
            next.push(compute_hash(&pair[0], &pair[1]));
        }
        flattened.extend(next.iter().copied());
        level = next;
    }

    flattened
}

/// The root is the last element of the flattened tree.
pub fn root_of(tree: &[H256]) -> H256 {
    *tree.last().expect("tree is never empty")
}

/// Convenience: builds the tree and returns only the root.
pub fn merkle_root(leaves: &[H256]) -> H256 {
    root_of(&build_tree(leaves))
}

/// Verifies a Merkle branch: repeatedly folds `acc` with each sibling,
/// taking the low bit of `mask` to decide concatenation order (0 = sibling
/// on the right, 1 = sibling on the left), then shifts `mask` right. Used
/// for both AuxPoW coinbase-in-parent and multi-chain aggregation proofs.
pub fn verify_branch(leaf: H256, branch: &[H256], mask: u32) -> H256 {
    let mut acc = leaf;
    let mut mask = mask;
    for sibling in branch {
        acc = if mask & 1 == 0 {
            compute_hash(&acc, sibling)
        } else {
            compute_hash(sibling, &acc)
        };
        mask >>= 1;
    }
    acc
}

/// Computes the branch and mask proving `leaves[index]`'s inclusion, for
/// use with `verify_branch`.
pub fn branch_for_index(leaves: &[H256], index: usize) -> (Vec<H256>, u32) {
    let mut position = index;
    let mut branch = Vec::new();
    let mut mask: u32 = 0;
    let mut level: Vec<H256> = leaves.to_vec();
    let mut depth = 0u32;

    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(*level.last().unwrap());
        }

        if position % 2 == 1 {
            branch.push(level[position - 1]);
            mask |= 1 << depth;
        } else {
            branch.push(level[position + 1]);
        }

        let mut next = Vec::with_capacity(level.len() / 2);
        for pair in level.chunks(2) {
            next.push(compute_hash(&pair[0], &pair[1]));
        }
        level = next;
        position /= 2;
        depth += 1;
    }

    (branch, mask)
}

fn compute_hash(first: &H256, second: &H256) -> H256 {
    let mut concat_inputs = Vec::with_capacity(64);
    concat_inputs.extend(first.0);
    concat_inputs.extend(second.0);
    double_sha256(&concat_inputs)
}
