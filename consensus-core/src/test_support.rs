use std::collections::HashMap;
use std::sync::RwLock;

use btc_types::Block;

use crate::chain_store::ChainStore;

/// An in-memory [`ChainStore`] keyed by height, for exercising the
/// validator/retarget/builder against a fixed or scripted chain without a
/// real storage backend.
#[derive(Default)]
pub struct MemoryChainStore {
    by_height: RwLock<HashMap<u64, Block>>,
}

impl MemoryChainStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, block: Block) {
        self.by_height.write().unwrap().insert(block.height, block);
    }
}

impl ChainStore for MemoryChainStore {
    async fn get_block_by_height(&self, height: u64) -> anyhow::Result<Option<Block>> {
        Ok(self.by_height.read().unwrap().get(&height).cloned())
    }

    async fn get_blocks_by_heights(&self, heights: &[u64]) -> anyhow::Result<Vec<Block>> {
        let guard = self.by_height.read().unwrap();
        heights
            .iter()
            .map(|h| {
                guard
                    .get(h)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("missing block at height {h}"))
            })
            .collect()
    }

    async fn get_top_block(&self) -> anyhow::Result<Block> {
        let guard = self.by_height.read().unwrap();
        let max_height = *guard
            .keys()
            .max()
            .ok_or_else(|| anyhow::anyhow!("chain store is empty"))?;
        Ok(guard[&max_height].clone())
    }
}
