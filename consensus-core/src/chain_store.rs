use btc_types::Block;

/// The chain-lookup boundary this core consumes. Implementations back it
/// with whatever store/index the embedding node uses; this crate never
/// touches storage directly. Generalizes the donor's synchronous
/// `BlocksGetter` trait to native async, matching how a real node's store
/// is reached over an executor or I/O boundary.
pub trait ChainStore {
    fn get_block_by_height(
        &self,
        height: u64,
    ) -> impl std::future::Future<Output = anyhow::Result<Option<Block>>> + Send;

    fn get_blocks_by_heights(
        &self,
        heights: &[u64],
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<Block>>> + Send;

    fn get_top_block(&self) -> impl std::future::Future<Output = anyhow::Result<Block>> + Send;
}
