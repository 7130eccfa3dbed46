use btc_types::header::BlockHeader;
use btc_types::U256;

/// The external proof-of-work search this core delegates to. `solve` must
/// honor an external cancel signal and return promptly when cancelled;
/// the Builder exposes no cancellation of its own.
pub trait Miner {
    fn solve(
        &self,
        header: &BlockHeader,
        target: U256,
    ) -> impl std::future::Future<Output = anyhow::Result<u32>> + Send;
}
