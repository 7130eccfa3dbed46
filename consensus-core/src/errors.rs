use thiserror::Error;

/// The closed set of consensus-rule violations a block can fail with.
/// Everything else (store I/O, miner I/O) propagates to the caller
/// unchanged via `anyhow::Error` — this type never wraps it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("stored hash does not match the recomputed header hash")]
    BadHash,
    #[error("proof of work hash is above the target")]
    PowBelowTarget,
    #[error("AuxPoW version chain id does not match the configured aux chain id")]
    PowWrongAuxChain,
    #[error("block timestamp is too far in the future")]
    TimestampTooFarFuture,
    #[error("block has no transactions")]
    NoTransactions,
    #[error("first transaction is not a coinbase")]
    FirstTxNotCoinbase,
    #[error("a non-first transaction is a coinbase")]
    NonFirstTxIsCoinbase,
    #[error("block has transactions but no merkle root to check against")]
    NoMerkleRoot,
    #[error("computed merkle root does not match header merkle root")]
    MerkleRootMismatch,
    #[error("AuxPoW coinbase does not prove into the parent block's merkle root")]
    AuxPowMerkleLink,
    #[error("expected block hash was not found in the AuxPoW coinbase script")]
    AuxPowHashNotInScript,
    #[error("merge-mining tag appears more than once in the AuxPoW coinbase script")]
    AuxPowHeaderDuplicated,
    #[error("expected hash does not begin immediately after the merge-mining tag")]
    AuxPowHashNotAfterHeader,
    #[error("legacy AuxPoW coinbase does not embed the hash within the first 20 bytes")]
    AuxPowLegacyOffset,
    #[error("AuxPoW chain merkle size does not match the declared branch length")]
    AuxPowSizeMismatch,
    #[error("AuxPoW chain merkle mask does not match the LCG-derived value")]
    AuxPowMaskMismatch,
    #[error("block bits do not match the expected next-work difficulty")]
    WrongDifficulty,
    #[error("block timestamp is not after the median time past")]
    TimestampTooEarly,
}
