pub mod aux;
pub mod block;
pub mod hash;
pub mod header;
pub mod network;
pub mod standardized;
pub mod tx;
pub mod u256;

pub use aux::AuxPow;
pub use block::Block;
pub use hash::{double_sha256, H256};
pub use header::{BlockHeader, Target, Work};
pub use network::{Network, NetworkParams};
pub use standardized::StandardizedBlock;
pub use tx::Tx;
pub use u256::U256;
