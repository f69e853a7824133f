use pc_blockchain::Block;
use pc_transaction::Transaction;

/// High-level events emitted by a [`crate::Node`] that the host (an API
/// layer, a peer gossip task) can subscribe to via a channel.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// A transaction entered the pending pool.
    TransactionSubmitted {
        transaction: Transaction,
        expected_block: u64,
    },

    /// This node sealed a new block.
    BlockMined(Block),

    /// The local chain has been replaced by a longer valid candidate.
    ChainReplaced { new_length: usize },

    /// A mining run was aborted on request.
    MiningCancelled,
}
