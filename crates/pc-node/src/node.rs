use std::sync::Arc;

use parking_lot::Mutex;
use pc_blockchain::{Block, ChainChoice, Ledger};
use pc_pow::{CancelReason, CancelToken, PowError};
use pc_transaction::Transaction;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::{NodeConfig, REWARD_SENDER},
    error::NodeError,
    event::NodeEvent,
};

/// Everything guarded by the node's single lock.
struct NodeState {
    ledger: Ledger,
    /// Shared by every proof search running against the current tip.
    tip_token: CancelToken,
}

impl NodeState {
    /// Signal searches on the old tip to stop and start a fresh token.
    fn rotate_tip_token(&mut self, reason: CancelReason) {
        self.tip_token.cancel(reason);
        self.tip_token = CancelToken::new();
    }
}

/// A ledger node: the chain, its pending pool and the mining loop.
///
/// `Node` is a cheap cloneable handle; clones share the same chain.  One
/// mutex guards the ledger and pool, so a transaction submitted while a
/// block is being sealed lands in exactly one block, and a chain
/// replacement never interleaves with a local append.
///
/// Proof searches run on tokio's blocking pool without holding the lock.
#[derive(Clone)]
pub struct Node {
    state: Arc<Mutex<NodeState>>,
    config: Arc<NodeConfig>,
    event_tx: mpsc::UnboundedSender<NodeEvent>,
}

impl Node {
    /// Create a node with a fresh chain holding only the genesis block.
    ///
    /// Returns the node together with a receiver for [`NodeEvent`]s that the
    /// calling application can process independently.
    pub fn new(
        config: NodeConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<NodeEvent>), NodeError> {
        let pow = config.proof_of_work()?;

        info!(
            node_id = %config.node_id,
            difficulty = pow.difficulty(),
            seed = ?pow.seed(),
            "initialising ledger node"
        );

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let node = Self {
            state: Arc::new(Mutex::new(NodeState {
                ledger: Ledger::new(pow),
                tip_token: CancelToken::new(),
            })),
            config: Arc::new(config),
            event_tx,
        };

        Ok((node, event_rx))
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn node_id(&self) -> Uuid {
        self.config.node_id
    }

    /// Queue a transaction; returns the index of the block expected to hold it.
    pub fn submit_transaction(
        &self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        let transaction = Transaction::new(sender, recipient, amount);
        let expected_block = self.state.lock().ledger.push_transaction(transaction.clone());

        debug!(
            sender = transaction.sender(),
            recipient = transaction.recipient(),
            amount = transaction.amount(),
            expected_block,
            "transaction submitted"
        );
        self.emit(NodeEvent::TransactionSubmitted {
            transaction,
            expected_block,
        });
        expected_block
    }

    /// Find a proof for the current tip, then seal the pending pool into a
    /// new block.
    ///
    /// If the tip moves while the search runs (another miner appended, or
    /// the chain was replaced) the search restarts on the new tip.  Returns
    /// [`NodeError::MiningCancelled`] after [`Node::cancel_mining`].
    pub async fn mine_next_block(&self) -> Result<Block, NodeError> {
        loop {
            let (previous_proof, tip_hash, pow, search) = {
                let state = self.state.lock();
                let tip = state.ledger.last_block()?;
                (
                    tip.proof(),
                    tip.hash()?,
                    state.ledger.pow().clone(),
                    state.tip_token.clone(),
                )
            };

            let outcome =
                tokio::task::spawn_blocking(move || pow.find_proof(previous_proof, &search))
                    .await
                    .map_err(|e| NodeError::Worker(e.to_string()))?;

            let proof = match outcome {
                Ok(proof) => proof,
                Err(PowError::Cancelled(CancelReason::Superseded)) => {
                    debug!(previous_proof, "tip moved during proof search, restarting");
                    continue;
                }
                Err(PowError::Cancelled(CancelReason::Aborted)) => {
                    info!(previous_proof, "mining aborted");
                    self.emit(NodeEvent::MiningCancelled);
                    return Err(NodeError::MiningCancelled);
                }
                Err(e) => return Err(e.into()),
            };

            let block = {
                let mut state = self.state.lock();
                if state.ledger.last_block()?.hash()? != tip_hash {
                    debug!(previous_proof, proof, "tip moved before sealing, restarting");
                    continue;
                }

                if let Some(reward) = self.config.mining_reward {
                    state.ledger.push_transaction(Transaction::new(
                        REWARD_SENDER,
                        self.config.node_id.to_string(),
                        reward,
                    ));
                }

                let block = state.ledger.append_pending(proof)?.clone();
                state.rotate_tip_token(CancelReason::Superseded);
                block
            };

            info!(
                index = block.index(),
                proof = block.proof(),
                transactions = block.transactions().len(),
                "mined block"
            );
            self.emit(NodeEvent::BlockMined(block.clone()));
            return Ok(block);
        }
    }

    /// Abort every proof search currently running.
    pub fn cancel_mining(&self) {
        self.state.lock().rotate_tip_token(CancelReason::Aborted);
        debug!("requested mining cancellation");
    }

    /// Snapshot of the whole chain.
    pub fn get_chain(&self) -> Vec<Block> {
        self.state.lock().ledger.blocks().to_vec()
    }

    pub fn get_last_block(&self) -> Result<Block, NodeError> {
        Ok(self.state.lock().ledger.last_block()?.clone())
    }

    /// Snapshot of transactions waiting for the next block.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.lock().ledger.pending().to_vec()
    }

    pub fn is_chain_valid(&self) -> bool {
        self.state.lock().ledger.is_valid()
    }

    /// Hex hash of `block` under the canonical encoding peers must share.
    pub fn hash_of(&self, block: &Block) -> Result<String, NodeError> {
        Ok(block.hash_hex()?)
    }

    /// Replace the local chain with the longest valid candidate, if any is
    /// longer than the local chain.  Returns `true` if the chain was replaced.
    ///
    /// Invalid candidates are skipped, never reported as errors.  Any proof
    /// search running against the old tip restarts on the new one.
    pub fn replace_chain_if_valid(&self, mut candidates: Vec<Vec<Block>>) -> bool {
        let new_length = {
            let mut state = self.state.lock();
            let choice = state
                .ledger
                .validator()
                .resolve_conflict(state.ledger.blocks(), &candidates);

            let ChainChoice::Candidate(position) = choice else {
                debug!(
                    local_length = state.ledger.len(),
                    candidates = candidates.len(),
                    "keeping local chain"
                );
                return false;
            };

            let chosen = candidates.swap_remove(position);
            let new_length = chosen.len();
            if let Err(e) = state.ledger.replace_blocks(chosen) {
                warn!("failed to replace chain: {e}");
                return false;
            }
            state.rotate_tip_token(CancelReason::Superseded);
            new_length
        };

        info!(new_length, "local chain replaced by longer valid chain");
        self.emit(NodeEvent::ChainReplaced { new_length });
        true
    }

    fn emit(&self, event: NodeEvent) {
        // Nobody listening is fine; events are advisory.
        let _ = self.event_tx.send(event);
    }
}
