use tracing::debug;

use crate::Transaction;

/// Pending transactions waiting to be sealed into the next block.
///
/// The pool is a plain owned buffer.  Callers that share it between threads
/// must hold it behind the same lock that guards block appends, so that a
/// `push` racing a `drain` lands entirely in one block.
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    pending: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transaction and return the number of pending entries.
    ///
    /// The expected block index is the ledger's business; see
    /// `Ledger::submit_transaction`.
    pub fn push(&mut self, tx: Transaction) -> usize {
        self.pending.push(tx);
        self.pending.len()
    }

    /// Take every pending transaction, leaving the pool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        let drained = std::mem::take(&mut self.pending);
        debug!(count = drained.len(), "drained transaction pool");
        drained
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut pool = TransactionPool::new();
        assert_eq!(pool.push(Transaction::new("a", "b", 1)), 1);
        assert_eq!(pool.push(Transaction::new("c", "d", 2)), 2);

        let senders: Vec<&str> = pool.pending().iter().map(|tx| tx.sender()).collect();
        assert_eq!(senders, ["a", "c"]);
    }

    #[test]
    fn drain_empties_the_pool() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("a", "b", 1));
        pool.push(Transaction::new("a", "b", 1));

        let drained = pool.drain();
        assert_eq!(drained.len(), 2);
        assert!(pool.is_empty());
        // A second drain yields nothing; transactions are never handed out twice.
        assert!(pool.drain().is_empty());
    }
}
