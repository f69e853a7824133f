pub mod pool;
pub mod transaction;

pub use pool::TransactionPool;
pub use transaction::Transaction;
