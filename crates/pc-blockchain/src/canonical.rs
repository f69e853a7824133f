//! Canonical byte encoding of a [`Block`], the sole input to its hash.
//!
//! The encoding is compact JSON whose object keys appear in lexicographic
//! order at every level, with the transaction list kept in block order:
//!
//! ```text
//! {"index":2,"previous_hash":"…","proof":35,"timestamp":1700000000000,
//!  "transactions":[{"amount":5,"recipient":"B","sender":"A"}]}
//! ```
//!
//! Key order comes from the field order of the view structs below, never
//! from the order a block was built or received in.  Peers in other
//! languages must reproduce these bytes exactly.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Block;

// Field order is the serialization order: keep these alphabetical.
#[derive(Serialize)]
struct CanonicalTransaction<'a> {
    amount: u64,
    recipient: &'a str,
    sender: &'a str,
}

#[derive(Serialize)]
struct CanonicalBlock<'a> {
    index: u64,
    previous_hash: &'a str,
    proof: u64,
    timestamp: i64,
    transactions: Vec<CanonicalTransaction<'a>>,
}

impl<'a> From<&'a Block> for CanonicalBlock<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            index: block.index(),
            previous_hash: block.previous_hash(),
            proof: block.proof(),
            timestamp: block.timestamp(),
            transactions: block
                .transactions()
                .iter()
                .map(|tx| CanonicalTransaction {
                    amount: tx.amount(),
                    recipient: tx.recipient(),
                    sender: tx.sender(),
                })
                .collect(),
        }
    }
}

/// Canonical bytes of `block`.
pub fn to_bytes(block: &Block) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&CanonicalBlock::from(block))
}

/// SHA-256 of the canonical bytes of `block`.
pub fn digest(block: &Block) -> Result<[u8; 32], serde_json::Error> {
    Ok(Sha256::digest(to_bytes(block)?).into())
}

#[cfg(test)]
mod tests {
    use pc_transaction::Transaction;

    use super::*;

    #[test]
    fn encoding_is_sorted_compact_json() {
        let block = Block::create(
            2,
            1_700_000_000_000,
            vec![Transaction::new("A", "B", 5)],
            35,
            "abc",
        )
        .unwrap();

        let bytes = to_bytes(&block).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"index":2,"previous_hash":"abc","proof":35,"timestamp":1700000000000,"transactions":[{"amount":5,"recipient":"B","sender":"A"}]}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        let block = Block::create(1, 0, vec![Transaction::new("a\"b", "c\\d", 1)], 0, "1").unwrap();
        let text = String::from_utf8(to_bytes(&block).unwrap()).unwrap();
        assert!(text.contains(r#""sender":"a\"b""#));
        assert!(text.contains(r#""recipient":"c\\d""#));
    }
}
