use serde::{Deserialize, Serialize};

/// A single transfer record waiting for, or already sealed into, a block.
///
/// The ledger treats transactions as opaque: nothing here checks balances,
/// addresses or signatures.  Identity is structural, so two transactions
/// with the same sender, recipient and amount compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_structural() {
        let a = Transaction::new("alice", "bob", 5);
        let b = Transaction::new(String::from("alice"), "bob", 5);
        assert_eq!(a, b);
        assert_ne!(a, Transaction::new("alice", "bob", 6));
    }

    #[test]
    fn deserialises_from_wire_json() {
        let tx: Transaction =
            serde_json::from_str(r#"{"recipient":"B","amount":5,"sender":"A"}"#).unwrap();
        assert_eq!(tx, Transaction::new("A", "B", 5));
    }
}
