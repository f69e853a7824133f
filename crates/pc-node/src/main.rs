use clap::Parser;
use pc_node::{Node, NodeConfig};
use pc_pow::ProofSeed;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Proofchain ledger node.
#[derive(Parser, Debug)]
#[command(
    name = "pc-node",
    version,
    about = "Proof-of-work ledger node",
    long_about = "Runs a proofchain ledger node: queues the given transactions, \
                  mines the requested number of blocks and prints the resulting \
                  chain as JSON."
)]
struct Cli {
    /// Leading zero hex digits required of every proof.
    #[arg(short, long, default_value_t = pc_pow::DEFAULT_DIFFICULTY, env = "PC_DIFFICULTY")]
    difficulty: u32,

    /// Number of blocks to mine.
    #[arg(short, long, default_value_t = 1, env = "PC_BLOCKS")]
    blocks: u32,

    /// Transaction to queue before mining, as `sender:recipient:amount`.
    /// May be repeated.
    #[arg(long = "tx", value_parser = parse_transfer)]
    transactions: Vec<Transfer>,

    /// Reward paid to this node for every mined block.
    #[arg(short, long, env = "PC_REWARD")]
    reward: Option<u64>,

    /// Start proof searches at a random candidate instead of zero.
    #[arg(long, default_value_t = false)]
    random_seed: bool,

    /// Suppress log output to stderr (run silently).
    #[arg(short, long, default_value_t = false, env = "PC_QUIET")]
    quiet: bool,
}

#[derive(Debug, Clone)]
struct Transfer {
    sender: String,
    recipient: String,
    amount: u64,
}

fn parse_transfer(raw: &str) -> Result<Transfer, String> {
    let mut parts = raw.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(sender), Some(recipient), Some(amount))
            if !sender.is_empty() && !recipient.is_empty() =>
        {
            let amount = amount
                .parse()
                .map_err(|e| format!("invalid amount `{amount}`: {e}"))?;
            Ok(Transfer {
                sender: sender.to_string(),
                recipient: recipient.to_string(),
                amount,
            })
        }
        _ => Err(format!("expected sender:recipient:amount, got `{raw}`")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::from_default_env()
            .add_directive("pc_node=info".parse()?)
            .add_directive("pc_blockchain=info".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = NodeConfig {
        difficulty: cli.difficulty,
        proof_seed: if cli.random_seed {
            ProofSeed::Random
        } else {
            ProofSeed::default()
        },
        mining_reward: cli.reward,
        quiet: cli.quiet,
        ..NodeConfig::default()
    };

    info!(
        difficulty = config.difficulty,
        blocks = cli.blocks,
        transactions = cli.transactions.len(),
        "starting proofchain node"
    );

    let (node, mut events) = Node::new(config)?;
    info!("Node id: {}", node.node_id());

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!("NodeEvent: {event:?}");
        }
    });

    for transfer in cli.transactions {
        node.submit_transaction(transfer.sender, transfer.recipient, transfer.amount);
    }

    for _ in 0..cli.blocks {
        let block = node.mine_next_block().await?;
        info!(index = block.index(), hash = %node.hash_of(&block)?, "block sealed");
    }

    println!("{}", serde_json::to_string_pretty(&node.get_chain())?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transfer_argument() {
        let t = parse_transfer("alice:bob:42").unwrap();
        assert_eq!((t.sender.as_str(), t.recipient.as_str(), t.amount), ("alice", "bob", 42));
    }

    #[test]
    fn rejects_malformed_transfer() {
        assert!(parse_transfer("alice:bob").is_err());
        assert!(parse_transfer(":bob:1").is_err());
        assert!(parse_transfer("alice:bob:-1").is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
