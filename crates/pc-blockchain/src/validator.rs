use pc_pow::ProofOfWork;
use tracing::{debug, warn};

use crate::{Block, ChainViolation};

/// Outcome of [`ChainValidator::resolve_conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainChoice {
    /// Keep the local chain.
    Local,

    /// Adopt the candidate at this position of the supplied slice.
    Candidate(usize),
}

/// Validates whole chains and applies the longest-valid-chain rule.
#[derive(Debug, Clone, Default)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    /// Walk `chain` from genesis to tip and report the first broken rule:
    /// - the genesis block has index 1 and equals [`Block::genesis`],
    /// - indices are contiguous,
    /// - each `previous_hash` is the hash of the block before it,
    /// - each proof is valid after the previous block's proof.
    pub fn check_chain(&self, chain: &[Block]) -> Result<(), ChainViolation> {
        let genesis = chain.first().ok_or(ChainViolation::Empty)?;
        if !genesis.is_genesis() {
            return Err(ChainViolation::BadGenesisIndex(genesis.index()));
        }
        if *genesis != Block::genesis() {
            return Err(ChainViolation::ForeignGenesis);
        }

        for window in chain.windows(2) {
            let prev = &window[0];
            let next = &window[1];

            if next.index() != prev.index() + 1 {
                return Err(ChainViolation::NonContiguousIndex {
                    previous: prev.index(),
                    index: next.index(),
                });
            }

            let prev_hash = prev.hash_hex().map_err(|e| ChainViolation::Unhashable {
                index: prev.index(),
                reason: e.to_string(),
            })?;
            if next.previous_hash() != prev_hash {
                return Err(ChainViolation::BrokenLink(next.index()));
            }

            if !self.pow.is_valid(prev.proof(), next.proof()) {
                return Err(ChainViolation::InvalidProof(next.index()));
            }
        }

        Ok(())
    }

    pub fn is_valid_chain(&self, chain: &[Block]) -> bool {
        self.check_chain(chain).is_ok()
    }

    /// Pick the longest valid chain among `local` and `candidates`.
    ///
    /// A candidate only wins if it is strictly longer than the best chain
    /// seen so far, so ties keep the local chain.  The local chain is
    /// trusted; it was built through validated appends.  Invalid candidates
    /// are logged and skipped.
    pub fn resolve_conflict(&self, local: &[Block], candidates: &[Vec<Block>]) -> ChainChoice {
        let mut choice = ChainChoice::Local;
        let mut best_len = local.len();

        for (position, candidate) in candidates.iter().enumerate() {
            if candidate.len() <= best_len {
                debug!(
                    candidate = position,
                    length = candidate.len(),
                    best_len,
                    "candidate chain is not longer"
                );
                continue;
            }

            match self.check_chain(candidate) {
                Ok(()) => {
                    choice = ChainChoice::Candidate(position);
                    best_len = candidate.len();
                }
                Err(violation) => {
                    warn!(
                        candidate = position,
                        length = candidate.len(),
                        %violation,
                        "rejecting candidate chain"
                    );
                }
            }
        }

        choice
    }
}
