use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{CancelToken, PowError, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// How often (in candidates) the search loop polls its [`CancelToken`].
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Where a proof search starts counting from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofSeed {
    /// Start at a fixed candidate.  `Fixed(0)` makes searches reproducible.
    Fixed(u64),

    /// Start at a random candidate, so repeated searches over the same
    /// previous proof may yield different (equally valid) proofs.
    Random,
}

impl Default for ProofSeed {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

impl ProofSeed {
    fn start(&self) -> u64 {
        match self {
            Self::Fixed(n) => *n,
            Self::Random => rand::random(),
        }
    }
}

/// SHA-256 of the decimal concatenation `"{previous_proof}{candidate}"`.
pub fn proof_digest(previous_proof: u64, candidate: u64) -> [u8; 32] {
    let guess = format!("{previous_proof}{candidate}");
    Sha256::digest(guess.as_bytes()).into()
}

/// Count the leading zero hex digits of a digest.
pub fn leading_zero_nibbles(digest: &[u8; 32]) -> u32 {
    let mut total = 0u32;
    for byte in digest {
        if *byte == 0 {
            total += 2;
        } else {
            if byte >> 4 == 0 {
                total += 1;
            }
            break;
        }
    }
    total
}

/// Proof-of-work consensus engine.
///
/// A candidate proof is valid when the hex SHA-256 digest of the previous
/// proof followed by the candidate starts with `difficulty` zeros.  Checking
/// a candidate costs one hash; finding one costs about `16^difficulty`.
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    difficulty: u32,
    seed: ProofSeed,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            seed: ProofSeed::default(),
        }
    }
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Result<Self, PowError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(PowError::InvalidDifficulty {
                difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        Ok(Self {
            difficulty,
            seed: ProofSeed::default(),
        })
    }

    pub fn with_seed(mut self, seed: ProofSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn seed(&self) -> ProofSeed {
        self.seed
    }

    /// Cheap validity predicate shared by miners and chain validators.
    pub fn is_valid(&self, previous_proof: u64, candidate: u64) -> bool {
        leading_zero_nibbles(&proof_digest(previous_proof, candidate)) >= self.difficulty
    }

    /// Search for a proof that is valid after `previous_proof`.
    ///
    /// Blocks the calling thread; run it on a dedicated worker.  The search
    /// has no side effects, so a cancelled search simply returns
    /// [`PowError::Cancelled`].
    pub fn find_proof(&self, previous_proof: u64, cancel: &CancelToken) -> Result<u64, PowError> {
        let start = self.seed.start();
        let mut candidate = start;
        let mut attempts: u64 = 0;

        loop {
            if attempts % CANCEL_CHECK_INTERVAL == 0 {
                if let Some(reason) = cancel.reason() {
                    debug!(previous_proof, attempts, ?reason, "proof search cancelled");
                    return Err(PowError::Cancelled(reason));
                }
            }

            if self.is_valid(previous_proof, candidate) {
                debug!(previous_proof, proof = candidate, attempts, "found proof");
                return Ok(candidate);
            }

            candidate = candidate.wrapping_add(1);
            attempts += 1;
            if candidate == start {
                return Err(PowError::Exhausted { previous_proof });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::CancelReason;

    use super::*;

    fn pow(difficulty: u32) -> ProofOfWork {
        ProofOfWork::new(difficulty).unwrap()
    }

    #[test]
    fn leading_zero_nibble_examples() {
        let mut h = [0u8; 32];
        assert_eq!(leading_zero_nibbles(&h), 64);
        h[0] = 0x0f;
        assert_eq!(leading_zero_nibbles(&h), 1);
        h[0] = 0xf0;
        assert_eq!(leading_zero_nibbles(&h), 0);
        h = [0u8; 32];
        h[1] = 0x01;
        assert_eq!(leading_zero_nibbles(&h), 3);
    }

    #[test]
    fn nibble_count_matches_hex_prefix() {
        let digest = proof_digest(100, 35293);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        let zeros = hex.chars().take_while(|c| *c == '0').count() as u32;
        assert_eq!(leading_zero_nibbles(&digest), zeros);
    }

    #[test]
    fn found_proof_is_valid() {
        let engine = pow(3);
        let proof = engine.find_proof(100, &CancelToken::new()).unwrap();
        assert!(engine.is_valid(100, proof));
    }

    #[test]
    fn fixed_seed_search_is_reproducible() {
        let engine = pow(2).with_seed(ProofSeed::Fixed(7));
        let token = CancelToken::new();
        let first = engine.find_proof(42, &token).unwrap();
        assert_eq!(first, engine.find_proof(42, &token).unwrap());
        assert!(first >= 7);
    }

    #[test]
    fn random_seed_still_yields_valid_proofs() {
        let engine = pow(2).with_seed(ProofSeed::Random);
        for _ in 0..5 {
            let proof = engine.find_proof(9, &CancelToken::new()).unwrap();
            assert!(engine.is_valid(9, proof));
        }
    }

    #[test]
    fn zero_difficulty_accepts_first_candidate() {
        let engine = pow(0);
        assert_eq!(engine.find_proof(1, &CancelToken::new()).unwrap(), 0);
    }

    #[test]
    fn cancelled_search_returns_reason() {
        // 64 zero digits is unreachable, so only cancellation ends the search.
        let engine = pow(MAX_DIFFICULTY);
        let token = CancelToken::new();
        token.cancel(CancelReason::Aborted);
        assert_eq!(
            engine.find_proof(1, &token),
            Err(PowError::Cancelled(CancelReason::Aborted))
        );
    }

    #[test]
    fn difficulty_above_digest_width_is_rejected() {
        assert!(matches!(
            ProofOfWork::new(MAX_DIFFICULTY + 1),
            Err(PowError::InvalidDifficulty { .. })
        ));
    }

    #[test]
    fn higher_difficulty_rejects_more_candidates() {
        let easy = pow(1);
        let hard = pow(2);
        let easy_hits = (0..4096u64).filter(|c| easy.is_valid(5, *c)).count();
        let hard_hits = (0..4096u64).filter(|c| hard.is_valid(5, *c)).count();
        // Roughly 256 vs 16 hits; each extra digit divides the hit rate by 16.
        assert!(easy_hits > hard_hits * 4, "easy={easy_hits} hard={hard_hits}");
        assert!(hard_hits > 0);
    }
}
