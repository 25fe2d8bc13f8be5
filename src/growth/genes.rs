// genes.rs - Sources of growth decisions

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Answers "pick one of `n`" for the growth driver. Answers are always in
/// `0..n`, and 0 when `n` is 0.
pub trait GeneSource {
    fn choose_from(&mut self, n: usize) -> usize;
}

/// Replays a fixed genome, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct GeneSequence {
    genes: Vec<u8>,
    cursor: usize,
}

impl GeneSequence {
    pub fn new(genes: Vec<u8>) -> Self {
        Self { genes, cursor: 0 }
    }

    /// Number of choices answered so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl GeneSource for GeneSequence {
    fn choose_from(&mut self, n: usize) -> usize {
        if n == 0 || self.genes.is_empty() {
            return 0;
        }
        let gene = self.genes[self.cursor % self.genes.len()];
        self.cursor += 1;
        gene as usize % n
    }
}

pub struct SeededGenes {
    rng: ChaCha8Rng,
}

impl SeededGenes {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl GeneSource for SeededGenes {
    fn choose_from(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_cycles() {
        let mut genes = GeneSequence::new(vec![4, 1]);
        assert_eq!(genes.choose_from(3), 1);
        assert_eq!(genes.choose_from(3), 1);
        assert_eq!(genes.choose_from(2), 0);
        assert_eq!(genes.consumed(), 3);
        assert_eq!(genes.choose_from(0), 0);
    }

    #[test]
    fn empty_sequence_answers_zero() {
        let mut genes = GeneSequence::new(Vec::new());
        assert_eq!(genes.choose_from(5), 0);
    }

    #[test]
    fn seeded_genes_replay() {
        let mut one = SeededGenes::new(11);
        let mut two = SeededGenes::new(11);
        for n in 1..50 {
            let pick = one.choose_from(n);
            assert!(pick < n);
            assert_eq!(pick, two.choose_from(n));
        }
        assert_eq!(one.choose_from(0), 0);
    }
}
