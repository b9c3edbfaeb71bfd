//! Random sources for maze generation
//!
//! Generation only ever needs two things from randomness: a uniform index
//! into a short list, and a biased coin. `MazeRng` captures exactly that so
//! tests and callers can plug in any source, and `SimpleLCG` provides a small
//! seeded one so a maze can be reproduced from its seed alone.
//!
//! `SimpleLCG` is a Park-Miller Linear Congruential Generator (MINSTD):
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

/// Source of randomness consumed by `Maze::generate`
pub trait MazeRng {
    /// Choose a random index in `[0, len)`; `len` must be non-zero
    fn choice_index(&mut self, len: usize) -> usize;

    /// Return true with probability `numerator / denominator`
    fn chance(&mut self, numerator: usize, denominator: usize) -> bool {
        self.choice_index(denominator) < numerator
    }
}

impl<R: MazeRng + ?Sized> MazeRng for &mut R {
    fn choice_index(&mut self, len: usize) -> usize {
        (**self).choice_index(len)
    }
}

/// Park-Miller Linear Congruential Generator
///
/// Generates a deterministic sequence of pseudo-random numbers from a seed.
/// Same seed always produces the same sequence.
#[derive(Clone, Debug)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    const A: u64 = 48271;
    const M: u64 = 2147483647; // 2^31 - 1

    /// Create a new LCG with the given seed
    ///
    /// Seeds are reduced modulo 2^31 - 1; a seed that reduces to 0 is
    /// replaced with 1 to avoid the degenerate all-zero sequence.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % Self::M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) {
        // u64 keeps the multiplication from overflowing
        self.state = ((self.state as u64 * Self::A) % Self::M) as u32;
    }
}

impl MazeRng for SimpleLCG {
    /// Compute `(state * len) / M` after advancing; always below `len`
    /// because the state never reaches M.
    fn choice_index(&mut self, len: usize) -> usize {
        self.advance();
        ((self.state as u64 * len as u64) / Self::M) as usize
    }
}
