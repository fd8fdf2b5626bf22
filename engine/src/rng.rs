//! Seedable randomness shared by one battle

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The single random source of a battle
///
/// Critical hits, damage variance, accuracy, status rolls and speed ties all
/// draw from here, so a battle replays exactly from its seed and the
/// decisions fed to it.
#[derive(Debug, Clone)]
pub struct BattleRng {
    inner: ChaCha8Rng,
    seed: Option<u64>,
}

impl BattleRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// The seed this stream started from, if one was given
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// True with probability `p`; certain outcomes consume nothing
    pub fn chance(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 || p.is_nan() {
            return false;
        }
        self.inner.gen_bool(p)
    }

    /// True with probability `percent`/100
    pub fn percent(&mut self, percent: u8) -> bool {
        self.chance(percent as f64 / 100.0)
    }

    /// Uniform value in 0.0..=1.0
    pub fn unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..=1.0)
    }

    /// Uniform integer in `low..=high`
    pub fn range(&mut self, low: u8, high: u8) -> u8 {
        if low >= high {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }

    /// Raw key used to break exact speed ties
    pub fn tiebreak(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

impl Default for BattleRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
