//! Seeded randomness for the `rand`/`randi` built-ins (spec §4.6). Seeding once at session start
//! from a CLI-provided seed (or the wall clock when none is given) is what makes `-s <seed>` runs
//! reproducible end to end, per spec §6.

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

pub struct Rng {
    inner: StdRng,
}

impl Rng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { inner: StdRng::from_entropy() }
    }

    pub fn rand(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    pub fn randi(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_sequence() {
        let mut a = Rng::from_seed(42);
        let mut b = Rng::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.rand(0.0, 1.0), b.rand(0.0, 1.0));
            assert_eq!(a.randi(0, 1000), b.randi(0, 1000));
        }
    }

    #[test]
    fn degenerate_range_returns_the_bound() {
        let mut rng = Rng::from_seed(1);
        assert_eq!(rng.rand(5.0, 5.0), 5.0);
        assert_eq!(rng.randi(5, 5), 5);
        assert_eq!(rng.randi(5, 4), 5);
    }
}
