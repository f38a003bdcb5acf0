use crate::domain::ports::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Thread-local OS-seeded generator. Not cryptographically meaningful here.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Either of the above, picked at runtime from the `--seed` flag.
#[derive(Debug, Clone)]
pub enum AnySource {
    Thread(ThreadRngSource),
    Seeded(SeededSource),
}

impl AnySource {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => AnySource::Seeded(SeededSource::new(seed)),
            None => AnySource::Thread(ThreadRngSource),
        }
    }
}

impl RandomSource for AnySource {
    fn next_f64(&mut self) -> f64 {
        match self {
            AnySource::Thread(source) => source.next_f64(),
            AnySource::Seeded(source) => source.next_f64(),
        }
    }
}
