use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::engine::RandomSource;

/// Боевой RNG: StdRng (ChaCha), засеянный энтропией ОС.
///
/// Криптостойкость здесь не опция: предсказуемая тасовка — прямой вектор
/// читерства в игре на фишки. Никакого глобального thread_rng в движке —
/// источник всегда передаётся явно.
#[derive(Clone, Debug)]
pub struct SystemRng {
    inner: StdRng,
}

impl SystemRng {
    pub fn new() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Детерминированный RNG для тестов и реплея: одинаковый seed —
/// одинаковые раздачи и одинаковые решения ботов.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_bytes(seed: [u8; 32]) -> Self {
        Self {
            inner: StdRng::from_seed(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}
