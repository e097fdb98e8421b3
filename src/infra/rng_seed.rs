//! RngSeed — доменный seed для воспроизводимого покерного RNG.
//!
//! Позволяет хранить базовый seed и детерминированно выводить дочерний
//! для каждой раздачи:
//!     new = H(domain || old || table_id || hand_id)
//! так что реплей любой раздачи восстанавливается из базового seed
//! и её идентификаторов.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::infra::rng::DeterministicRng;

/// 32-байтовый seed для RNG.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Seed из u64 (удобно в тестах).
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes: b }
    }

    /// Доменное хэш-расширение с контекстом стола и раздачи.
    pub fn derive(&self, table_id: u64, hand_id: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"POKER_TABLES_RNG_V1");
        hasher.update(self.bytes);
        hasher.update(table_id.to_le_bytes());
        hasher.update(hand_id.to_le_bytes());

        let hash = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash[..32]);
        Self { bytes: out }
    }

    /// Создать детерминированный RNG из seed.
    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed_bytes(self.bytes)
    }
}
