//! Инфраструктура: RNG, seed-деривация, леджер балансов, хранилище
//! записей раздач, генерация идентификаторов.

pub mod ids;
pub mod ledger;
pub mod persistence;
pub mod rng;
pub mod rng_seed;

pub use ids::IdGenerator;
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use persistence::{HandRecordStore, InMemoryHandStore};
pub use rng::{DeterministicRng, SystemRng};
pub use rng_seed::RngSeed;
