//! Решения виртуальных игроков: эвристика силы руки + уровни сложности.
//!
//! Чистые синхронные вычисления: вызываются движком inline, когда ход
//! доходит до виртуального места. Случайность — только через
//! инжектированный RandomSource.

pub mod decision;
pub mod strength;

pub use decision::{decide, DecisionContext};
pub use strength::hand_strength;
