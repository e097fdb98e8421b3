//! Движок раздачи: ставки, банки, порядок хода, события и история.
//!
//! Весь движок детерминирован относительно инжектированного источника
//! случайности — один и тот же seed даёт одну и ту же раздачу.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod events;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod session;
pub mod side_pots;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind};
pub use betting::{legal_actions, BettingState, LegalActions};
pub use errors::EngineError;
pub use events::TableEvent;
pub use game_loop::{HandEngine, HandStatus};
pub use session::TableSession;
pub use side_pots::{compute_side_pots, settle_pots, PotPayout, SidePot};

/// Источник случайности для тасовки колоды и решений ботов.
///
/// В проде — CSPRNG, в тестах и реплеях — детерминированный генератор
/// из [`crate::infra::RngSeed`].
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Равномерное число из [0, 1).
    fn next_f64(&mut self) -> f64;
}
