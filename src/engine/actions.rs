use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId, SeatIndex};

/// Тип действия игрока — тегированный вариант вместо пары "строка + сумма",
/// чтобы сумма существовала только там, где она осмысленна.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Повысить до указанной суммарной ставки на улице.
    /// Открывающий бет — это Raise при current_bet == 0.
    Raise(Chips),
    /// Поставить весь оставшийся стек.
    AllIn,
}

/// Конкретное действие игрока за столом.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    pub kind: PlayerActionKind,
}
