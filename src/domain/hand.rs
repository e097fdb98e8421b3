use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{HandId, PlayerId, TableId};

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

/// Ранг руки: упакованный u32 с тотальным порядком
/// (схема кодирования — в eval::hand_rank).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank(pub u32);

/// Результат конкретного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHandResult {
    pub player_id: PlayerId,
    pub seat: crate::domain::table::SeatIndex,
    /// Итоговый ранг руки (None, если до шоудауна не дошло).
    pub rank: Option<HandRank>,
    /// Сколько фишек выиграно из банков этой раздачи.
    pub won: Chips,
    /// Является ли игрок победителем хотя бы одного банка (включая сплит).
    pub is_winner: bool,
}

/// Краткое описание завершённой раздачи — для истории/подписчиков.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub street_reached: Street,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    pub results: Vec<PlayerHandResult>,
}
