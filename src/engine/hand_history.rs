use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::player::PlayerStatus;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::PlayerActionKind;
use crate::engine::side_pots::{PotPayout, SidePot};

/// Тип события в раздаче (внутренний лог для истории и отладки).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum HandEventKind {
    HandStarted {
        table_id: TableId,
        hand_id: HandId,
        hand_number: u64,
    },

    BlindsPosted {
        dealer: SeatIndex,
        small_blind: Option<(SeatIndex, Chips)>,
        big_blind: Option<(SeatIndex, Chips)>,
    },

    HoleCardsDealt {
        seat: SeatIndex,
        cards: Vec<Card>,
    },

    BoardDealt {
        street: Street,
        cards: Vec<Card>,
    },

    PlayerActed {
        player_id: PlayerId,
        seat: SeatIndex,
        action: PlayerActionKind,
        new_stack: Chips,
        pot_after: Chips,
    },

    /// Действие подставлено движком по таймауту.
    PlayerTimedOut {
        seat: SeatIndex,
        action: PlayerActionKind,
    },

    ShowdownReveal {
        seat: SeatIndex,
        player_id: PlayerId,
        hole_cards: Vec<Card>,
        rank_value: u32,
    },

    PotAwarded {
        seat: SeatIndex,
        player_id: PlayerId,
        amount: Chips,
    },

    /// Раздача абортирована, взносы возвращены в стеки.
    HandAborted {
        hand_id: HandId,
        reason: String,
    },

    HandFinished {
        hand_id: HandId,
        table_id: TableId,
    },
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история одной раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }
}

/// Снимок места для записи завершённой раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub name: String,
    pub stack_after: Chips,
    pub status: PlayerStatus,
    pub is_bot: bool,
}

/// Неизменяемая запись о завершённой раздаче. Пишется ровно один раз
/// при расчёте; долговременное хранение — забота внешнего слоя
/// (см. infra::persistence).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandRecord {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub hand_number: u64,
    pub seats: Vec<SeatSnapshot>,
    pub history: HandHistory,
    pub final_pots: Vec<SidePot>,
    pub payouts: Vec<PotPayout>,
    /// UNIX-время расчёта в миллисекундах.
    pub settled_at_ms: u64,
}
