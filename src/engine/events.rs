use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, Street};
use crate::domain::player::PlayerStatus;
use crate::domain::{HandId, PlayerId, SeatIndex};
use crate::engine::actions::PlayerActionKind;
use crate::engine::side_pots::PotPayout;

/// Кому предназначены карты в событии CardsDealt.
/// Транспортный слой обязан фильтровать приватные события по адресату —
/// движок лишь помечает область видимости.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardScope {
    /// Карманные карты: видны только этому месту.
    PrivateToSeat(SeatIndex),
    /// Общие карты борда.
    Public,
}

/// Публичный снимок места (без карманных карт).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatInfo {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub name: String,
    pub stack: Chips,
    pub status: PlayerStatus,
    pub is_bot: bool,
}

/// Вскрытие руки на шоудауне.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowdownEntry {
    pub seat: SeatIndex,
    pub hole_cards: Vec<Card>,
    pub rank: HandRank,
    pub best_five: Vec<Card>,
}

/// Исходящие события стола — по одному на наблюдаемый переход состояния.
/// Broadcast-слой раздаёт их подключённым клиентам; движок транспортом
/// не занимается.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum TableEvent {
    /// Состав/состояние мест изменились (join/leave/sit out/расчёт).
    SeatsUpdated { seats: Vec<SeatInfo> },

    /// Розданы карты (карманные или борд).
    CardsDealt { scope: CardScope, cards: Vec<Card> },

    /// Начался раунд торговли.
    BettingRoundStarted { street: Street, to_act: Option<SeatIndex> },

    /// Игрок совершил действие.
    ActionTaken {
        seat: SeatIndex,
        action: PlayerActionKind,
        pot_after: Chips,
    },

    /// Раунд торговли завершён.
    RoundComplete { street: Street, pot: Chips },

    /// Шоудаун: вскрытые руки.
    Showdown { entries: Vec<ShowdownEntry> },

    /// Раздача рассчитана, банки выплачены.
    HandSettled {
        hand_id: HandId,
        payouts: Vec<PotPayout>,
    },

    /// Игрок не уложился в дедлайн, подставлено действие по умолчанию.
    PlayerTimedOut {
        seat: SeatIndex,
        default_action: PlayerActionKind,
    },

    /// Раздача абортирована из-за внутренней ошибки, взносы возвращены.
    HandAborted { hand_id: HandId, reason: String },
}
