use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Уровень виртуального игрока (влияет на разброс решений в ai::decision).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BotTier {
    Beginner,
    Intermediate,
    Expert,
    Pro,
}

/// Статус игрока в контексте стола/раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Игрок активен в текущей раздаче.
    Active,
    /// Игрок сфолдил и больше не претендует на банк.
    Folded,
    /// Игрок в олл-ине — ставок больше не делает, но участвует в шоудауне.
    AllIn,
    /// Сидит за столом, но раздачи пропускает (disconnect / sit out).
    /// Стек и место сохраняются до возврата или явного leave.
    SittingOut,
    /// Стек обнулился — в новые раздачи не попадает.
    Busted,
}

/// Состояние места за конкретным столом.
///
/// Владелец — Table; никакой другой компонент не мутирует seat напрямую.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTable {
    pub player_id: PlayerId,
    /// Отображаемое имя (приходит от внешнего identity-провайдера).
    pub name: String,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Ставка в текущем раунде торговли.
    pub round_bet: Chips,
    /// Сколько всего внесено в банк за раздачу (основа для side pots).
    pub total_committed: Chips,
    pub status: PlayerStatus,
    /// Карманные карты: пусто вне раздачи, ровно 2 в раздаче.
    pub hole_cards: Vec<Card>,
    /// None — человек, Some(tier) — виртуальный игрок.
    pub bot: Option<BotTier>,
}

impl PlayerAtTable {
    pub fn human(player_id: PlayerId, name: String, stack: Chips) -> Self {
        Self {
            player_id,
            name,
            stack,
            round_bet: Chips::ZERO,
            total_committed: Chips::ZERO,
            status: PlayerStatus::Active,
            hole_cards: Vec::new(),
            bot: None,
        }
    }

    pub fn virtual_player(player_id: PlayerId, tier: BotTier, stack: Chips) -> Self {
        Self {
            player_id,
            name: format!("bot-{player_id}"),
            stack,
            round_bet: Chips::ZERO,
            total_committed: Chips::ZERO,
            status: PlayerStatus::Active,
            hole_cards: Vec::new(),
            bot: Some(tier),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.bot.is_some()
    }

    /// Участвует ли в текущей раздаче (претендует на банк).
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Может ли ещё делать ставки в этом раунде.
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Active)
    }
}
