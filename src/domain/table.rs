use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::player::PlayerAtTable;
use crate::domain::{HandId, TableId};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Стейки стола: малый и большой блайнды.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

/// Конфиг стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Количество мест за столом (2–9).
    pub max_seats: u8,
    pub stakes: TableStakes,
    /// Дедлайн на действие человека в секундах; по истечении движок
    /// подставляет check/fold (единственный источник синтетических действий).
    pub action_timeout_secs: u64,
}

impl TableConfig {
    pub fn new(max_seats: u8, stakes: TableStakes) -> Self {
        Self {
            max_seats,
            stakes,
            action_timeout_secs: 20,
        }
    }
}

/// Основное состояние стола. Ровно одна живая раздача в любой момент;
/// стол — единственный владелец своего состояния (см. runtime: actor на стол).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex, None — место пустое.
    pub seats: Vec<Option<PlayerAtTable>>,

    /// Общие карты борда (0–5 карт).
    pub board: Vec<Card>,

    /// Дилерская кнопка; None до первой раздачи.
    pub dealer_button: Option<SeatIndex>,

    /// ID текущей раздачи (если идёт).
    pub current_hand_id: Option<HandId>,

    /// Сквозной номер раздачи на столе.
    pub hand_number: u64,

    /// Текущая улица.
    pub street: Street,

    pub hand_in_progress: bool,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: String, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name,
            config,
            seats,
            board: Vec::new(),
            dealer_button: None,
            current_hand_id: None,
            hand_number: 0,
            street: Street::Preflop,
            hand_in_progress: false,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Первое свободное место, если есть.
    pub fn free_seat(&self) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|s| s.is_none())
            .map(|i| i as SeatIndex)
    }

    /// Место игрока по его id.
    pub fn seat_of(&self, player_id: crate::domain::PlayerId) -> Option<SeatIndex> {
        self.seats.iter().position(|s| {
            s.as_ref()
                .map(|p| p.player_id == player_id)
                .unwrap_or(false)
        }).map(|i| i as SeatIndex)
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&PlayerAtTable> {
        self.seats.get(seat as usize).and_then(|s| s.as_ref())
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut PlayerAtTable> {
        self.seats.get_mut(seat as usize).and_then(|s| s.as_mut())
    }

    /// Сумма всех стеков + всё внесённое в текущую раздачу.
    /// Используется тестами для проверки сохранения фишек.
    pub fn total_chips(&self) -> Chips {
        let mut total = Chips::ZERO;
        for p in self.seats.iter().flatten() {
            total += p.stack;
            total += p.total_committed;
        }
        total
    }
}
