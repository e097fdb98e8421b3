use crate::domain::{PlayerId, SeatIndex, TableId};

use thiserror::Error;

/// Ошибки движка покера.
///
/// Клиентские ошибки (NotPlayersTurn, IllegalAction, NotEnoughChips и т.п.)
/// не мутируют состояние: ход остаётся за игроком, стол ждёт повторного
/// действия или таймаута. DeckExhausted/Internal — фатальны только для
/// текущей раздачи: она абортируется с возвратом внесённых фишек.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Все места за столом заняты")]
    TableFull,

    #[error("Игрок {0} уже сидит за этим столом")]
    AlreadySeated(PlayerId),

    #[error("Игрок {0} не сидит за этим столом")]
    NotSeated(PlayerId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("В этом месте нет игрока")]
    EmptySeat,

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Сейчас не ход игрока с id={0}")]
    NotPlayersTurn(PlayerId),

    #[error("Недопустимое действие в текущем состоянии раздачи")]
    IllegalAction,

    #[error("Недостаточно фишек для этой ставки")]
    NotEnoughChips,

    #[error("Недостаточно средств на балансе для бай-ина")]
    InsufficientBalance(PlayerId),

    #[error("Размер рейза слишком мал")]
    RaiseTooSmall,

    #[error("Невозможно выполнить check — нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call — нет ставки для уравнивания")]
    CannotCall,

    #[error("В колоде закончились карты")]
    DeckExhausted,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
