use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{Chips, PlayerId};

/// Ошибки внешнего леджера балансов.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Недостаточно средств у игрока {0}")]
    InsufficientFunds(PlayerId),

    #[error("Неизвестный игрок {0}")]
    UnknownPlayer(PlayerId),
}

/// Интерфейс к внешнему леджеру фишек (identity/balance-провайдер).
///
/// Движок трогает леджер ровно в двух точках: дебет бай-ина при посадке
/// и кредит финального стека при уходе со стола. Внутри раздачи никаких
/// внешних транзакций нет — фишки живут в стеках и банках стола.
pub trait Ledger: Send {
    fn balance(&self, player_id: PlayerId) -> Result<Chips, LedgerError>;
    fn debit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError>;
    fn credit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError>;
}

/// Леджер в памяти — для тестов и локальных запусков.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<PlayerId, Chips>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, player_id: PlayerId, amount: Chips) -> Self {
        self.balances.insert(player_id, amount);
        self
    }

    pub fn deposit(&mut self, player_id: PlayerId, amount: Chips) {
        *self.balances.entry(player_id).or_insert(Chips::ZERO) += amount;
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, player_id: PlayerId) -> Result<Chips, LedgerError> {
        self.balances
            .get(&player_id)
            .copied()
            .ok_or(LedgerError::UnknownPlayer(player_id))
    }

    fn debit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError> {
        let balance = self
            .balances
            .get_mut(&player_id)
            .ok_or(LedgerError::UnknownPlayer(player_id))?;
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds(player_id));
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError> {
        *self.balances.entry(player_id).or_insert(Chips::ZERO) += amount;
        Ok(())
    }
}
