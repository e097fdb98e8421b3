use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Текущий общий банк раздачи (для отображения и событий).
/// Разбиение на main/side pots происходит один раз при расчёте —
/// см. side_pots.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub total: Chips,
}

impl Pot {
    pub fn new() -> Self {
        Self { total: Chips::ZERO }
    }

    pub fn add(&mut self, amount: Chips) {
        self.total += amount;
    }
}
