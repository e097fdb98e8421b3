use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::player::PlayerAtTable;
use crate::domain::{PlayerId, SeatIndex};

/// Состояние раунда ставок на конкретной улице.
/// Пересоздаётся при входе на каждую из четырёх улиц.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Текущая целевая ставка, до которой должны дотянуться игроки (BB, bet, raise).
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза
    /// (= размер последнего рейза, на префлопе по умолчанию BB).
    pub min_raise: Chips,
    /// Seat последнего агрессора (bet/raise/all-in).
    pub last_aggressor: Option<SeatIndex>,
    /// Улица, к которой относится этот раунд.
    pub street: Street,
    /// Очередь ходящих (по кругу): кто ещё должен сделать действие на этой улице.
    pub to_act: Vec<SeatIndex>,
    /// Игроки, для которых ре-рейз закрыт до следующего полного рейза:
    /// уже ходили в этом раунде, когда пришёл короткий олл-ин.
    pub capped_players: Vec<PlayerId>,
}

impl BettingState {
    pub fn new(street: Street, current_bet: Chips, min_raise: Chips, to_act: Vec<SeatIndex>) -> Self {
        Self {
            current_bet,
            min_raise,
            last_aggressor: None,
            street,
            to_act,
            capped_players: Vec::new(),
        }
    }

    /// Удалить seat из очереди to_act, если он там есть.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
    }

    /// Обновить состояние после bet/raise: новая целевая ставка,
    /// новый min_raise и перезапущенная очередь остальных активных.
    pub fn on_raise(
        &mut self,
        seat: SeatIndex,
        new_bet: Chips,
        raise_size: Chips,
        new_to_act: Vec<SeatIndex>,
    ) {
        self.current_bet = new_bet;
        if raise_size > self.min_raise {
            self.min_raise = raise_size;
        }
        self.last_aggressor = Some(seat);
        self.to_act = new_to_act;
        // Полный рейз открывает действие заново для всех.
        self.capped_players.clear();
    }

    /// Раунд ставок завершён, когда очередь пуста.
    pub fn is_round_complete(&self) -> bool {
        self.to_act.is_empty()
    }

    /// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
    pub fn to_call(&self, player: &PlayerAtTable) -> Chips {
        self.current_bet.saturating_sub(player.round_bet)
    }
}

/// Множество легальных действий для конкретного места при текущем состоянии
/// ставок. Единый источник истины: валидация входящих действий и клэмпинг
/// решений виртуальных игроков работают через него.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegalActions {
    pub can_fold: bool,
    /// Check легален, только если ставка уже уравнена.
    pub can_check: bool,
    /// Сколько нужно доплатить для call; None, если уравнивать нечего.
    /// Если стек меньше — call исполнится как all-in call.
    pub call_amount: Option<Chips>,
    /// Допустимый рейз: (минимальная, максимальная) суммарная ставка на улице.
    /// None, если полный рейз не по стеку — тогда остаётся только all-in.
    pub raise_totals: Option<(Chips, Chips)>,
    pub can_all_in: bool,
}

/// Посчитать легальные действия игрока.
/// Для мест вне раздачи (folded/sitting out/busted/all-in) всё запрещено.
pub fn legal_actions(player: &PlayerAtTable, betting: &BettingState) -> LegalActions {
    if !player.can_act() {
        return LegalActions {
            can_fold: false,
            can_check: false,
            call_amount: None,
            raise_totals: None,
            can_all_in: false,
        };
    }

    let to_call = betting.to_call(player);
    let min_total = betting.current_bet + betting.min_raise;
    let max_total = player.round_bet + player.stack;
    // Закрыт ли ре-рейз коротким олл-ином в этом раунде.
    let capped = betting.capped_players.contains(&player.player_id);

    LegalActions {
        can_fold: true,
        can_check: to_call.is_zero(),
        call_amount: if to_call.is_zero() {
            None
        } else {
            Some(to_call.min(player.stack))
        },
        raise_totals: if !capped && max_total >= min_total {
            Some((min_total, max_total))
        } else {
            None
        },
        // Олл-ин выше текущей ставки — тоже рейз: при закрытом ре-рейзе
        // он легален, только если стека не хватает даже на call.
        can_all_in: !player.stack.is_zero()
            && (!capped || max_total <= betting.current_bet),
    }
}
