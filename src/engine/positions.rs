use crate::domain::player::PlayerStatus;
use crate::domain::{SeatIndex, Table};

/// Найти следующее место по кругу, занятое игроком, готовым к раздаче
/// (не sitting out и не busted).
pub fn next_playable_seat(table: &Table, start: SeatIndex, include_start: bool) -> Option<SeatIndex> {
    let max = table.max_seats() as usize;
    if max == 0 {
        return None;
    }

    let mut idx = start as usize % max;
    if !include_start {
        idx = (idx + 1) % max;
    }

    for _ in 0..max {
        if let Some(p) = table.player(idx as SeatIndex) {
            if !matches!(p.status, PlayerStatus::SittingOut | PlayerStatus::Busted) {
                return Some(idx as SeatIndex);
            }
        }
        idx = (idx + 1) % max;
    }

    None
}

/// Все места участников раздачи по кругу, начиная с start (включительно).
pub fn collect_hand_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats() as usize;
    let mut seats = Vec::new();
    if max == 0 {
        return seats;
    }

    let mut idx = start as usize % max;
    for _ in 0..max {
        if let Some(p) = table.player(idx as SeatIndex) {
            if p.is_in_hand() {
                seats.push(idx as SeatIndex);
            }
        }
        idx = (idx + 1) % max;
    }

    seats
}

/// Следующая позиция дилерской кнопки: ровно на одно занятое место
/// по часовой стрелке, пустые и выбывшие места пропускаются.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    match table.dealer_button {
        Some(button) => next_playable_seat(table, button, false),
        None => next_playable_seat(table, 0, true),
    }
}

/// Порядок позиций для раздачи выигрыша: по часовой стрелке от места
/// слева от кнопки. Используется для детерминированной раздачи
/// неделимого остатка при сплите банка.
pub fn payout_order(table: &Table, button: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats();
    if max == 0 {
        return Vec::new();
    }
    let first = (button + 1) % max;
    collect_hand_seats_from(table, first)
}
