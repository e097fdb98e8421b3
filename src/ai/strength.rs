use crate::domain::card::Card;

/// Нормированная сила руки в [0, 1] по hole + board.
///
/// Это эвристика для виртуальных игроков, не точный эквити-калькулятор:
/// до флопа — взвешенная оценка старшинства, пары, одномастности и
/// коннекторности; после флопа — группы рангов и мастей по 5–7 картам.
pub fn hand_strength(hole: &[Card], board: &[Card]) -> f64 {
    if board.is_empty() {
        return preflop_strength(hole);
    }

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for card in hole.iter().chain(board.iter()) {
        rank_counts[card.rank.value() as usize] += 1;
        suit_counts[card.suit.index()] += 1;
    }

    let mut strength: f64 = 0.0;

    if rank_counts.iter().any(|&c| c >= 4) {
        strength += 0.9;
    }
    if rank_counts.iter().any(|&c| c == 3) {
        strength += 0.7;
    }
    let pairs = rank_counts.iter().filter(|&&c| c >= 2).count() as f64;
    strength += pairs * 0.3;

    // 4 к флашу (или готовый флаш) — сильное дро.
    if suit_counts.iter().any(|&c| c >= 4) {
        strength += 0.4;
    }

    strength.clamp(0.0, 1.0)
}

/// Префлоп-оценка двух карманных карт.
fn preflop_strength(hole: &[Card]) -> f64 {
    if hole.len() != 2 {
        return 0.0;
    }

    // Нормируем ранги к 0..12 (двойка = 0, туз = 12).
    let v1 = (hole[0].rank.value() - 2) as f64;
    let v2 = (hole[1].rank.value() - 2) as f64;
    let high = v1.max(v2);
    let low = v1.min(v2);

    let is_pair = hole[0].rank == hole[1].rank;
    let is_suited = hole[0].suit == hole[1].suit;
    let is_connector = (v1 - v2).abs() <= 2.0;

    let mut strength = 0.0;
    strength += high / 12.0 * 0.4; // старшая карта — 40% веса
    strength += low / 12.0 * 0.2; // младшая — 20%

    if is_pair {
        strength += 0.3 + (high / 12.0) * 0.2; // старшая пара ценнее
    }
    if is_suited {
        strength += 0.1;
    }
    if is_connector {
        strength += 0.1;
    }

    // Премиумы: JJ+ и AK.
    if is_pair && high >= 9.0 {
        strength += 0.2;
    } else if high == 12.0 && low >= 11.0 {
        strength += 0.15;
    }

    strength.clamp(0.0, 1.0)
}
