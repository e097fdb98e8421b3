use crate::domain::card::{Card, Rank};
use crate::domain::hand::HandRank;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Вычислить лучшую 5-карточную руку из hole + board.
///
/// Ожидается `hole.len() == 2` и `board.len()` от 3 до 5;
/// в общем случае функция корректна для любых 5–7 карт.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> HandRank {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);
    evaluate_cards(&all_cards)
}

/// Оценка 5–7 карт: перебираем все 5-карточные подмножества, берём максимум.
/// Детерминированная чистая функция — единственный источник порядка рук
/// во всём движке.
pub fn evaluate_cards(cards: &[Card]) -> HandRank {
    best_five(cards).0
}

/// То же, но с самими картами лучшей пятёрки (для шоудаун-событий).
pub fn best_five(cards: &[Card]) -> (HandRank, [Card; 5]) {
    let n = cards.len();
    debug_assert!((5..=7).contains(&n), "ожидается от 5 до 7 карт");

    let mut best: Option<(HandRank, [Card; 5])> = None;

    for a in 0..n.saturating_sub(4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate_5card_hand(&five);
                        if best.map_or(true, |(best_r, _)| r > best_r) {
                            best = Some((r, five));
                        }
                    }
                }
            }
        }
    }

    best.unwrap_or((
        HandRank(0),
        [Card::new(Rank::Two, crate::domain::Suit::Clubs); 5],
    ))
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_5card_hand(cards: &[Card; 5]) -> HandRank {
    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 15]; // индексы 2..14
    let mut rank_mask: RankMask = 0;

    for card in cards.iter() {
        suit_counts[card.suit.index()] += 1;
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = detect_straight(rank_mask);

    // Группы рангов: (ранг, сколько раз), по убыванию количества, затем ранга.
    // Это и есть лексикографический тай-брейк "размер группы → ранг".
    let mut groups: Vec<(Rank, u8)> = Vec::with_capacity(5);
    for v in (2u8..=14).rev() {
        let c = rank_counts[v as usize];
        if c > 0 {
            // v всегда валиден: заполнен только из реальных карт
            if let Some(rank) = Rank::from_value(v) {
                groups.push((rank, c));
            }
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let pattern: Vec<u8> = groups.iter().map(|g| g.1).collect();

    if is_flush {
        if let Some(high) = straight_high {
            return HandRank::from_category_and_ranks(
                HandCategory::StraightFlush,
                straight_rank_array(high),
            );
        }
    }

    // Каре: кикер один, остальные нибблы не участвуют в сравнении.
    if pattern == [4, 1] {
        let ranks = [groups[0].0, groups[1].0, Rank::Two, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::FourOfAKind, ranks);
    }

    if pattern == [3, 2] {
        let ranks = [groups[0].0, groups[1].0, Rank::Two, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::FullHouse, ranks);
    }

    if is_flush {
        let mut sorted: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
        sorted.sort_by(|a, b| b.cmp(a));
        let ranks = [sorted[0], sorted[1], sorted[2], sorted[3], sorted[4]];
        return HandRank::from_category_and_ranks(HandCategory::Flush, ranks);
    }

    if let Some(high) = straight_high {
        return HandRank::from_category_and_ranks(
            HandCategory::Straight,
            straight_rank_array(high),
        );
    }

    if pattern == [3, 1, 1] {
        let ranks = [groups[0].0, groups[1].0, groups[2].0, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::ThreeOfAKind, ranks);
    }

    if pattern == [2, 2, 1] {
        let ranks = [groups[0].0, groups[1].0, groups[2].0, Rank::Two, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::TwoPair, ranks);
    }

    if pattern == [2, 1, 1, 1] {
        let ranks = [groups[0].0, groups[1].0, groups[2].0, groups[3].0, Rank::Two];
        return HandRank::from_category_and_ranks(HandCategory::OnePair, ranks);
    }

    // Старшая карта: топ-5 рангов по убыванию.
    let ranks = [
        groups[0].0,
        groups[1].0,
        groups[2].0,
        groups[3].0,
        groups[4].0,
    ];
    HandRank::from_category_and_ranks(HandCategory::HighCard, ranks)
}

/// Ранги стрита по убыванию для заданной старшей карты.
/// Wheel (A2345) кодируется как пятёрка сверху: туз идёт последним
/// и проигрывает любому стриту от шестёрки.
fn straight_rank_array(high: Rank) -> [Rank; 5] {
    if high == Rank::Five {
        return [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    }
    let hv = high.value();
    let mut out = [Rank::Two; 5];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = Rank::from_value(hv - i as u8).unwrap_or(Rank::Two);
    }
    out
}
