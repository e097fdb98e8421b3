use crate::domain::card::Rank;

/// Битовая маска рангов: 13 бит, бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Маски всех возможных стритов (5 подряд), от wheel к broadway.
pub const STRAIGHT_MASKS: [RankMask; 10] = [
    // A2345 (wheel) — туз играет снизу
    mask_from_ranks(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]),
    mask_from_ranks(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six]),
    mask_from_ranks(&[Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven]),
    mask_from_ranks(&[Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight]),
    mask_from_ranks(&[Rank::Five, Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine]),
    mask_from_ranks(&[Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten]),
    mask_from_ranks(&[Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack]),
    mask_from_ranks(&[Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen]),
    mask_from_ranks(&[Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King]),
    // TJQKA (broadway)
    mask_from_ranks(&[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]),
];

/// Старшая карта стрита для каждого индекса STRAIGHT_MASKS.
/// Wheel считается стритом до пятёрки — это единственный случай,
/// когда туз играет как младшая карта.
const STRAIGHT_HIGHS: [Rank; 10] = [
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

/// Битовая маска одного ранга.
pub fn rank_to_bit(rank: Rank) -> RankMask {
    1u16 << (rank.value() - 2)
}

/// Маска из списка рангов (const, используется для таблицы стритов).
pub const fn mask_from_ranks(ranks: &[Rank]) -> RankMask {
    let mut mask: RankMask = 0;
    let mut i = 0;
    while i < ranks.len() {
        mask |= 1 << (ranks[i] as u8 - 2);
        i += 1;
    }
    mask
}

/// Найти стрит в маске рангов; возвращает старшую карту самого сильного стрита.
pub fn detect_straight(rank_mask: RankMask) -> Option<Rank> {
    for (i, sm) in STRAIGHT_MASKS.iter().enumerate().rev() {
        if rank_mask & sm == *sm {
            return Some(STRAIGHT_HIGHS[i]);
        }
    }
    None
}
