use crate::domain::card::Rank;
use crate::domain::hand::HandRank;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandRank {
    /// Собрать HandRank из категории и 5 тай-брейк рангов (от старшего к младшему).
    ///
    /// Схема кодирования (u32):
    ///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
    /// Ранг 2..14 помещается в ниббл, поэтому сравнение упакованных значений
    /// эквивалентно лексикографическому сравнению (категория, ранги).
    pub fn from_category_and_ranks(category: HandCategory, ranks: [Rank; 5]) -> Self {
        let mut value = ((category as u32) & 0x0F) << 20;
        for (i, r) in ranks.iter().enumerate() {
            value |= (r.value() as u32) << (16 - 4 * i);
        }
        HandRank(value)
    }

    /// Категория из упакованного значения.
    pub fn category(&self) -> HandCategory {
        match (self.0 >> 20) & 0x0F {
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            _ => HandCategory::HighCard,
        }
    }

    /// Тай-брейк ранги (от старшего к младшему).
    pub fn tiebreak_ranks(&self) -> [Rank; 5] {
        let mut out = [Rank::Two; 5];
        for (i, slot) in out.iter_mut().enumerate() {
            let nibble = ((self.0 >> (16 - 4 * i)) & 0x0F) as u8;
            *slot = Rank::from_value(nibble).unwrap_or(Rank::Two);
        }
        out
    }
}

/// Человеческое описание руки по категории (для событий и истории).
pub fn describe_hand(rank: HandRank) -> &'static str {
    match rank.category() {
        HandCategory::HighCard => "High card",
        HandCategory::OnePair => "One pair",
        HandCategory::TwoPair => "Two pair",
        HandCategory::ThreeOfAKind => "Three of a kind",
        HandCategory::Straight => "Straight",
        HandCategory::Flush => "Flush",
        HandCategory::FullHouse => "Full house",
        HandCategory::FourOfAKind => "Four of a kind",
        HandCategory::StraightFlush => "Straight flush",
    }
}
