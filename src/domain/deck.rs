use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::engine::RandomSource;

/// Колода карт. Владеет оставшимися картами; раздача снимает карты сверху,
/// бёрн откладывает карту в закрытую стопку. Инвариант: оставшиеся + розданные
/// + сожжённые = ровно 52 уникальные карты (проверяется в тестах).
///
/// Перемешивание — только через инжектированный RNG (см. infra::rng):
/// в проде CSPRNG, в тестах детерминированный.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    burned: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода без перемешивания.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck {
            cards,
            burned: Vec::new(),
        }
    }

    /// Перемешанная колода: равномерная перестановка 52 карт из источника rng.
    pub fn shuffled<R: RandomSource>(rng: &mut R) -> Self {
        let mut deck = Deck::standard_52();
        rng.shuffle(&mut deck.cards);
        deck
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять ровно n карт сверху. None, если карт меньше n
    /// (колода не изменяется — движок превратит это в DeckExhausted).
    pub fn draw_n(&mut self, n: usize) -> Option<Vec<Card>> {
        if self.cards.len() < n {
            return None;
        }
        let at = self.cards.len() - n;
        Some(self.cards.split_off(at))
    }

    /// Сжечь одну карту в закрытую (перед флопом/тёрном/ривером).
    pub fn burn_one(&mut self) -> Option<()> {
        let card = self.cards.pop()?;
        self.burned.push(card);
        Some(())
    }

    /// Сожжённые карты (для проверки целостности колоды).
    pub fn burned_cards(&self) -> &[Card] {
        &self.burned
    }
}
