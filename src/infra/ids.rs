use serde::{Deserialize, Serialize};

/// Монотонный генератор идентификаторов (раздачи, виртуальные игроки).
/// Один генератор на стол — между столами уникальность обеспечивает
/// пространство (table_id, hand_id).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
