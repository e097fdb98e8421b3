//! Доменная модель покера: карты, фишки, колода, игроки, столы, итоги раздач.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod table;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type TableId = u64;
pub type HandId = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use table::*;
