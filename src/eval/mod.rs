//! Оценка покерных рук: категории, тай-брейки, упакованный ранг.

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::{best_five, evaluate_best_hand, evaluate_cards};
pub use hand_rank::{describe_hand, HandCategory};
