//! poker-tables — авторитетный движок многопользовательских столов
//! техасского холдема (no-limit).
//!
//! Слои:
//! - [`domain`] — карты, фишки, колода, игроки, столы;
//! - [`eval`] — оценка лучшей пятикарточной комбинации;
//! - [`engine`] — раздача: ставки, банки, шоудаун, история, сессия стола;
//! - [`ai`] — решения виртуальных игроков;
//! - [`infra`] — RNG, леджер балансов, хранилище записей раздач;
//! - [`runtime`] — actor на стол поверх tokio.
//!
//! Сервер авторитетен: клиент присылает только намерения (сесть, уйти,
//! действие), все правила применяются здесь. Движок детерминирован
//! относительно инжектированного источника случайности.

pub mod ai;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod runtime;
