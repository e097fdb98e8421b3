use log::trace;

use crate::ai::strength::hand_strength;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::player::BotTier;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::LegalActions;
use crate::engine::RandomSource;

/// Контекст решения для виртуального места: всё, что видно этому месту.
#[derive(Clone, Debug)]
pub struct DecisionContext<'a> {
    pub tier: BotTier,
    pub hole: &'a [Card],
    pub board: &'a [Card],
    pub street: Street,
    pub pot: Chips,
    pub stack: Chips,
    /// Целевая ставка улицы и уже внесённое этим местом.
    pub current_bet: Chips,
    pub round_bet: Chips,
    pub min_raise: Chips,
    /// Позиция места относительно кнопки, 0..1 (1 — самая поздняя).
    pub position_ratio: f64,
    /// Легальные действия — решение обязано попасть в это множество.
    pub legal: LegalActions,
}

/// Доля случайного шума в оценке силы: чем выше уровень, тем уже разброс.
fn random_factor(tier: BotTier) -> f64 {
    match tier {
        BotTier::Beginner => 0.5,
        BotTier::Intermediate => 0.3,
        BotTier::Expert => 0.15,
        BotTier::Pro => 0.05,
    }
}

/// Толерантность к риску, со случайной добавкой на каждое решение.
fn risk_tolerance<R: RandomSource>(tier: BotTier, rng: &mut R) -> f64 {
    match tier {
        BotTier::Beginner => 0.2 + rng.next_f64() * 0.4,
        BotTier::Intermediate => 0.3 + rng.next_f64() * 0.3,
        BotTier::Expert => 0.4 + rng.next_f64() * 0.3,
        BotTier::Pro => 0.5 + rng.next_f64() * 0.3,
    }
}

/// Решение виртуального игрока. Чистая функция от контекста и RNG;
/// всегда возвращает действие из ctx.legal — при невозможности
/// желаемого клэмпится к ближайшему легальному (all-in/call/check/fold),
/// никогда не ошибается.
pub fn decide<R: RandomSource>(ctx: &DecisionContext<'_>, rng: &mut R) -> PlayerActionKind {
    let strength = hand_strength(ctx.hole, ctx.board);
    let rf = random_factor(ctx.tier);
    let risk = risk_tolerance(ctx.tier, rng);

    // Размываем оценку, чтобы игра не была детерминированной и читаемой.
    let mut adjusted = strength * (1.0 - rf) + rng.next_f64() * rf;

    // Профи осторожнее на префлопе, поздняя позиция агрессивнее.
    if ctx.street == Street::Preflop && ctx.tier == BotTier::Pro {
        adjusted *= 0.8;
    }
    if ctx.position_ratio > 0.7 {
        adjusted *= 1.2;
    }
    let adjusted = adjusted.clamp(0.0, 1.0);

    let to_call = ctx.legal.call_amount.map(|c| c.0).unwrap_or(0) as f64;
    let pot_odds = if to_call > 0.0 {
        to_call / (ctx.pot.0 as f64 + to_call)
    } else {
        0.0
    };

    let fold_p = (1.0 - adjusted - risk + pot_odds).max(0.0);
    let raise_p = adjusted * 0.7 + risk * 0.3;
    let all_in_p = adjusted * 0.4 + risk * 0.1;

    let decision = if ctx.legal.can_check {
        // Ставки нет: check или открывающий рейз.
        if adjusted > 0.6 || rng.next_f64() < raise_p {
            sized_raise(ctx, adjusted, rng)
        } else {
            PlayerActionKind::Check
        }
    } else if ctx.legal.call_amount.is_some() {
        if rng.next_f64() < fold_p {
            PlayerActionKind::Fold
        } else if adjusted > 0.85 || rng.next_f64() < all_in_p * 0.5 {
            clamp_all_in(ctx)
        } else if adjusted > 0.6 || rng.next_f64() < raise_p * 0.5 {
            sized_raise(ctx, adjusted, rng)
        } else {
            // Call на короткий стек движок исполнит как all-in call.
            PlayerActionKind::Call
        }
    } else if ctx.legal.can_fold {
        PlayerActionKind::Fold
    } else {
        // Место вне раздачи — сюда не должны приходить; безопасный дефолт.
        PlayerActionKind::Fold
    };

    trace!(
        "bot decision: tier={:?} strength={strength:.2} adjusted={adjusted:.2} -> {decision:?}",
        ctx.tier
    );
    decision
}

/// All-in, либо ближайшее легальное, если пустой стек (не должно случаться).
fn clamp_all_in(ctx: &DecisionContext<'_>) -> PlayerActionKind {
    if ctx.legal.can_all_in {
        PlayerActionKind::AllIn
    } else if ctx.legal.call_amount.is_some() {
        PlayerActionKind::Call
    } else if ctx.legal.can_check {
        PlayerActionKind::Check
    } else {
        PlayerActionKind::Fold
    }
}

/// Рейз с сайзингом от доли банка и клэмпом в легальный диапазон.
/// Если полный рейз не по стеку — all-in (или call как запасной вариант).
fn sized_raise<R: RandomSource>(
    ctx: &DecisionContext<'_>,
    adjusted: f64,
    rng: &mut R,
) -> PlayerActionKind {
    let (min_total, max_total) = match ctx.legal.raise_totals {
        Some(range) => range,
        None => return clamp_all_in(ctx),
    };

    // Новичок рейзит кратно минимальному рейзу, без оглядки на банк.
    if ctx.tier == BotTier::Beginner {
        let mult = 1 + (rng.next_f64() * 3.0) as u64;
        let total = ctx.current_bet + Chips(ctx.min_raise.0 * mult);
        return PlayerActionKind::Raise(total.max(min_total).min(max_total));
    }

    // Доля банка по силе руки.
    let mut bet_ratio = if adjusted > 0.9 {
        1.0 + rng.next_f64() * 0.5
    } else if adjusted > 0.8 {
        0.75 + rng.next_f64() * 0.5
    } else if adjusted > 0.6 {
        0.5 + rng.next_f64() * 0.25
    } else if adjusted > 0.4 {
        0.25 + rng.next_f64() * 0.25
    } else {
        0.1 + rng.next_f64() * 0.2
    };

    bet_ratio *= match ctx.tier {
        BotTier::Intermediate => 0.9 + rng.next_f64() * 0.2,
        BotTier::Expert => 0.85 + rng.next_f64() * 0.3,
        // Профи иногда резко меняет сайзинг, чтобы сбить чтение.
        BotTier::Pro => {
            if rng.next_f64() < 0.3 {
                if rng.next_f64() < 0.5 {
                    0.5
                } else {
                    1.5
                }
            } else {
                1.0
            }
        }
        BotTier::Beginner => 1.0,
    };

    let raise_size = ((ctx.pot.0 as f64 * bet_ratio) as u64).max(ctx.min_raise.0);
    let rounded = round_bet_amount(raise_size, ctx.tier, rng);
    let total = ctx.current_bet + Chips(rounded);

    PlayerActionKind::Raise(total.max(min_total).min(max_total))
}

/// Округление сайзинга к "человеческим" шагам. Гранулярность — настройка
/// стиля, а не правило игры: клэмп в легальный диапазон происходит после.
fn round_bet_amount<R: RandomSource>(amount: u64, tier: BotTier, rng: &mut R) -> u64 {
    let step = if rng.next_f64() < 0.7 { 50 } else { 100 };
    let mut rounded = amount.div_ceil(step) * step;

    // Продвинутые уровни иногда добавляют нестандартный довесок.
    if matches!(tier, BotTier::Expert | BotTier::Pro) && rng.next_f64() < 0.4 {
        rounded += (rng.next_f64() * 5.0) as u64 * 10;
    }

    rounded.max(amount)
}
