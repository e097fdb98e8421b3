use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::HandRank;
use crate::domain::{SeatIndex, Table};
use crate::engine::positions::payout_order;

/// Банк (main или side): сумма и места, претендующие на неё.
/// Сфолдившие места никогда не входят в eligible_seats, хотя их фишки
/// продолжают финансировать банки тех уровней, до которых они дошли.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
}

/// Выплата из банков по итогам раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotPayout {
    pub seat: SeatIndex,
    pub amount: Chips,
}

/// Построить main/side pots из суммарных взносов игроков за раздачу.
///
/// Алгоритм: уровни — отсортированные уникальные взносы участников раздачи;
/// банк уровня i получает (tier_i - tier_{i-1}) от каждого, кто внёс хотя бы
/// tier_i (включая сфолдивших), а право на него имеют только не сфолдившие
/// с взносом >= tier_i. Вызывается один раз при расчёте раздачи.
pub fn compute_side_pots(table: &Table) -> Vec<SidePot> {
    // (seat, взнос, участвует ли в шоудауне)
    let mut contribs: Vec<(SeatIndex, Chips, bool)> = Vec::new();
    for (idx, seat_opt) in table.seats.iter().enumerate() {
        if let Some(p) = seat_opt {
            if !p.total_committed.is_zero() {
                contribs.push((idx as SeatIndex, p.total_committed, p.is_in_hand()));
            }
        }
    }

    // Уровни только по взносам живых участников: банк выше максимального
    // живого взноса выиграть некому.
    let mut tiers: Vec<Chips> = contribs
        .iter()
        .filter(|(_, _, in_hand)| *in_hand)
        .map(|(_, c, _)| *c)
        .collect();
    tiers.sort();
    tiers.dedup();

    if tiers.is_empty() {
        return Vec::new();
    }

    let mut pots = Vec::with_capacity(tiers.len());
    let mut prev = Chips::ZERO;

    for &tier in &tiers {
        let mut amount = Chips::ZERO;
        for &(_, contrib, _) in &contribs {
            amount += contrib.min(tier).saturating_sub(contrib.min(prev));
        }

        let eligible: Vec<SeatIndex> = contribs
            .iter()
            .filter(|(_, contrib, in_hand)| *in_hand && *contrib >= tier)
            .map(|(seat, _, _)| *seat)
            .collect();

        if !amount.is_zero() && !eligible.is_empty() {
            pots.push(SidePot {
                amount,
                eligible_seats: eligible,
            });
        }
        prev = tier;
    }

    // Несвязанный хвост (взнос сфолдившего выше всех живых уровней) не должен
    // теряться — доливаем его в последний банк.
    let committed: u64 = contribs.iter().map(|(_, c, _)| c.0).sum();
    let in_pots: u64 = pots.iter().map(|p| p.amount.0).sum();
    if committed > in_pots {
        if let Some(last) = pots.last_mut() {
            last.amount += Chips(committed - in_pots);
        }
    }

    pots
}

/// Распределить банки по известным рангам рук.
///
/// Для каждого банка: среди eligible мест берём лучшие по рангу, делим
/// поровну; неделимый остаток уходит победителю, ближайшему по кругу слева
/// от кнопки (домовое правило, детерминированное).
pub fn settle_pots(
    table: &Table,
    pots: &[SidePot],
    ranks: &HashMap<SeatIndex, HandRank>,
) -> Vec<PotPayout> {
    let button = table.dealer_button.unwrap_or(0);
    let order = payout_order(table, button);

    let mut payouts: HashMap<SeatIndex, Chips> = HashMap::new();

    for pot in pots {
        let best = pot
            .eligible_seats
            .iter()
            .filter_map(|s| ranks.get(s))
            .max()
            .copied();

        let winners: Vec<SeatIndex> = match best {
            Some(best_rank) => {
                // Победители в позиционном порядке от левого соседа кнопки.
                let mut w: Vec<SeatIndex> = order
                    .iter()
                    .copied()
                    .filter(|s| {
                        pot.eligible_seats.contains(s) && ranks.get(s) == Some(&best_rank)
                    })
                    .collect();
                if w.is_empty() {
                    // eligible без рангов быть не должно; банк без победителя
                    // отдаём первому претенденту, чтобы фишки не исчезли.
                    w.extend(pot.eligible_seats.first().copied());
                }
                w
            }
            None => pot.eligible_seats.iter().take(1).copied().collect(),
        };

        if winners.is_empty() {
            continue;
        }

        let share = Chips(pot.amount.0 / winners.len() as u64);
        let remainder = Chips(pot.amount.0 % winners.len() as u64);

        for (i, &seat) in winners.iter().enumerate() {
            let mut prize = share;
            if i == 0 {
                prize += remainder;
            }
            if !prize.is_zero() {
                *payouts.entry(seat).or_insert(Chips::ZERO) += prize;
            }
        }
    }

    // Стабильный порядок выплат — по позиции от кнопки.
    let mut out: Vec<PotPayout> = Vec::new();
    for seat in order {
        if let Some(amount) = payouts.remove(&seat) {
            out.push(PotPayout { seat, amount });
        }
    }
    // На случай мест вне payout_order (не должно случаться).
    for (seat, amount) in payouts {
        out.push(PotPayout { seat, amount });
    }
    out
}
