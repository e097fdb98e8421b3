use std::collections::HashMap;

use log::{debug, info, warn};

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandRank, HandSummary, PlayerHandResult, Street};
use crate::domain::player::{PlayerAtTable, PlayerStatus};
use crate::domain::table::Table;
use crate::domain::{HandId, SeatIndex};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::betting::{legal_actions, BettingState};
use crate::engine::errors::EngineError;
use crate::engine::events::{CardScope, ShowdownEntry, TableEvent};
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{collect_hand_seats_from, next_dealer};
use crate::engine::pot::Pot;
use crate::engine::side_pots::{compute_side_pots, settle_pots, SidePot};
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::eval::best_five;

/// Статус раздачи после применения действия.
#[derive(Debug)]
pub enum HandStatus {
    Ongoing,
    Finished(HandSummary),
}

/// Состояние одной живой раздачи. Владеет колодой и раундом торговли;
/// взносы игроков лежат на самих местах (total_committed).
#[derive(Debug)]
pub struct HandEngine {
    pub hand_id: HandId,
    pub deck: Deck,
    pub betting: BettingState,
    pub pot: Pot,
    /// Банки, построенные при расчёте (до него — пусто).
    pub side_pots: Vec<SidePot>,
    /// Чей сейчас ход; None, когда раунд завершён или все в олл-ине.
    pub current_actor: Option<SeatIndex>,
    pub history: HandHistory,
}

/// Старт новой раздачи: кнопка, блайнды, карманные карты, очередь префлопа.
///
/// Возвращает движок раздачи и события для broadcast-слоя.
pub fn start_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    hand_id: HandId,
) -> Result<(HandEngine, Vec<TableEvent>), EngineError> {
    if table.hand_in_progress {
        return Err(EngineError::HandAlreadyInProgress);
    }

    // Готовим участников: в раздачу входят все, кто не sit out и с фишками.
    for seat_opt in table.seats.iter_mut() {
        if let Some(p) = seat_opt {
            p.round_bet = Chips::ZERO;
            p.total_committed = Chips::ZERO;
            p.hole_cards.clear();
            if p.stack.is_zero() {
                p.status = PlayerStatus::Busted;
            } else if !matches!(p.status, PlayerStatus::SittingOut) {
                p.status = PlayerStatus::Active;
            }
        }
    }

    let playable = table
        .seats
        .iter()
        .flatten()
        .filter(|p| matches!(p.status, PlayerStatus::Active))
        .count();
    if playable < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    table.board.clear();
    table.street = Street::Preflop;
    table.hand_in_progress = true;
    table.current_hand_id = Some(hand_id);
    table.hand_number += 1;

    let dealer_seat = next_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;
    table.dealer_button = Some(dealer_seat);

    let mut engine = HandEngine {
        hand_id,
        deck: Deck::shuffled(rng),
        betting: BettingState::new(
            Street::Preflop,
            Chips::ZERO,
            table.config.stakes.big_blind,
            Vec::new(),
        ),
        pot: Pot::new(),
        side_pots: Vec::new(),
        current_actor: None,
        history: HandHistory::new(),
    };

    engine.history.push(HandEventKind::HandStarted {
        table_id: table.id,
        hand_id,
        hand_number: table.hand_number,
    });
    info!(
        "table {}: hand #{} started, button at seat {}",
        table.id, table.hand_number, dealer_seat
    );

    let mut events = Vec::new();
    post_blinds(table, &mut engine, dealer_seat);
    deal_hole_cards(table, &mut engine, dealer_seat, &mut events)?;

    events.push(TableEvent::BettingRoundStarted {
        street: Street::Preflop,
        to_act: engine.current_actor,
    });

    Ok((engine, events))
}

/// Постинг блайндов и порядок действия на префлопе.
/// Хедз-ап: кнопка постит малый блайнд и ходит первой на префлопе.
fn post_blinds(table: &mut Table, engine: &mut HandEngine, dealer_seat: SeatIndex) {
    let stakes = table.config.stakes;
    let order = collect_hand_seats_from(table, dealer_seat);

    let (sb_seat, bb_seat) = if order.len() == 2 {
        (order[0], order[1])
    } else {
        (order[1 % order.len()], order[2 % order.len()])
    };

    let mut sb_evt = None;
    if let Some(p) = table.player_mut(sb_seat) {
        let paid = commit_chips(p, stakes.small_blind);
        engine.pot.add(paid);
        sb_evt = Some((sb_seat, paid));
    }

    let mut bb_evt = None;
    if let Some(p) = table.player_mut(bb_seat) {
        let paid = commit_chips(p, stakes.big_blind);
        engine.pot.add(paid);
        bb_evt = Some((bb_seat, paid));
    }

    engine.betting.current_bet = stakes.big_blind;
    engine.betting.min_raise = stakes.big_blind;
    engine.betting.last_aggressor = Some(bb_seat);

    engine.history.push(HandEventKind::BlindsPosted {
        dealer: dealer_seat,
        small_blind: sb_evt,
        big_blind: bb_evt,
    });

    // Первым на префлопе ходит сосед BB слева; очередь замыкает сам BB
    // (у него остаётся option). Блайнды в олл-ине в очередь не попадают.
    let start = order
        .iter()
        .position(|&s| s == bb_seat)
        .map(|i| (i + 1) % order.len())
        .unwrap_or(0);

    let mut to_act = Vec::new();
    for i in 0..order.len() {
        let seat = order[(start + i) % order.len()];
        if table.player(seat).map(|p| p.can_act()).unwrap_or(false) {
            to_act.push(seat);
        }
    }

    engine.current_actor = to_act.first().copied();
    engine.betting.to_act = to_act;
}

/// Списать с места не более amount; при опустевшем стеке игрок в олл-ине.
fn commit_chips(player: &mut PlayerAtTable, amount: Chips) -> Chips {
    let real = amount.min(player.stack);
    player.stack -= real;
    player.round_bet += real;
    player.total_committed += real;
    if player.stack.is_zero() {
        player.status = PlayerStatus::AllIn;
    }
    real
}

/// Раздать по 2 карманные карты по кругу от кнопки.
fn deal_hole_cards(
    table: &mut Table,
    engine: &mut HandEngine,
    dealer_seat: SeatIndex,
    events: &mut Vec<TableEvent>,
) -> Result<(), EngineError> {
    let order = collect_hand_seats_from(table, dealer_seat);

    for _round in 0..2 {
        for &seat in &order {
            let card = engine.deck.draw_one().ok_or(EngineError::DeckExhausted)?;
            if let Some(p) = table.player_mut(seat) {
                p.hole_cards.push(card);
            }
        }
    }

    for &seat in &order {
        if let Some(p) = table.player(seat) {
            engine.history.push(HandEventKind::HoleCardsDealt {
                seat,
                cards: p.hole_cards.clone(),
            });
            events.push(TableEvent::CardsDealt {
                scope: CardScope::PrivateToSeat(seat),
                cards: p.hole_cards.clone(),
            });
        }
    }

    Ok(())
}

/// Действие по умолчанию для текущего актёра: check, если легален, иначе fold.
/// Единственный источник синтетических действий (таймаут/дисконнект).
pub fn default_action(table: &Table, engine: &HandEngine) -> Option<PlayerAction> {
    let seat = engine.current_actor?;
    let player = table.player(seat)?;
    let legal = legal_actions(player, &engine.betting);
    let kind = if legal.can_check {
        PlayerActionKind::Check
    } else {
        PlayerActionKind::Fold
    };
    Some(PlayerAction {
        player_id: player.player_id,
        seat,
        kind,
    })
}

/// Применить действие игрока.
///
/// Любая ошибка до мутаций: отвергнутое действие оставляет состояние
/// нетронутым, ход остаётся за тем же местом.
pub fn apply_action(
    table: &mut Table,
    engine: &mut HandEngine,
    action: PlayerAction,
) -> Result<(HandStatus, Vec<TableEvent>), EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }
    if action.seat as usize >= table.seats.len() {
        return Err(EngineError::InvalidSeat(action.seat));
    }

    let player_ref = table.player(action.seat).ok_or(EngineError::EmptySeat)?;
    if player_ref.player_id != action.player_id {
        return Err(EngineError::NotSeated(action.player_id));
    }
    if engine.current_actor != Some(action.seat) {
        return Err(EngineError::NotPlayersTurn(action.player_id));
    }

    validate_action(player_ref, &action.kind, &engine.betting)?;

    let old_current_bet = engine.betting.current_bet;
    let to_call = engine.betting.to_call(player_ref);

    // С этого места действие принято — мутируем.
    let (new_stack, new_bet, committed) = {
        let player = table
            .player_mut(action.seat)
            .ok_or(EngineError::EmptySeat)?;

        let committed = match action.kind {
            PlayerActionKind::Fold => {
                player.status = PlayerStatus::Folded;
                Chips::ZERO
            }
            PlayerActionKind::Check => Chips::ZERO,
            PlayerActionKind::Call => commit_chips(player, to_call),
            PlayerActionKind::Raise(total_bet) => {
                let diff = total_bet.saturating_sub(player.round_bet);
                commit_chips(player, diff)
            }
            PlayerActionKind::AllIn => {
                let all = player.stack;
                commit_chips(player, all)
            }
        };

        (player.stack, player.round_bet, committed)
    };

    engine.pot.add(committed);

    // Агрессия (raise или олл-ин выше текущей ставки).
    let raised = new_bet > old_current_bet
        && matches!(
            action.kind,
            PlayerActionKind::Raise(_) | PlayerActionKind::AllIn
        );
    if raised {
        let raise_size = new_bet - old_current_bet;
        let new_to_act = reopen_order_after_raise(table, action.seat);
        if raise_size >= engine.betting.min_raise {
            // Полный рейз перезапускает очередь и открывает ре-рейз всем.
            engine
                .betting
                .on_raise(action.seat, new_bet, raise_size, new_to_act);
        } else {
            // Короткий олл-ин (меньше полного рейза): доплата для остальных
            // растёт, но уже ходившие в этом раунде отвечают только
            // fold/call — право ре-рейза у них не открывается,
            // min_raise считается от последнего полного рейза.
            for &seat in &new_to_act {
                if engine.betting.to_act.contains(&seat) {
                    continue;
                }
                if let Some(p) = table.player(seat) {
                    if !engine.betting.capped_players.contains(&p.player_id) {
                        engine.betting.capped_players.push(p.player_id);
                    }
                }
            }
            engine.betting.current_bet = new_bet;
            engine.betting.last_aggressor = Some(action.seat);
            engine.betting.to_act = new_to_act;
        }
    }
    engine.betting.mark_acted(action.seat);

    engine.history.push(HandEventKind::PlayerActed {
        player_id: action.player_id,
        seat: action.seat,
        action: action.kind,
        new_stack,
        pot_after: engine.pot.total,
    });
    debug!(
        "table {}: seat {} -> {:?}, pot {}",
        table.id, action.seat, action.kind, engine.pot.total
    );

    let events = vec![TableEvent::ActionTaken {
        seat: action.seat,
        action: action.kind,
        pot_after: engine.pot.total,
    }];

    settle_or_continue(table, engine, events)
}

/// Принудительный fold места вне его хода (уход со стола посреди раздачи).
/// Внесённые фишки остаются в банке.
pub fn force_fold(
    table: &mut Table,
    engine: &mut HandEngine,
    seat: SeatIndex,
) -> Result<(HandStatus, Vec<TableEvent>), EngineError> {
    if !table.hand_in_progress {
        return Err(EngineError::NoActiveHand);
    }
    let player = table.player_mut(seat).ok_or(EngineError::EmptySeat)?;
    if !player.is_in_hand() {
        return Err(EngineError::IllegalAction);
    }

    let player_id = player.player_id;
    let new_stack = player.stack;
    player.status = PlayerStatus::Folded;
    engine.betting.mark_acted(seat);

    engine.history.push(HandEventKind::PlayerActed {
        player_id,
        seat,
        action: PlayerActionKind::Fold,
        new_stack,
        pot_after: engine.pot.total,
    });

    let events = vec![TableEvent::ActionTaken {
        seat,
        action: PlayerActionKind::Fold,
        pot_after: engine.pot.total,
    }];

    if engine.current_actor == Some(seat) {
        engine.current_actor = engine.betting.to_act.first().copied();
    }

    settle_or_continue(table, engine, events)
}

/// Общий хвост после принятого действия: расчёт при единственном
/// претенденте, переход улицы при пустой очереди, иначе передача хода.
fn settle_or_continue(
    table: &mut Table,
    engine: &mut HandEngine,
    mut events: Vec<TableEvent>,
) -> Result<(HandStatus, Vec<TableEvent>), EngineError> {
    // Остался один претендент на банк — расчёт без шоудауна и без добора карт.
    if seats_in_hand(table).len() == 1 {
        let summary = finish_without_showdown(table, engine, &mut events);
        return Ok((HandStatus::Finished(summary), events));
    }

    if engine.betting.is_round_complete() {
        events.push(TableEvent::RoundComplete {
            street: table.street,
            pot: engine.pot.total,
        });
        let status = advance_streets(table, engine, &mut events)?;
        Ok((status, events))
    } else {
        engine.current_actor = engine.betting.to_act.first().copied();
        Ok((HandStatus::Ongoing, events))
    }
}

/// Очередь после рейза: все остальные активные по кругу от рейзера.
fn reopen_order_after_raise(table: &Table, raiser_seat: SeatIndex) -> Vec<SeatIndex> {
    let order = collect_hand_seats_from(table, raiser_seat);
    order
        .into_iter()
        .skip(1)
        .filter(|&s| table.player(s).map(|p| p.can_act()).unwrap_or(false))
        .collect()
}

/// Места, всё ещё претендующие на банк (active + all-in).
fn seats_in_hand(table: &Table) -> Vec<SeatIndex> {
    table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            s.as_ref()
                .filter(|p| p.is_in_hand())
                .map(|_| idx as SeatIndex)
        })
        .collect()
}

/// Переход улиц вплоть до шоудауна. Если после очередной улицы некому
/// торговаться (все в олл-ине), оставшиеся улицы доезжают автоматически.
fn advance_streets(
    table: &mut Table,
    engine: &mut HandEngine,
    events: &mut Vec<TableEvent>,
) -> Result<HandStatus, EngineError> {
    loop {
        match table.street {
            Street::Preflop => deal_board(table, engine, 3, Street::Flop, events)?,
            Street::Flop => deal_board(table, engine, 1, Street::Turn, events)?,
            Street::Turn => deal_board(table, engine, 1, Street::River, events)?,
            Street::River => {
                let summary = finish_with_showdown(table, engine, events);
                return Ok(HandStatus::Finished(summary));
            }
            Street::Showdown => {
                return Err(EngineError::Internal("advance после шоудауна"));
            }
        }

        reset_betting_for_street(table, engine);

        if engine.current_actor.is_some() {
            events.push(TableEvent::BettingRoundStarted {
                street: table.street,
                to_act: engine.current_actor,
            });
            return Ok(HandStatus::Ongoing);
        }
        // Некому ходить — продолжаем доезд борда.
    }
}

/// Сжечь карту и открыть count карт борда.
fn deal_board(
    table: &mut Table,
    engine: &mut HandEngine,
    count: usize,
    street: Street,
    events: &mut Vec<TableEvent>,
) -> Result<(), EngineError> {
    engine.deck.burn_one().ok_or(EngineError::DeckExhausted)?;
    let cards = engine
        .deck
        .draw_n(count)
        .ok_or(EngineError::DeckExhausted)?;
    table.board.extend_from_slice(&cards);
    table.street = street;

    engine.history.push(HandEventKind::BoardDealt {
        street,
        cards: cards.clone(),
    });
    events.push(TableEvent::CardsDealt {
        scope: CardScope::Public,
        cards,
    });
    Ok(())
}

/// Новый раунд торговли: обнуление round_bet и очередь активных от соседа
/// кнопки. Если способных торговаться меньше двух — очередь пустая
/// (сигнал доезда).
fn reset_betting_for_street(table: &mut Table, engine: &mut HandEngine) {
    for seat_opt in table.seats.iter_mut() {
        if let Some(p) = seat_opt {
            p.round_bet = Chips::ZERO;
        }
    }

    let button = table.dealer_button.unwrap_or(0);
    let order = collect_hand_seats_from(table, (button + 1) % table.max_seats());
    let to_act: Vec<SeatIndex> = order
        .into_iter()
        .filter(|&s| table.player(s).map(|p| p.can_act()).unwrap_or(false))
        .collect();

    let to_act = if to_act.len() < 2 { Vec::new() } else { to_act };

    engine.betting = BettingState::new(
        table.street,
        Chips::ZERO,
        table.config.stakes.big_blind,
        to_act,
    );
    engine.current_actor = engine.betting.to_act.first().copied();
}

/// Расчёт при единственном оставшемся: победитель забирает все банки,
/// карты не вскрываются и не доезжают.
fn finish_without_showdown(
    table: &mut Table,
    engine: &mut HandEngine,
    events: &mut Vec<TableEvent>,
) -> HandSummary {
    let winner_seat = seats_in_hand(table).first().copied().unwrap_or(0);

    engine.side_pots = compute_side_pots(table);
    let ranks = HashMap::new();
    // settle_pots без рангов отдаёт каждый банк первому (единственному)
    // претенденту.
    let payouts = settle_pots(table, &engine.side_pots, &ranks);
    apply_payouts(table, engine, &payouts);

    debug!("table {}: seat {} wins uncontested", table.id, winner_seat);
    let results = build_results(table, &payouts, &HashMap::new());
    finalize_hand(table, engine, events, payouts, results)
}

/// Шоудаун: вскрытие рук, построение банков, расчёт и выплаты.
fn finish_with_showdown(
    table: &mut Table,
    engine: &mut HandEngine,
    events: &mut Vec<TableEvent>,
) -> HandSummary {
    table.street = Street::Showdown;

    let mut ranks: HashMap<SeatIndex, HandRank> = HashMap::new();
    let mut reveals = Vec::new();

    for seat in seats_in_hand(table) {
        if let Some(p) = table.player(seat) {
            let mut cards = p.hole_cards.clone();
            cards.extend_from_slice(&table.board);
            let (rank, five) = best_five(&cards);
            ranks.insert(seat, rank);

            engine.history.push(HandEventKind::ShowdownReveal {
                seat,
                player_id: p.player_id,
                hole_cards: p.hole_cards.clone(),
                rank_value: rank.0,
            });
            reveals.push(ShowdownEntry {
                seat,
                hole_cards: p.hole_cards.clone(),
                rank,
                best_five: five.to_vec(),
            });
        }
    }

    events.push(TableEvent::Showdown { entries: reveals });

    engine.side_pots = compute_side_pots(table);
    let payouts = settle_pots(table, &engine.side_pots, &ranks);
    apply_payouts(table, engine, &payouts);

    let results = build_results(table, &payouts, &ranks);
    finalize_hand(table, engine, events, payouts, results)
}

fn apply_payouts(
    table: &mut Table,
    engine: &mut HandEngine,
    payouts: &[crate::engine::side_pots::PotPayout],
) {
    for payout in payouts {
        if let Some(p) = table.player_mut(payout.seat) {
            p.stack += payout.amount;
            engine.history.push(HandEventKind::PotAwarded {
                seat: payout.seat,
                player_id: p.player_id,
                amount: payout.amount,
            });
        }
    }
}

fn build_results(
    table: &Table,
    payouts: &[crate::engine::side_pots::PotPayout],
    ranks: &HashMap<SeatIndex, HandRank>,
) -> Vec<PlayerHandResult> {
    let mut results = Vec::new();
    for (idx, seat_opt) in table.seats.iter().enumerate() {
        if let Some(p) = seat_opt {
            if p.total_committed.is_zero() && p.hole_cards.is_empty() {
                continue; // не участвовал в раздаче
            }
            let seat = idx as SeatIndex;
            let won = payouts
                .iter()
                .filter(|pp| pp.seat == seat)
                .map(|pp| pp.amount)
                .fold(Chips::ZERO, |acc, a| acc + a);
            results.push(PlayerHandResult {
                player_id: p.player_id,
                seat,
                rank: ranks.get(&seat).copied(),
                won,
                is_winner: !won.is_zero(),
            });
        }
    }
    results
}

fn finalize_hand(
    table: &mut Table,
    engine: &mut HandEngine,
    events: &mut Vec<TableEvent>,
    payouts: Vec<crate::engine::side_pots::PotPayout>,
    results: Vec<PlayerHandResult>,
) -> HandSummary {
    // Улица, на которой раздача фактически закончилась (до перевода стола
    // в терминальное состояние).
    let street_reached = table.street;
    table.street = Street::Showdown;
    table.hand_in_progress = false;
    table.current_hand_id = None;

    // Обнуляем взносы: фишки уже разложены по стекам победителей.
    for seat_opt in table.seats.iter_mut() {
        if let Some(p) = seat_opt {
            p.total_committed = Chips::ZERO;
            p.round_bet = Chips::ZERO;
            if p.stack.is_zero() && !matches!(p.status, PlayerStatus::SittingOut) {
                p.status = PlayerStatus::Busted;
            }
        }
    }

    engine.history.push(HandEventKind::HandFinished {
        hand_id: engine.hand_id,
        table_id: table.id,
    });
    info!(
        "table {}: hand #{} settled, pot {}",
        table.id, table.hand_number, engine.pot.total
    );

    events.push(TableEvent::HandSettled {
        hand_id: engine.hand_id,
        payouts,
    });

    HandSummary {
        hand_id: engine.hand_id,
        table_id: table.id,
        street_reached,
        board: table.board.clone(),
        total_pot: engine.pot.total,
        results,
    }
}

/// Аборт текущей раздачи из-за внутренней ошибки (DeckExhausted и т.п.):
/// все взносы возвращаются в стеки, стол остаётся жив. В корректной работе
/// не случается — это защита от багов, а не от действий игроков.
pub fn abort_hand(
    table: &mut Table,
    engine: &mut HandEngine,
    reason: &EngineError,
) -> Vec<TableEvent> {
    warn!(
        "table {}: hand #{} aborted: {}",
        table.id, table.hand_number, reason
    );

    for seat_opt in table.seats.iter_mut() {
        if let Some(p) = seat_opt {
            p.stack += p.total_committed;
            p.total_committed = Chips::ZERO;
            p.round_bet = Chips::ZERO;
            p.hole_cards.clear();
        }
    }

    table.hand_in_progress = false;
    table.current_hand_id = None;
    table.board.clear();
    table.street = Street::Showdown;
    engine.current_actor = None;

    engine.history.push(HandEventKind::HandAborted {
        hand_id: engine.hand_id,
        reason: reason.to_string(),
    });

    vec![TableEvent::HandAborted {
        hand_id: engine.hand_id,
        reason: reason.to_string(),
    }]
}
