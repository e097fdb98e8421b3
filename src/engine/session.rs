//! TableSession — фасад одного стола: посадка и уход игроков, приём
//! действий, ходы виртуальных игроков, таймауты и запись раздач.
//!
//! Сессия однопоточна по построению: runtime запускает actor на стол,
//! и все операции приходят сюда последовательно. Никаких блокировок.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};

use crate::ai::{decide, DecisionContext};
use crate::domain::chips::Chips;
use crate::domain::hand::HandSummary;
use crate::domain::player::{BotTier, PlayerAtTable, PlayerStatus};
use crate::domain::table::{Table, TableConfig};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::betting::{legal_actions, LegalActions};
use crate::engine::errors::EngineError;
use crate::engine::events::{SeatInfo, TableEvent};
use crate::engine::game_loop::{
    abort_hand, apply_action, default_action, force_fold, start_hand, HandEngine, HandStatus,
};
use crate::engine::hand_history::{HandEventKind, HandRecord, SeatSnapshot};
use crate::engine::positions::collect_hand_seats_from;
use crate::engine::side_pots::PotPayout;
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::infra::ids::IdGenerator;
use crate::infra::ledger::Ledger;
use crate::infra::persistence::HandRecordStore;

/// Идентификаторы виртуальных игроков живут в отдельном диапазоне,
/// чтобы не пересекаться с id людей из внешнего identity-провайдера.
const BOT_ID_BASE: u64 = 1_000_000_000;

/// Состояние одного стола со всем окружением: леджер для бай-инов,
/// хранилище записей раздач и источник случайности.
pub struct TableSession<R: RandomSource> {
    table: Table,
    engine: Option<HandEngine>,
    hand_ids: IdGenerator,
    bot_ids: IdGenerator,
    rng: R,
    ledger: Box<dyn Ledger>,
    store: Box<dyn HandRecordStore>,
    last_summary: Option<HandSummary>,
}

impl<R: RandomSource> TableSession<R> {
    pub fn new(
        id: TableId,
        name: String,
        config: TableConfig,
        rng: R,
        ledger: Box<dyn Ledger>,
        store: Box<dyn HandRecordStore>,
    ) -> Self {
        Self {
            table: Table::new(id, name, config),
            engine: None,
            hand_ids: IdGenerator::new(),
            bot_ids: IdGenerator::starting_at(BOT_ID_BASE),
            rng,
            ledger,
            store,
            last_summary: None,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn last_summary(&self) -> Option<&HandSummary> {
        self.last_summary.as_ref()
    }

    pub fn hand_in_progress(&self) -> bool {
        self.table.hand_in_progress
    }

    /// Чей сейчас ход (если раздача идёт и очередь не пуста).
    pub fn current_actor(&self) -> Option<SeatIndex> {
        self.engine.as_ref().and_then(|e| e.current_actor)
    }

    /// Место человека, от которого ждём действия. None, если ход
    /// виртуального игрока или раздача не идёт — дедлайн не нужен.
    pub fn awaiting_human(&self) -> Option<SeatIndex> {
        let seat = self.current_actor()?;
        let player = self.table.player(seat)?;
        if player.is_bot() {
            None
        } else {
            Some(seat)
        }
    }

    /// Ключ текущего хода человека: (раздача, позиция в истории, место).
    /// Меняется при каждом новом ходе — в том числе когда одно и то же
    /// место ходит подряд, — и служит runtime-слою для перевзвода дедлайна.
    pub fn human_turn_key(&self) -> Option<(HandId, u32, SeatIndex)> {
        let seat = self.awaiting_human()?;
        let engine = self.engine.as_ref()?;
        Some((engine.hand_id, engine.history.events.len() as u32, seat))
    }

    /// Легальные действия игрока в текущем раунде.
    pub fn legal_actions_for(&self, player_id: PlayerId) -> Result<LegalActions, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::NotSeated(player_id))?;
        let engine = self.engine.as_ref().ok_or(EngineError::NoActiveHand)?;
        let player = self.table.player(seat).ok_or(EngineError::EmptySeat)?;
        Ok(legal_actions(player, &engine.betting))
    }

    /// Посадить человека: дебет бай-ина из леджера, первое свободное место.
    /// Вошедший посреди раздачи в текущую не попадает — играет со следующей.
    pub fn join(
        &mut self,
        player_id: PlayerId,
        name: String,
        buy_in: Chips,
    ) -> Result<(SeatIndex, Vec<TableEvent>), EngineError> {
        if self.table.seat_of(player_id).is_some() {
            return Err(EngineError::AlreadySeated(player_id));
        }
        let seat = self.table.free_seat().ok_or(EngineError::TableFull)?;

        self.ledger
            .debit(player_id, buy_in)
            .map_err(|_| EngineError::InsufficientBalance(player_id))?;

        let mut player = PlayerAtTable::human(player_id, name, buy_in);
        if self.table.hand_in_progress {
            player.status = PlayerStatus::Folded;
        }
        self.table.seats[seat as usize] = Some(player);

        info!(
            "table {}: player {} seated at {} with buy-in {}",
            self.table.id, player_id, seat, buy_in
        );
        Ok((seat, vec![self.seats_updated_event()]))
    }

    /// Посадить виртуального игрока. Его стек фондируется столом,
    /// леджер не участвует.
    pub fn add_virtual_player(
        &mut self,
        tier: BotTier,
        stack: Chips,
    ) -> Result<(SeatIndex, Vec<TableEvent>), EngineError> {
        let seat = self.table.free_seat().ok_or(EngineError::TableFull)?;
        let player_id = self.bot_ids.next_id();

        let mut player = PlayerAtTable::virtual_player(player_id, tier, stack);
        if self.table.hand_in_progress {
            player.status = PlayerStatus::Folded;
        }
        self.table.seats[seat as usize] = Some(player);

        info!(
            "table {}: bot {} ({:?}) seated at {}",
            self.table.id, player_id, tier, seat
        );
        Ok((seat, vec![self.seats_updated_event()]))
    }

    /// Уход со стола. Участник живой раздачи сначала фолдится (его взносы
    /// остаются в банке), затем финальный стек кредитуется в леджер.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<(Chips, Vec<TableEvent>), EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::NotSeated(player_id))?;

        let mut events = Vec::new();
        let in_hand = self
            .table
            .player(seat)
            .map(|p| p.is_in_hand())
            .unwrap_or(false);
        if in_hand && self.engine.is_some() {
            self.force_fold_checked(seat, &mut events)?;
            self.drive_bots(&mut events);
        }

        let player = self.table.seats[seat as usize]
            .take()
            .ok_or(EngineError::EmptySeat)?;
        let stack = player.stack;
        if !player.is_bot() {
            if let Err(e) = self.ledger.credit(player_id, stack) {
                warn!(
                    "table {}: credit {} to player {} failed: {e}",
                    self.table.id, stack, player_id
                );
            }
        }

        info!(
            "table {}: player {} left seat {} with {}",
            self.table.id, player_id, seat, stack
        );
        events.push(self.seats_updated_event());
        Ok((stack, events))
    }

    /// Sit out (disconnect): участник живой раздачи фолдится, место и стек
    /// сохраняются, новые раздачи пропускаются до resume или leave.
    pub fn sit_out(&mut self, player_id: PlayerId) -> Result<Vec<TableEvent>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::NotSeated(player_id))?;

        let mut events = Vec::new();
        let in_hand = self
            .table
            .player(seat)
            .map(|p| p.is_in_hand())
            .unwrap_or(false);
        if in_hand && self.engine.is_some() {
            self.force_fold_checked(seat, &mut events)?;
            self.drive_bots(&mut events);
        }

        if let Some(p) = self.table.player_mut(seat) {
            if !matches!(p.status, PlayerStatus::Busted) {
                p.status = PlayerStatus::SittingOut;
            }
        }

        events.push(self.seats_updated_event());
        Ok(events)
    }

    /// Возврат после sit out: со следующей раздачи игрок снова в игре.
    pub fn resume(&mut self, player_id: PlayerId) -> Result<Vec<TableEvent>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::NotSeated(player_id))?;
        let in_progress = self.table.hand_in_progress;

        let player = self.table.player_mut(seat).ok_or(EngineError::EmptySeat)?;
        if !matches!(player.status, PlayerStatus::SittingOut) {
            return Err(EngineError::IllegalAction);
        }
        player.status = if in_progress {
            PlayerStatus::Folded
        } else {
            PlayerStatus::Active
        };

        Ok(vec![self.seats_updated_event()])
    }

    /// Действие человека. После него автоматически доигрываются ходы
    /// виртуальных игроков вплоть до следующего хода человека или конца
    /// раздачи.
    pub fn act(
        &mut self,
        player_id: PlayerId,
        kind: PlayerActionKind,
    ) -> Result<Vec<TableEvent>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::NotSeated(player_id))?;
        if self.engine.is_none() {
            return Err(EngineError::NoActiveHand);
        }

        let mut events = Vec::new();
        self.apply_checked(
            PlayerAction {
                player_id,
                seat,
                kind,
            },
            &mut events,
        )?;
        self.drive_bots(&mut events);
        Ok(events)
    }

    /// Текущий актёр не уложился в дедлайн: подставляется check/fold.
    pub fn timeout_current_actor(&mut self) -> Result<Vec<TableEvent>, EngineError> {
        let action = {
            let engine = self.engine.as_mut().ok_or(EngineError::NoActiveHand)?;
            let action = default_action(&self.table, engine).ok_or(EngineError::NoActiveHand)?;
            let player = self
                .table
                .player(action.seat)
                .ok_or(EngineError::EmptySeat)?;
            // Запись в историю — только для действия, которое точно будет
            // принято: отклонённый таймаут не должен оставлять в ней след.
            validate_action(player, &action.kind, &engine.betting)?;
            engine.history.push(HandEventKind::PlayerTimedOut {
                seat: action.seat,
                action: action.kind,
            });
            action
        };
        warn!(
            "table {}: seat {} timed out, defaulting to {:?}",
            self.table.id, action.seat, action.kind
        );

        let mut events = vec![TableEvent::PlayerTimedOut {
            seat: action.seat,
            default_action: action.kind,
        }];
        self.apply_checked(action, &mut events)?;
        self.drive_bots(&mut events);
        Ok(events)
    }

    /// Запустить раздачу, если стол к ней готов (две и более готовых
    /// к игре позиции). Ходы виртуальных игроков доигрываются сразу.
    pub fn start_hand_if_ready(&mut self) -> Result<Option<Vec<TableEvent>>, EngineError> {
        if self.table.hand_in_progress {
            return Ok(None);
        }
        if self.playable_count() < 2 {
            return Ok(None);
        }

        let hand_id = self.hand_ids.next_id();
        match start_hand(&mut self.table, &mut self.rng, hand_id) {
            Ok((engine, mut events)) => {
                self.engine = Some(engine);
                self.drive_bots(&mut events);
                Ok(Some(events))
            }
            Err(EngineError::NotEnoughPlayers) => Ok(None),
            Err(e) => {
                // Старт сорвался после постинга блайндов: возвращаем взносы
                // и приводим стол в состояние "раздача не идёт".
                warn!("table {}: hand start failed: {e}", self.table.id);
                self.recover_failed_start();
                Err(e)
            }
        }
    }

    /// Снимок мест для событий SeatsUpdated (карманные карты не входят).
    pub fn seat_infos(&self) -> Vec<SeatInfo> {
        self.table
            .seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| {
                s.as_ref().map(|p| SeatInfo {
                    seat: idx as SeatIndex,
                    player_id: p.player_id,
                    name: p.name.clone(),
                    stack: p.stack,
                    status: p.status,
                    is_bot: p.is_bot(),
                })
            })
            .collect()
    }

    fn seats_updated_event(&self) -> TableEvent {
        TableEvent::SeatsUpdated {
            seats: self.seat_infos(),
        }
    }

    /// Есть ли за столом человек, готовый к игре. Runtime не стартует
    /// раздачи на столах из одних виртуальных игроков.
    pub fn has_playable_human(&self) -> bool {
        self.table.seats.iter().flatten().any(|p| {
            !p.is_bot()
                && !p.stack.is_zero()
                && !matches!(p.status, PlayerStatus::SittingOut)
        })
    }

    fn playable_count(&self) -> usize {
        self.table
            .seats
            .iter()
            .flatten()
            .filter(|p| !p.stack.is_zero() && !matches!(p.status, PlayerStatus::SittingOut))
            .count()
    }

    fn position_ratio(&self, seat: SeatIndex) -> f64 {
        let button = self.table.dealer_button.unwrap_or(0);
        let order = collect_hand_seats_from(&self.table, (button + 1) % self.table.max_seats());
        match order.iter().position(|&s| s == seat) {
            Some(idx) if order.len() > 1 => idx as f64 / (order.len() - 1) as f64,
            _ => 1.0,
        }
    }

    /// Пока ходит виртуальный игрок — решаем и применяем его действие.
    /// decide() гарантированно выдаёт легальное действие, так что отказ
    /// движка здесь означает баг: раздача абортируется с возвратом взносов.
    fn drive_bots(&mut self, events: &mut Vec<TableEvent>) {
        loop {
            let action = match self.next_bot_action() {
                Some(a) => a,
                None => return,
            };
            if let Err(e) = self.apply_checked(action, events) {
                warn!(
                    "table {}: bot action rejected ({e}), aborting hand",
                    self.table.id
                );
                let internal = EngineError::Internal("отклонено действие виртуального игрока");
                if let Some(mut engine) = self.engine.take() {
                    events.extend(abort_hand(&mut self.table, &mut engine, &internal));
                    events.push(self.seats_updated_event());
                }
                return;
            }
        }
    }

    fn next_bot_action(&mut self) -> Option<PlayerAction> {
        let engine = self.engine.as_ref()?;
        let seat = engine.current_actor?;
        let player = self.table.player(seat)?;
        let tier = player.bot?;

        let position_ratio = self.position_ratio(seat);
        let legal = legal_actions(player, &engine.betting);
        let ctx = DecisionContext {
            tier,
            hole: &player.hole_cards,
            board: &self.table.board,
            street: self.table.street,
            pot: engine.pot.total,
            stack: player.stack,
            current_bet: engine.betting.current_bet,
            round_bet: player.round_bet,
            min_raise: engine.betting.min_raise,
            position_ratio,
            legal,
        };
        let kind = decide(&ctx, &mut self.rng);

        Some(PlayerAction {
            player_id: player.player_id,
            seat,
            kind,
        })
    }

    fn apply_checked(
        &mut self,
        action: PlayerAction,
        events: &mut Vec<TableEvent>,
    ) -> Result<(), EngineError> {
        let result = {
            let engine = self.engine.as_mut().ok_or(EngineError::NoActiveHand)?;
            apply_action(&mut self.table, engine, action)
        };
        self.handle_result(result, events)
    }

    fn force_fold_checked(
        &mut self,
        seat: SeatIndex,
        events: &mut Vec<TableEvent>,
    ) -> Result<(), EngineError> {
        let result = {
            let engine = self.engine.as_mut().ok_or(EngineError::NoActiveHand)?;
            force_fold(&mut self.table, engine, seat)
        };
        self.handle_result(result, events)
    }

    /// Единая обработка исхода действия: завершение раздачи с записью,
    /// аборт при фатальной ошибке движка, клиентские ошибки — наверх.
    fn handle_result(
        &mut self,
        result: Result<(HandStatus, Vec<TableEvent>), EngineError>,
        events: &mut Vec<TableEvent>,
    ) -> Result<(), EngineError> {
        match result {
            Ok((HandStatus::Ongoing, evs)) => {
                events.extend(evs);
                Ok(())
            }
            Ok((HandStatus::Finished(summary), evs)) => {
                events.extend(evs);
                self.finish_hand(summary, events);
                Ok(())
            }
            Err(e @ (EngineError::DeckExhausted | EngineError::Internal(_))) => {
                if let Some(mut engine) = self.engine.take() {
                    events.extend(abort_hand(&mut self.table, &mut engine, &e));
                }
                events.push(self.seats_updated_event());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Завершение раздачи: неизменяемая запись в хранилище и снимок мест.
    fn finish_hand(&mut self, summary: HandSummary, events: &mut Vec<TableEvent>) {
        if let Some(engine) = self.engine.take() {
            let payouts: Vec<PotPayout> = summary
                .results
                .iter()
                .filter(|r| !r.won.is_zero())
                .map(|r| PotPayout {
                    seat: r.seat,
                    amount: r.won,
                })
                .collect();

            let seats: Vec<SeatSnapshot> = self
                .table
                .seats
                .iter()
                .enumerate()
                .filter_map(|(idx, s)| {
                    s.as_ref().map(|p| SeatSnapshot {
                        seat: idx as SeatIndex,
                        player_id: p.player_id,
                        name: p.name.clone(),
                        stack_after: p.stack,
                        status: p.status,
                        is_bot: p.is_bot(),
                    })
                })
                .collect();

            self.store.append(HandRecord {
                table_id: self.table.id,
                hand_id: engine.hand_id,
                hand_number: self.table.hand_number,
                seats,
                history: engine.history,
                final_pots: engine.side_pots,
                payouts,
                settled_at_ms: now_ms(),
            });
        }

        self.last_summary = Some(summary);
        events.push(self.seats_updated_event());
    }

    /// Откат сорвавшегося старта раздачи: блайнды по стекам, флаги вниз.
    fn recover_failed_start(&mut self) {
        for seat_opt in self.table.seats.iter_mut() {
            if let Some(p) = seat_opt {
                p.stack += p.total_committed;
                p.total_committed = Chips::ZERO;
                p.round_bet = Chips::ZERO;
                p.hole_cards.clear();
            }
        }
        self.table.hand_in_progress = false;
        self.table.current_hand_id = None;
        self.table.board.clear();
        self.engine = None;
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
