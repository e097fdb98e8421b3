//! Actor одного стола: владеет TableSession, последовательно применяет
//! команды из mpsc-канала и раздаёт события через broadcast.
//!
//! Вся конкурентность сервера сводится к этому паттерну: ни одного lock
//! на состоянии стола, любое обращение — команда в канал.

use log::{error, info, warn};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{sleep_until, Duration, Instant};

use crate::domain::chips::Chips;
use crate::domain::player::BotTier;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::LegalActions;
use crate::engine::errors::EngineError;
use crate::engine::events::{SeatInfo, TableEvent};
use crate::engine::session::TableSession;
use crate::engine::RandomSource;

/// Пауза между расчётом раздачи и стартом следующей.
const NEXT_HAND_DELAY: Duration = Duration::from_secs(2);

/// Ёмкость канала команд на стол.
const COMMAND_CHANNEL_CAPACITY: usize = 128;

/// Ёмкость broadcast-канала событий; отставший подписчик теряет старые
/// события (Lagged), но не тормозит стол.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Ключ хода человека: раздача, позиция в её истории и место актёра.
/// Новый ход — новый ключ, даже если подряд ходит одно и то же место.
type TurnKey = (HandId, u32, SeatIndex);

/// Команды actor'у стола. Каждая отвечает через oneshot.
pub enum TableCommand {
    Join {
        player_id: PlayerId,
        name: String,
        buy_in: Chips,
        reply: oneshot::Sender<Result<SeatIndex, EngineError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<Chips, EngineError>>,
    },
    AddVirtualPlayer {
        tier: BotTier,
        stack: Chips,
        reply: oneshot::Sender<Result<SeatIndex, EngineError>>,
    },
    Act {
        player_id: PlayerId,
        kind: PlayerActionKind,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    SitOut {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    Resume {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    LegalActions {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<LegalActions, EngineError>>,
    },
    Seats {
        reply: oneshot::Sender<Vec<SeatInfo>>,
    },
}

/// Хэндл стола: клонируемый, живёт у транспортного слоя.
/// Падение actor'а превращает все вызовы в TableNotFound.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table_id: TableId,
    commands_tx: mpsc::Sender<TableCommand>,
    events_tx: broadcast::Sender<TableEvent>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Подписка на события стола. Приватные CardsDealt транспортный слой
    /// обязан фильтровать по адресату (CardScope).
    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.events_tx.subscribe()
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        buy_in: Chips,
    ) -> Result<SeatIndex, EngineError> {
        self.request(|reply| TableCommand::Join {
            player_id,
            name,
            buy_in,
            reply,
        })
        .await
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<Chips, EngineError> {
        self.request(|reply| TableCommand::Leave { player_id, reply })
            .await
    }

    pub async fn add_virtual_player(
        &self,
        tier: BotTier,
        stack: Chips,
    ) -> Result<SeatIndex, EngineError> {
        self.request(|reply| TableCommand::AddVirtualPlayer { tier, stack, reply })
            .await
    }

    pub async fn act(
        &self,
        player_id: PlayerId,
        kind: PlayerActionKind,
    ) -> Result<(), EngineError> {
        self.request(|reply| TableCommand::Act {
            player_id,
            kind,
            reply,
        })
        .await
    }

    pub async fn sit_out(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.request(|reply| TableCommand::SitOut { player_id, reply })
            .await
    }

    pub async fn resume(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.request(|reply| TableCommand::Resume { player_id, reply })
            .await
    }

    pub async fn legal_actions(&self, player_id: PlayerId) -> Result<LegalActions, EngineError> {
        self.request(|reply| TableCommand::LegalActions { player_id, reply })
            .await
    }

    /// Публичный снимок мест (без карманных карт).
    pub async fn seats(&self) -> Result<Vec<SeatInfo>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::Seats { reply })
            .await
            .map_err(|_| EngineError::TableNotFound(self.table_id))?;
        rx.await.map_err(|_| EngineError::TableNotFound(self.table_id))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, EngineError>>) -> TableCommand,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.commands_tx
            .send(make(reply))
            .await
            .map_err(|_| EngineError::TableNotFound(self.table_id))?;
        rx.await
            .map_err(|_| EngineError::TableNotFound(self.table_id))?
    }
}

/// Запустить actor стола на tokio-рантайме.
pub fn spawn_table<R>(session: TableSession<R>) -> TableHandle
where
    R: RandomSource + Send + 'static,
{
    let table_id = session.table().id;
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

    let task = TableTask {
        session,
        commands_rx,
        events_tx: events_tx.clone(),
    };
    tokio::spawn(async move {
        task.run().await;
        info!("table {table_id}: actor stopped");
    });

    TableHandle {
        table_id,
        commands_tx,
        events_tx,
    }
}

struct TableTask<R: RandomSource> {
    session: TableSession<R>,
    commands_rx: mpsc::Receiver<TableCommand>,
    events_tx: broadcast::Sender<TableEvent>,
}

impl<R: RandomSource + Send + 'static> TableTask<R> {
    async fn run(mut self) {
        // Дедлайн привязан к конкретному ходу: каждый новый ход получает
        // свежий отсчёт, а команды, не меняющие хода, таймер не сбрасывают.
        let mut turn_deadline: Option<(TurnKey, Instant)> = None;
        // Отложенный старт следующей раздачи.
        let mut next_start: Option<Instant> = None;

        loop {
            self.rearm_turn_deadline(&mut turn_deadline);
            self.rearm_next_start(&mut next_start);

            let turn_at = turn_deadline.map(|(_, at)| at);
            let start_at = next_start;

            tokio::select! {
                cmd = self.commands_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        // Все хэндлы стола сброшены — стол закрывается.
                        None => break,
                    }
                }

                _ = sleep_until(turn_at.unwrap_or_else(Instant::now)), if turn_at.is_some() => {
                    turn_deadline = None;
                    match self.session.timeout_current_actor() {
                        Ok(events) => self.publish(events),
                        Err(e) => warn!(
                            "table {}: timeout handling failed: {e}",
                            self.session.table().id
                        ),
                    }
                }

                _ = sleep_until(start_at.unwrap_or_else(Instant::now)), if start_at.is_some() => {
                    next_start = None;
                    match self.session.start_hand_if_ready() {
                        Ok(Some(events)) => self.publish(events),
                        Ok(None) => {}
                        Err(e) => error!(
                            "table {}: hand start failed: {e}",
                            self.session.table().id
                        ),
                    }
                }
            }
        }
    }

    /// Таймер хода взводится только на человека: виртуальные игроки ходят
    /// мгновенно внутри сессии.
    fn rearm_turn_deadline(&self, slot: &mut Option<(TurnKey, Instant)>) {
        match self.session.human_turn_key() {
            None => *slot = None,
            Some(key) => {
                let armed_for = slot.map(|(k, _)| k);
                if armed_for != Some(key) {
                    let timeout =
                        Duration::from_secs(self.session.table().config.action_timeout_secs);
                    *slot = Some((key, Instant::now() + timeout));
                }
            }
        }
    }

    /// Столы из одних виртуальных игроков сами раздачи не запускают.
    fn rearm_next_start(&self, slot: &mut Option<Instant>) {
        if self.session.hand_in_progress() || !self.session.has_playable_human() {
            *slot = None;
        } else if slot.is_none() {
            *slot = Some(Instant::now() + NEXT_HAND_DELAY);
        }
    }

    fn handle_command(&mut self, cmd: TableCommand) {
        match cmd {
            TableCommand::Join {
                player_id,
                name,
                buy_in,
                reply,
            } => {
                let result = self.session.join(player_id, name, buy_in);
                let _ = reply.send(self.publish_ok(result));
            }
            TableCommand::Leave { player_id, reply } => {
                let result = self.session.leave(player_id);
                let _ = reply.send(self.publish_ok(result));
            }
            TableCommand::AddVirtualPlayer { tier, stack, reply } => {
                let result = self.session.add_virtual_player(tier, stack);
                let _ = reply.send(self.publish_ok(result));
            }
            TableCommand::Act {
                player_id,
                kind,
                reply,
            } => {
                let result = self.session.act(player_id, kind);
                let _ = reply.send(self.publish_ok(result.map(|evs| ((), evs))));
            }
            TableCommand::SitOut { player_id, reply } => {
                let result = self.session.sit_out(player_id);
                let _ = reply.send(self.publish_ok(result.map(|evs| ((), evs))));
            }
            TableCommand::Resume { player_id, reply } => {
                let result = self.session.resume(player_id);
                let _ = reply.send(self.publish_ok(result.map(|evs| ((), evs))));
            }
            TableCommand::LegalActions { player_id, reply } => {
                let _ = reply.send(self.session.legal_actions_for(player_id));
            }
            TableCommand::Seats { reply } => {
                let _ = reply.send(self.session.seat_infos());
            }
        }
    }

    /// Опубликовать события успешного исхода, вернуть полезную нагрузку.
    fn publish_ok<T>(
        &self,
        result: Result<(T, Vec<TableEvent>), EngineError>,
    ) -> Result<T, EngineError> {
        result.map(|(value, events)| {
            self.publish(events);
            value
        })
    }

    fn publish(&self, events: Vec<TableEvent>) {
        for event in events {
            // Err означает отсутствие подписчиков — это не ошибка стола.
            let _ = self.events_tx.send(event);
        }
    }
}
