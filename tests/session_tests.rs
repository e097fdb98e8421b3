//! Тесты TableSession: посадка/уход через леджер, виртуальные игроки,
//! таймауты, sit out и запись завершённых раздач в хранилище.

use std::sync::{Arc, Mutex};

use poker_tables::domain::chips::Chips;
use poker_tables::domain::player::{BotTier, PlayerStatus};
use poker_tables::domain::table::{TableConfig, TableStakes};
use poker_tables::domain::PlayerId;
use poker_tables::engine::errors::EngineError;
use poker_tables::engine::hand_history::{HandEventKind, HandRecord};
use poker_tables::engine::{PlayerActionKind, TableSession};
use poker_tables::infra::{
    DeterministicRng, HandRecordStore, InMemoryHandStore, InMemoryLedger, Ledger, LedgerError,
};

/// Обёртка над леджером с общим доступом: тест сохраняет клон
/// и смотрит балансы после операций сессии.
#[derive(Clone, Default)]
struct SharedLedger(Arc<Mutex<InMemoryLedger>>);

impl SharedLedger {
    fn with_balance(self, player_id: PlayerId, amount: Chips) -> Self {
        self.0.lock().unwrap().deposit(player_id, amount);
        self
    }

    fn balance(&self, player_id: PlayerId) -> Option<Chips> {
        self.0.lock().unwrap().balance(player_id).ok()
    }
}

impl Ledger for SharedLedger {
    fn balance(&self, player_id: PlayerId) -> Result<Chips, LedgerError> {
        self.0.lock().unwrap().balance(player_id)
    }

    fn debit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError> {
        self.0.lock().unwrap().debit(player_id, amount)
    }

    fn credit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError> {
        self.0.lock().unwrap().credit(player_id, amount)
    }
}

/// Аналогичная обёртка над хранилищем записей раздач.
#[derive(Clone, Default)]
struct SharedStore(Arc<Mutex<InMemoryHandStore>>);

impl SharedStore {
    fn records(&self, table_id: u64) -> Vec<HandRecord> {
        self.0.lock().unwrap().list(table_id)
    }
}

impl HandRecordStore for SharedStore {
    fn append(&mut self, record: HandRecord) {
        self.0.lock().unwrap().append(record);
    }

    fn list(&self, table_id: u64) -> Vec<HandRecord> {
        self.0.lock().unwrap().list(table_id)
    }
}

fn make_config(max_seats: u8) -> TableConfig {
    TableConfig::new(max_seats, TableStakes::new(Chips::new(10), Chips::new(20)))
}

fn make_session(
    max_seats: u8,
    seed: u64,
    ledger: SharedLedger,
    store: SharedStore,
) -> TableSession<DeterministicRng> {
    TableSession::new(
        1,
        "Session".to_string(),
        make_config(max_seats),
        DeterministicRng::from_u64(seed),
        Box::new(ledger),
        Box::new(store),
    )
}

/// Доиграть текущую раздачу: человек всегда фолдит, боты ходят сами.
/// Возвращает число шагов (страховка от зависания).
fn play_out_hand(session: &mut TableSession<DeterministicRng>, human_id: PlayerId) -> usize {
    let mut steps = 0;
    while session.hand_in_progress() {
        steps += 1;
        assert!(steps < 100, "раздача не завершается");
        match session.awaiting_human() {
            Some(_) => {
                session.act(human_id, PlayerActionKind::Fold).expect("fold");
            }
            None => {
                // Ход человека не ожидается, а раздача идёт — только таймаут
                // мог бы сдвинуть её; в тестах это не должно случаться.
                panic!("раздача зависла без текущего актёра");
            }
        }
    }
    steps
}

//
// ====================== ПОСАДКА И УХОД ======================
//

/// Join дебетует бай-ин, leave кредитует финальный стек.
#[test]
fn join_and_leave_move_chips_through_ledger() {
    let ledger = SharedLedger::default().with_balance(1, Chips::new(1000));
    let store = SharedStore::default();
    let mut session = make_session(6, 1, ledger.clone(), store);

    let (seat, _) = session.join(1, "alice".to_string(), Chips::new(400)).expect("join");
    assert_eq!(seat, 0);
    assert_eq!(ledger.balance(1), Some(Chips::new(600)), "бай-ин списан");
    assert_eq!(session.table().seated_count(), 1);

    let (stack, _) = session.leave(1).expect("leave");
    assert_eq!(stack, Chips::new(400), "стек не менялся");
    assert_eq!(ledger.balance(1), Some(Chips::new(1000)), "стек вернулся");
    assert_eq!(session.table().seated_count(), 0);
}

#[test]
fn join_rejects_insufficient_balance() {
    let ledger = SharedLedger::default().with_balance(1, Chips::new(100));
    let mut session = make_session(6, 1, ledger.clone(), SharedStore::default());

    let err = session
        .join(1, "alice".to_string(), Chips::new(500))
        .expect_err("баланса не хватает");
    assert_eq!(err, EngineError::InsufficientBalance(1));
    assert_eq!(ledger.balance(1), Some(Chips::new(100)), "ничего не списано");
}

#[test]
fn join_rejects_double_seating_and_full_table() {
    let ledger = SharedLedger::default()
        .with_balance(1, Chips::new(1000))
        .with_balance(2, Chips::new(1000))
        .with_balance(3, Chips::new(1000));
    let mut session = make_session(2, 1, ledger, SharedStore::default());

    session.join(1, "a".to_string(), Chips::new(100)).expect("join 1");
    let err = session
        .join(1, "a".to_string(), Chips::new(100))
        .expect_err("уже сидит");
    assert_eq!(err, EngineError::AlreadySeated(1));

    session.join(2, "b".to_string(), Chips::new(100)).expect("join 2");
    let err = session
        .join(3, "c".to_string(), Chips::new(100))
        .expect_err("мест нет");
    assert_eq!(err, EngineError::TableFull);
}

#[test]
fn leave_unknown_player_rejected() {
    let mut session = make_session(6, 1, SharedLedger::default(), SharedStore::default());
    let err = session.leave(42).expect_err("никто не садился");
    assert_eq!(err, EngineError::NotSeated(42));
}

//
// ====================== ВИРТУАЛЬНЫЕ ИГРОКИ ======================
//

/// Боты получают отдельный диапазон id и флаг is_bot в снимке мест.
#[test]
fn virtual_players_are_marked_and_funded_without_ledger() {
    let ledger = SharedLedger::default();
    let mut session = make_session(6, 1, ledger, SharedStore::default());

    let (seat_a, _) = session
        .add_virtual_player(BotTier::Beginner, Chips::new(500))
        .expect("бот 1");
    let (seat_b, _) = session
        .add_virtual_player(BotTier::Pro, Chips::new(500))
        .expect("бот 2");
    assert_ne!(seat_a, seat_b);

    let infos = session.seat_infos();
    assert_eq!(infos.len(), 2);
    assert!(infos.iter().all(|s| s.is_bot));
    assert_ne!(infos[0].player_id, infos[1].player_id);
}

/// Человек + два бота: раздача доигрывается, запись попадает в хранилище,
/// фишки за столом сохраняются.
#[test]
fn full_hand_with_bots_is_recorded() {
    let ledger = SharedLedger::default().with_balance(1, Chips::new(2000));
    let store = SharedStore::default();
    let mut session = make_session(6, 42, ledger, store.clone());

    session.join(1, "alice".to_string(), Chips::new(1000)).expect("join");
    session
        .add_virtual_player(BotTier::Intermediate, Chips::new(1000))
        .expect("бот 1");
    session
        .add_virtual_player(BotTier::Expert, Chips::new(1000))
        .expect("бот 2");

    let chips_before = session.table().total_chips();
    let events = session.start_hand_if_ready().expect("старт").expect("готов");
    assert!(!events.is_empty());

    play_out_hand(&mut session, 1);

    assert_eq!(session.table().total_chips(), chips_before, "фишки сохранились");
    assert!(session.last_summary().is_some());

    let records = store.records(1);
    assert_eq!(records.len(), 1, "одна запись на раздачу");
    let record = &records[0];
    assert_eq!(record.hand_number, 1);
    assert_eq!(record.seats.len(), 3);
    assert!(!record.history.events.is_empty());
}

//
// ====================== ТАЙМАУТ И SIT OUT ======================
//

/// Два человека: таймауты двигают раздачу до конца без единого действия.
#[test]
fn timeouts_drive_hand_to_completion() {
    let ledger = SharedLedger::default()
        .with_balance(1, Chips::new(1000))
        .with_balance(2, Chips::new(1000));
    let store = SharedStore::default();
    let mut session = make_session(6, 9, ledger, store.clone());

    session.join(1, "a".to_string(), Chips::new(500)).expect("join 1");
    session.join(2, "b".to_string(), Chips::new(500)).expect("join 2");
    session.start_hand_if_ready().expect("старт").expect("готов");

    let mut steps = 0;
    while session.hand_in_progress() {
        steps += 1;
        assert!(steps < 50, "таймауты не завершают раздачу");
        session.timeout_current_actor().expect("таймаут");
    }

    assert_eq!(store.records(1).len(), 1);
    assert_eq!(session.table().total_chips(), Chips::new(1000));
}

/// Запись о таймауте появляется в истории только парой с реально
/// применённым действием по умолчанию.
#[test]
fn timeout_history_matches_applied_default() {
    let ledger = SharedLedger::default()
        .with_balance(1, Chips::new(1000))
        .with_balance(2, Chips::new(1000));
    let store = SharedStore::default();
    let mut session = make_session(6, 9, ledger, store.clone());

    session.join(1, "a".to_string(), Chips::new(500)).expect("join 1");
    session.join(2, "b".to_string(), Chips::new(500)).expect("join 2");
    session.start_hand_if_ready().expect("старт").expect("готов");

    // Хедз-ап, кнопка перед BB: дефолт — fold, раздача закончена.
    session.timeout_current_actor().expect("таймаут");
    assert!(!session.hand_in_progress());

    let records = store.records(1);
    assert_eq!(records.len(), 1);
    let events = &records[0].history.events;

    let positions: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e.kind, HandEventKind::PlayerTimedOut { .. }))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(positions.len(), 1, "ровно одна запись о таймауте");

    let at = positions[0];
    assert!(
        matches!(
            &events[at].kind,
            HandEventKind::PlayerTimedOut {
                seat: 0,
                action: PlayerActionKind::Fold,
            }
        ),
        "кнопка перед BB фолдит по таймауту: {:?}",
        events[at].kind
    );
    assert!(
        matches!(
            &events[at + 1].kind,
            HandEventKind::PlayerActed {
                seat: 0,
                action: PlayerActionKind::Fold,
                ..
            }
        ),
        "сразу за таймаутом идёт применённое действие: {:?}",
        events[at + 1].kind
    );
}

/// Sit out посреди раздачи: игрок фолдится, раздача завершается,
/// следующая не стартует (за столом один готовый к игре).
#[test]
fn sit_out_mid_hand_folds_and_blocks_next_hand() {
    let ledger = SharedLedger::default()
        .with_balance(1, Chips::new(1000))
        .with_balance(2, Chips::new(1000));
    let mut session = make_session(6, 9, ledger, SharedStore::default());

    session.join(1, "a".to_string(), Chips::new(500)).expect("join 1");
    session.join(2, "b".to_string(), Chips::new(500)).expect("join 2");
    session.start_hand_if_ready().expect("старт").expect("готов");

    // Хедз-ап: первым ходит кнопка (игрок 1). Его sit out = fold,
    // остаётся один претендент — раздача закончена.
    session.sit_out(1).expect("sit out");
    assert!(!session.hand_in_progress());

    let seat = session.table().seat_of(1).expect("место сохранилось");
    assert_eq!(
        session.table().player(seat).map(|p| p.status),
        Some(PlayerStatus::SittingOut)
    );

    assert!(
        session.start_hand_if_ready().expect("ок").is_none(),
        "для новой раздачи нужны двое готовых"
    );

    // Возврат в игру — следующая раздача снова возможна.
    session.resume(1).expect("resume");
    assert!(session.start_hand_if_ready().expect("ок").is_some());
}

/// Уход посреди раздачи: взносы остаются в банке, финальный стек
/// кредитуется без них.
#[test]
fn leave_mid_hand_forfeits_committed_chips() {
    let ledger = SharedLedger::default()
        .with_balance(1, Chips::new(1000))
        .with_balance(2, Chips::new(1000));
    let mut session = make_session(6, 9, ledger.clone(), SharedStore::default());

    session.join(1, "a".to_string(), Chips::new(500)).expect("join 1");
    session.join(2, "b".to_string(), Chips::new(500)).expect("join 2");
    session.start_hand_if_ready().expect("старт").expect("готов");

    // Игрок 1 — кнопка/SB в хедз-апе: в банке уже 10 его фишек.
    let (stack, _) = session.leave(1).expect("leave");
    assert_eq!(stack, Chips::new(490), "малый блайнд остался в банке");
    assert_eq!(ledger.balance(1), Some(Chips::new(990)));

    // Оставшийся забрал банк без шоудауна.
    assert!(!session.hand_in_progress());
    let seat2 = session.table().seat_of(2).expect("игрок 2 на месте");
    assert_eq!(
        session.table().player(seat2).map(|p| p.stack),
        Some(Chips::new(510))
    );
}

/// Действие вне раздачи отвергается типизированной ошибкой.
#[test]
fn act_without_active_hand_rejected() {
    let ledger = SharedLedger::default().with_balance(1, Chips::new(1000));
    let mut session = make_session(6, 1, ledger, SharedStore::default());
    session.join(1, "a".to_string(), Chips::new(500)).expect("join");

    let err = session.act(1, PlayerActionKind::Check).expect_err("раздачи нет");
    assert_eq!(err, EngineError::NoActiveHand);
}
