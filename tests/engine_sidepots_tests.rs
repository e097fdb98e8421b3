//! Side pots и расчёт выплат.
//!
//! Проверяем:
//! - формирование main/side pots из взносов (включая сфолдивших);
//! - состав eligible_seats;
//! - сплит банка и неделимый остаток;
//! - возврат неуравненной ставки через банк с единственным претендентом.

use std::collections::HashMap;

use poker_tables::domain::chips::Chips;
use poker_tables::domain::hand::HandRank;
use poker_tables::domain::player::{PlayerAtTable, PlayerStatus};
use poker_tables::domain::table::{Table, TableConfig, TableStakes};
use poker_tables::domain::SeatIndex;
use poker_tables::engine::side_pots::{compute_side_pots, settle_pots, SidePot};

fn make_config() -> TableConfig {
    TableConfig::new(6, TableStakes::new(Chips::new(10), Chips::new(20)))
}

/// Утилита: стол с игроками (seat, committed, folded).
/// У всех нулевой остаток стека — для расчёта банков он не важен.
fn table_with_commitments(entries: &[(SeatIndex, u64, bool)]) -> Table {
    let mut table = Table::new(1, "Side pots".to_string(), make_config());
    table.dealer_button = Some(0);
    for &(seat, committed, folded) in entries {
        let mut p = PlayerAtTable::human(100 + seat as u64, format!("p{seat}"), Chips::ZERO);
        p.total_committed = Chips::new(committed);
        p.status = if folded {
            PlayerStatus::Folded
        } else {
            PlayerStatus::AllIn
        };
        table.seats[seat as usize] = Some(p);
    }
    table
}

fn pot_info(p: &SidePot) -> (u64, Vec<SeatIndex>) {
    let mut seats = p.eligible_seats.clone();
    seats.sort_unstable();
    (p.amount.0, seats)
}

fn ranks_of(pairs: &[(SeatIndex, u32)]) -> HashMap<SeatIndex, HandRank> {
    pairs.iter().map(|&(s, r)| (s, HandRank(r))).collect()
}

//
// ====================== ПОСТРОЕНИЕ БАНКОВ ======================
//

/// Два игрока с равными взносами — один общий банк.
#[test]
fn equal_commitments_single_pot() {
    let table = table_with_commitments(&[(0, 100, false), (1, 100, false)]);

    let pots = compute_side_pots(&table);
    assert_eq!(pots.len(), 1);
    assert_eq!(pot_info(&pots[0]), (200, vec![0, 1]));
}

/// Канонический случай: A=100, B=50 (all-in), C=200.
/// B претендует только на нижний слой 150 (50 × 3); всего 350.
#[test]
fn short_all_in_creates_side_pots() {
    let table = table_with_commitments(&[(0, 100, false), (1, 50, false), (2, 200, false)]);

    let pots = compute_side_pots(&table);
    assert_eq!(pots.len(), 3, "три уровня взносов — три банка");

    assert_eq!(pot_info(&pots[0]), (150, vec![0, 1, 2]));
    assert_eq!(pot_info(&pots[1]), (100, vec![0, 2]));
    // Неуравненные 100 от C — банк с единственным претендентом:
    // фактически возврат ставки.
    assert_eq!(pot_info(&pots[2]), (100, vec![2]));

    let total: u64 = pots.iter().map(|p| p.amount.0).sum();
    assert_eq!(total, 350, "ни одна фишка не теряется");
}

/// Взносы сфолдившего финансируют банки, но в eligible он не входит.
#[test]
fn folded_chips_fund_pots_without_eligibility() {
    let table = table_with_commitments(&[(0, 100, false), (1, 100, true), (2, 100, false)]);

    let pots = compute_side_pots(&table);
    assert_eq!(pots.len(), 1);
    assert_eq!(pot_info(&pots[0]), (300, vec![0, 2]));
}

/// Сфолдивший внёс больше всех живых: хвост его взноса не теряется,
/// а доливается в верхний банк.
#[test]
fn folded_overcommit_tail_goes_to_top_pot() {
    let table = table_with_commitments(&[(0, 50, false), (1, 80, true)]);

    let pots = compute_side_pots(&table);
    assert_eq!(pots.len(), 1);
    // 50 + 50 по уровню + 30 хвоста сфолдившего.
    assert_eq!(pot_info(&pots[0]), (130, vec![0]));
}

/// Четыре игрока, попарно равные взносы — два слоя.
#[test]
fn paired_commitments_two_layers() {
    let table = table_with_commitments(&[
        (0, 100, false),
        (1, 100, false),
        (2, 300, false),
        (3, 300, false),
    ]);

    let pots = compute_side_pots(&table);
    assert_eq!(pots.len(), 2);
    assert_eq!(pot_info(&pots[0]), (400, vec![0, 1, 2, 3]));
    assert_eq!(pot_info(&pots[1]), (400, vec![2, 3]));
}

#[test]
fn no_commitments_no_pots() {
    let table = table_with_commitments(&[]);
    assert!(compute_side_pots(&table).is_empty());
}

//
// ====================== РАСЧЁТ ВЫПЛАТ ======================
//

/// Лучший ранг забирает банк целиком.
#[test]
fn settle_single_winner_takes_pot() {
    let table = table_with_commitments(&[(0, 100, false), (1, 100, false)]);
    let pots = compute_side_pots(&table);
    let ranks = ranks_of(&[(0, 500), (1, 900)]);

    let payouts = settle_pots(&table, &pots, &ranks);
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].seat, 1);
    assert_eq!(payouts[0].amount, Chips::new(200));
}

/// Сплит: равные ранги делят банк поровну.
#[test]
fn settle_split_pot_evenly() {
    let table = table_with_commitments(&[(0, 100, false), (1, 100, false)]);
    let pots = compute_side_pots(&table);
    let ranks = ranks_of(&[(0, 700), (1, 700)]);

    let payouts = settle_pots(&table, &pots, &ranks);
    let total: u64 = payouts.iter().map(|p| p.amount.0).sum();
    assert_eq!(total, 200);
    assert_eq!(payouts.len(), 2);
    assert!(payouts.iter().all(|p| p.amount == Chips::new(100)));
}

/// Неделимый остаток уходит победителю, ближайшему по кругу слева
/// от кнопки (кнопка на месте 0 — значит, место 1 раньше места 0).
#[test]
fn settle_odd_chip_goes_to_earliest_position() {
    let table = table_with_commitments(&[(0, 67, false), (1, 67, false), (2, 67, false)]);
    let pots = compute_side_pots(&table);
    // Банк 201 делят двое: 100 + 100 и один неделимый остаток.
    let ranks = ranks_of(&[(0, 700), (1, 700), (2, 100)]);

    let payouts = settle_pots(&table, &pots, &ranks);
    let total: u64 = payouts.iter().map(|p| p.amount.0).sum();
    assert_eq!(total, 201);

    let by_seat: HashMap<SeatIndex, u64> =
        payouts.iter().map(|p| (p.seat, p.amount.0)).collect();
    assert_eq!(by_seat[&1], 101, "остаток — левому соседу кнопки");
    assert_eq!(by_seat[&0], 100);
    assert!(!by_seat.contains_key(&2));
}

/// Side pot уходит сильнейшему среди его eligible, даже если за столом
/// есть рука сильнее, не претендующая на этот банк.
#[test]
fn settle_side_pot_ignores_ineligible_hands() {
    let table = table_with_commitments(&[(0, 100, false), (1, 50, false), (2, 200, false)]);
    let pots = compute_side_pots(&table);
    // B (место 1) — сильнейшая рука, но претендует только на нижний банк.
    let ranks = ranks_of(&[(0, 800), (1, 900), (2, 100)]);

    let payouts = settle_pots(&table, &pots, &ranks);
    let by_seat: HashMap<SeatIndex, u64> =
        payouts.iter().map(|p| (p.seat, p.amount.0)).collect();

    assert_eq!(by_seat[&1], 150, "B забирает только main pot");
    assert_eq!(by_seat[&0], 100, "side pot — лучшему из A и C");
    assert_eq!(by_seat[&2], 100, "неуравненная ставка возвращается C");

    let total: u64 = payouts.iter().map(|p| p.amount.0).sum();
    assert_eq!(total, 350);
}

/// Без рангов (fold до шоудауна) банк с единственным претендентом
/// уходит ему.
#[test]
fn settle_without_ranks_pays_sole_claimant() {
    let table = table_with_commitments(&[(0, 60, true), (1, 60, false)]);
    let pots = compute_side_pots(&table);

    let payouts = settle_pots(&table, &pots, &HashMap::new());
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].seat, 1);
    assert_eq!(payouts[0].amount, Chips::new(120));
}
