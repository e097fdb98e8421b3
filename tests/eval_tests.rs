//! Тесты оценщика рук: канонический порядок категорий, тай-брейки,
//! wheel, выбор лучшей пятёрки из 6–7 карт.

use poker_tables::domain::card::Card;
use poker_tables::eval::{best_five, describe_hand, evaluate_best_hand, evaluate_cards, HandCategory};

/// Утилита: распарсить строку вида "Ah Kd 7c" в вектор карт.
fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace()
        .map(|c| c.parse().expect("валидная карта в тесте"))
        .collect()
}

fn category_of(s: &str) -> HandCategory {
    evaluate_cards(&cards(s)).category()
}

//
// ====================== КАТЕГОРИИ ======================
//

#[test]
fn categories_are_detected() {
    assert_eq!(category_of("Ah Kh Qh Jh Th"), HandCategory::StraightFlush);
    assert_eq!(category_of("9c 9d 9h 9s 2c"), HandCategory::FourOfAKind);
    assert_eq!(category_of("9c 9d 9h 2s 2c"), HandCategory::FullHouse);
    assert_eq!(category_of("Ah Jh 9h 5h 2h"), HandCategory::Flush);
    assert_eq!(category_of("9c 8d 7h 6s 5c"), HandCategory::Straight);
    assert_eq!(category_of("9c 9d 9h Ks 2c"), HandCategory::ThreeOfAKind);
    assert_eq!(category_of("9c 9d Kh Ks 2c"), HandCategory::TwoPair);
    assert_eq!(category_of("9c 9d Kh Qs 2c"), HandCategory::OnePair);
    assert_eq!(category_of("Ac 9d Kh Qs 2c"), HandCategory::HighCard);
}

/// Полный порядок категорий: каждая рука из корпуса строго сильнее следующей.
#[test]
fn category_ladder_is_strictly_ordered() {
    let ladder = [
        "Ah Kh Qh Jh Th", // royal flush
        "6h 5h 4h 3h 2h", // straight flush
        "9c 9d 9h 9s 2c", // quads
        "9c 9d 9h 2s 2c", // full house
        "Ah Jh 9h 5h 2h", // flush
        "9c 8d 7h 6s 5c", // straight
        "9c 9d 9h Ks 2c", // trips
        "9c 9d Kh Ks 2c", // two pair
        "9c 9d Kh Qs 2c", // pair
        "Ac 9d Kh Qs 2c", // high card
    ];

    for pair in ladder.windows(2) {
        let stronger = evaluate_cards(&cards(pair[0]));
        let weaker = evaluate_cards(&cards(pair[1]));
        assert!(
            stronger > weaker,
            "{} должна бить {}",
            pair[0],
            pair[1]
        );
    }
}

//
// ====================== ТАЙ-БРЕЙКИ ======================
//

/// Каре тузов с двойкой бьёт каре королей с дамой (пример из корпуса).
#[test]
fn quad_aces_beat_quad_kings() {
    let aces = evaluate_cards(&cards("As Ah Ad Ac 2s"));
    let kings = evaluate_cards(&cards("Ks Kh Kd Kc Qs"));
    assert!(aces > kings);
}

/// Wheel (A2345) — самый младший стрит: проигрывает стриту до шестёрки.
#[test]
fn wheel_is_lowest_straight() {
    let wheel = evaluate_cards(&cards("Ah 2c 3d 4s 5h"));
    let six_high = evaluate_cards(&cards("2c 3d 4s 5h 6d"));

    assert_eq!(wheel.category(), HandCategory::Straight);
    assert!(six_high > wheel, "стрит до 6 бьёт wheel");
}

/// Steel wheel (стрит-флаш до пятёрки) остаётся стрит-флашем
/// и проигрывает любому старшему стрит-флашу.
#[test]
fn steel_wheel_vs_higher_straight_flush() {
    let steel = evaluate_cards(&cards("Ah 2h 3h 4h 5h"));
    let six_high = evaluate_cards(&cards("2h 3h 4h 5h 6h"));

    assert_eq!(steel.category(), HandCategory::StraightFlush);
    assert!(six_high > steel);
}

/// Две одинаковые по силе руки в разных мастях равны (сплит банка).
#[test]
fn equal_hands_in_different_suits_tie() {
    let a = evaluate_cards(&cards("Ac Kc Qd Jh 9s"));
    let b = evaluate_cards(&cards("Ad Kd Qh Js 9c"));
    assert_eq!(a, b);
}

/// Кикеры сравниваются по убыванию: AK-пара тузов бьёт AQ-пару тузов.
#[test]
fn pair_kicker_decides() {
    let ak = evaluate_cards(&cards("Ac Ad Kh 7s 2c"));
    let aq = evaluate_cards(&cards("Ah As Qh 7d 2d"));
    assert!(ak > aq);
}

/// Два фулл-хауса: сначала сравнивается тройка, затем пара.
#[test]
fn full_house_trips_dominate() {
    let nines_full = evaluate_cards(&cards("9c 9d 9h As Ac"));
    let eights_full = evaluate_cards(&cards("8c 8d 8h Ks Kc"));
    assert!(nines_full > eights_full);

    let nines_over_kings = evaluate_cards(&cards("9c 9d 9h Ks Kc"));
    assert!(nines_full > nines_over_kings, "при равных тройках решает пара");
}

/// Два флаша сравниваются лексикографически по убыванию рангов.
#[test]
fn flush_tiebreak_by_ranks() {
    let ace_high = evaluate_cards(&cards("Ah Jh 9h 5h 2h"));
    let king_high = evaluate_cards(&cards("Kd Qd 9d 5d 2d"));
    assert!(ace_high > king_high);

    let ace_high_lower = evaluate_cards(&cards("Ah Jh 9h 4h 2h"));
    assert!(ace_high > ace_high_lower, "решает четвёртая карта");
}

//
// ====================== 6–7 КАРТ ======================
//

/// Из 7 карт выбирается лучшая пятёрка: пара на борде + пара в руке = две пары.
#[test]
fn best_five_from_seven_cards() {
    let hole = cards("Ah Ad");
    let board = cards("Kc Kd 7h 4s 2c");

    let rank = evaluate_best_hand(&hole, &board);
    assert_eq!(rank.category(), HandCategory::TwoPair);
}

/// Стрит, собранный поперёк hole и board.
#[test]
fn straight_across_hole_and_board() {
    let hole = cards("9c 8d");
    let board = cards("7h 6s 5c Kd 2h");

    let rank = evaluate_best_hand(&hole, &board);
    assert_eq!(rank.category(), HandCategory::Straight);
}

/// best_five возвращает именно те 5 карт, из которых собран ранг.
#[test]
fn best_five_returns_winning_cards() {
    let seven = cards("Ah Ad Kc Kd 7h 4s 2c");
    let (rank, five) = best_five(&seven);

    assert_eq!(rank.category(), HandCategory::TwoPair);
    assert_eq!(five.len(), 5);
    // Обе пары обязаны войти в пятёрку.
    let shown: Vec<String> = five.iter().map(|c| c.to_string()).collect();
    for needed in ["Ah", "Ad", "Kc", "Kd"] {
        assert!(shown.contains(&needed.to_string()), "в пятёрке нет {needed}");
    }
}

/// Лишние карты не улучшают ранг: 5, 6 и 7 карт с одним и тем же
/// лучшим подмножеством дают один ранг.
#[test]
fn extra_cards_do_not_change_rank() {
    let five = evaluate_cards(&cards("Ah Kh Qh Jh Th"));
    let six = evaluate_cards(&cards("Ah Kh Qh Jh Th 2c"));
    let seven = evaluate_cards(&cards("Ah Kh Qh Jh Th 2c 3d"));

    assert_eq!(five, six);
    assert_eq!(six, seven);
}

#[test]
fn describe_hand_names_category() {
    let rank = evaluate_cards(&cards("Ah Kh Qh Jh Th"));
    assert_eq!(describe_hand(rank), "Straight flush");

    let rank = evaluate_cards(&cards("9c 9d Kh Qs 2c"));
    assert_eq!(describe_hand(rank), "One pair");
}
