//! End-to-end play sessions through the public `ClickerGame` surface.

use code_clicker::clicker::catalog::{BONUS_LIFETIME_TICKS, JUNIOR_DEV};
use code_clicker::clicker::state::BonusKind;
use code_clicker::clicker::ClickerGame;
use code_clicker::config::ClickerConfig;
use code_clicker::input::InputEvent;
use code_clicker::storage::{KeyValueStore, MemoryStore};

fn config(seed: u64) -> ClickerConfig {
    ClickerConfig {
        seed: Some(seed),
        ..ClickerConfig::default()
    }
}

fn new_game(store: MemoryStore) -> ClickerGame<MemoryStore> {
    ClickerGame::new(store, &config(7))
}

#[test]
fn first_purchase_is_saved_and_restored() {
    let mut game = new_game(MemoryStore::new());
    for _ in 0..50 {
        game.handle_input(&InputEvent::Key('c'));
    }
    assert_eq!(game.state().lines_of_code, 50.0);

    game.handle_input(&InputEvent::Key('1'));
    assert_eq!(game.state().upgrade_count(JUNIOR_DEV), 1);
    assert_eq!(game.state().upgrades[0].cost, 75);
    assert_eq!(game.store().get("linesOfCode").as_deref(), Some("0"));
    assert_eq!(game.store().get("bestScore").as_deref(), Some("50"));

    let restored = new_game(game.store().clone());
    assert_eq!(restored.state().upgrade_count(JUNIOR_DEV), 1);
    assert_eq!(restored.state().upgrades[0].cost, 75);
    assert_eq!(restored.state().best_score, 50.0);
    assert_eq!(restored.state().lines_of_code, 0.0);
}

#[test]
fn passive_income_accrues_per_second() {
    let store = MemoryStore::with_entries([(
        "upgrades",
        r#"[{"name":"Junior Dev","cost":75,"count":1}]"#,
    )]);
    let mut game = new_game(store);
    game.tick(19);
    assert_eq!(game.state().lines_of_code, 0.0);
    game.tick(1);
    assert_eq!(game.state().lines_of_code, 1.0);
    assert_eq!(game.store().get("linesOfCode").as_deref(), Some("1"));
}

#[test]
fn daily_streak_rewards_once() {
    let mut game = new_game(MemoryStore::new());
    for day in 20_000..20_003 {
        game.record_visit(day);
    }
    assert_eq!(game.state().streak_count, 3);

    game.handle_input(&InputEvent::Key('s'));
    assert_eq!(game.state().lines_of_code, 3_000.0);
    assert_eq!(game.store().get("lastStreakReward").as_deref(), Some("3"));

    assert!(game.claim_streak_reward().is_empty());
    assert_eq!(game.state().lines_of_code, 3_000.0);

    // A missed day starts over.
    game.record_visit(20_010);
    assert_eq!(game.state().streak_count, 1);
}

#[test]
fn refactor_resets_and_boosts() {
    let store = MemoryStore::with_entries([
        ("linesOfCode", "1000000"),
        ("bestScore", "1000000"),
        ("upgrades", r#"[{"name":"Junior Dev","cost":2883,"count":10}]"#),
        ("themeMode", "matrix"),
    ]);
    let mut game = new_game(store);
    game.handle_input(&InputEvent::Key('r'));

    let state = game.state();
    assert_eq!(state.refactor_points, 1);
    assert_eq!(state.lines_of_code, 0.0);
    assert_eq!(state.upgrades[0].count, 0);
    assert_eq!(state.upgrades[0].cost, 50);
    assert!((state.click_value() - 1.2).abs() < 1e-9);
    assert_eq!(game.store().get("refactorPoints").as_deref(), Some("1"));
    assert_eq!(game.store().get("themeMode").as_deref(), Some("default"));
    assert_eq!(game.store().get("bestScore").as_deref(), Some("1000000"));

    // Next refactor needs 3,000,000.
    assert!(game.perform_refactor().is_empty());
}

#[test]
fn leaderboard_entry_through_keyboard() {
    let mut game = new_game(MemoryStore::with_entries([("linesOfCode", "1234")]));
    game.handle_input(&InputEvent::Key('l'));
    for c in "grace".chars() {
        game.handle_input(&InputEvent::Key(c));
    }
    game.handle_input(&InputEvent::Enter);

    let restored = new_game(game.store().clone());
    assert_eq!(restored.state().leaderboard.len(), 1);
    assert_eq!(restored.state().leaderboard[0].name, "grace");
    assert_eq!(restored.state().leaderboard[0].score, 1234.0);
}

#[test]
fn long_session_keeps_bonus_invariants() {
    let mut game = new_game(MemoryStore::with_entries([("linesOfCode", "5000")]));
    for _ in 0..600 {
        game.tick(10);
        let state = game.state();
        for kind in [BonusKind::Loc, BonusKind::Multiplier, BonusKind::AutoClick] {
            assert!(state.bonuses.iter().filter(|b| b.kind == kind).count() <= 1);
        }
        for bonus in &state.bonuses {
            assert!(bonus.expires_at > state.now);
            assert!(bonus.expires_at <= state.now + BONUS_LIFETIME_TICKS);
        }
        if !state.bonuses.is_empty() {
            game.handle_input(&InputEvent::Key('g'));
        }
    }
    assert_eq!(game.state().now, 6_000);
}

#[test]
fn same_seed_same_session() {
    let run = |seed: u64| {
        let mut game = ClickerGame::new(
            MemoryStore::with_entries([("linesOfCode", "20000")]),
            &config(seed),
        );
        for _ in 0..300 {
            game.tick(20);
            game.collect_oldest_bonus();
            game.click();
        }
        (
            game.state().lines_of_code,
            game.state().log.len(),
            game.store().get("linesOfCode"),
        )
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn theme_toggle_persists() {
    let mut game = new_game(MemoryStore::new());
    game.handle_input(&InputEvent::Key('t'));
    let restored = new_game(game.store().clone());
    assert_eq!(restored.state().theme.as_str(), "light");
}

#[test]
fn tampered_upgrade_count_does_not_crash_purchase() {
    let store = MemoryStore::with_entries([
        ("linesOfCode", "1000"),
        (
            "upgrades",
            r#"[{"name":"Junior Dev","cost":50,"count":4294967295}]"#,
        ),
    ]);
    let mut game = new_game(store);
    assert_eq!(game.state().upgrade_count(JUNIOR_DEV), u32::MAX);

    assert!(game.buy_upgrade(0).is_empty());
    assert_eq!(game.state().upgrade_count(JUNIOR_DEV), u32::MAX);
    assert_eq!(game.state().lines_of_code, 1_000.0);
}

#[test]
fn tampered_last_visit_day_restarts_streak() {
    let store = MemoryStore::with_entries([
        ("lastVisitDay", "9223372036854775807"),
        ("streakCount", "5"),
    ]);
    let mut game = new_game(store);
    game.record_visit(20_000);
    assert_eq!(game.state().streak_count, 1);
    assert_eq!(game.store().get("lastVisitDay").as_deref(), Some("20000"));
}
