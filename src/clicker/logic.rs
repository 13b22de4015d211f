//! Code Clicker game logic: pure functions over `GameState`.
//!
//! Every operation returns the [`Changes`] it made. An empty result means the
//! call was silently ignored (not enough LOC, refactor not yet allowed, ...).

use rand::Rng;

use super::bonus;
use super::catalog::{
    self, AUTOCLICK_INTERVAL_TICKS, CLICK_MULTIPLIER, CODE_OPTIMIZER, COST_GROWTH,
    DARK_MATRIX_THEME, EFFECT_DURATION_TICKS, EVENT_INTERVAL_TICKS, FASTER_BONUS_ENGINE,
    LEADERBOARD_SIZE, PASSIVE_INTERVAL_TICKS,
};
use super::events;
use super::save::{Changes, StorageKey};
use super::state::{AchievementCondition, BonusKind, GameState, LeaderboardEntry, ThemeMode};

/// Add (or with a negative amount, remove) lines of code, tracking the best score.
pub(crate) fn add_lines(state: &mut GameState, amount: f64) -> Changes {
    let mut changes = Changes::none();
    if amount == 0.0 {
        return changes;
    }
    state.lines_of_code = (state.lines_of_code + amount).max(0.0);
    changes.mark(StorageKey::LinesOfCode);
    if state.lines_of_code > state.best_score {
        state.best_score = state.lines_of_code;
        changes.mark(StorageKey::BestScore);
    }
    changes
}

/// Manual click (or a synthetic one from auto-click).
pub fn click(state: &mut GameState) -> Changes {
    let multiplier = if state.multiplier_active() {
        CLICK_MULTIPLIER
    } else {
        1.0
    };
    let mut changes = add_lines(state, state.click_value() * multiplier);
    changes.merge(check_achievements(state));
    changes
}

/// Cost growth applied after buying `name`. Code Optimizer does not discount
/// its own growth.
pub fn growth_factor(state: &GameState, name: &str) -> f64 {
    if name == CODE_OPTIMIZER {
        COST_GROWTH
    } else {
        COST_GROWTH * state.cost_reduction()
    }
}

/// Try to buy one unit of the upgrade at `index`.
pub fn buy_upgrade(state: &mut GameState, index: usize) -> Changes {
    let Some(upgrade) = state.upgrades.get(index) else {
        return Changes::none();
    };
    let price = upgrade.cost;
    if state.lines_of_code < price as f64 {
        return Changes::none();
    }
    let Some(owned) = upgrade.count.checked_add(1) else {
        return Changes::none();
    };
    let name = upgrade.name.clone();

    let mut changes = add_lines(state, -(price as f64));
    let factor = growth_factor(state, &name);
    let upgrade = &mut state.upgrades[index];
    upgrade.count = owned;
    upgrade.cost = (price as f64 * factor).floor() as u64;
    changes.mark(StorageKey::Upgrades);
    state.add_log(&format!("Bought {} ({} owned)", name, owned), false);

    match name.as_str() {
        FASTER_BONUS_ENGINE => {
            restart_bonus_spawner(state);
        }
        DARK_MATRIX_THEME => {
            if state.theme_mode != ThemeMode::Matrix {
                state.theme_mode = ThemeMode::Matrix;
                changes.mark(StorageKey::ThemeMode);
                state.add_log("✦ Matrix mode engaged", true);
            }
        }
        _ => {}
    }

    changes.merge(check_achievements(state));
    changes
}

/// Reschedule the spawner from now using the current interval.
fn restart_bonus_spawner(state: &mut GameState) {
    state.next_bonus_at = state.now + state.bonus_interval_ticks();
    log::debug!(
        "bonus spawner restarted: every {}ms",
        state.bonus_interval_ms()
    );
}

/// Collect an on-screen bonus by id. Unknown or expired ids are ignored.
pub fn collect_bonus(state: &mut GameState, id: u32) -> Changes {
    let now = state.now;
    let Some(pos) = state
        .bonuses
        .iter()
        .position(|b| b.id == id && !b.is_expired(now))
    else {
        return Changes::none();
    };
    let bonus = state.bonuses.remove(pos);

    let mut changes = Changes::none();
    changes.touch();
    match bonus.kind {
        BonusKind::Loc => {
            changes.merge(add_lines(state, bonus.value));
            state.add_log(&format!("✦ Bonus: {}", bonus.label), true);
        }
        BonusKind::Multiplier => {
            state.multiplier_until = Some(extend_effect(state.multiplier_until, now));
            state.add_log("⚡ x2 Clicks for 10 seconds!", true);
        }
        BonusKind::AutoClick => {
            if !state.autoclick_active() {
                state.next_autoclick_at = now + AUTOCLICK_INTERVAL_TICKS;
            }
            state.autoclick_until = Some(extend_effect(state.autoclick_until, now));
            state.add_log("⚡ Auto Click for 10 seconds!", true);
        }
    }
    changes.merge(check_achievements(state));
    changes
}

/// New expiry for a re-triggered timed effect: never earlier than the
/// current one.
fn extend_effect(current: Option<u64>, now: u64) -> u64 {
    let fresh = now + EFFECT_DURATION_TICKS;
    match current {
        Some(until) if until > fresh => until,
        _ => fresh,
    }
}

/// Prestige reset. Requires best score ≥ the next refactor threshold.
pub fn perform_refactor(state: &mut GameState) -> Changes {
    if !state.can_refactor() {
        return Changes::none();
    }

    state.refactor_points = state.refactor_points.saturating_add(1);
    let mut changes = reset_progress(state);
    changes.mark(StorageKey::RefactorPoints);

    state.add_log(
        &format!(
            "♻ Refactor #{}! All yields x{:.1}",
            state.refactor_points,
            state.refactor_multiplier()
        ),
        true,
    );
    log::info!(
        "refactor performed: points={} next threshold={}",
        state.refactor_points,
        state.next_refactor_threshold()
    );
    changes
}

/// Shared by refactor and reset: resource, upgrades, achievements, theme mode.
fn reset_progress(state: &mut GameState) -> Changes {
    let mut changes = Changes::none();
    changes.touch();

    state.lines_of_code = 0.0;
    changes.mark(StorageKey::LinesOfCode);

    for upgrade in &mut state.upgrades {
        upgrade.count = 0;
        if let Some(base) = catalog::base_cost(&upgrade.name) {
            upgrade.cost = base;
        }
    }
    changes.mark(StorageKey::Upgrades);

    for achievement in &mut state.achievements {
        achievement.unlocked = false;
    }
    changes.mark(StorageKey::Achievements);

    state.theme_mode = ThemeMode::Default;
    changes.mark(StorageKey::ThemeMode);

    restart_bonus_spawner(state);
    changes
}

/// Start over completely: progress and refactor points. Best score,
/// leaderboard, theme and streak survive.
pub fn reset_game(state: &mut GameState) -> Changes {
    let mut changes = reset_progress(state);
    state.refactor_points = 0;
    changes.mark(StorageKey::RefactorPoints);
    state.add_log("Game reset.", true);
    changes
}

/// Claim the first reached and unclaimed streak tier.
pub fn claim_streak_reward(state: &mut GameState) -> Changes {
    let Some(tier) = state.next_streak_reward() else {
        return Changes::none();
    };
    let mut changes = add_lines(state, tier.reward as f64);
    state.last_streak_reward = tier.day;
    changes.mark(StorageKey::LastStreakReward);
    state.add_log(
        &format!(
            "🔥 {}-day streak! +{} LOC",
            tier.day,
            format_number(tier.reward as f64)
        ),
        true,
    );
    changes.merge(check_achievements(state));
    changes
}

/// Record the current resource on the leaderboard under `name`.
pub fn save_score(state: &mut GameState, name: &str) -> Changes {
    state.leaderboard.push(LeaderboardEntry {
        name: name.to_string(),
        score: state.lines_of_code,
    });
    // Stable: equal scores keep their insertion order.
    state
        .leaderboard
        .sort_by(|a, b| b.score.total_cmp(&a.score));
    state.leaderboard.truncate(LEADERBOARD_SIZE);

    let mut changes = Changes::none();
    changes.mark(StorageKey::Leaderboard);
    changes
}

/// Unlock every achievement whose condition now holds.
pub fn check_achievements(state: &mut GameState) -> Changes {
    let mut newly = Vec::new();
    for i in 0..state.achievements.len() {
        if state.achievements[i].unlocked {
            continue;
        }
        let met = match state.achievements[i].condition {
            AchievementCondition::LinesOfCode(threshold) => state.lines_of_code >= threshold,
            AchievementCondition::UpgradeCount(name, count) => state.upgrade_count(name) >= count,
        };
        if met {
            state.achievements[i].unlocked = true;
            newly.push(state.achievements[i].text.clone());
        }
    }

    let mut changes = Changes::none();
    if !newly.is_empty() {
        changes.mark(StorageKey::Achievements);
        for text in newly {
            state.add_log(&format!("🏅 Achievement unlocked: {}", text), true);
        }
    }
    changes
}

pub fn toggle_theme(state: &mut GameState) -> Changes {
    state.theme = state.theme.toggled();
    let mut changes = Changes::none();
    changes.mark(StorageKey::Theme);
    changes
}

/// Record a visit on `day` (days since the Unix epoch) and update the streak.
pub fn record_visit(state: &mut GameState, day: i64) -> Changes {
    let streak = match state.last_visit_day {
        Some(last) if last == day => return Changes::none(),
        Some(last) if last.checked_add(1) == Some(day) => state.streak_count.saturating_add(1),
        _ => 1,
    };
    state.streak_count = streak;
    state.last_visit_day = Some(day);

    let mut changes = Changes::none();
    changes.mark(StorageKey::StreakCount);
    changes.mark(StorageKey::LastVisitDay);
    if let Some(tier) = state.next_streak_reward() {
        state.add_log(
            &format!("🔥 {}-day streak reward ready! Press S to claim", tier.day),
            true,
        );
    }
    changes
}

/// Advance the game by `delta_ticks` ticks (20 ticks/sec).
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, delta_ticks: u32) -> Changes {
    let mut changes = Changes::none();
    for _ in 0..delta_ticks {
        changes.merge(step(state, rng));
    }
    changes
}

/// One tick. Timed effects expire before anything else runs, so an effect
/// never acts on the tick it ends.
fn step<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Changes {
    state.now += 1;
    let now = state.now;
    let mut changes = Changes::none();

    if state.multiplier_until.is_some() && !state.multiplier_active() {
        state.multiplier_until = None;
        state.add_log("  x2 Clicks ended", false);
        changes.touch();
    }
    if state.autoclick_until.is_some() && !state.autoclick_active() {
        state.autoclick_until = None;
        state.add_log("  Auto Click ended", false);
        changes.touch();
    }

    if bonus::purge_expired(state) {
        changes.touch();
    }

    if state.autoclick_active() && now >= state.next_autoclick_at {
        changes.merge(click(state));
        state.next_autoclick_at = now + AUTOCLICK_INTERVAL_TICKS;
    }

    if now >= state.next_passive_at {
        let rate = state.passive_rate();
        changes.merge(add_lines(state, rate));
        changes.merge(check_achievements(state));
        state.next_passive_at = now + PASSIVE_INTERVAL_TICKS;
    }

    if now >= state.next_event_at {
        changes.merge(events::evaluate_negative(state, rng));
        changes.merge(events::evaluate_positive(state, rng));
        state.next_event_at = now + EVENT_INTERVAL_TICKS;
    }

    if now >= state.next_bonus_at {
        if bonus::run_spawner(state, rng) {
            changes.touch();
        }
        state.next_bonus_at = now + state.bonus_interval_ticks();
    }

    changes
}

/// Format a number with thousands separators and at most one decimal:
/// 1234567 → "1,234,567", 1.25 → "1.3".
pub fn format_number(n: f64) -> String {
    let tenths = (n.abs() * 10.0).round() as u64;
    let digits = (tenths / 10).to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    if n < 0.0 && tenths > 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if tenths % 10 != 0 {
        out.push('.');
        out.push(char::from(b'0' + (tenths % 10) as u8));
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_purchase_cost_follows_growth_rule(
            index in 0usize..25,
            optimizer in 0u32..12,
            cost in 1u64..10_000_000,
        ) {
            let mut state = GameState::new();
            let opt = state.upgrade_index(CODE_OPTIMIZER).unwrap();
            state.upgrades[opt].count = optimizer;
            state.upgrades[index].cost = cost;
            state.lines_of_code = cost as f64;

            let name = state.upgrades[index].name.clone();
            let factor = growth_factor(&state, &name);
            prop_assert!((1.05 - 1e-9..=1.5).contains(&factor));

            buy_upgrade(&mut state, index);
            prop_assert_eq!(state.upgrades[index].cost, (cost as f64 * factor).floor() as u64);
            prop_assert_eq!(state.lines_of_code, 0.0);
        }

        #[test]
        fn prop_purchase_rejected_when_short(
            index in 0usize..25,
            shortfall in 1u64..1_000,
        ) {
            let mut state = GameState::new();
            let cost = state.upgrades[index].cost;
            state.lines_of_code = cost.saturating_sub(shortfall) as f64;
            let before_loc = state.lines_of_code;
            let before = state.upgrades.clone();
            prop_assert!(buy_upgrade(&mut state, index).is_empty());
            prop_assert_eq!(state.lines_of_code, before_loc);
            prop_assert_eq!(&state.upgrades, &before);
        }

        #[test]
        fn prop_leaderboard_bounded_and_sorted(scores in proptest::collection::vec(0u32..100_000, 0..30)) {
            let mut state = GameState::new();
            for (i, s) in scores.iter().enumerate() {
                state.lines_of_code = *s as f64;
                save_score(&mut state, &format!("p{}", i));
                prop_assert!(state.leaderboard.len() <= LEADERBOARD_SIZE);
                prop_assert!(state.leaderboard.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }

        #[test]
        fn prop_check_achievements_idempotent(loc in 0.0f64..5_000.0, juniors in 0u32..10) {
            let mut state = GameState::new();
            state.lines_of_code = loc;
            state.upgrades[0].count = juniors;
            check_achievements(&mut state);
            let first: Vec<bool> = state.achievements.iter().map(|a| a.unlocked).collect();
            prop_assert!(check_achievements(&mut state).is_empty());
            let second: Vec<bool> = state.achievements.iter().map(|a| a.unlocked).collect();
            prop_assert_eq!(first, second);
        }
    }
}
