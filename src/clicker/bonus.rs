//! Bonus spawner: short-lived collectibles scattered over the viewport.

use rand::Rng;

use super::catalog::BONUS_LIFETIME_TICKS;
use super::state::{Bonus, BonusKind, GameState};

/// Bonus footprint; keeps spawns fully inside the viewport.
const BONUS_SIZE: f64 = 100.0;
const LOC_CUTOFF: f64 = 0.6;
const MULTIPLIER_CUTOFF: f64 = 0.85;

/// Drop bonuses whose lifetime is over. Returns true if any were removed.
pub fn purge_expired(state: &mut GameState) -> bool {
    let now = state.now;
    let before = state.bonuses.len();
    state.bonuses.retain(|b| !b.is_expired(now));
    let removed = before - state.bonuses.len();
    if removed > 0 {
        log::debug!("{} bonus(es) expired", removed);
    }
    removed > 0
}

/// Kind for the roll `r`, falling through to the next kind when one is
/// already on screen.
fn pick_kind(state: &GameState, r: f64) -> Option<BonusKind> {
    if r < LOC_CUTOFF && !state.has_bonus(BonusKind::Loc) {
        Some(BonusKind::Loc)
    } else if r < MULTIPLIER_CUTOFF && !state.has_bonus(BonusKind::Multiplier) {
        Some(BonusKind::Multiplier)
    } else if !state.has_bonus(BonusKind::AutoClick) {
        Some(BonusKind::AutoClick)
    } else {
        None
    }
}

/// One spawner firing: purge, then maybe spawn. Returns true if the bonus
/// set changed.
pub fn run_spawner<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    let purged = purge_expired(state);
    let roll: f64 = rng.random();
    if roll >= state.bonus_spawn_chance() {
        return purged;
    }
    spawn_bonus(state, rng) || purged
}

/// Place a new bonus. Returns false when every kind is already active.
pub fn spawn_bonus<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    let x = rng.random::<f64>() * (state.viewport.width - BONUS_SIZE);
    let y = rng.random::<f64>() * (state.viewport.height - BONUS_SIZE);
    let r: f64 = rng.random();

    let Some(kind) = pick_kind(state, r) else {
        return false;
    };
    let (value, label) = match kind {
        BonusKind::Loc => {
            let value = rng.random_range(10..30);
            (value as f64, format!("+ {} LOC", value))
        }
        BonusKind::Multiplier => (2.0, "x2 Clicks (10s)".to_string()),
        BonusKind::AutoClick => (10.0, "Auto Click (10s)".to_string()),
    };

    let id = state.next_bonus_id;
    state.next_bonus_id = state.next_bonus_id.wrapping_add(1);
    state.bonuses.push(Bonus {
        id,
        kind,
        x: x.max(0.0),
        y: y.max(0.0),
        value,
        label: label.clone(),
        expires_at: state.now + BONUS_LIFETIME_TICKS,
    });
    state.add_log(&format!("✦ {} appeared! Press G to grab", label), false);
    log::debug!("spawned {} bonus #{} at ({:.0}, {:.0})", kind.name(), id, x, y);
    true
}
