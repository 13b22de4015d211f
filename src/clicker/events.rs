//! Random narrative events.
//!
//! Each table is walked in order and at most one entry fires per evaluation.
//! A draw is taken for every entry visited, before its resource gate is
//! checked, so gated-out entries still consume randomness.

use rand::Rng;

use super::catalog::{RandomEvent, MIN_POSITIVE_GAIN, NEGATIVE_EVENTS, POSITIVE_EVENTS};
use super::logic::{add_lines, format_number};
use super::save::Changes;
use super::state::GameState;

/// First entry in `table` whose draw and gate both pass.
fn pick<'a, R: Rng + ?Sized>(
    table: &'a [RandomEvent],
    modifier: f64,
    lines_of_code: f64,
    rng: &mut R,
) -> Option<&'a RandomEvent> {
    table.iter().find(|event| {
        let roll: f64 = rng.random();
        roll < event.chance * modifier && lines_of_code >= event.min_loc
    })
}

fn announce(state: &mut GameState, event: &RandomEvent, amount: f64) {
    let text = event.message.replace("{amount}", &format_number(amount));
    state.add_log(&text, true);
    log::info!("event fired: {} ({})", event.name, amount);
}

pub fn evaluate_negative<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Changes {
    let modifier = state.negative_event_modifier();
    let Some(event) = pick(NEGATIVE_EVENTS, modifier, state.lines_of_code, rng) else {
        return Changes::none();
    };
    let loss = (state.lines_of_code * event.percent).floor();
    announce(state, event, loss);
    let mut changes = add_lines(state, -loss);
    changes.touch();
    changes
}

pub fn evaluate_positive<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Changes {
    let modifier = state.positive_event_modifier();
    let Some(event) = pick(POSITIVE_EVENTS, modifier, state.lines_of_code, rng) else {
        return Changes::none();
    };
    let mut gain = (state.lines_of_code * event.percent).floor();
    if gain == 0.0 {
        gain = MIN_POSITIVE_GAIN;
    }
    announce(state, event, gain);
    let mut changes = add_lines(state, gain);
    changes.touch();
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::save::StorageKey;
    use crate::clicker::test_rng::SeqRng;

    #[test]
    fn merge_conflict_scenario() {
        let mut state = GameState::new();
        state.lines_of_code = 1_000.0;
        let mut rng = SeqRng::always();
        let changes = evaluate_negative(&mut state, &mut rng);
        assert!(changes.contains(StorageKey::LinesOfCode));
        assert_eq!(state.lines_of_code, 950.0);
        assert!(state.log.last().unwrap().text.contains("lost 50 LOC"));
    }

    #[test]
    fn only_one_negative_event_fires() {
        let mut state = GameState::new();
        state.lines_of_code = 10_000.0;
        let mut rng = SeqRng::always();
        evaluate_negative(&mut state, &mut rng);
        assert_eq!(state.lines_of_code, 9_500.0);
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn gate_skips_to_next_entry() {
        let mut state = GameState::new();
        // Below Merge Conflict (500), Intern Mistake (1000), at Coffee Spill (300).
        state.lines_of_code = 400.0;
        let mut rng = SeqRng::always();
        evaluate_negative(&mut state, &mut rng);
        assert_eq!(state.lines_of_code, 388.0);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn nothing_fires_below_every_gate() {
        let mut state = GameState::new();
        state.lines_of_code = 100.0;
        let mut rng = SeqRng::always();
        assert!(evaluate_negative(&mut state, &mut rng).is_empty());
        assert_eq!(state.lines_of_code, 100.0);
        assert_eq!(rng.draws(), NEGATIVE_EVENTS.len());
    }

    #[test]
    fn failed_draws_fire_nothing() {
        let mut state = GameState::new();
        state.lines_of_code = 50_000.0;
        let mut rng = SeqRng::never();
        assert!(evaluate_negative(&mut state, &mut rng).is_empty());
        assert!(evaluate_positive(&mut state, &mut rng).is_empty());
        assert_eq!(state.lines_of_code, 50_000.0);
    }

    #[test]
    fn draw_is_scaled_by_modifier() {
        let mut state = GameState::new();
        state.lines_of_code = 1_000.0;
        let idx = state.upgrade_index(crate::clicker::catalog::AUTOMATED_TESTING).unwrap();
        state.upgrades[idx].count = 5; // x0.5
        // 0.0065 passes the raw 0.01 chance but not 0.005.
        let mut rng = SeqRng::repeat(0.0065);
        evaluate_negative(&mut state, &mut rng);
        // Intern Mistake 0.008 * 0.5 = 0.004 fails too; Coffee Spill 0.006 fails;
        // Rollback 0.005 fails; Code Review Rejection 0.0075 fires.
        assert_eq!(state.lines_of_code, 980.0);
    }

    #[test]
    fn positive_draw_is_boosted_by_continuous_integration() {
        // 80 LOC clears only the Open Source Boost gate.
        let with_ci = |count: u32| {
            let mut state = GameState::new();
            state.lines_of_code = 80.0;
            let idx = state
                .upgrade_index(crate::clicker::catalog::CONTINUOUS_INTEGRATION)
                .unwrap();
            state.upgrades[idx].count = count;
            state
        };
        let mut plain = with_ci(0);
        let mut boosted = with_ci(1); // x1.2

        // 0.011 misses the raw 0.01 chance but not 0.012.
        assert!(evaluate_positive(&mut plain, &mut SeqRng::repeat(0.011)).is_empty());
        assert_eq!(plain.lines_of_code, 80.0);

        let changes = evaluate_positive(&mut boosted, &mut SeqRng::repeat(0.011));
        assert!(changes.contains(StorageKey::LinesOfCode));
        assert_eq!(boosted.lines_of_code, 84.0);
    }

    #[test]
    fn positive_gain_has_floor_of_ten() {
        let mut state = GameState::new();
        let mut rng = SeqRng::always();
        let changes = evaluate_positive(&mut state, &mut rng);
        assert!(changes.contains(StorageKey::LinesOfCode));
        assert_eq!(state.lines_of_code, 10.0);
        assert!(state.log.last().unwrap().text.contains("10 LOC"));
    }

    #[test]
    fn positive_gain_is_percentage() {
        let mut state = GameState::new();
        state.lines_of_code = 2_000.0;
        let mut rng = SeqRng::always();
        evaluate_positive(&mut state, &mut rng);
        assert_eq!(state.lines_of_code, 2_100.0);
        assert_eq!(state.best_score, 2_100.0);
    }
}
