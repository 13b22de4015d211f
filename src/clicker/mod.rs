//! Code Clicker: an incremental game about writing lines of code.
//!
//! [`ClickerGame`] owns the state, the store and the RNG. Every mutation goes
//! through it so that changed keys are persisted and subscribers notified.

pub mod bonus;
pub mod catalog;
pub mod events;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

#[cfg(test)]
pub(crate) mod test_rng;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::ClickerConfig;
use crate::input::{ClickState, InputEvent};
use crate::storage::KeyValueStore;

use save::Changes;
use state::{GameState, Viewport};

/// Keys that buy the n-th visible upgrade. Command keys are left out.
pub const SHOP_KEYS: &str = "123456789abdefhijkmnopquvwxyz";

/// Longest name accepted for the leaderboard.
pub const MAX_NAME_LEN: usize = 16;

// ── Click action IDs ────────────────────────────────────────────
pub const ACTION_CLICK: u16 = 1;
pub const ACTION_REFACTOR: u16 = 2;
pub const ACTION_CLAIM_STREAK: u16 = 3;
pub const ACTION_TOGGLE_THEME: u16 = 4;
pub const ACTION_SAVE_SCORE: u16 = 5;
pub const ACTION_GRAB_BONUS: u16 = 6;
pub const ACTION_NAME_SAVE: u16 = 7;
pub const ACTION_NAME_CANCEL: u16 = 8;
/// Plus the bonus id, wrapped below [`ACTION_BUY_BASE`]. See [`bonus_action`].
pub const ACTION_BONUS_BASE: u16 = 100;
/// Plus the upgrade index.
pub const ACTION_BUY_BASE: u16 = 1000;

/// Click action for the bonus with `id`. It names the same bonus however the
/// active list shifts between the frame and the click. Bonuses alive at the
/// same time have ids a few apart, well inside the wrap span.
pub fn bonus_action(id: u32) -> u16 {
    let span = u32::from(ACTION_BUY_BASE - ACTION_BONUS_BASE);
    ACTION_BONUS_BASE + (id % span) as u16
}

/// What keyboard input currently drives.
#[derive(Clone, Debug, PartialEq)]
pub enum InputMode {
    Play,
    /// Typing a leaderboard name.
    NameEntry(String),
}

type Subscriber = Box<dyn FnMut(&GameState, &Changes)>;

pub struct ClickerGame<S: KeyValueStore> {
    state: GameState,
    store: S,
    rng: Pcg32,
    subscribers: Vec<Subscriber>,
    mode: InputMode,
}

impl<S: KeyValueStore> ClickerGame<S> {
    /// Restore a session from `store`.
    pub fn new(store: S, config: &ClickerConfig) -> Self {
        let mut state = save::load(&store);
        state.viewport = Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
        };
        let seed = config.seed.unwrap_or_default();
        log::debug!("rng seed {}", seed);
        Self {
            state,
            store,
            rng: Pcg32::seed_from_u64(seed),
            subscribers: Vec::new(),
            mode: InputMode::Play,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    /// Call `callback` after every mutation that changed something.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameState, &Changes) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Persist the changed keys and notify subscribers.
    fn commit(&mut self, changes: Changes) -> Changes {
        if changes.is_empty() {
            return changes;
        }
        for (key, value) in save::writes(&self.state, &changes) {
            self.store.set(key.as_str(), &value);
        }
        for subscriber in &mut self.subscribers {
            subscriber(&self.state, &changes);
        }
        changes
    }

    pub fn click(&mut self) -> Changes {
        let changes = logic::click(&mut self.state);
        self.commit(changes)
    }

    pub fn buy_upgrade(&mut self, index: usize) -> Changes {
        let changes = logic::buy_upgrade(&mut self.state, index);
        self.commit(changes)
    }

    pub fn collect_bonus(&mut self, id: u32) -> Changes {
        let changes = logic::collect_bonus(&mut self.state, id);
        self.commit(changes)
    }

    /// Collect whichever active bonus appeared first.
    pub fn collect_oldest_bonus(&mut self) -> Changes {
        match self.state.bonuses.first() {
            Some(bonus) => {
                let id = bonus.id;
                self.collect_bonus(id)
            }
            None => Changes::none(),
        }
    }

    pub fn perform_refactor(&mut self) -> Changes {
        let changes = logic::perform_refactor(&mut self.state);
        self.commit(changes)
    }

    pub fn claim_streak_reward(&mut self) -> Changes {
        let changes = logic::claim_streak_reward(&mut self.state);
        self.commit(changes)
    }

    pub fn save_score(&mut self, name: &str) -> Changes {
        let changes = logic::save_score(&mut self.state, name);
        self.commit(changes)
    }

    pub fn check_achievements(&mut self) -> Changes {
        let changes = logic::check_achievements(&mut self.state);
        self.commit(changes)
    }

    pub fn toggle_theme(&mut self) -> Changes {
        let changes = logic::toggle_theme(&mut self.state);
        self.commit(changes)
    }

    pub fn reset_game(&mut self) -> Changes {
        let changes = logic::reset_game(&mut self.state);
        self.commit(changes)
    }

    pub fn record_visit(&mut self, day: i64) -> Changes {
        let changes = logic::record_visit(&mut self.state, day);
        self.commit(changes)
    }

    /// Advance the simulation by `delta_ticks` fixed ticks.
    pub fn tick(&mut self, delta_ticks: u32) -> Changes {
        let changes = logic::tick(&mut self.state, &mut self.rng, delta_ticks);
        self.commit(changes)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.state.viewport = Viewport { width, height };
    }

    /// Indices of the upgrades shown in the shop, in display order.
    pub fn visible_upgrades(&self) -> Vec<usize> {
        visible_upgrades(&self.state)
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputMode::NameEntry(name) = &mut self.mode {
            match event {
                InputEvent::Key(c) if !c.is_control() => {
                    if name.chars().count() < MAX_NAME_LEN {
                        name.push(*c);
                    }
                }
                InputEvent::Backspace => {
                    name.pop();
                }
                InputEvent::Enter | InputEvent::Click(ACTION_NAME_SAVE) => {
                    let name = name.trim().to_string();
                    self.mode = InputMode::Play;
                    if !name.is_empty() {
                        self.save_score(&name);
                        self.state
                            .add_log(&format!("Score saved for {}", name), false);
                    }
                }
                InputEvent::Escape | InputEvent::Click(ACTION_NAME_CANCEL) => {
                    self.mode = InputMode::Play
                }
                _ => return false,
            }
            return true;
        }

        match event {
            InputEvent::Key('c' | ' ') | InputEvent::Click(ACTION_CLICK) => {
                self.click();
            }
            InputEvent::Key('g') | InputEvent::Click(ACTION_GRAB_BONUS) => {
                self.collect_oldest_bonus();
            }
            InputEvent::Key('r') | InputEvent::Click(ACTION_REFACTOR) => {
                self.perform_refactor();
            }
            InputEvent::Key('s') | InputEvent::Click(ACTION_CLAIM_STREAK) => {
                self.claim_streak_reward();
            }
            InputEvent::Key('t') | InputEvent::Click(ACTION_TOGGLE_THEME) => {
                self.toggle_theme();
            }
            InputEvent::Key('l') | InputEvent::Click(ACTION_SAVE_SCORE) => {
                self.mode = InputMode::NameEntry(String::new());
            }
            InputEvent::Key('X') => {
                self.reset_game();
            }
            InputEvent::Key(c) => {
                let Some(slot) = SHOP_KEYS.find(*c) else {
                    return false;
                };
                let Some(&index) = self.visible_upgrades().get(slot) else {
                    return false;
                };
                self.buy_upgrade(index);
            }
            InputEvent::Click(id) if *id >= ACTION_BUY_BASE => {
                self.buy_upgrade((id - ACTION_BUY_BASE) as usize);
            }
            InputEvent::Click(action) if *action >= ACTION_BONUS_BASE => {
                let Some(bonus_id) = self
                    .state
                    .bonuses
                    .iter()
                    .find(|b| bonus_action(b.id) == *action)
                    .map(|b| b.id)
                else {
                    return false;
                };
                self.collect_bonus(bonus_id);
            }
            _ => return false,
        }
        true
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, &self.mode, f, area, click_state);
    }
}

/// Unlocked upgrades in catalog order.
pub fn visible_upgrades(state: &GameState) -> Vec<usize> {
    state
        .upgrades
        .iter()
        .enumerate()
        .filter(|(_, u)| state.is_unlocked(u))
        .map(|(i, _)| i)
        .collect()
}
