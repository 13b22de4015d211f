/// Code Clicker game state definitions.

use serde::{Deserialize, Serialize};

use super::catalog::{
    self, StreakTier, BONUS_BASE_CHANCE, BONUS_BASE_INTERVAL_MS, BONUS_CHANCE_PER_LEVEL,
    BONUS_INTERVAL_STEP_MS, BONUS_MIN_INTERVAL_MS, CODE_OPTIMIZER, COST_REDUCTION_PER_LEVEL,
    FASTER_BONUS_ENGINE, LOG_CAPACITY, MIN_COST_REDUCTION, MIN_NEGATIVE_MODIFIER,
    NEGATIVE_REDUCTION_PER_LEVEL, POSITIVE_INCREASE_PER_LEVEL, REFACTOR_BASE_THRESHOLD,
    REFACTOR_MULTIPLIER_STEP, REFACTOR_THRESHOLD_STEP, STREAK_TIERS,
};
use crate::time::ms_to_ticks;

/// Optional tag on support upgrades. Plain generators carry none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeTag {
    Cosmetic,
    Functional,
}

/// Display grouping of an upgrade, derived from its yields and tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeCategory {
    Click,
    Auto,
    Infrastructure,
    Visual,
    Support,
}

impl UpgradeCategory {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeCategory::Click => "click",
            UpgradeCategory::Auto => "auto",
            UpgradeCategory::Infrastructure => "infrastructure",
            UpgradeCategory::Visual => "visual",
            UpgradeCategory::Support => "support",
        }
    }
}

/// A purchasable generator or modifier. Field names follow the persisted
/// JSON (`linesPerSecond`, `unlockAt`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrade {
    pub name: String,
    /// Price of the next unit.
    pub cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_per_second: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_per_click: Option<u64>,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_at: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<UpgradeTag>,
}

impl Upgrade {
    pub fn new(name: &str, cost: u64) -> Self {
        Self {
            name: name.to_string(),
            cost,
            lines_per_second: None,
            lines_per_click: None,
            count: 0,
            unlock_at: None,
            tag: None,
        }
    }

    pub fn per_second(mut self, lines: u64) -> Self {
        self.lines_per_second = Some(lines);
        self
    }

    pub fn per_click(mut self, lines: u64) -> Self {
        self.lines_per_click = Some(lines);
        self
    }

    pub fn unlock_at(mut self, threshold: u64) -> Self {
        self.unlock_at = Some(threshold);
        self
    }

    pub fn tag(mut self, tag: UpgradeTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn category(&self) -> UpgradeCategory {
        let per_click = self.lines_per_click.unwrap_or(0) > 0;
        let per_second = self.lines_per_second.unwrap_or(0) > 0;
        match (self.tag, per_click, per_second) {
            (Some(UpgradeTag::Cosmetic), _, _) => UpgradeCategory::Visual,
            (Some(UpgradeTag::Functional), _, _) => UpgradeCategory::Support,
            (None, true, true) => UpgradeCategory::Infrastructure,
            (None, false, true) => UpgradeCategory::Auto,
            (None, _, false) => UpgradeCategory::Click,
        }
    }

    /// Lines per click contributed by all owned units.
    pub fn click_yield(&self) -> f64 {
        self.lines_per_click.unwrap_or(0) as f64 * self.count as f64
    }

    /// Lines per second contributed by all owned units.
    pub fn passive_yield(&self) -> f64 {
        self.lines_per_second.unwrap_or(0) as f64 * self.count as f64
    }
}

/// What has to hold for an achievement to unlock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementCondition {
    LinesOfCode(f64),
    UpgradeCount(&'static str, u32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Achievement {
    pub text: String,
    pub condition: AchievementCondition,
    pub unlocked: bool,
}

impl Achievement {
    pub fn new(text: &str, condition: AchievementCondition) -> Self {
        Self {
            text: text.to_string(),
            condition,
            unlocked: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BonusKind {
    /// Immediate resource grant.
    Loc,
    /// Doubles click yield for a while.
    Multiplier,
    /// Clicks on the player's behalf for a while.
    AutoClick,
}

impl BonusKind {
    pub fn name(&self) -> &'static str {
        match self {
            BonusKind::Loc => "loc",
            BonusKind::Multiplier => "multiplier",
            BonusKind::AutoClick => "autoclick",
        }
    }
}

/// A time-limited collectible spawned on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Bonus {
    pub id: u32,
    pub kind: BonusKind,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub label: String,
    /// Tick at which the bonus disappears.
    pub expires_at: u64,
}

impl Bonus {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Default,
    Matrix,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Default => "default",
            ThemeMode::Matrix => "matrix",
        }
    }

    pub fn parse(s: &str) -> Option<ThemeMode> {
        match s {
            "default" => Some(ThemeMode::Default),
            "matrix" => Some(ThemeMode::Matrix),
            _ => None,
        }
    }
}

/// Area bonuses are scattered over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Full state of a Code Clicker session.
pub struct GameState {
    /// Spendable resource.
    pub lines_of_code: f64,
    /// Highest resource ever held.
    pub best_score: f64,
    pub theme: Theme,
    pub theme_mode: ThemeMode,
    /// Number of refactors (prestige resets) performed.
    pub refactor_points: u32,
    /// Consecutive days played.
    pub streak_count: u32,
    /// Day of the highest streak tier already claimed.
    pub last_streak_reward: u32,
    /// Day number (days since epoch) of the last recorded visit.
    pub last_visit_day: Option<i64>,
    pub upgrades: Vec<Upgrade>,
    pub achievements: Vec<Achievement>,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Active bonuses, oldest first.
    pub bonuses: Vec<Bonus>,
    pub next_bonus_id: u32,
    /// Tick at which the x2 click multiplier ends.
    pub multiplier_until: Option<u64>,
    /// Tick at which auto-click ends.
    pub autoclick_until: Option<u64>,
    pub next_autoclick_at: u64,
    /// Tick clock. Advanced only by `logic::tick`.
    pub now: u64,
    pub next_passive_at: u64,
    pub next_event_at: u64,
    pub next_bonus_at: u64,
    pub viewport: Viewport,
    pub log: Vec<LogEntry>,
}

impl GameState {
    pub fn new() -> Self {
        let mut state = Self {
            lines_of_code: 0.0,
            best_score: 0.0,
            theme: Theme::Dark,
            theme_mode: ThemeMode::Default,
            refactor_points: 0,
            streak_count: 0,
            last_streak_reward: 0,
            last_visit_day: None,
            upgrades: catalog::default_upgrades(),
            achievements: catalog::default_achievements(),
            leaderboard: Vec::new(),
            bonuses: Vec::new(),
            next_bonus_id: 0,
            multiplier_until: None,
            autoclick_until: None,
            next_autoclick_at: 0,
            now: 0,
            next_passive_at: catalog::PASSIVE_INTERVAL_TICKS,
            next_event_at: catalog::EVENT_INTERVAL_TICKS,
            next_bonus_at: 0,
            viewport: Viewport::default(),
            log: Vec::new(),
        };
        state.next_bonus_at = state.bonus_interval_ticks();
        state
    }

    pub fn refactor_multiplier(&self) -> f64 {
        1.0 + self.refactor_points as f64 * REFACTOR_MULTIPLIER_STEP
    }

    /// Lines gained per manual click, before the x2 bonus.
    pub fn click_value(&self) -> f64 {
        let per_click: f64 = self.upgrades.iter().map(Upgrade::click_yield).sum();
        (1.0 + per_click) * self.refactor_multiplier()
    }

    /// Lines gained per second from owned generators.
    pub fn passive_rate(&self) -> f64 {
        let per_second: f64 = self.upgrades.iter().map(Upgrade::passive_yield).sum();
        per_second * self.refactor_multiplier()
    }

    pub fn next_refactor_threshold(&self) -> f64 {
        REFACTOR_BASE_THRESHOLD + self.refactor_points as f64 * REFACTOR_THRESHOLD_STEP
    }

    pub fn can_refactor(&self) -> bool {
        self.best_score >= self.next_refactor_threshold()
    }

    pub fn upgrade_index(&self, name: &str) -> Option<usize> {
        self.upgrades.iter().position(|u| u.name == name)
    }

    pub fn upgrade_count(&self, name: &str) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.name == name)
            .map_or(0, |u| u.count)
    }

    /// Shown in the shop once the best score reaches `unlock_at`.
    pub fn is_unlocked(&self, upgrade: &Upgrade) -> bool {
        upgrade
            .unlock_at
            .map_or(true, |threshold| self.best_score >= threshold as f64)
    }

    /// Factor applied to cost growth, from Code Optimizer levels.
    pub fn cost_reduction(&self) -> f64 {
        let level = self.upgrade_count(CODE_OPTIMIZER) as f64;
        (1.0 - level * COST_REDUCTION_PER_LEVEL).max(MIN_COST_REDUCTION)
    }

    /// Scale on negative event chances, from Automated Testing levels.
    pub fn negative_event_modifier(&self) -> f64 {
        let level = self.upgrade_count(catalog::AUTOMATED_TESTING) as f64;
        (1.0 - level * NEGATIVE_REDUCTION_PER_LEVEL).max(MIN_NEGATIVE_MODIFIER)
    }

    /// Scale on positive event chances, from Continuous Integration levels.
    pub fn positive_event_modifier(&self) -> f64 {
        let level = self.upgrade_count(catalog::CONTINUOUS_INTEGRATION) as f64;
        1.0 + level * POSITIVE_INCREASE_PER_LEVEL
    }

    pub fn bonus_interval_ms(&self) -> u64 {
        let level = self.upgrade_count(FASTER_BONUS_ENGINE) as u64;
        BONUS_BASE_INTERVAL_MS
            .saturating_sub(level.saturating_mul(BONUS_INTERVAL_STEP_MS))
            .max(BONUS_MIN_INTERVAL_MS)
    }

    pub fn bonus_interval_ticks(&self) -> u64 {
        ms_to_ticks(self.bonus_interval_ms())
    }

    pub fn bonus_spawn_chance(&self) -> f64 {
        let level = self.upgrade_count(FASTER_BONUS_ENGINE) as f64;
        BONUS_BASE_CHANCE + level * BONUS_CHANCE_PER_LEVEL
    }

    /// First tier reached by the streak and not yet claimed.
    pub fn next_streak_reward(&self) -> Option<StreakTier> {
        STREAK_TIERS
            .iter()
            .find(|t| self.streak_count >= t.day && self.last_streak_reward < t.day)
            .copied()
    }

    pub fn multiplier_active(&self) -> bool {
        self.multiplier_until.is_some_and(|until| self.now < until)
    }

    pub fn autoclick_active(&self) -> bool {
        self.autoclick_until.is_some_and(|until| self.now < until)
    }

    pub fn has_bonus(&self, kind: BonusKind) -> bool {
        self.bonuses.iter().any(|b| b.kind == kind)
    }

    pub fn unlocked_achievement_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
