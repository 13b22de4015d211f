//! Built-in tables and balance constants.

use crate::time::ms_to_ticks;

use super::state::{Achievement, AchievementCondition, Upgrade, UpgradeTag};

// ── Well-known upgrades ─────────────────────────────────────────
pub const JUNIOR_DEV: &str = "Junior Dev";
pub const AI_ASSISTANT: &str = "AI Assistant";
pub const FASTER_BONUS_ENGINE: &str = "Faster Bonus Engine";
pub const CODE_OPTIMIZER: &str = "Code Optimizer";
pub const AUTOMATED_TESTING: &str = "Automated Testing";
pub const CONTINUOUS_INTEGRATION: &str = "Continuous Integration";
pub const DARK_MATRIX_THEME: &str = "Dark Matrix Theme";

// ── Costs ───────────────────────────────────────────────────────
pub const COST_GROWTH: f64 = 1.5;
/// Code Optimizer: -5% growth per level, never below 70%.
pub const COST_REDUCTION_PER_LEVEL: f64 = 0.05;
pub const MIN_COST_REDUCTION: f64 = 0.7;

// ── Random events ───────────────────────────────────────────────
/// Automated Testing: -10% negative chance per level, never below 50%.
pub const NEGATIVE_REDUCTION_PER_LEVEL: f64 = 0.1;
pub const MIN_NEGATIVE_MODIFIER: f64 = 0.5;
/// Continuous Integration: +20% positive chance per level, uncapped.
pub const POSITIVE_INCREASE_PER_LEVEL: f64 = 0.2;
/// Positive events never grant less than this.
pub const MIN_POSITIVE_GAIN: f64 = 10.0;

// ── Refactor ────────────────────────────────────────────────────
pub const REFACTOR_BASE_THRESHOLD: f64 = 1_000_000.0;
pub const REFACTOR_THRESHOLD_STEP: f64 = 2_000_000.0;
pub const REFACTOR_MULTIPLIER_STEP: f64 = 0.2;

// ── Timers ──────────────────────────────────────────────────────
pub const PASSIVE_INTERVAL_TICKS: u64 = ms_to_ticks(1_000);
pub const EVENT_INTERVAL_TICKS: u64 = ms_to_ticks(15_000);
pub const BONUS_BASE_INTERVAL_MS: u64 = 2_000;
pub const BONUS_INTERVAL_STEP_MS: u64 = 200;
pub const BONUS_MIN_INTERVAL_MS: u64 = 400;
pub const BONUS_BASE_CHANCE: f64 = 0.2;
pub const BONUS_CHANCE_PER_LEVEL: f64 = 0.01;
pub const BONUS_LIFETIME_TICKS: u64 = ms_to_ticks(4_000);
/// How long the click multiplier and auto-click last once collected.
pub const EFFECT_DURATION_TICKS: u64 = ms_to_ticks(10_000);
pub const AUTOCLICK_INTERVAL_TICKS: u64 = ms_to_ticks(250);
pub const CLICK_MULTIPLIER: f64 = 2.0;

// ── Misc ────────────────────────────────────────────────────────
pub const LEADERBOARD_SIZE: usize = 10;
pub const LOG_CAPACITY: usize = 50;

fn passive(name: &str, cost: u64, per_second: u64) -> Upgrade {
    Upgrade::new(name, cost).per_second(per_second)
}

fn clicker(name: &str, cost: u64, per_click: u64) -> Upgrade {
    Upgrade::new(name, cost).per_click(per_click)
}

fn hybrid(name: &str, cost: u64, per_second: u64, per_click: u64, unlock_at: u64) -> Upgrade {
    Upgrade::new(name, cost)
        .per_second(per_second)
        .per_click(per_click)
        .unlock_at(unlock_at)
}

fn support(name: &str, cost: u64, unlock_at: u64, tag: UpgradeTag) -> Upgrade {
    Upgrade::new(name, cost).unlock_at(unlock_at).tag(tag)
}

/// The built-in upgrade table in display order.
pub fn default_upgrades() -> Vec<Upgrade> {
    vec![
        // Passive income
        passive(JUNIOR_DEV, 50, 1),
        passive("Mid-Level Dev", 200, 5),
        passive("Senior Dev", 1_000, 20),
        passive(AI_ASSISTANT, 5_000, 100),
        passive("Startup Incubator", 15_000, 500),
        passive("AI Dev Team", 100_000, 2_000),
        passive("Code Generation API", 250_000, 5_000),
        passive("Quantum Computing Cluster", 500_000, 10_000),
        passive("Autonomous Dev Division", 1_000_000, 25_000),
        // Per click
        clicker("Better Keyboard", 200, 1),
        clicker("Dual Monitor Setup", 600, 5),
        clicker("Mechanical Keyboard", 2_000, 10),
        clicker("Ergonomic Chair", 10_000, 25),
        clicker("Quantum Dev Tools", 50_000, 50),
        clicker("Neural Interface", 200_000, 100),
        clicker("Thought-to-Code Translator", 750_000, 250),
        // Infrastructure
        hybrid("Cloud IDE", 30_000, 300, 10, 0),
        hybrid("On-call DevOps", 100_000, 1_200, 25, 0),
        hybrid("Serverless Architecture", 300_000, 3_000, 50, 50_000),
        hybrid("Global CDN Network", 750_000, 7_500, 100, 100_000),
        // Support
        support(FASTER_BONUS_ENGINE, 50_000, 200, UpgradeTag::Functional),
        support(CODE_OPTIMIZER, 100_000, 10_000, UpgradeTag::Functional),
        support(AUTOMATED_TESTING, 200_000, 25_000, UpgradeTag::Functional),
        support(CONTINUOUS_INTEGRATION, 400_000, 50_000, UpgradeTag::Functional),
        // Visual
        support(DARK_MATRIX_THEME, 25_000, 10_000, UpgradeTag::Cosmetic),
    ]
}

/// Base cost of an upgrade in the built-in table.
pub fn base_cost(name: &str) -> Option<u64> {
    default_upgrades()
        .into_iter()
        .find(|u| u.name == name)
        .map(|u| u.cost)
}

pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new("First 100 LOC!", AchievementCondition::LinesOfCode(100.0)),
        Achievement::new(
            "Own 5 Junior Devs",
            AchievementCondition::UpgradeCount(JUNIOR_DEV, 5),
        ),
        Achievement::new("1,000 LOC milestone", AchievementCondition::LinesOfCode(1_000.0)),
        Achievement::new(
            "Buy an AI Assistant",
            AchievementCondition::UpgradeCount(AI_ASSISTANT, 1),
        ),
    ]
}

/// A one-time reward unlocked by a daily streak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakTier {
    pub day: u32,
    pub reward: u64,
}

pub const STREAK_TIERS: &[StreakTier] = &[
    StreakTier { day: 3, reward: 3_000 },
    StreakTier { day: 5, reward: 6_000 },
    StreakTier { day: 7, reward: 10_000 },
    StreakTier { day: 14, reward: 25_000 },
    StreakTier { day: 30, reward: 100_000 },
];

/// One row of a random-event table. `message` contains `{amount}`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomEvent {
    pub name: &'static str,
    pub message: &'static str,
    /// Base probability per evaluation.
    pub chance: f64,
    /// Minimum resource for the event to fire.
    pub min_loc: f64,
    /// Fraction of the current resource gained or lost.
    pub percent: f64,
}

pub const NEGATIVE_EVENTS: &[RandomEvent] = &[
    RandomEvent {
        name: "Merge Conflict",
        message: "🔥 Catastrophic merge conflict! You lost {amount} LOC!",
        chance: 0.01,
        min_loc: 500.0,
        percent: 0.05,
    },
    RandomEvent {
        name: "Intern Mistake",
        message: "😱 The intern force-pushed to production! You lost {amount} LOC!",
        chance: 0.008,
        min_loc: 1_000.0,
        percent: 0.08,
    },
    RandomEvent {
        name: "Coffee Spill",
        message: "☕ You spilled coffee on your keyboard. Lost {amount} LOC fixing typos.",
        chance: 0.012,
        min_loc: 300.0,
        percent: 0.03,
    },
    RandomEvent {
        name: "Rollback",
        message: "🔁 Production rollback! {amount} LOC reverted.",
        chance: 0.01,
        min_loc: 750.0,
        percent: 0.06,
    },
    RandomEvent {
        name: "Code Review Rejection",
        message: "🛑 Lead dev rejected your changes. {amount} LOC sent back.",
        chance: 0.015,
        min_loc: 200.0,
        percent: 0.02,
    },
];

pub const POSITIVE_EVENTS: &[RandomEvent] = &[
    RandomEvent {
        name: "Open Source Boost",
        message: "🎉 Your open source project went viral! You gained {amount} LOC!",
        chance: 0.01,
        min_loc: 0.0,
        percent: 0.05,
    },
    RandomEvent {
        name: "Hackathon Victory",
        message: "🏆 You won a hackathon and earned {amount} LOC!",
        chance: 0.008,
        min_loc: 200.0,
        percent: 0.08,
    },
    RandomEvent {
        name: "AI Optimizer",
        message: "🤖 Your AI assistant optimized your code. +{amount} LOC!",
        chance: 0.012,
        min_loc: 500.0,
        percent: 0.03,
    },
    RandomEvent {
        name: "Productivity Surge",
        message: "🚀 You hit flow state and crushed it! +{amount} LOC!",
        chance: 0.015,
        min_loc: 100.0,
        percent: 0.04,
    },
];
