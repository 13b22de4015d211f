//! Code Clicker セーブ/ロード機能。
//!
//! ## 保存形式
//!
//! 1つの JSON にまとめず、ブラウザ版と同じくキーごとに文字列で保存する
//! (`linesOfCode`, `upgrades`, `leaderboard` ...)。操作は変更したキーの集合
//! ([`Changes`]) を返し、コントローラが [`writes`] でエンコードして書き込む。
//!
//! ## 読み込み方針
//!
//! - 欠損・パース不能な値はデフォルトに置き換える (エラーにはしない)。
//! - `upgrades` は組み込みテーブルに名前でマージする。保存側のフィールドが
//!   優先され、テーブルに無いアップグレードは捨てる。

use std::collections::BTreeSet;

use serde_json::Value;

use super::catalog::{self, LEADERBOARD_SIZE};
use super::state::{GameState, LeaderboardEntry, Theme, ThemeMode, Upgrade};
use crate::storage::KeyValueStore;

/// Every persisted key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    LinesOfCode,
    BestScore,
    Theme,
    ThemeMode,
    RefactorPoints,
    Upgrades,
    Leaderboard,
    LastStreakReward,
    StreakCount,
    LastVisitDay,
    Achievements,
}

impl StorageKey {
    pub const ALL: [StorageKey; 11] = [
        StorageKey::LinesOfCode,
        StorageKey::BestScore,
        StorageKey::Theme,
        StorageKey::ThemeMode,
        StorageKey::RefactorPoints,
        StorageKey::Upgrades,
        StorageKey::Leaderboard,
        StorageKey::LastStreakReward,
        StorageKey::StreakCount,
        StorageKey::LastVisitDay,
        StorageKey::Achievements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::LinesOfCode => "linesOfCode",
            StorageKey::BestScore => "bestScore",
            StorageKey::Theme => "theme",
            StorageKey::ThemeMode => "themeMode",
            StorageKey::RefactorPoints => "refactorPoints",
            StorageKey::Upgrades => "upgrades",
            StorageKey::Leaderboard => "leaderboard",
            StorageKey::LastStreakReward => "lastStreakReward",
            StorageKey::StreakCount => "streakCount",
            StorageKey::LastVisitDay => "lastVisitDay",
            StorageKey::Achievements => "achievements",
        }
    }
}

/// What an operation changed.
///
/// `keys` need writing back to the store. `touched` covers changes that
/// are visible but not persisted (bonuses, timed effects, log lines).
/// An empty `Changes` means the operation was a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    keys: BTreeSet<StorageKey>,
    touched: bool,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, key: StorageKey) {
        self.keys.insert(key);
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    pub fn merge(&mut self, other: Changes) {
        self.keys.extend(other.keys);
        self.touched |= other.touched;
    }

    pub fn contains(&self, key: StorageKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = StorageKey> + '_ {
        self.keys.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && !self.touched
    }
}

/// 値を保存用文字列にエンコードする。
pub fn encode(state: &GameState, key: StorageKey) -> String {
    match key {
        StorageKey::LinesOfCode => encode_count(state.lines_of_code),
        StorageKey::BestScore => encode_count(state.best_score),
        StorageKey::Theme => state.theme.as_str().to_string(),
        StorageKey::ThemeMode => state.theme_mode.as_str().to_string(),
        StorageKey::RefactorPoints => state.refactor_points.to_string(),
        StorageKey::Upgrades => to_json(&state.upgrades),
        StorageKey::Leaderboard => to_json(&state.leaderboard),
        StorageKey::LastStreakReward => state.last_streak_reward.to_string(),
        StorageKey::StreakCount => state.streak_count.to_string(),
        StorageKey::LastVisitDay => state
            .last_visit_day
            .map_or_else(String::new, |d| d.to_string()),
        StorageKey::Achievements => {
            let unlocked: Vec<&str> = state
                .achievements
                .iter()
                .filter(|a| a.unlocked)
                .map(|a| a.text.as_str())
                .collect();
            to_json(&unlocked)
        }
    }
}

/// 変更されたキーを (key, value) の組にする。
pub fn writes(state: &GameState, changes: &Changes) -> Vec<(StorageKey, String)> {
    changes.keys().map(|k| (k, encode(state, k))).collect()
}

fn encode_count(value: f64) -> String {
    (value.max(0.0).floor() as u64).to_string()
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Code Clicker: セーブ値のシリアライズに失敗: {e}");
            "[]".to_string()
        }
    }
}

/// `parseInt` 相当の寛容な整数パース。先頭の空白と符号を許し、
/// 数字が続く限り読む。数字が1つも無ければ `None`。
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn read_int(store: &dyn KeyValueStore, key: StorageKey) -> Option<i64> {
    store.get(key.as_str()).as_deref().and_then(parse_int)
}

fn read_count(store: &dyn KeyValueStore, key: StorageKey) -> f64 {
    read_int(store, key).unwrap_or(0).max(0) as f64
}

fn read_u32(store: &dyn KeyValueStore, key: StorageKey) -> u32 {
    read_int(store, key)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

/// 保存済みアップグレードを組み込みテーブルに名前でマージする。
pub fn merge_upgrades(saved_json: Option<&str>) -> Vec<Upgrade> {
    let defaults = catalog::default_upgrades();
    let Some(json) = saved_json else {
        return defaults;
    };
    let saved: Vec<Value> = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Code Clicker: upgrades のパースに失敗（デフォルトを使用）: {e}");
            return defaults;
        }
    };

    defaults
        .into_iter()
        .map(|default| {
            let saved_fields = saved.iter().find_map(|v| match v {
                Value::Object(map) if map.get("name").and_then(Value::as_str) == Some(default.name.as_str()) => {
                    Some(map)
                }
                _ => None,
            });
            match saved_fields {
                Some(fields) => overlay(&default, fields),
                None => default,
            }
        })
        .collect()
}

/// `{ ...default, ...saved }`. A saved field with the wrong type keeps the
/// whole default entry.
fn overlay(default: &Upgrade, saved: &serde_json::Map<String, Value>) -> Upgrade {
    let mut merged = match serde_json::to_value(default) {
        Ok(Value::Object(map)) => map,
        _ => return default.clone(),
    };
    for (k, v) in saved {
        merged.insert(k.clone(), v.clone());
    }
    match serde_json::from_value(Value::Object(merged)) {
        Ok(upgrade) => upgrade,
        Err(e) => {
            log::warn!("Code Clicker: {} の保存データを無視（型が不正）: {e}", default.name);
            default.clone()
        }
    }
}

fn load_leaderboard(json: Option<&str>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = json
        .and_then(|j| serde_json::from_str(j).ok())
        .unwrap_or_default();
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

fn load_achievements(state: &mut GameState, json: Option<&str>) {
    let unlocked: Vec<String> = json
        .and_then(|j| serde_json::from_str(j).ok())
        .unwrap_or_default();
    for achievement in &mut state.achievements {
        achievement.unlocked = unlocked.iter().any(|t| *t == achievement.text);
    }
}

/// ストアから状態を復元する。何も無ければ新規ゲーム。
pub fn load(store: &dyn KeyValueStore) -> GameState {
    let mut state = GameState::new();

    state.lines_of_code = read_count(store, StorageKey::LinesOfCode);
    state.best_score = read_count(store, StorageKey::BestScore);
    state.theme = store
        .get(StorageKey::Theme.as_str())
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_default();
    state.theme_mode = store
        .get(StorageKey::ThemeMode.as_str())
        .as_deref()
        .and_then(ThemeMode::parse)
        .unwrap_or_default();
    state.refactor_points = read_u32(store, StorageKey::RefactorPoints);
    state.streak_count = read_u32(store, StorageKey::StreakCount);
    state.last_streak_reward = read_u32(store, StorageKey::LastStreakReward);
    state.last_visit_day = read_int(store, StorageKey::LastVisitDay);

    state.upgrades = merge_upgrades(store.get(StorageKey::Upgrades.as_str()).as_deref());
    state.leaderboard = load_leaderboard(store.get(StorageKey::Leaderboard.as_str()).as_deref());
    load_achievements(&mut state, store.get(StorageKey::Achievements.as_str()).as_deref());

    // The spawner interval depends on the restored Faster Bonus Engine level.
    state.next_bonus_at = state.now + state.bonus_interval_ticks();

    log::info!(
        "Code Clicker: loaded {} LOC, {} refactor points, {} upgrades owned",
        state.lines_of_code,
        state.refactor_points,
        state.upgrades.iter().map(|u| u64::from(u.count)).sum::<u64>()
    );
    state
}
