//! Code Clicker rendering: stats, shop, bonuses, progress panels and log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::time::TICKS_PER_SEC;
use crate::widgets::ClickableList;

use super::logic::format_number;
use super::state::{GameState, Theme, ThemeMode, UpgradeCategory};
use super::{
    bonus_action, visible_upgrades, InputMode, ACTION_BUY_BASE, ACTION_CLAIM_STREAK,
    ACTION_CLICK, ACTION_GRAB_BONUS, ACTION_NAME_CANCEL, ACTION_NAME_SAVE, ACTION_REFACTOR,
    ACTION_SAVE_SCORE, ACTION_TOGGLE_THEME, SHOP_KEYS,
};

/// Colors for the active theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub dim: Color,
    pub good: Color,
    pub bad: Color,
}

impl Palette {
    pub fn for_state(state: &GameState) -> Self {
        match (state.theme_mode, state.theme) {
            (ThemeMode::Matrix, _) => Palette {
                bg: Color::Black,
                fg: Color::LightGreen,
                accent: Color::Green,
                dim: Color::DarkGray,
                good: Color::LightGreen,
                bad: Color::Red,
            },
            (ThemeMode::Default, Theme::Dark) => Palette {
                bg: Color::Reset,
                fg: Color::White,
                accent: Color::Cyan,
                dim: Color::DarkGray,
                good: Color::Green,
                bad: Color::Red,
            },
            (ThemeMode::Default, Theme::Light) => Palette {
                bg: Color::White,
                fg: Color::Black,
                accent: Color::Blue,
                dim: Color::Gray,
                good: Color::Green,
                bad: Color::Red,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(self.dim))
            .style(self.base())
    }
}

pub fn render(
    state: &GameState,
    mode: &InputMode,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let palette = Palette::for_state(state);
    f.render_widget(Block::default().style(palette.base()), area);

    let bonus_rows = (state.bonuses.len() + effect_lines(state).len()) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(bonus_rows.max(1) + 2),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(state, &palette, f, chunks[0], click_state);
    render_bonuses(state, &palette, f, chunks[1], click_state);

    if is_narrow_layout(area.width) {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(chunks[2]);
        render_shop(state, &palette, f, body[0], click_state);
        render_log(state, &palette, f, body[1]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(4)])
            .split(body[1]);
        render_shop(state, &palette, f, body[0], click_state);
        render_progress(state, &palette, f, side[0], click_state);
        render_log(state, &palette, f, side[1]);
    }

    render_footer(mode, &palette, f, chunks[3], click_state);
}

fn render_header(
    state: &GameState,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let title = if state.theme_mode == ThemeMode::Matrix {
        " ▓ Code Clicker :: matrix ▓ "
    } else {
        " Code Clicker "
    };
    let block = palette.block(title);
    let inner = block.inner(area);

    let loc = Span::styled(
        format!("{} LOC", format_number(state.lines_of_code.floor())),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );
    let rates = Span::styled(
        format!(
            "  {}/s · {}/click",
            format_number(state.passive_rate()),
            format_number(state.click_value())
        ),
        Style::default().fg(palette.fg),
    );
    let best = Span::styled(
        format!("  best {}", format_number(state.best_score.floor())),
        Style::default().fg(palette.dim),
    );

    let refactor = if state.can_refactor() {
        Span::styled(
            "  [R] Refactor ready!",
            Style::default()
                .fg(palette.good)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!(
                "  refactor x{:.1} · next at {}",
                state.refactor_multiplier(),
                format_number(state.next_refactor_threshold())
            ),
            Style::default().fg(palette.dim),
        )
    };

    let button_style = if state.multiplier_active() {
        Style::default()
            .fg(palette.bg)
            .bg(palette.good)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(palette.bg)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    };
    let lines = vec![
        Line::from(vec![loc, rates, best]),
        Line::from(refactor),
        Line::from(Span::styled("  ⌨  [C] Write code  ", button_style)),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);

    let mut cs = click_state.borrow_mut();
    if inner.height >= 3 {
        cs.add_row_target(inner, inner.y + 1, ACTION_REFACTOR);
        cs.add_row_target(inner, inner.y + 2, ACTION_CLICK);
    }
}

fn seconds_left(state: &GameState, until: Option<u64>) -> u64 {
    until.map_or(0, |t| t.saturating_sub(state.now).div_ceil(TICKS_PER_SEC))
}

/// Active timed effects, one line each.
fn effect_lines(state: &GameState) -> Vec<String> {
    let mut lines = Vec::new();
    if state.multiplier_active() {
        lines.push(format!(
            "⚡ x2 Clicks ({}s)",
            seconds_left(state, state.multiplier_until)
        ));
    }
    if state.autoclick_active() {
        lines.push(format!(
            "⚡ Auto Click ({}s)",
            seconds_left(state, state.autoclick_until)
        ));
    }
    lines
}

fn render_bonuses(
    state: &GameState,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    for bonus in &state.bonuses {
        let left = bonus.expires_at.saturating_sub(state.now).div_ceil(TICKS_PER_SEC);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!("✦ {}", bonus.label),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}s  [G]", left),
                    Style::default().fg(palette.dim),
                ),
            ]),
            bonus_action(bonus.id),
        );
    }
    for text in effect_lines(state) {
        cl.push(Line::from(Span::styled(text, Style::default().fg(palette.good))));
    }
    if cl.is_empty() {
        cl.push(Line::from(Span::styled(
            "Watch for bonuses...",
            Style::default().fg(palette.dim),
        )));
    }

    let block = palette.block(" Bonuses ");
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn category_color(category: UpgradeCategory) -> Color {
    match category {
        UpgradeCategory::Click => Color::Yellow,
        UpgradeCategory::Auto => Color::Cyan,
        UpgradeCategory::Infrastructure => Color::Magenta,
        UpgradeCategory::Support => Color::Blue,
        UpgradeCategory::Visual => Color::LightGreen,
    }
}

fn yield_text(upgrade: &super::state::Upgrade) -> String {
    match (upgrade.lines_per_second, upgrade.lines_per_click) {
        (Some(s), Some(c)) => format!("+{}/s +{}/click", format_number(s as f64), c),
        (Some(s), None) => format!("+{}/s", format_number(s as f64)),
        (None, Some(c)) => format!("+{}/click", c),
        (None, None) => upgrade.category().name().to_string(),
    }
}

fn render_shop(
    state: &GameState,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    for (index, key) in visible_upgrades(state).into_iter().zip(SHOP_KEYS.chars()) {
        let upgrade = &state.upgrades[index];
        let affordable = state.lines_of_code >= upgrade.cost as f64;
        let name_style = if affordable {
            Style::default()
                .fg(category_color(upgrade.category()))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.dim)
        };
        let cost_color = if affordable { palette.good } else { palette.bad };
        let owned = if upgrade.count > 0 {
            format!(" x{}", upgrade.count)
        } else {
            String::new()
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!("[{}] ", key), Style::default().fg(palette.accent)),
                Span::styled(format!("{}{}", upgrade.name, owned), name_style),
                Span::styled(
                    format!("  {} LOC", format_number(upgrade.cost as f64)),
                    Style::default().fg(cost_color),
                ),
                Span::styled(
                    format!("  {}", yield_text(upgrade)),
                    Style::default().fg(palette.dim),
                ),
            ]),
            ACTION_BUY_BASE + index as u16,
        );
    }

    let locked = state.upgrades.len() - cl.len();
    if locked > 0 {
        cl.push(Line::from(Span::styled(
            format!("  {} more unlock as your best score grows", locked),
            Style::default().fg(palette.dim),
        )));
    }

    // Keep the cheapest affordable rows in view on short screens.
    let visible_rows = area.height.saturating_sub(2) as usize;
    let scroll = cl.len().saturating_sub(visible_rows).min(first_unaffordable(state)) as u16;

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, scroll);
    let widget = Paragraph::new(cl.into_lines())
        .block(palette.block(" Shop "))
        .scroll((scroll, 0));
    f.render_widget(widget, area);
}

/// Shop position of the first upgrade the player cannot afford.
fn first_unaffordable(state: &GameState) -> usize {
    visible_upgrades(state)
        .iter()
        .position(|&i| state.lines_of_code < state.upgrades[i].cost as f64)
        .unwrap_or(0)
}

fn render_progress(
    state: &GameState,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();

    let streak = match state.next_streak_reward() {
        Some(tier) => Span::styled(
            format!(
                "🔥 {}-day streak · [S] claim {} LOC",
                state.streak_count,
                format_number(tier.reward as f64)
            ),
            Style::default()
                .fg(palette.good)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            format!("🔥 {}-day streak", state.streak_count),
            Style::default().fg(palette.fg),
        ),
    };
    cl.push_clickable(Line::from(streak), ACTION_CLAIM_STREAK);

    cl.push(Line::from(Span::styled(
        format!(
            "🏅 {}/{} achievements",
            state.unlocked_achievement_count(),
            state.achievements.len()
        ),
        Style::default().fg(palette.fg),
    )));
    for achievement in state.achievements.iter().filter(|a| a.unlocked) {
        cl.push(Line::from(Span::styled(
            format!("   ✓ {}", achievement.text),
            Style::default().fg(palette.good),
        )));
    }

    cl.push_clickable(
        Line::from(Span::styled(
            "🏆 Leaderboard · [L] save score",
            Style::default().fg(palette.accent),
        )),
        ACTION_SAVE_SCORE,
    );
    for (rank, entry) in state.leaderboard.iter().enumerate() {
        cl.push(Line::from(Span::styled(
            format!(
                "  {:>2}. {:<16} {}",
                rank + 1,
                entry.name,
                format_number(entry.score.floor())
            ),
            Style::default().fg(palette.fg),
        )));
    }

    cl.push_clickable(
        Line::from(Span::styled(
            format!("[T] theme: {}", state.theme.as_str()),
            Style::default().fg(palette.dim),
        )),
        ACTION_TOGGLE_THEME,
    );

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(palette.block(" Progress ")),
        area,
    );
}

fn render_log(state: &GameState, palette: &Palette, f: &mut Frame, area: Rect) {
    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .log
        .iter()
        .rev()
        .take(rows)
        .rev()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .block(palette.block(" Log "))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_footer(
    mode: &InputMode,
    palette: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let dim = Style::default().fg(palette.dim);
    let items: Vec<(Span, Option<u16>)> = match mode {
        InputMode::Play => vec![
            (Span::styled("[C] code", dim), Some(ACTION_CLICK)),
            (Span::styled("1-9 a-z buy", dim), None),
            (Span::styled("[G] grab bonus", dim), Some(ACTION_GRAB_BONUS)),
            (Span::styled("[R] refactor", dim), Some(ACTION_REFACTOR)),
            (Span::styled("[S] streak", dim), Some(ACTION_CLAIM_STREAK)),
            (Span::styled("[L] leaderboard", dim), Some(ACTION_SAVE_SCORE)),
            (Span::styled("[T] theme", dim), Some(ACTION_TOGGLE_THEME)),
        ],
        InputMode::NameEntry(name) => vec![
            (
                Span::styled(
                    format!("Name: {}▏", name),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                None,
            ),
            (Span::styled("[Enter] save", dim), Some(ACTION_NAME_SAVE)),
            (Span::styled("[Esc] cancel", dim), Some(ACTION_NAME_CANCEL)),
        ],
    };

    // Each hint is a target over its own columns, clipped to the footer.
    let mut cs = click_state.borrow_mut();
    let mut spans = Vec::new();
    let mut x = area.x;
    for (i, (span, action)) in items.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
            x = x.saturating_add(2);
        }
        let width = span.width() as u16;
        if let Some(action) = action {
            if x < area.right() && area.height > 0 {
                let visible = width.min(area.right() - x);
                cs.add_click_target(Rect::new(x, area.y, visible, 1), action);
            }
        }
        spans.push(span);
        x = x.saturating_add(width);
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left),
        area,
    );
}
