use std::{cell::RefCell, io, rc::Rc};

use code_clicker::clicker::ClickerGame;
use code_clicker::config::{ClickerConfig, CONFIG_KEY};
use code_clicker::input::{ClickState, InputEvent};
use code_clicker::storage::KeyValueStore;
use code_clicker::time::GameTime;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

#[cfg(target_arch = "wasm32")]
type Store = code_clicker::storage::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
type Store = code_clicker::storage::MemoryStore;

const MS_PER_DAY: f64 = 86_400_000.0;

fn init_logging(level: log::Level) {
    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(level).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        env_logger::Builder::new()
            .filter_level(level.to_level_filter())
            .init();
    }
}

/// Monotonic milliseconds for the frame clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Browser viewport size in CSS pixels.
fn viewport_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Resolve a pointer position against the targets of the last frame.
fn dom_hit_test(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let document = web_sys::window()?.document()?;
    // DomBackend renders its grid as the first <div> in <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let hit = cs.hit_test_pixels(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    );
    log::trace!("click at ({}, {}) -> {:?}", mouse_x, mouse_y, hit);
    hit
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let store = Store::default();
    let mut config = store
        .get(CONFIG_KEY)
        .map(|json| ClickerConfig::from_json(&json))
        .unwrap_or_default();
    init_logging(config.log_level());
    config.seed.get_or_insert(js_sys::Date::now() as u64);

    let mut game = ClickerGame::new(store, &config);
    if let Some((width, height)) = viewport_size() {
        game.set_viewport(width, height);
    }
    game.subscribe(|_, changes| {
        let keys: Vec<&str> = changes.keys().map(|k| k.as_str()).collect();
        if !keys.is_empty() {
            log::trace!("saved {:?}", keys);
        }
    });
    game.record_visit((js_sys::Date::now() / MS_PER_DAY).floor() as i64);
    log::info!(
        "code clicker started: {} LOC, best {}",
        game.state().lines_of_code,
        game.state().best_score
    );

    let game = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_hit_test(mouse_event.x, mouse_event.y, &cs)
            };
            if let Some(action) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Enter => InputEvent::Enter,
                KeyCode::Esc => InputEvent::Escape,
                KeyCode::Backspace => InputEvent::Backspace,
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    let time = RefCell::new(GameTime::new(config.max_frame_ms));
    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = time.borrow_mut().update(now_ms());
            let mut game = game.borrow_mut();
            if let Some((width, height)) = viewport_size() {
                game.set_viewport(width, height);
            }
            if ticks > 0 {
                game.tick(ticks);
            }

            let area = f.area();
            click_state
                .borrow_mut()
                .begin_frame(area.width, area.height);
            game.render(f, area, &click_state);
        }
    });

    Ok(())
}
