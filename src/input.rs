//! Input normalization: keyboard and pointer events become [`InputEvent`]s,
//! and pointer positions are resolved against click targets registered by
//! the renderer on every frame.

use ratzilla::ratatui::layout::Rect;

/// Input events after normalization from keyboard, mouse and touch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    Enter,
    Escape,
    Backspace,
    /// A press on a registered target, carrying its action ID.
    Click(u16),
}

/// A clickable region in terminal cell coordinates.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Targets from the last drawn frame, plus the terminal size they were laid
/// out for. Shared between the draw loop and the mouse handler.
#[derive(Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame at the given terminal size.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register `row` as a full-width target inside `area`. Rows outside the
    /// area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action at a cell. Later targets win where targets overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                let r = t.rect;
                col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|t| t.action_id)
    }

    /// Resolve a pixel position relative to the grid's top-left corner.
    pub fn hit_test_pixels(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_to_cell(x, grid_width, self.terminal_cols)?;
        let row = pixel_to_cell(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// Below this width the panels stack vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 80
}

/// Map a pixel offset along one axis to a cell index. `None` when the offset
/// falls outside the grid or the grid has no size.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
