//! Clickable line lists for the shop and bonus panels.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

/// Lines paired with the action each clickable line triggers. Targets follow
/// their line, so inserting a header shifts every target below it.
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line index, action id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register one row target per clickable line. `top_offset` and
    /// `bottom_offset` are the border rows of `area`, `scroll` the number of
    /// lines scrolled out above. Lines are assumed not to wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            if line_idx < scroll {
                continue;
            }
            let row = content_y + (line_idx - scroll);
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_lines() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Shop"));
        cl.push_clickable(Line::from("Junior Dev"), 200);
        cl.push_clickable(Line::from("Mid-Level Dev"), 201);
        cl.push(Line::from("footer"));
        assert_eq!(cl.len(), 4);

        let area = Rect::new(0, 5, 60, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);
        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(3, 7), Some(200));
        assert_eq!(cs.hit_test(3, 8), Some(201));
        assert_eq!(cs.hit_test(3, 6), None);
    }

    #[test]
    fn scrolled_and_clipped_lines_have_no_target() {
        let mut cl = ClickableList::new();
        for i in 0..10u16 {
            cl.push_clickable(Line::from(format!("item {}", i)), 100 + i);
        }
        // 3 content rows between the borders, first 2 lines scrolled away.
        let area = Rect::new(0, 0, 40, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 2);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(0, 1), Some(102));
        assert_eq!(cs.hit_test(0, 3), Some(104));
        assert_eq!(cs.hit_test(0, 4), None);
    }

    #[test]
    fn empty_list_registers_nothing() {
        let cl = ClickableList::new();
        assert!(cl.is_empty());
        let mut cs = ClickState::new();
        cl.register_targets(Rect::new(0, 0, 10, 10), &mut cs, 0, 0, 0);
        assert!(cs.targets.is_empty());
    }
}
