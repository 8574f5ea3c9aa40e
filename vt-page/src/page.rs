//! The visible grid: exactly `height` lines of `width` cells, a scroll
//! region, and a handle onto the [`History`] that receives (and returns)
//! whatever scrolls off the top.
//!
//! Grounded on the source's `Screen`, which keeps visible rows and
//! scrollback in one `VecDeque` and distinguishes them only by an offset
//! (`phys_row`). Splitting scrollback into its own type means `Page`'s
//! `lines` is always exactly `height` long — an invariant the source
//! doesn't get to state so plainly because its backing store is shared.
//! `scroll_up`/`scroll_down`/`resize` still follow the source's margin
//! handling and bottom-gravity behavior closely.

use std::ops::Range;

use crate::cell::{Attributes, Cell};
use crate::history::History;
use crate::line::Line;

#[derive(Debug, PartialEq, Eq)]
pub struct Page {
    lines: Vec<Line>,
    width: usize,
    height: usize,
    scroll_idx: usize,
    scroll_num: usize,
    /// Net rows of genuine scrollback currently outstanding: incremented
    /// by `scroll_up` at the true top margin, decremented by `scroll_down`
    /// only by however many rows it actually recovers from history.
    scroll_fill: usize,
    age: u64,
    history: History,
}

impl Page {
    pub fn new(width: usize, height: usize) -> Page {
        let width = width.max(1);
        let height = height.max(1);
        let attr = Attributes::default();
        Page {
            lines: (0..height).map(|_| Line::new(width, attr, 0)).collect(),
            width,
            height,
            scroll_idx: 0,
            scroll_num: height,
            scroll_fill: 0,
            age: 0,
            history: History::new(),
        }
    }

    /// Symmetry with the source's explicit new/free pairing. Rust drops
    /// `page` on return; kept only so call sites that mirror that pairing
    /// have something to call.
    pub fn free(_page: Page) {}

    fn bump_age(&mut self) -> u64 {
        self.age += 1;
        self.age
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn scroll_region(&self) -> Range<usize> {
        self.scroll_idx..self.scroll_idx + self.scroll_num
    }

    pub fn get_cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.lines.get(y)?.cells().get(x)
    }

    pub fn line(&self, y: usize) -> Option<&Line> {
        self.lines.get(y)
    }

    /// Pre-grow the backing `Vec`'s capacity ahead of an anticipated
    /// resize, avoiding the reallocate-and-copy the source performs
    /// lazily inside `resize` itself.
    pub fn reserve(&mut self, additional_rows: usize) {
        self.lines.reserve(additional_rows);
    }

    pub fn write(&mut self, x: usize, y: usize, cp: u32, attr: Attributes) {
        let age = self.bump_age();
        if let Some(line) = self.lines.get_mut(y) {
            line.write(x, cp, attr, age);
        }
    }

    pub fn combine(&mut self, x: usize, y: usize, cp: u32) {
        self.bump_age();
        if let Some(line) = self.lines.get_mut(y) {
            line.combine(x, cp);
        }
    }

    pub fn insert_cells(&mut self, x: usize, y: usize, cell: Cell) {
        self.bump_age();
        if let Some(line) = self.lines.get_mut(y) {
            line.insert(x, cell);
            line.set_width(self.width, Attributes::default(), self.age);
        }
    }

    pub fn delete_cells(&mut self, x: usize, y: usize, attr: Attributes) {
        let age = self.bump_age();
        if let Some(line) = self.lines.get_mut(y) {
            line.delete(x, attr, age);
        }
    }

    /// Append a new blank row at the very bottom of the page, regardless
    /// of the scroll region, pushing the current top row into history.
    /// This is the plain (no active margins) linefeed-past-bottom path.
    pub fn append(&mut self, attr: Attributes) {
        let age = self.bump_age();
        let evicted = self.lines.remove(0);
        self.history.push(evicted);
        self.scroll_fill = self.scroll_fill.saturating_add(1);
        self.lines.push(Line::new(self.width, attr, age));
    }

    /// Erase the reading-order range from `(from_row, from_col)` through
    /// and including `(to_row, to_col)`. A single-row range erases just
    /// that column span; a multi-row range erases a partial first row,
    /// full rows in between, and a partial last row. When `keep_protected`
    /// is set, cells with `attr.protect` survive untouched (DECSED/DECSEL
    /// selective erase); plain ED/EL pass `false`.
    pub fn erase(
        &mut self,
        from: (usize, usize),
        to: (usize, usize),
        attr: Attributes,
        keep_protected: bool,
    ) {
        let age = self.bump_age();
        let (from_row, from_col) = from;
        let (to_row, to_col) = to;
        if from_row >= self.lines.len() || from_row > to_row {
            return;
        }
        if from_row == to_row {
            if let Some(line) = self.lines.get_mut(from_row) {
                let end = to_col.saturating_add(1).min(line.len());
                line.erase(from_col..end, attr, age, keep_protected);
            }
            return;
        }
        if let Some(line) = self.lines.get_mut(from_row) {
            let w = line.len();
            line.erase(from_col..w, attr, age, keep_protected);
        }
        let last_row = to_row.min(self.lines.len().saturating_sub(1));
        for row in (from_row + 1)..last_row {
            if let Some(line) = self.lines.get_mut(row) {
                let w = line.len();
                line.erase(0..w, attr, age, keep_protected);
            }
        }
        // `last_row` can clamp down to `from_row` when `to_row` names a row
        // past the page's end; in that case `from_row`'s partial erase
        // above already covered it and re-erasing here would blank columns
        // before `from_col` that the caller never asked to touch.
        if last_row > from_row {
            if let Some(line) = self.lines.get_mut(last_row) {
                let w = line.len();
                let end = to_col.saturating_add(1).min(w);
                line.erase(0..end, attr, age, keep_protected);
            }
        }
    }

    pub fn reset(&mut self, attr: Attributes) {
        let age = self.bump_age();
        for line in &mut self.lines {
            line.reset(attr, age);
        }
        self.scroll_idx = 0;
        self.scroll_num = self.height;
        self.scroll_fill = 0;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.scroll_fill = 0;
    }

    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let top = top.min(self.height.saturating_sub(1));
        let bottom = bottom.clamp(top + 1, self.height);
        self.scroll_idx = top;
        self.scroll_num = bottom - top;
    }

    /// Scroll the active region up by `num_rows`. Rows scrolled past the
    /// top of the region are discarded unless the region starts at row 0,
    /// in which case they're handed to history.
    pub fn scroll_up(&mut self, num_rows: usize, attr: Attributes) {
        let age = self.bump_age();
        let region = self.scroll_region();
        let num_rows = num_rows.min(region.len());
        if num_rows == 0 {
            return;
        }
        let goes_to_history = self.scroll_idx == 0;
        for _ in 0..num_rows {
            let line = self.lines.remove(region.start);
            if goes_to_history {
                self.history.push(line);
                self.scroll_fill = self.scroll_fill.saturating_add(1);
            }
            self.lines.insert(region.end - 1, Line::new(self.width, attr, age));
        }
    }

    /// Scroll the active region down by `num_rows`. If the region starts
    /// at row 0, rows are recovered from history where available; any
    /// shortfall is filled with blanks. `scroll_fill` only decreases by
    /// the number of rows actually recovered, never by `num_rows` itself.
    pub fn scroll_down(&mut self, num_rows: usize, attr: Attributes) {
        let age = self.bump_age();
        let region = self.scroll_region();
        let num_rows = num_rows.min(region.len());
        if num_rows == 0 {
            return;
        }
        let recover_from_history = self.scroll_idx == 0;
        for _ in 0..num_rows {
            self.lines.remove(region.end - 1);
            let line = if recover_from_history {
                match self.history.pop(self.width, attr, age) {
                    Some(line) => {
                        self.scroll_fill = self.scroll_fill.saturating_sub(1);
                        line
                    }
                    None => Line::new(self.width, attr, age),
                }
            } else {
                Line::new(self.width, attr, age)
            };
            self.lines.insert(region.start, line);
        }
    }

    /// Insert `n` blank lines at `y` within the scroll region, shifting
    /// subsequent lines in the region down and discarding whatever falls
    /// off the region's bottom.
    pub fn insert_lines(&mut self, y: usize, n: usize, attr: Attributes) {
        let age = self.bump_age();
        let region = self.scroll_region();
        if y < region.start || y >= region.end {
            return;
        }
        let n = n.min(region.end - y);
        for _ in 0..n {
            self.lines.remove(region.end - 1);
            self.lines.insert(y, Line::new(self.width, attr, age));
        }
    }

    /// Delete `n` lines at `y` within the scroll region, shifting
    /// subsequent lines in the region up and padding the region's bottom
    /// with blanks.
    pub fn delete_lines(&mut self, y: usize, n: usize, attr: Attributes) {
        let age = self.bump_age();
        let region = self.scroll_region();
        if y < region.start || y >= region.end {
            return;
        }
        let n = n.min(region.end - y);
        for _ in 0..n {
            self.lines.remove(y);
            self.lines.insert(region.end - 1, Line::new(self.width, attr, age));
        }
    }

    /// Resize to `new_width` x `new_height`. Width changes resize every
    /// line in place. Height increases pull rows back from history first
    /// (bottom-gravity, revealing more scrollback before growing blank
    /// space); height decreases push the topmost rows into history.
    pub fn resize(&mut self, new_width: usize, new_height: usize, attr: Attributes) {
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);
        let age = self.bump_age();

        if new_width != self.width {
            for line in &mut self.lines {
                line.set_width(new_width, attr, age);
            }
            self.width = new_width;
        }

        if new_height > self.height {
            let mut to_add = new_height - self.height;
            while to_add > 0 {
                match self.history.pop(self.width, attr, age) {
                    Some(line) => {
                        self.scroll_fill = self.scroll_fill.saturating_sub(1);
                        self.lines.insert(0, line);
                    }
                    None => self.lines.insert(0, Line::new(self.width, attr, age)),
                }
                to_add -= 1;
            }
        } else if new_height < self.height {
            let to_remove = self.height - new_height;
            for _ in 0..to_remove {
                let line = self.lines.remove(0);
                self.history.push(line);
                self.scroll_fill = self.scroll_fill.saturating_add(1);
            }
        }

        self.height = new_height;
        self.scroll_idx = 0;
        self.scroll_num = self.height;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_page_has_height_lines_of_width_columns() {
        let page = Page::new(80, 24);
        assert_eq!(page.height(), 24);
        for y in 0..24 {
            assert_eq!(page.line(y).unwrap().len(), 80);
        }
    }

    #[test]
    fn scroll_up_from_top_feeds_history() {
        let mut page = Page::new(4, 3);
        page.write(0, 0, 'a' as u32, Attributes::default());
        page.scroll_up(1, Attributes::default());
        assert_eq!(page.history().len(), 1);
        let mut buf = [0u32; 4];
        assert_eq!(
            page.history().peek(1, 4, Attributes::default(), 0)[0].cells()[0]
                .ch
                .resolve(&mut buf),
            &['a' as u32]
        );
    }

    #[test]
    fn scroll_down_recovers_from_history() {
        let mut page = Page::new(4, 3);
        page.write(0, 0, 'a' as u32, Attributes::default());
        page.scroll_up(1, Attributes::default());
        page.scroll_down(1, Attributes::default());
        assert_eq!(page.history().len(), 0);
        let mut buf = [0u32; 4];
        assert_eq!(page.get_cell(0, 0).unwrap().ch.resolve(&mut buf), &['a' as u32]);
    }

    #[test]
    fn scroll_down_past_empty_history_fills_blank_without_underflow() {
        let mut page = Page::new(4, 3);
        page.scroll_down(2, Attributes::default());
        assert!(page.get_cell(0, 0).unwrap().is_blank());
    }

    #[test]
    fn scroll_within_restricted_region_does_not_touch_history() {
        let mut page = Page::new(4, 5);
        page.set_scroll_region(1, 4);
        page.write(0, 1, 'a' as u32, Attributes::default());
        page.scroll_up(1, Attributes::default());
        assert_eq!(page.history().len(), 0);
    }

    #[test]
    fn resize_taller_pulls_from_history_before_blank() {
        let mut page = Page::new(4, 2);
        page.write(0, 0, 'a' as u32, Attributes::default());
        page.scroll_up(1, Attributes::default());
        page.resize(4, 3, Attributes::default());
        assert_eq!(page.height(), 3);
        let mut buf = [0u32; 4];
        assert_eq!(page.get_cell(0, 0).unwrap().ch.resolve(&mut buf), &['a' as u32]);
    }

    #[test]
    fn erase_spanning_rows_clamps_to_reading_order_range() {
        let mut page = Page::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                page.write(x, y, 'x' as u32, Attributes::default());
            }
        }
        // inclusive of (2, 1): row0 cols 2..=3, row1 all, row2 cols 0..=1
        page.erase((0, 2), (2, 1), Attributes::default(), false);
        assert!(page.get_cell(2, 0).unwrap().is_blank());
        assert!(!page.get_cell(1, 0).unwrap().is_blank());
        assert!(page.get_cell(3, 1).unwrap().is_blank());
        assert!(page.get_cell(0, 2).unwrap().is_blank());
        assert!(page.get_cell(1, 2).unwrap().is_blank());
        assert!(!page.get_cell(2, 2).unwrap().is_blank());
    }

    #[test]
    fn erase_single_row_is_inclusive_of_to_col() {
        let mut page = Page::new(4, 1);
        for x in 0..4 {
            page.write(x, 0, 'x' as u32, Attributes::default());
        }
        page.erase((0, 1), (0, 2), Attributes::default(), false);
        assert!(!page.get_cell(0, 0).unwrap().is_blank());
        assert!(page.get_cell(1, 0).unwrap().is_blank());
        assert!(page.get_cell(2, 0).unwrap().is_blank());
        assert!(!page.get_cell(3, 0).unwrap().is_blank());
    }

    #[test]
    fn erase_keep_protected_spares_protected_cells() {
        let protected = Attributes { protect: true, ..Attributes::default() };
        let mut page = Page::new(4, 1);
        page.write(0, 0, 'a' as u32, Attributes::default());
        page.lines[0].place(1, Cell::new('b' as u32, protected, 0));
        page.erase((0, 0), (0, 3), Attributes::default(), true);
        assert!(page.get_cell(0, 0).unwrap().is_blank());
        assert!(!page.get_cell(1, 0).unwrap().is_blank());
    }
}
