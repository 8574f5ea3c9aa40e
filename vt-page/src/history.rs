//! Scrollback: lines that have scrolled off the top of the visible page,
//! held in eviction order and bounded so a very long session doesn't grow
//! without limit.
//!
//! The source keeps scrollback as part of the same `Vec<Line>` that backs
//! the visible screen, trimmed from the front once it exceeds
//! `scrollback_size`. Splitting it into its own ring here keeps `Page`'s
//! invariant ("exactly `height` visible lines") independent of how much
//! history is retained, which is how the combining-mark and
//! scroll-with-history tests want to exercise it.

use std::collections::VecDeque;

use crate::cell::Attributes;
use crate::line::Line;

pub const DEFAULT_MAX_LINES: usize = 4096;

#[derive(Debug, PartialEq, Eq)]
pub struct History {
    lines: VecDeque<Line>,
    max_lines: usize,
}

impl Default for History {
    fn default() -> History {
        History::with_capacity(DEFAULT_MAX_LINES)
    }
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    pub fn with_capacity(max_lines: usize) -> History {
        History { lines: VecDeque::new(), max_lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Push a line that has just scrolled off the page. Evicts the oldest
    /// line if this push would exceed `max_lines`.
    pub fn push(&mut self, line: Line) {
        if self.max_lines == 0 {
            return;
        }
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Pop the most recently scrolled-off line back onto the page, widened
    /// or narrowed to `new_width` to match the page's current geometry.
    pub fn pop(&mut self, new_width: usize, attr: Attributes, age: u64) -> Option<Line> {
        let mut line = self.lines.pop_back()?;
        line.set_width(new_width, attr, age);
        Some(line)
    }

    /// Return up to `max` most recent lines in their original top-to-
    /// bottom order, without removing them, each reserved to at least
    /// `reserve_width` columns. Used to reflow scrollback for a resize
    /// without disturbing it.
    pub fn peek(&self, max: usize, reserve_width: usize, attr: Attributes, age: u64) -> Vec<Line> {
        let n = max.min(self.lines.len());
        let skip = self.lines.len() - n;
        self.lines
            .iter()
            .skip(skip)
            .map(|line| {
                let mut line = line.clone();
                line.reserve(reserve_width, attr, age);
                line
            })
            .collect()
    }

    /// Reconfigure the retention bound, evicting from the front until the
    /// new bound is satisfied.
    pub fn trim(&mut self, max: usize) {
        self.max_lines = max;
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_evicts_oldest_past_capacity() {
        let mut hist = History::with_capacity(2);
        hist.push(Line::new(4, Attributes::default(), 0));
        hist.push(Line::new(4, Attributes::default(), 1));
        hist.push(Line::new(4, Attributes::default(), 2));
        assert_eq!(hist.len(), 2);
        let peeked = hist.peek(2, 4, Attributes::default(), 0);
        assert_eq!(peeked[0].cells()[0].age, 1);
        assert_eq!(peeked[1].cells()[0].age, 2);
    }

    #[test]
    fn pop_resizes_to_new_width() {
        let mut hist = History::new();
        hist.push(Line::new(3, Attributes::default(), 0));
        let line = hist.pop(6, Attributes::default(), 1).unwrap();
        assert_eq!(line.len(), 6);
        assert!(hist.is_empty());
    }

    #[test]
    fn trim_lowers_capacity_and_evicts() {
        let mut hist = History::new();
        for age in 0..5 {
            hist.push(Line::new(2, Attributes::default(), age));
        }
        hist.trim(2);
        assert_eq!(hist.len(), 2);
        let peeked = hist.peek(2, 2, Attributes::default(), 0);
        assert_eq!(peeked[0].cells()[0].age, 3);
    }

    #[test]
    fn clear_empties_history() {
        let mut hist = History::new();
        hist.push(Line::new(2, Attributes::default(), 0));
        hist.clear();
        assert!(hist.is_empty());
    }
}
