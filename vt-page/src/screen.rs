//! The consumer-facing façade: feeds bytes through the parser, applies
//! whatever it recognises to a [`Page`], and exposes just enough surface
//! for a caller that owns the PTY and the renderer.
//!
//! Grounded on the source's `impl vte::Perform for TerminalState`, which
//! is the same shape — one big dispatch over parsed actions mutating
//! cursor/page state — adapted from `vte`'s byte-oriented callbacks to
//! dispatch over this crate's own [`vt_parser::Command`] classification.

use std::ops::Range;

use log::debug;
use vt_parser::{Codepoint, Command, Event, Parser, Sequence, Utf8Decoder};

use crate::cell::{Attributes, Cell};
use crate::color::Color;
use crate::error::Error;
use crate::page::Page;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SavedCursor {
    x: usize,
    y: usize,
    attr: Attributes,
}

/// Terminal model: owns the page, the parser, and cursor/rendition state
/// that isn't part of the grid itself.
#[derive(Debug, PartialEq, Eq)]
pub struct Screen {
    page: Page,
    parser: Parser,
    decoder: Utf8Decoder,
    cursor_x: usize,
    cursor_y: usize,
    attr: Attributes,
    saved: Option<SavedCursor>,
    answerback: String,
    /// Raw bytes queued for the host in response to status/identify
    /// requests (DA, DSR, ENQ). Actual PTY delivery is the caller's job.
    pending_reply: Vec<u8>,
}

fn default_scroll_region(height: usize) -> Range<usize> {
    0..height
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Screen {
        Screen {
            page: Page::new(width, height),
            parser: Parser::new(),
            decoder: Utf8Decoder::new(),
            cursor_x: 0,
            cursor_y: 0,
            attr: Attributes::default(),
            saved: None,
            answerback: String::new(),
            pending_reply: Vec::new(),
        }
    }

    /// Like [`Screen::new`], but rejects a degenerate `0x0` (or smaller)
    /// geometry instead of silently clamping it to `1x1`. A caller wiring
    /// up a Screen from untrusted window-size reports should prefer this.
    pub fn try_new(width: usize, height: usize) -> Result<Screen, Error> {
        if width == 0 {
            return Err(Error::InvalidArgument("width must be at least 1"));
        }
        if height == 0 {
            return Err(Error::InvalidArgument("height must be at least 1"));
        }
        Ok(Screen::new(width, height))
    }

    pub fn get_width(&self) -> usize {
        self.page.width()
    }

    pub fn get_height(&self) -> usize {
        self.page.height()
    }

    pub fn get_age(&self) -> u64 {
        self.page.age()
    }

    pub fn set_answerback(&mut self, s: impl Into<String>) {
        self.answerback = s.into();
    }

    /// Raw cell contents for a renderer to walk. What to do with them
    /// (shape into glyph runs, apply a color palette) is out of scope.
    pub fn draw(&self) -> &Page {
        &self.page
    }

    /// Bytes the emulator wants to send back to the host (status
    /// reports, identify responses), drained by the caller after a call
    /// to `feed_text`.
    pub fn take_pending_reply(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending_reply)
    }

    /// Record raw key input bound for the host. Encoding a keypress into
    /// the right escape sequence for the active keyboard mode is a
    /// separate, out-of-scope input layer; this just forwards bytes.
    pub fn feed_keyboard(&mut self, bytes: &[u8]) {
        self.pending_reply.extend_from_slice(bytes);
    }

    pub fn feed_text(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            for &cp in self.decoder.decode(byte).to_vec().iter() {
                self.feed_codepoint(cp);
            }
        }
    }

    fn feed_codepoint(&mut self, cp: Codepoint) {
        let (event, seq) = self.parser.feed(cp);
        match event {
            Event::Graphic => self.print(cp),
            Event::Control => {
                if let Some(seq) = seq {
                    let command = seq.command;
                    self.dispatch_control(command);
                }
            }
            Event::Escape => {
                if let Some(seq) = seq {
                    let command = seq.command;
                    self.dispatch_escape(command);
                }
            }
            Event::Csi => {
                if let Some(seq) = seq {
                    let seq = seq.clone();
                    self.dispatch_csi(&seq);
                }
            }
            Event::Dcs | Event::Osc => {
                // Payload dispatch for DCS/OSC (e.g. OSC 4 palette sets,
                // DECRQSS) is out of scope; classified but unacted on.
            }
            Event::None | Event::Ignore => {}
        }
    }

    fn scroll_region(&self) -> Range<usize> {
        self.page.scroll_region()
    }

    fn clamp_cursor(&mut self) {
        let width = self.page.width().max(1);
        let height = self.page.height().max(1);
        self.cursor_x = self.cursor_x.min(width - 1);
        self.cursor_y = self.cursor_y.min(height - 1);
    }

    fn print(&mut self, cp: Codepoint) {
        let width = self.page.width();
        if self.cursor_x >= width {
            self.newline();
            self.cursor_x = 0;
        }
        self.page.write(self.cursor_x, self.cursor_y, cp, self.attr);
        let cw = self.page.get_cell(self.cursor_x, self.cursor_y).map(|c| c.cwidth).unwrap_or(1);
        self.cursor_x += cw.max(1) as usize;
    }

    fn newline(&mut self) {
        let region = self.scroll_region();
        if self.cursor_y + 1 >= region.end {
            if region == default_scroll_region(self.page.height()) {
                self.page.append(self.attr);
            } else {
                self.page.scroll_up(1, self.attr);
            }
        } else {
            self.cursor_y += 1;
        }
    }

    fn reverse_newline(&mut self) {
        let region = self.scroll_region();
        if self.cursor_y == region.start {
            self.page.scroll_down(1, self.attr);
        } else if self.cursor_y > 0 {
            self.cursor_y -= 1;
        }
    }

    fn dispatch_control(&mut self, command: Command) {
        match command {
            Command::LF | Command::VT | Command::FF => self.newline(),
            Command::CR => self.cursor_x = 0,
            Command::BS => self.cursor_x = self.cursor_x.saturating_sub(1),
            Command::HT => {
                let width = self.page.width();
                self.cursor_x = ((self.cursor_x / 8) + 1).saturating_mul(8).min(width - 1);
            }
            Command::IND => self.newline(),
            Command::NEL => {
                self.newline();
                self.cursor_x = 0;
            }
            Command::RI => self.reverse_newline(),
            Command::ENQ => self.pending_reply.extend_from_slice(self.answerback.as_bytes()),
            _ => debug!("unhandled control command {:?}", command),
        }
    }

    fn dispatch_escape(&mut self, command: Command) {
        match command {
            Command::RIS => self.hard_reset(),
            Command::DECSTR => self.soft_reset(),
            Command::DECSC => self.save_cursor(),
            Command::DECRC => self.restore_cursor(),
            Command::DECALN => self.fill_screen_with_e(),
            Command::IND => self.newline(),
            Command::NEL => {
                self.newline();
                self.cursor_x = 0;
            }
            Command::RI => self.reverse_newline(),
            _ => debug!("unhandled escape command {:?}", command),
        }
    }

    fn save_cursor(&mut self) {
        self.saved = Some(SavedCursor { x: self.cursor_x, y: self.cursor_y, attr: self.attr });
    }

    fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved {
            self.cursor_x = saved.x;
            self.cursor_y = saved.y;
            self.attr = saved.attr;
            self.clamp_cursor();
        }
    }

    fn fill_screen_with_e(&mut self) {
        let (width, height) = (self.page.width(), self.page.height());
        for y in 0..height {
            for x in 0..width {
                self.page.write(x, y, 'E' as u32, Attributes::default());
            }
        }
    }

    fn dispatch_csi(&mut self, seq: &Sequence) {
        let width = self.page.width();
        let height = self.page.height();
        match seq.command {
            Command::CUU => self.cursor_y = self.cursor_y.saturating_sub(arg1(seq)),
            Command::CUD => self.cursor_y = (self.cursor_y + arg1(seq)).min(height - 1),
            Command::CUF => self.cursor_x = (self.cursor_x + arg1(seq)).min(width - 1),
            Command::CUB => self.cursor_x = self.cursor_x.saturating_sub(arg1(seq)),
            Command::CNL => {
                self.cursor_y = (self.cursor_y + arg1(seq)).min(height - 1);
                self.cursor_x = 0;
            }
            Command::CPL => {
                self.cursor_y = self.cursor_y.saturating_sub(arg1(seq));
                self.cursor_x = 0;
            }
            Command::CHA | Command::HPA => {
                self.cursor_x = (arg1(seq) - 1).min(width.saturating_sub(1));
            }
            Command::VPA => {
                self.cursor_y = (arg1(seq) - 1).min(height.saturating_sub(1));
            }
            Command::CUP | Command::HVP => {
                let row = seq.arg_or(0, 1).max(1) as usize - 1;
                let col = seq.arg_or(1, 1).max(1) as usize - 1;
                self.cursor_y = row.min(height - 1);
                self.cursor_x = col.min(width - 1);
            }
            Command::ED => self.erase_display(seq.arg_or(0, 0), false),
            Command::EL => self.erase_line(seq.arg_or(0, 0), false),
            Command::DECSED => self.erase_display(seq.arg_or(0, 0), true),
            Command::DECSEL => self.erase_line(seq.arg_or(0, 0), true),
            Command::DECSCA => self.attr.protect = seq.arg_or(0, 0) == 1,
            Command::ICH => {
                let n = arg1(seq);
                for _ in 0..n {
                    self.page.insert_cells(
                        self.cursor_x,
                        self.cursor_y,
                        Cell::blank(self.attr, self.page.age()),
                    );
                }
            }
            Command::DCH => {
                let n = arg1(seq);
                for _ in 0..n {
                    self.page.delete_cells(self.cursor_x, self.cursor_y, self.attr);
                }
            }
            Command::ECH => {
                let n = arg1(seq);
                if n > 0 {
                    self.page.erase(
                        (self.cursor_y, self.cursor_x),
                        (self.cursor_y, (self.cursor_x + n - 1).min(width.saturating_sub(1))),
                        self.attr,
                        false,
                    );
                }
            }
            Command::IL => self.page.insert_lines(self.cursor_y, arg1(seq), self.attr),
            Command::DL => self.page.delete_lines(self.cursor_y, arg1(seq), self.attr),
            Command::SU => self.page.scroll_up(arg1(seq), self.attr),
            Command::SD => self.page.scroll_down(arg1(seq), self.attr),
            Command::DECSTBM => {
                let top = seq.arg_or(0, 1).max(1) as usize - 1;
                let bottom = seq.arg_or(1, height as i32).max(1) as usize;
                self.page.set_scroll_region(top, bottom);
                self.cursor_x = 0;
                self.cursor_y = 0;
            }
            Command::SGR => self.apply_sgr(seq),
            Command::RIS => self.hard_reset(),
            Command::DECSTR => self.soft_reset(),
            Command::RC => self.restore_cursor(),
            _ => debug!("unhandled csi command {:?}", seq.command),
        }
    }

    /// ED: erase the display. `to`/`from` are inclusive of both endpoints,
    /// so mode 1 (start of screen through the cursor) and mode 0 (cursor
    /// through end of screen) both cover the cursor cell itself, matching
    /// xterm/VT behavior.
    fn erase_display(&mut self, mode: i32, keep_protected: bool) {
        let (width, height) = (self.page.width(), self.page.height());
        let last_col = width.saturating_sub(1);
        let last_row = height.saturating_sub(1);
        match mode {
            0 => self.page.erase((self.cursor_y, self.cursor_x), (last_row, last_col), self.attr, keep_protected),
            1 => self.page.erase((0, 0), (self.cursor_y, self.cursor_x), self.attr, keep_protected),
            2 | 3 => self.page.erase((0, 0), (last_row, last_col), self.attr, keep_protected),
            _ => {}
        }
    }

    /// EL: erase the line. Inclusive endpoints, same reasoning as
    /// [`erase_display`](Self::erase_display).
    fn erase_line(&mut self, mode: i32, keep_protected: bool) {
        let last_col = self.page.width().saturating_sub(1);
        match mode {
            0 => self.page.erase((self.cursor_y, self.cursor_x), (self.cursor_y, last_col), self.attr, keep_protected),
            1 => self.page.erase((self.cursor_y, 0), (self.cursor_y, self.cursor_x), self.attr, keep_protected),
            2 => self.page.erase((self.cursor_y, 0), (self.cursor_y, last_col), self.attr, keep_protected),
            _ => {}
        }
    }

    fn apply_sgr(&mut self, seq: &Sequence) {
        if seq.n_args == 0 {
            self.attr = Attributes::default();
            return;
        }
        let mut i = 0;
        while i < seq.n_args {
            let code = seq.arg_or(i, 0);
            match code {
                0 => self.attr = Attributes::default(),
                1 => self.attr.bold = true,
                3 => self.attr.italic = true,
                4 => self.attr.underline = true,
                5 => self.attr.blink = true,
                7 => self.attr.inverse = true,
                8 => self.attr.hidden = true,
                22 => self.attr.bold = false,
                23 => self.attr.italic = false,
                24 => self.attr.underline = false,
                25 => self.attr.blink = false,
                27 => self.attr.inverse = false,
                28 => self.attr.hidden = false,
                30..=37 => self.attr.foreground = named_from_ansi((code - 30) as u8),
                39 => self.attr.foreground = Color::Default,
                40..=47 => self.attr.background = named_from_ansi((code - 40) as u8),
                49 => self.attr.background = Color::Default,
                90..=97 => self.attr.foreground = named_from_ansi((code - 90) as u8 + 8),
                100..=107 => self.attr.background = named_from_ansi((code - 100) as u8 + 8),
                38 | 48 => {
                    let is_fg = code == 38;
                    match seq.arg_or(i + 1, -1) {
                        5 => {
                            let idx = seq.arg_or(i + 2, 0) as u8;
                            let color = Color::Palette256(idx);
                            if is_fg {
                                self.attr.foreground = color;
                            } else {
                                self.attr.background = color;
                            }
                            i += 2;
                        }
                        2 => {
                            let r = seq.arg_or(i + 2, 0) as u8;
                            let g = seq.arg_or(i + 3, 0) as u8;
                            let b = seq.arg_or(i + 4, 0) as u8;
                            let color = Color::Rgb(r, g, b);
                            if is_fg {
                                self.attr.foreground = color;
                            } else {
                                self.attr.background = color;
                            }
                            i += 4;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.page.resize(width, height, self.attr);
        self.clamp_cursor();
    }

    /// ESC c (RIS): blank the page, clear history, reset cursor/rendition.
    pub fn hard_reset(&mut self) {
        self.page.reset(Attributes::default());
        self.page.clear_history();
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.attr = Attributes::default();
        self.saved = None;
        self.parser.reset();
    }

    /// DECSTR: reset cursor/rendition/scroll region but keep the page's
    /// contents and scrollback intact.
    pub fn soft_reset(&mut self) {
        let height = self.page.height();
        self.page.set_scroll_region(0, height);
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.attr = Attributes::default();
        self.saved = None;
    }
}

fn arg1(seq: &Sequence) -> usize {
    seq.arg_or(0, 1).max(1) as usize
}

fn named_from_ansi(code: u8) -> Color {
    use crate::color::NamedColor::*;
    const TABLE: [crate::color::NamedColor; 16] =
        [Black, Maroon, Green, Olive, Navy, Purple, Teal, Silver, Grey, Red, Lime, Yellow, Blue, Fuschia, Aqua, White];
    Color::Named(TABLE[(code as usize).min(15)])
}

#[cfg(test)]
mod test {
    use super::*;

    fn init() {
        let _ = env_logger::Builder::new().is_test(true).try_init();
    }

    #[test]
    fn ascii_print_advances_cursor() {
        init();
        let mut screen = Screen::new(10, 3);
        screen.feed_text(b"Hi");
        assert_eq!(screen.cursor_x, 2);
        let mut buf = [0u32; 4];
        assert_eq!(screen.draw().get_cell(0, 0).unwrap().ch.resolve(&mut buf), &['H' as u32]);
    }

    #[test]
    fn csi_cursor_position_moves_cursor() {
        let mut screen = Screen::new(10, 5);
        screen.feed_text(b"\x1b[3;4H");
        assert_eq!((screen.cursor_x, screen.cursor_y), (3, 2));
    }

    #[test]
    fn sgr_bold_red_sets_attribute_and_is_reset_by_zero() {
        let mut screen = Screen::new(10, 1);
        screen.feed_text(b"\x1b[1;31mX\x1b[0mY");
        let mut buf = [0u32; 4];
        let bold_cell = screen.draw().get_cell(0, 0).unwrap();
        assert!(bold_cell.attr.bold);
        assert_eq!(bold_cell.ch.resolve(&mut buf), &['X' as u32]);
        let reset_cell = screen.draw().get_cell(1, 0).unwrap();
        assert!(!reset_cell.attr.bold);
    }

    #[test]
    fn newline_at_bottom_margin_scrolls_into_history() {
        let mut screen = Screen::new(4, 2);
        screen.feed_text(b"ab\r\ncd\r\nef");
        assert_eq!(screen.draw().history().len(), 1);
    }

    #[test]
    fn decaln_fills_screen_with_e() {
        let mut screen = Screen::new(3, 2);
        screen.feed_text(b"\x1b#8");
        let mut buf = [0u32; 4];
        assert_eq!(screen.draw().get_cell(2, 1).unwrap().ch.resolve(&mut buf), &['E' as u32]);
    }

    #[test]
    fn ich_inserts_repeat_count_blanks() {
        let mut screen = Screen::new(10, 1);
        screen.feed_text(b"abcde\x1b[3D\x1b[3@");
        let mut buf = [0u32; 4];
        // cursor backed up 3 to sit on 'c'; CSI 3 @ should insert 3 blanks
        // there, pushing "cde" right instead of inserting just one.
        assert!(screen.draw().get_cell(2, 0).unwrap().is_blank());
        assert!(screen.draw().get_cell(3, 0).unwrap().is_blank());
        assert!(screen.draw().get_cell(4, 0).unwrap().is_blank());
        assert_eq!(screen.draw().get_cell(5, 0).unwrap().ch.resolve(&mut buf), &['c' as u32]);
    }

    #[test]
    fn ed_mode_1_erases_through_cursor_inclusive() {
        let mut screen = Screen::new(5, 1);
        screen.feed_text(b"abcde\x1b[3D\x1b[1K");
        let mut buf = [0u32; 4];
        assert!(screen.draw().get_cell(0, 0).unwrap().is_blank());
        assert!(screen.draw().get_cell(1, 0).unwrap().is_blank());
        // cursor sits on 'c' (index 2); mode-1 erase must include it
        assert!(screen.draw().get_cell(2, 0).unwrap().is_blank());
        assert_eq!(screen.draw().get_cell(3, 0).unwrap().ch.resolve(&mut buf), &['d' as u32]);
    }

    #[test]
    fn decsca_protected_cell_survives_selective_erase_but_not_plain_erase() {
        let mut screen = Screen::new(5, 1);
        screen.feed_text(b"\x1b[1\"qX\x1b[0\"q");
        assert!(screen.draw().get_cell(0, 0).unwrap().attr.protect);
        // DECSEL (selective EL): protected cells survive.
        screen.feed_text(b"\x1b[?2K");
        assert!(
            !screen.draw().get_cell(0, 0).unwrap().is_blank(),
            "DECSEL must not erase a DECSCA-protected cell"
        );
        // Plain EL: erases unconditionally, protected or not.
        screen.feed_text(b"\x1b[2K");
        assert!(
            screen.draw().get_cell(0, 0).unwrap().is_blank(),
            "plain EL must erase even protected cells"
        );
    }

    #[test]
    fn try_new_rejects_zero_dimensions() {
        assert_eq!(Screen::try_new(0, 5), Err(Error::InvalidArgument("width must be at least 1")));
        assert_eq!(Screen::try_new(5, 0), Err(Error::InvalidArgument("height must be at least 1")));
        assert!(Screen::try_new(5, 5).is_ok());
    }

    #[test]
    fn hard_reset_clears_page_and_history() {
        let mut screen = Screen::new(4, 2);
        screen.feed_text(b"ab\r\ncd\r\nef");
        screen.feed_text(b"\x1bc");
        assert_eq!(screen.draw().history().len(), 0);
        assert!(screen.draw().get_cell(0, 0).unwrap().is_blank());
    }
}
