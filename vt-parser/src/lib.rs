//! A byte-level UTF-8 decoder paired with a VT500-style escape sequence
//! state machine.
//!
//! [`Parser::feed`] takes one decoded codepoint at a time and returns an
//! [`Event`] describing what happened, plus (for control characters and
//! fully-formed escape/CSI/DCS/OSC sequences) a [`Sequence`] describing it
//! in detail. The state machine follows Paul Williams's VT500 diagram
//! (<https://vt100.net/emu/dec_ansi_parser>), extended to recognise 8-bit
//! C1 introducers from any state.
//!
//! Feeding raw bytes instead of codepoints is a matter of running them
//! through [`decoder::Utf8Decoder`] first and calling `feed` once per
//! codepoint it produces.

pub mod charset;
mod classify;
pub mod command;
pub mod decoder;
pub mod intermediates;
pub mod sequence;
pub mod state;

pub use charset::Charset;
pub use command::Command;
pub use decoder::{Codepoint, Utf8Decoder};
pub use sequence::Sequence;
pub use state::{Event, State};

use sequence::{ArgAccum, SequenceType, MAX_ARGS};

/// Hard cap on the number of bytes a single DCS or OSC string can
/// accumulate before further bytes are silently dropped. Matches the
/// `DEVCON_PARSER_ST_MAX` limit this parser is grounded on.
const ST_MAX: usize = 4096;

/// The escape sequence state machine. Create one with [`Parser::new`] and
/// feed it decoded codepoints one at a time with [`Parser::feed`].
#[derive(Debug, PartialEq, Eq)]
pub struct Parser {
    state: State,
    accum: ArgAccum,
    seq: Sequence,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser { state: State::Ground, accum: ArgAccum::default(), seq: Sequence::default() }
    }

    /// Current state, exposed for diagnostics and tests.
    pub fn state(&self) -> State {
        self.state
    }

    /// Feed one decoded codepoint into the state machine.
    ///
    /// Returns the event it produced and, for [`Event::Control`],
    /// [`Event::Escape`], [`Event::Csi`], [`Event::Dcs`] and
    /// [`Event::Osc`], a reference to the sequence describing it. The
    /// reference is only valid until the next call to `feed`.
    pub fn feed(&mut self, cp: Codepoint) -> (Event, Option<&Sequence>) {
        let event = self.step(cp);
        let seq = match event {
            Event::Control | Event::Escape | Event::Csi | Event::Dcs | Event::Osc => {
                Some(&self.seq)
            }
            Event::None | Event::Ignore | Event::Graphic => None,
        };
        (event, seq)
    }

    /// Reset to the ground state, discarding any in-progress sequence.
    /// Mirrors what a `CAN` byte does, without consuming any input.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.clear();
    }

    fn step(&mut self, cp: Codepoint) -> Event {
        // These transitions apply regardless of the current state: C1
        // control codes act as sequence introducers (or, for the plainer
        // C1 controls, as immediate executes) no matter what was being
        // parsed before them, and CAN/SUB/ESC always abort whatever was
        // in progress. Note this means an ESC or C1 introducer arriving
        // mid-DCS or mid-OSC discards the string collected so far without
        // dispatching it.
        match cp {
            0x18 => {
                self.state = State::Ground;
                return self.ignore(cp);
            }
            0x1a => {
                self.state = State::Ground;
                return self.execute(cp);
            }
            0x80..=0x8f | 0x91..=0x97 | 0x99 | 0x9a => {
                self.state = State::Ground;
                return self.execute(cp);
            }
            0x1b => {
                self.state = State::Escape;
                self.clear();
                return Event::None;
            }
            0x98 | 0x9e | 0x9f => {
                // SOS / PM / APC: no dedicated state, their payload is
                // never interpreted, so just drop everything until ST.
                self.state = State::StIgnore;
                return Event::None;
            }
            0x90 => {
                self.state = State::DcsEntry;
                self.clear();
                return Event::None;
            }
            0x9d => {
                self.state = State::OscString;
                self.clear();
                return Event::None;
            }
            0x9b => {
                self.state = State::CsiEntry;
                self.clear();
                return Event::None;
            }
            _ => {}
        }

        match self.state {
            State::Ground => self.in_ground(cp),
            State::Escape => self.in_escape(cp),
            State::EscapeIntermediate => self.in_escape_intermediate(cp),
            State::CsiEntry => self.in_csi_entry(cp),
            State::CsiParam => self.in_csi_param(cp),
            State::CsiIntermediate => self.in_csi_intermediate(cp),
            State::CsiIgnore => self.in_csi_ignore(cp),
            State::DcsEntry => self.in_dcs_entry(cp),
            State::DcsParam => self.in_dcs_param(cp),
            State::DcsIntermediate => self.in_dcs_intermediate(cp),
            State::DcsPassthrough => self.in_dcs_passthrough(cp),
            State::DcsIgnore => self.in_dcs_ignore(cp),
            State::OscString => self.in_osc_string(cp),
            State::StIgnore => self.in_st_ignore(cp),
        }
    }

    fn in_ground(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x9c => self.ignore(cp),
            _ => self.print(cp),
        }
    }

    fn in_escape(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x20..=0x2f => {
                self.collect(cp);
                self.state = State::EscapeIntermediate;
                Event::None
            }
            0x30..=0x4f | 0x51..=0x57 | 0x59 | 0x5a | 0x5c | 0x60..=0x7e => {
                self.state = State::Ground;
                self.esc_dispatch(cp)
            }
            0x50 => {
                self.state = State::DcsEntry;
                self.clear();
                Event::None
            }
            0x5b => {
                self.state = State::CsiEntry;
                self.clear();
                Event::None
            }
            0x5d => {
                self.state = State::OscString;
                self.clear();
                Event::None
            }
            0x58 | 0x5e | 0x5f => {
                self.state = State::StIgnore;
                Event::None
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.collect(cp);
                self.state = State::EscapeIntermediate;
                Event::None
            }
        }
    }

    fn in_escape_intermediate(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x20..=0x2f => {
                self.collect(cp);
                Event::None
            }
            0x30..=0x7e => {
                self.state = State::Ground;
                self.esc_dispatch(cp)
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.collect(cp);
                Event::None
            }
        }
    }

    fn in_csi_entry(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x20..=0x2f => {
                self.collect(cp);
                self.state = State::CsiIntermediate;
                Event::None
            }
            0x3a => {
                self.state = State::CsiIgnore;
                Event::None
            }
            0x30..=0x39 | 0x3b => {
                self.param(cp);
                self.state = State::CsiParam;
                Event::None
            }
            0x3c..=0x3f => {
                self.collect(cp);
                self.state = State::CsiParam;
                Event::None
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                self.csi_dispatch(cp)
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.state = State::CsiIgnore;
                Event::None
            }
        }
    }

    fn in_csi_param(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x20..=0x2f => {
                self.collect(cp);
                self.state = State::CsiIntermediate;
                Event::None
            }
            0x30..=0x39 | 0x3b => {
                self.param(cp);
                Event::None
            }
            0x3a | 0x3c..=0x3f => {
                self.state = State::CsiIgnore;
                Event::None
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                self.csi_dispatch(cp)
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.state = State::CsiIgnore;
                Event::None
            }
        }
    }

    fn in_csi_intermediate(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x20..=0x2f => {
                self.collect(cp);
                Event::None
            }
            0x30..=0x3f => {
                self.state = State::CsiIgnore;
                Event::None
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                self.csi_dispatch(cp)
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.state = State::CsiIgnore;
                Event::None
            }
        }
    }

    fn in_csi_ignore(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.execute(cp),
            0x20..=0x3f => Event::Ignore,
            0x40..=0x7e => {
                self.state = State::Ground;
                Event::Ignore
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => Event::Ignore,
        }
    }

    fn in_dcs_entry(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.ignore(cp),
            0x20..=0x2f => {
                self.collect(cp);
                self.state = State::DcsIntermediate;
                Event::None
            }
            0x3a => {
                self.state = State::DcsIgnore;
                Event::None
            }
            0x30..=0x39 | 0x3b => {
                self.param(cp);
                self.state = State::DcsParam;
                Event::None
            }
            0x3c..=0x3f => {
                self.collect(cp);
                self.state = State::DcsParam;
                Event::None
            }
            0x40..=0x7e => {
                self.state = State::DcsPassthrough;
                self.dcs_consume(cp);
                Event::None
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.state = State::DcsPassthrough;
                self.dcs_consume(cp);
                Event::None
            }
        }
    }

    fn in_dcs_param(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.ignore(cp),
            0x20..=0x2f => {
                self.collect(cp);
                self.state = State::DcsIntermediate;
                Event::None
            }
            0x30..=0x39 | 0x3b => {
                self.param(cp);
                Event::None
            }
            0x3a | 0x3c..=0x3f => {
                self.state = State::DcsIgnore;
                Event::None
            }
            0x40..=0x7e => {
                self.state = State::DcsPassthrough;
                self.dcs_consume(cp);
                Event::None
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.state = State::DcsPassthrough;
                self.dcs_consume(cp);
                Event::None
            }
        }
    }

    fn in_dcs_intermediate(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x1f => self.ignore(cp),
            0x20..=0x2f => {
                self.collect(cp);
                Event::None
            }
            0x30..=0x3f => {
                self.state = State::DcsIgnore;
                Event::None
            }
            0x40..=0x7e => {
                self.state = State::DcsPassthrough;
                self.dcs_consume(cp);
                Event::None
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => {
                self.state = State::DcsPassthrough;
                self.dcs_consume(cp);
                Event::None
            }
        }
    }

    fn in_dcs_passthrough(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x7e => {
                self.push_st(cp);
                Event::None
            }
            0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.dcs_dispatch()
            }
            _ => {
                self.push_st(cp);
                Event::None
            }
        }
    }

    fn in_dcs_ignore(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                Event::None
            }
            _ => Event::None,
        }
    }

    fn in_osc_string(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x06 | 0x08..=0x1f => self.ignore(cp),
            0x20..=0x7f => {
                self.push_st(cp);
                Event::None
            }
            0x07 | 0x9c => {
                self.state = State::Ground;
                self.osc_dispatch(cp)
            }
            _ => {
                self.push_st(cp);
                Event::None
            }
        }
    }

    fn in_st_ignore(&mut self, cp: Codepoint) -> Event {
        match cp {
            0x00..=0x7f => self.ignore(cp),
            0x9c => {
                self.state = State::Ground;
                self.ignore(cp)
            }
            _ => Event::None,
        }
    }

    fn clear(&mut self) {
        self.seq.clear();
        self.accum.clear();
    }

    fn ignore(&mut self, raw: Codepoint) -> Event {
        self.seq.clear();
        self.seq.terminator = raw;
        Event::Ignore
    }

    fn print(&mut self, raw: Codepoint) -> Event {
        self.seq.clear();
        self.seq.terminator = raw;
        Event::Graphic
    }

    fn execute(&mut self, raw: Codepoint) -> Event {
        self.seq.clear();
        self.seq.kind = SequenceType::Control;
        self.seq.terminator = raw;
        self.seq.command = classify::control(raw);
        Event::Control
    }

    fn collect(&mut self, cp: Codepoint) {
        if cp <= 0xff {
            if let Some(bit) = intermediates::bit_for(cp as u8) {
                self.seq.intermediates |= bit;
            }
        }
    }

    fn param(&mut self, cp: Codepoint) {
        match cp {
            x if x == b';' as Codepoint => self.accum.separator(),
            x if (b'0' as Codepoint..=b'9' as Codepoint).contains(&x) => {
                self.accum.digit(x - b'0' as Codepoint)
            }
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, raw: Codepoint) -> Event {
        self.seq.kind = SequenceType::Escape;
        self.seq.terminator = raw;
        self.seq.n_args = 0;
        let (cmd, cs) = classify::escape(raw, self.seq.intermediates);
        self.seq.command = cmd;
        self.seq.charset = cs;
        Event::Escape
    }

    fn finalize_args(&mut self) {
        self.seq.args = self.accum.args;
        self.seq.n_args = self.accum.finish();
    }

    fn csi_dispatch(&mut self, raw: Codepoint) -> Event {
        self.seq.kind = SequenceType::Csi;
        self.seq.terminator = raw;
        self.seq.charset = Charset::None;
        self.finalize_args();
        self.seq.command = classify::csi(raw, self.seq.intermediates, self.seq.n_args, &self.seq.args);
        Event::Csi
    }

    fn dcs_consume(&mut self, raw: Codepoint) {
        self.seq.kind = SequenceType::Dcs;
        self.seq.terminator = raw;
        self.seq.charset = Charset::None;
        self.seq.command = Command::None;
        self.finalize_args();
        self.seq.st.clear();
    }

    fn dcs_dispatch(&mut self) -> Event {
        Event::Dcs
    }

    fn osc_dispatch(&mut self, raw: Codepoint) -> Event {
        self.seq.kind = SequenceType::Osc;
        self.seq.terminator = raw;
        self.seq.command = Command::None;
        self.seq.charset = Charset::None;
        self.seq.n_args = 0;
        Event::Osc
    }

    /// Append the UTF-8 encoding of `cp` to the in-progress DCS/OSC string,
    /// dropping bytes once [`ST_MAX`] is reached rather than growing
    /// without bound.
    fn push_st(&mut self, cp: Codepoint) {
        if self.seq.st.len() >= ST_MAX {
            log::debug!("DCS/OSC string exceeded {} bytes, dropping the rest", ST_MAX);
            return;
        }
        let mut buf = [0u8; 4];
        let n = decoder::encode(cp, &mut buf);
        let room = ST_MAX - self.seq.st.len();
        self.seq.st.extend_from_slice(&buf[..n.min(room)]);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn feed_str(p: &mut Parser, s: &str) -> Vec<(Event, Option<Sequence>)> {
        let mut out = vec![];
        for cp in s.chars().map(|c| c as Codepoint) {
            let (ev, seq) = p.feed(cp);
            out.push((ev, seq.cloned()));
        }
        out
    }

    #[test]
    fn plain_text_is_graphic() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "Hi");
        assert_eq!(events[0].0, Event::Graphic);
        assert_eq!(events[1].0, Event::Graphic);
    }

    #[test]
    fn newline_is_control_lf() {
        let mut p = Parser::new();
        let (ev, seq) = p.feed('\n' as Codepoint);
        assert_eq!(ev, Event::Control);
        assert_eq!(seq.unwrap().command, Command::LF);
    }

    #[test]
    fn csi_cursor_position() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[12;34H");
        let (ev, seq) = events.last().unwrap().clone();
        assert_eq!(ev, Event::Csi);
        let seq = seq.unwrap();
        assert_eq!(seq.command, Command::CUP);
        assert_eq!(seq.n_args, 2);
        assert_eq!(seq.args[0], 12);
        assert_eq!(seq.args[1], 34);
    }

    #[test]
    fn csi_sgr_bold_red() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[1;31m");
        let (ev, seq) = events.last().unwrap().clone();
        assert_eq!(ev, Event::Csi);
        let seq = seq.unwrap();
        assert_eq!(seq.command, Command::SGR);
        assert_eq!(seq.n_args, 2);
        assert_eq!(seq.args[0], 1);
        assert_eq!(seq.args[1], 31);
    }

    #[test]
    fn sgr_reset_has_no_args() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[m");
        let (ev, seq) = events.last().unwrap().clone();
        assert_eq!(ev, Event::Csi);
        let seq = seq.unwrap();
        assert_eq!(seq.command, Command::SGR);
        assert_eq!(seq.n_args, 0);
    }

    #[test]
    fn csi_with_leading_omitted_arg() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[;1m");
        let (_, seq) = events.last().unwrap().clone();
        let seq = seq.unwrap();
        assert_eq!(seq.n_args, 2);
        assert_eq!(seq.args[0], -1);
        assert_eq!(seq.args[1], 1);
    }

    #[test]
    fn select_american_nrcs() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b(B");
        let (ev, seq) = events.last().unwrap().clone();
        assert_eq!(ev, Event::Escape);
        let seq = seq.unwrap();
        assert_eq!(seq.command, Command::SCS);
        assert_eq!(seq.charset, charset::AMERICAN_NRCS);
        assert_eq!(seq.terminator, 'B' as Codepoint);
        assert_eq!(seq.intermediates, intermediates::POPEN);
    }

    #[test]
    fn decstbm_scroll_region() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[5;20r");
        let (_, seq) = events.last().unwrap().clone();
        let seq = seq.unwrap();
        assert_eq!(seq.command, Command::DECSTBM);
        assert_eq!(seq.args[0], 5);
        assert_eq!(seq.args[1], 20);
    }

    #[test]
    fn sd_vs_xterm_ihmt_by_arg_count() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[3T");
        assert_eq!(events.last().unwrap().1.clone().unwrap().command, Command::SD);

        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[1;2;3;4;5T");
        assert_eq!(events.last().unwrap().1.clone().unwrap().command, Command::XTERM_IHMT);
    }

    #[test]
    fn unknown_csi_is_none_but_still_delivered() {
        let mut p = Parser::new();
        // '!' with no defined meaning as a CSI terminator.
        let events = feed_str(&mut p, "\x1b[!");
        // still mid-sequence (collecting intermediate), finish with a
        // terminator that genuinely has no assignment under that flag.
        let events2 = feed_str(&mut p, "\x1b[5z");
        let (ev, seq) = events2.last().unwrap().clone();
        let _ = events;
        assert_eq!(ev, Event::Csi);
        assert_eq!(seq.unwrap().command, Command::None);
    }

    #[test]
    fn can_aborts_sequence() {
        let mut p = Parser::new();
        feed_str(&mut p, "\x1b[1;2");
        let (ev, seq) = p.feed(0x18);
        assert_eq!(ev, Event::Ignore);
        assert!(seq.is_none());
        assert_eq!(p.state(), State::Ground);
        let (ev, _) = p.feed('x' as Codepoint);
        assert_eq!(ev, Event::Graphic);
    }

    #[test]
    fn broken_csi_colon_is_ignored_until_terminator() {
        let mut p = Parser::new();
        let events = feed_str(&mut p, "\x1b[1:2m");
        assert!(events.iter().all(|(ev, _)| *ev != Event::Csi));
        assert_eq!(p.state(), State::Ground);
    }

    #[test]
    fn dcs_collects_payload_and_dispatches_on_st() {
        let mut p = Parser::new();
        feed_str(&mut p, "\x1bP1$q\"p");
        let (ev, seq) = p.feed(0x9c);
        assert_eq!(ev, Event::Dcs);
        let seq = seq.unwrap();
        assert_eq!(seq.st, b"\"p");
    }

    #[test]
    fn osc_dispatches_on_bel() {
        let mut p = Parser::new();
        feed_str(&mut p, "\x1b]0;title");
        let (ev, seq) = p.feed(0x07);
        assert_eq!(ev, Event::Osc);
        assert_eq!(seq.unwrap().st, b"0;title");
    }

    #[test]
    fn esc_aborts_in_progress_osc_without_dispatch() {
        let mut p = Parser::new();
        feed_str(&mut p, "\x1b]0;partial");
        let (ev, seq) = p.feed(0x1b);
        assert_eq!(ev, Event::None);
        assert!(seq.is_none());
        assert_eq!(p.state(), State::Escape);
    }

    #[test]
    fn c1_csi_introducer_works_without_esc() {
        let mut p = Parser::new();
        let mut events = vec![];
        for cp in [0x9b, b'1' as Codepoint, b'0' as Codepoint, b'A' as Codepoint] {
            let (ev, seq) = p.feed(cp);
            events.push((ev, seq.cloned()));
        }
        let (ev, seq) = events.last().unwrap();
        assert_eq!(*ev, Event::Csi);
        assert_eq!(seq.as_ref().unwrap().command, Command::CUU);
        assert_eq!(seq.as_ref().unwrap().args[0], 10);
    }

    #[test]
    fn broken_utf8_recovers_as_latin1_then_continues() {
        let mut dec = Utf8Decoder::new();
        let mut p = Parser::new();
        let mut commands = vec![];
        for &b in &[0xC3u8, 0x28] {
            for &cp in dec.decode(b) {
                let (ev, seq) = p.feed(cp);
                commands.push((ev, seq.map(|s| s.terminator)));
            }
        }
        assert_eq!(commands[0].0, Event::Graphic);
        assert_eq!(commands[1].0, Event::Graphic);
    }
}
