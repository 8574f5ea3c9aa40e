use crate::charset::Charset;
use crate::command::Command;

pub const MAX_ARGS: usize = 16;
/// Unseen/omitted argument slots report this value.
pub const ARG_DEFAULT: i32 = -1;
const ARG_MAX: i32 = 0xFFFF;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SequenceType {
    Control,
    Escape,
    Csi,
    Dcs,
    Osc,
}

/// A fully recognised sequence, valid only until the next `Parser::feed`
/// call (the `st` buffer is reused across sequences).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub kind: SequenceType,
    pub command: Command,
    pub terminator: u32,
    pub intermediates: u32,
    pub charset: Charset,
    pub args: [i32; MAX_ARGS],
    pub n_args: usize,
    pub st: Vec<u8>,
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence {
            kind: SequenceType::Escape,
            command: Command::None,
            terminator: 0,
            intermediates: 0,
            charset: Charset::None,
            args: [ARG_DEFAULT; MAX_ARGS],
            n_args: 0,
            st: Vec::with_capacity(64),
        }
    }
}

impl Sequence {
    pub(crate) fn clear(&mut self) {
        self.command = Command::None;
        self.terminator = 0;
        self.intermediates = 0;
        self.charset = Charset::None;
        self.args = [ARG_DEFAULT; MAX_ARGS];
        self.n_args = 0;
        self.st.clear();
    }

    /// Argument `idx`, or `default` if it was never assigned (matches
    /// the VT convention that an omitted numeric parameter takes the
    /// command's own default rather than literal zero).
    pub fn arg_or(&self, idx: usize, default: i32) -> i32 {
        match self.args.get(idx) {
            Some(&ARG_DEFAULT) | None => default,
            Some(&v) => v,
        }
    }
}

/// Argument accumulator used while parsing `PARAM` bytes. `count` tracks
/// the number of `;` separators seen so far, which doubles as the index of
/// the slot currently being written to by `digit`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ArgAccum {
    pub args: [i32; MAX_ARGS],
    pub count: usize,
}

impl Default for ArgAccum {
    fn default() -> Self {
        ArgAccum { args: [ARG_DEFAULT; MAX_ARGS], count: 0 }
    }
}

impl ArgAccum {
    pub fn clear(&mut self) {
        self.args = [ARG_DEFAULT; MAX_ARGS];
        self.count = 0;
    }

    pub fn digit(&mut self, d: u32) {
        if self.count >= MAX_ARGS {
            return;
        }
        let slot = &mut self.args[self.count];
        let base = if *slot < 0 { 0 } else { *slot };
        *slot = (base.saturating_mul(10) + d as i32).min(ARG_MAX);
    }

    pub fn separator(&mut self) {
        if self.count < MAX_ARGS {
            self.count += 1;
        }
    }

    /// Final argument count at dispatch time: the trailing slot counts
    /// unless the sequence had no separators at all and that slot was
    /// never written to (the bare, argument-less case).
    pub fn finish(&self) -> usize {
        if self.count < MAX_ARGS && (self.count > 0 || self.args[self.count] >= 0) {
            self.count + 1
        } else {
            self.count
        }
    }
}
