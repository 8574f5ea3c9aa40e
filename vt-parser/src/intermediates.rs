//! Bitmask representation of the `0x20..0x3F` bytes collected between an
//! introducer and a terminator. Bit `i` corresponds to ASCII `0x20 + i`;
//! bits 16..=27 are never set because the parameter lexer (digits, `:`,
//! `;`) consumes those bytes before they reach `Collect`.

pub const SPACE: u32 = 1 << 0;
pub const BANG: u32 = 1 << 1;
pub const DQUOTE: u32 = 1 << 2;
pub const HASH: u32 = 1 << 3;
pub const DOLLAR: u32 = 1 << 4;
pub const PERCENT: u32 = 1 << 5;
pub const AND: u32 = 1 << 6;
pub const SQUOTE: u32 = 1 << 7;
pub const POPEN: u32 = 1 << 8;
pub const PCLOSE: u32 = 1 << 9;
pub const MULT: u32 = 1 << 10;
pub const PLUS: u32 = 1 << 11;
pub const COMMA: u32 = 1 << 12;
pub const MINUS: u32 = 1 << 13;
pub const DOT: u32 = 1 << 14;
pub const SLASH: u32 = 1 << 15;
pub const LT: u32 = 1 << 28;
pub const EQUAL: u32 = 1 << 29;
pub const GT: u32 = 1 << 30;
pub const WHAT: u32 = 1 << 31;

/// Map a byte in `0x20..=0x3F` to its bit position. Bytes outside that
/// range (digits, `:`, `;` are handled by `PARAM` before reaching here;
/// anything else is a caller bug) return `None`.
#[inline]
pub fn bit_for(byte: u8) -> Option<u32> {
    match byte {
        0x20..=0x3F => Some(1u32 << (byte - 0x20)),
        _ => None,
    }
}
