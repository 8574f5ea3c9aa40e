//! Turns a finished sequence's `(terminator, intermediates, args)` into a
//! [`Command`]. Three kinds of input reach here: a single control byte, an
//! escape sequence, and a CSI sequence — DCS and OSC sequences are handed
//! back to the caller unclassified (`Command::None`), since interpreting
//! their payload is specific to whatever protocol rides inside them.

use crate::charset::{self, Charset};
use crate::command::Command;
use crate::intermediates as flag;
use crate::sequence::MAX_ARGS;

/// Classify a single C0/C1 control byte executed outside of any sequence.
pub fn control(terminator: u32) -> Command {
    match terminator {
        0x00 => Command::NUL,
        0x05 => Command::ENQ,
        0x07 => Command::BEL,
        0x08 => Command::BS,
        0x09 => Command::HT,
        0x0a => Command::LF,
        0x0b => Command::VT,
        0x0c => Command::FF,
        0x0d => Command::CR,
        0x0e => Command::SO,
        0x0f => Command::SI,
        0x11 => Command::DC1,
        0x13 => Command::DC3,
        0x1a => Command::SUB,
        0x84 => Command::IND,
        0x85 => Command::NEL,
        0x88 => Command::HTS,
        0x8d => Command::RI,
        0x8e => Command::SS2,
        0x8f => Command::SS3,
        0x96 => Command::SPA,
        0x97 => Command::EPA,
        0x9a => Command::DECID,
        0x9c => Command::ST,
        _ => Command::None,
    }
}

/// The four intermediates that can introduce an SCS (select-character-set)
/// sequence: `(`, `)`, `*`, `+` select a 94-char set into G0-G3; `-`, `.`,
/// `/` select a 96-char set into G1-G3.
const SCS_94: u32 = flag::POPEN | flag::PCLOSE | flag::MULT | flag::PLUS;
const SCS_96: u32 = flag::MINUS | flag::DOT | flag::SLASH;

/// Classify an escape sequence (`ESC <intermediates> <terminator>`).
/// Returns the command and, for `SCS`, the charset it selects.
pub fn escape(terminator: u32, intermediates: u32) -> (Command, Charset) {
    let introducer = intermediates & (SCS_94 | SCS_96);
    if introducer.count_ones() == 1 {
        let require_96 = introducer & SCS_96 != 0;
        if terminator <= 0xFF {
            if let Some(cs) =
                charset::from_terminator(terminator as u8, intermediates & !introducer, require_96)
            {
                return (Command::SCS, cs);
            }
        }
        // Looked like an SCS introducer but the terminator didn't resolve
        // to a known charset; fall through to the generic table below.
    }

    let cmd = match terminator {
        x if x == b'3' as u32 && intermediates == flag::HASH => Command::DECDHL_TH,
        x if x == b'4' as u32 && intermediates == flag::HASH => Command::DECDHL_BH,
        x if x == b'5' as u32 && intermediates == flag::HASH => Command::DECSWL,
        x if x == b'6' as u32 && intermediates == 0 => Command::DECBI,
        x if x == b'6' as u32 && intermediates == flag::HASH => Command::DECDWL,
        x if x == b'7' as u32 && intermediates == 0 => Command::DECSC,
        x if x == b'8' as u32 && intermediates == 0 => Command::DECRC,
        x if x == b'8' as u32 && intermediates == flag::HASH => Command::DECALN,
        x if x == b'9' as u32 && intermediates == 0 => Command::DECFI,
        x if x == b'<' as u32 && intermediates == 0 => Command::DECANM,
        x if x == b'=' as u32 && intermediates == 0 => Command::DECKPAM,
        x if x == b'>' as u32 && intermediates == 0 => Command::DECKPNM,
        x if x == b'@' as u32 && intermediates == flag::PERCENT => Command::XTERM_SDCS,
        x if x == b'D' as u32 && intermediates == 0 => Command::IND,
        x if x == b'E' as u32 && intermediates == 0 => Command::NEL,
        x if x == b'F' as u32 && intermediates == 0 => Command::XTERM_CLLHP,
        x if x == b'F' as u32 && intermediates == flag::SPACE => Command::S7C1T,
        x if x == b'G' as u32 && intermediates == flag::SPACE => Command::S8C1T,
        x if x == b'G' as u32 && intermediates == flag::PERCENT => Command::XTERM_SUCS,
        x if x == b'H' as u32 && intermediates == 0 => Command::HTS,
        x if x == b'L' as u32 && intermediates == flag::SPACE => Command::XTERM_SACL1,
        x if x == b'M' as u32 && intermediates == 0 => Command::RI,
        x if x == b'M' as u32 && intermediates == flag::SPACE => Command::XTERM_SACL2,
        x if x == b'N' as u32 && intermediates == 0 => Command::SS2,
        x if x == b'N' as u32 && intermediates == flag::SPACE => Command::XTERM_SACL3,
        x if x == b'O' as u32 && intermediates == 0 => Command::SS3,
        x if x == b'V' as u32 && intermediates == 0 => Command::SPA,
        x if x == b'W' as u32 && intermediates == 0 => Command::EPA,
        x if x == b'Z' as u32 && intermediates == 0 => Command::DECID,
        x if x == b'\\' as u32 && intermediates == 0 => Command::ST,
        x if x == b'c' as u32 && intermediates == 0 => Command::RIS,
        x if x == b'l' as u32 && intermediates == 0 => Command::XTERM_MLHP,
        x if x == b'm' as u32 && intermediates == 0 => Command::XTERM_MUHP,
        x if x == b'n' as u32 && intermediates == 0 => Command::LS2,
        x if x == b'o' as u32 && intermediates == 0 => Command::LS3,
        x if x == b'|' as u32 && intermediates == 0 => Command::LS3R,
        x if x == b'}' as u32 && intermediates == 0 => Command::LS2R,
        x if x == b'~' as u32 && intermediates == 0 => Command::LS1R,
        _ => Command::None,
    };
    (cmd, Charset::None)
}

/// Classify a CSI sequence (`CSI <intermediates> <params> <terminator>`).
pub fn csi(terminator: u32, intermediates: u32, n_args: usize, args: &[i32; MAX_ARGS]) -> Command {
    use flag::{BANG, COMMA, DOLLAR, DQUOTE, EQUAL, GT, MULT, PCLOSE, PLUS, SPACE, SQUOTE, WHAT};

    match terminator {
        x if x == b'A' as u32 && intermediates == 0 => Command::CUU,
        x if x == b'a' as u32 && intermediates == 0 => Command::HPR,
        x if x == b'B' as u32 && intermediates == 0 => Command::CUD,
        x if x == b'b' as u32 && intermediates == 0 => Command::REP,
        x if x == b'C' as u32 && intermediates == 0 => Command::CUF,
        x if x == b'c' as u32 && intermediates == 0 => Command::DA1,
        x if x == b'c' as u32 && intermediates == GT => Command::DA2,
        x if x == b'c' as u32 && intermediates == EQUAL => Command::DA3,
        x if x == b'D' as u32 && intermediates == 0 => Command::CUB,
        x if x == b'd' as u32 && intermediates == 0 => Command::VPA,
        x if x == b'E' as u32 && intermediates == 0 => Command::CNL,
        x if x == b'e' as u32 && intermediates == 0 => Command::VPR,
        x if x == b'F' as u32 && intermediates == 0 => Command::CPL,
        x if x == b'f' as u32 && intermediates == 0 => Command::HVP,
        x if x == b'G' as u32 && intermediates == 0 => Command::CHA,
        x if x == b'g' as u32 && intermediates == 0 => Command::TBC,
        x if x == b'g' as u32 && intermediates == MULT => Command::DECLFKC,
        x if x == b'H' as u32 && intermediates == 0 => Command::CUP,
        x if x == b'h' as u32 && intermediates == 0 => Command::SM_ANSI,
        x if x == b'h' as u32 && intermediates == WHAT => Command::SM_DEC,
        x if x == b'I' as u32 && intermediates == 0 => Command::CHT,
        x if x == b'i' as u32 && intermediates == 0 => Command::MC_ANSI,
        x if x == b'i' as u32 && intermediates == WHAT => Command::MC_DEC,
        x if x == b'J' as u32 && intermediates == 0 => Command::ED,
        x if x == b'J' as u32 && intermediates == WHAT => Command::DECSED,
        x if x == b'K' as u32 && intermediates == 0 => Command::EL,
        x if x == b'K' as u32 && intermediates == WHAT => Command::DECSEL,
        x if x == b'L' as u32 && intermediates == 0 => Command::IL,
        x if x == b'l' as u32 && intermediates == 0 => Command::RM_ANSI,
        x if x == b'l' as u32 && intermediates == WHAT => Command::RM_DEC,
        x if x == b'M' as u32 && intermediates == 0 => Command::DL,
        x if x == b'm' as u32 && intermediates == 0 => Command::SGR,
        x if x == b'm' as u32 && intermediates == GT => Command::XTERM_SRV,
        x if x == b'n' as u32 && intermediates == 0 => Command::DSR_ANSI,
        x if x == b'n' as u32 && intermediates == GT => Command::XTERM_RRV,
        x if x == b'n' as u32 && intermediates == WHAT => Command::DSR_DEC,
        x if x == b'P' as u32 && intermediates == 0 => Command::DCH,
        x if x == b'P' as u32 && intermediates == SPACE => Command::PPA,
        x if x == b'p' as u32 && intermediates == 0 => Command::DECSSL,
        x if x == b'p' as u32 && intermediates == SPACE => Command::DECSSCLS,
        x if x == b'p' as u32 && intermediates == BANG => Command::DECSTR,
        x if x == b'p' as u32 && intermediates == DQUOTE => Command::DECSCL,
        x if x == b'p' as u32 && intermediates == DOLLAR => Command::DECRQM_ANSI,
        x if x == b'p' as u32 && intermediates == (DOLLAR | WHAT) => Command::DECRQM_DEC,
        x if x == b'p' as u32 && intermediates == PCLOSE => Command::DECSDPT,
        x if x == b'p' as u32 && intermediates == MULT => Command::DECSPPCS,
        x if x == b'p' as u32 && intermediates == PLUS => Command::DECSR,
        x if x == b'p' as u32 && intermediates == COMMA => Command::DECLTOD,
        x if x == b'p' as u32 && intermediates == GT => Command::XTERM_SPM,
        x if x == b'Q' as u32 && intermediates == SPACE => Command::PPR,
        x if x == b'q' as u32 && intermediates == 0 => Command::DECLL,
        x if x == b'q' as u32 && intermediates == SPACE => Command::DECSCUSR,
        x if x == b'q' as u32 && intermediates == DQUOTE => Command::DECSCA,
        x if x == b'q' as u32 && intermediates == DOLLAR => Command::DECSDDT,
        x if x == b'q' as u32 && intermediates == MULT => Command::DECSR,
        x if x == b'q' as u32 && intermediates == PLUS => Command::DECELF,
        x if x == b'q' as u32 && intermediates == COMMA => Command::DECTID,
        x if x == b'R' as u32 && intermediates == SPACE => Command::PPB,
        x if x == b'r' as u32 && intermediates == 0 => Command::DECSTBM,
        x if x == b'r' as u32 && intermediates == SPACE => Command::DECSKCV,
        x if x == b'r' as u32 && intermediates == DOLLAR => Command::DECCARA,
        x if x == b'r' as u32 && intermediates == MULT => Command::DECSCS,
        x if x == b'r' as u32 && intermediates == PLUS => Command::DECSMKR,
        // DECPCTERM takes 2 args, XTERM_RPM takes at most 1; split on count.
        x if x == b'r' as u32 && intermediates == WHAT => {
            if n_args >= 2 {
                Command::DECPCTERM
            } else {
                Command::XTERM_RPM
            }
        }
        x if x == b'S' as u32 && intermediates == 0 => Command::SU,
        x if x == b'S' as u32 && intermediates == WHAT => Command::XTERM_SGFX,
        // DECSLRM and the ANSI save-cursor form share this encoding; only
        // DECLRMM (left/right margin mode) state disambiguates them, and
        // that's outside this crate's scope, so both stay folded together.
        x if x == b's' as u32 && intermediates == 0 => Command::DECSLRM_OR_SC,
        x if x == b's' as u32 && intermediates == DOLLAR => Command::DECSPRTT,
        x if x == b's' as u32 && intermediates == MULT => Command::DECSFC,
        x if x == b's' as u32 && intermediates == WHAT => Command::XTERM_SPM,
        // SD takes 0-1 args, XTERM_IHMT needs exactly 5; the boundary is
        // kept generous (>=5 vs <5) to tolerate unused trailing args.
        x if x == b'T' as u32 && intermediates == 0 => {
            if n_args >= 5 {
                Command::XTERM_IHMT
            } else {
                Command::SD
            }
        }
        x if x == b'T' as u32 && intermediates == GT => Command::XTERM_RTM,
        // XTERM_WM and DECSLPP collide; we always resolve to XTERM_WM.
        x if x == b't' as u32 && intermediates == 0 => Command::XTERM_WM,
        x if x == b't' as u32 && intermediates == SPACE => Command::DECSWBV,
        x if x == b't' as u32 && intermediates == DQUOTE => Command::DECSRFR,
        x if x == b't' as u32 && intermediates == DOLLAR => Command::DECRARA,
        x if x == b't' as u32 && intermediates == GT => Command::XTERM_STM,
        x if x == b'U' as u32 && intermediates == 0 => Command::NP,
        x if x == b'u' as u32 && intermediates == 0 => Command::RC,
        x if x == b'u' as u32 && intermediates == SPACE => Command::DECSMBV,
        x if x == b'u' as u32 && intermediates == DQUOTE => Command::DECSTRL,
        x if x == b'u' as u32 && intermediates == WHAT => Command::DECRQUPSS,
        x if x == b'u' as u32 && intermediates == DOLLAR && args.first() == Some(&1) => {
            Command::DECRQTSR
        }
        x if x == b'u' as u32 && intermediates == MULT => Command::DECSCP,
        x if x == b'u' as u32 && intermediates == COMMA => Command::DECRQKT,
        x if x == b'V' as u32 && intermediates == 0 => Command::PP,
        x if x == b'v' as u32 && intermediates == SPACE => Command::DECSLCK,
        x if x == b'v' as u32 && intermediates == DQUOTE => Command::DECRQDE,
        x if x == b'v' as u32 && intermediates == DOLLAR => Command::DECCRA,
        x if x == b'v' as u32 && intermediates == COMMA => Command::DECRPKT,
        x if x == b'W' as u32 && intermediates == WHAT && args.first() == Some(&5) => {
            Command::DECST8C
        }
        x if x == b'w' as u32 && intermediates == DOLLAR => Command::DECRQPSR,
        x if x == b'w' as u32 && intermediates == SQUOTE => Command::DECEFR,
        x if x == b'w' as u32 && intermediates == PLUS => Command::DECSPP,
        x if x == b'X' as u32 && intermediates == 0 => Command::ECH,
        x if x == b'x' as u32 && intermediates == 0 => Command::DECREQTPARM,
        x if x == b'x' as u32 && intermediates == DOLLAR => Command::DECFRA,
        x if x == b'x' as u32 && intermediates == MULT => Command::DECSACE,
        x if x == b'x' as u32 && intermediates == PLUS => Command::DECRQPKFM,
        x if x == b'y' as u32 && intermediates == 0 => Command::DECTST,
        x if x == b'y' as u32 && intermediates == MULT => Command::DECRQCRA,
        x if x == b'y' as u32 && intermediates == PLUS => Command::DECPKFMR,
        x if x == b'Z' as u32 && intermediates == 0 => Command::CBT,
        x if x == b'z' as u32 && intermediates == DOLLAR => Command::DECERA,
        x if x == b'z' as u32 && intermediates == SQUOTE => Command::DECELR,
        x if x == b'z' as u32 && intermediates == MULT => Command::DECINVM,
        x if x == b'z' as u32 && intermediates == PLUS => Command::DECPKA,
        x if x == b'@' as u32 && intermediates == 0 => Command::ICH,
        x if x == b'`' as u32 && intermediates == 0 => Command::HPA,
        x if x == b'{' as u32 && intermediates == DOLLAR => Command::DECSERA,
        x if x == b'{' as u32 && intermediates == SQUOTE => Command::DECSLE,
        x if x == b'|' as u32 && intermediates == DOLLAR => Command::DECSCPP,
        x if x == b'|' as u32 && intermediates == SQUOTE => Command::DECRQLP,
        x if x == b'|' as u32 && intermediates == MULT => Command::DECSNLS,
        x if x == b'}' as u32 && intermediates == SPACE => Command::DECKBD,
        x if x == b'}' as u32 && intermediates == DOLLAR => Command::DECSASD,
        x if x == b'}' as u32 && intermediates == SQUOTE => Command::DECIC,
        x if x == b'~' as u32 && intermediates == SPACE => Command::DECTME,
        x if x == b'~' as u32 && intermediates == DOLLAR => Command::DECSSDT,
        x if x == b'~' as u32 && intermediates == SQUOTE => Command::DECDC,
        _ => Command::None,
    }
}
