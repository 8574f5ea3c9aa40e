//! Character set selection (`SCS`, ESC `(`/`)`/`*`/`+`/`-`/`.`/`/`).
//!
//! UTF-8 is assumed throughout this implementation, so the resolved
//! charset id is never used to translate bytes — `Command::SCS` is
//! still reported faithfully so a consumer that wants 94/96 G-set
//! translation can layer it on top.
#![allow(clippy::upper_case_acronyms)]

use crate::intermediates as flag;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Charset {
    None,

    // 96-character sets.
    IsoLatin1Supplemental,
    IsoLatin2Supplemental,
    IsoLatin5Supplemental,
    IsoGreekSupplemental,
    IsoHebrewSupplemental,
    IsoLatinCyrillic,

    // 94-character sets.
    DecSpecialGraphic,
    DecSupplemental,
    DecTechnical,
    CyrillicDec,
    DutchNrcs,
    FinnishNrcs,
    FrenchNrcs,
    FrenchCanadianNrcs,
    GermanNrcs,
    GreekDec,
    GreekNrcs,
    HebrewDec,
    HebrewNrcs,
    ItalianNrcs,
    NorwegianDanishNrcs,
    PortugueseNrcs,
    RussianNrcs,
    ScsNrcs,
    SpanishNrcs,
    SwedishNrcs,
    SwissNrcs,
    TurkishDec,
    TurkishNrcs,

    UserprefSupplemental,
}

pub const BRITISH_NRCS: Charset = Charset::IsoLatin1Supplemental;
pub const AMERICAN_NRCS: Charset = Charset::IsoLatin2Supplemental;

/// Whether `cs` belongs to the 96-character-set family (as opposed to a
/// 94-character set or the special user-preference set).
fn is_96(cs: Charset) -> bool {
    matches!(
        cs,
        Charset::IsoLatin1Supplemental
            | Charset::IsoLatin2Supplemental
            | Charset::IsoLatin5Supplemental
            | Charset::IsoGreekSupplemental
            | Charset::IsoHebrewSupplemental
            | Charset::IsoLatinCyrillic
    )
}

struct Entry {
    cs: Charset,
    raw: u8,
    flags: u32,
}

/// Listed in priority order: when two entries share `(raw, flags)` the
/// earlier one in this table wins. The only real collision is Hebrew
/// (96-compat, primary choice) against Swedish NRCS's secondary choice;
/// keeping Hebrew first here reproduces that preference intentionally.
const TABLE: &[Entry] = &[
    Entry { cs: Charset::IsoLatin1Supplemental, raw: b'A', flags: 0 },
    Entry { cs: Charset::IsoLatin2Supplemental, raw: b'B', flags: 0 },
    Entry { cs: Charset::IsoLatin5Supplemental, raw: b'M', flags: 0 },
    Entry { cs: Charset::IsoGreekSupplemental, raw: b'F', flags: 0 },
    Entry { cs: Charset::IsoHebrewSupplemental, raw: b'H', flags: 0 },
    Entry { cs: Charset::IsoLatinCyrillic, raw: b'L', flags: 0 },
    Entry { cs: Charset::DecSpecialGraphic, raw: b'0', flags: 0 },
    Entry { cs: Charset::DecSupplemental, raw: b'5', flags: flag::PERCENT },
    Entry { cs: Charset::DecTechnical, raw: b'>', flags: 0 },
    Entry { cs: Charset::CyrillicDec, raw: b'4', flags: flag::AND },
    Entry { cs: Charset::DutchNrcs, raw: b'4', flags: 0 },
    Entry { cs: Charset::FinnishNrcs, raw: b'5', flags: 0 },
    Entry { cs: Charset::FrenchNrcs, raw: b'R', flags: 0 },
    Entry { cs: Charset::FrenchCanadianNrcs, raw: b'9', flags: 0 },
    Entry { cs: Charset::GermanNrcs, raw: b'K', flags: 0 },
    Entry { cs: Charset::GreekDec, raw: b'?', flags: flag::DQUOTE },
    Entry { cs: Charset::GreekNrcs, raw: b'>', flags: flag::DQUOTE },
    Entry { cs: Charset::HebrewDec, raw: b'4', flags: flag::DQUOTE },
    Entry { cs: Charset::HebrewNrcs, raw: b'=', flags: flag::PERCENT },
    Entry { cs: Charset::ItalianNrcs, raw: b'Y', flags: 0 },
    Entry { cs: Charset::NorwegianDanishNrcs, raw: b'`', flags: 0 },
    Entry { cs: Charset::PortugueseNrcs, raw: b'6', flags: flag::PERCENT },
    Entry { cs: Charset::RussianNrcs, raw: b'5', flags: flag::AND },
    Entry { cs: Charset::ScsNrcs, raw: b'3', flags: flag::PERCENT },
    Entry { cs: Charset::SpanishNrcs, raw: b'Z', flags: 0 },
    Entry { cs: Charset::SwedishNrcs, raw: b'7', flags: 0 },
    Entry { cs: Charset::SwissNrcs, raw: b'=', flags: 0 },
    Entry { cs: Charset::TurkishDec, raw: b'0', flags: flag::PERCENT },
    Entry { cs: Charset::TurkishNrcs, raw: b'2', flags: flag::PERCENT },
    Entry { cs: Charset::UserprefSupplemental, raw: b'<', flags: 0 },
    // Secondary choices.
    Entry { cs: Charset::FinnishNrcs, raw: b'C', flags: 0 },
    Entry { cs: Charset::FrenchNrcs, raw: b'f', flags: 0 },
    Entry { cs: Charset::FrenchCanadianNrcs, raw: b'Q', flags: 0 },
    Entry { cs: Charset::NorwegianDanishNrcs, raw: b'E', flags: 0 },
    // Secondary choice on Swedish NRCS conflicts with the primary choice
    // on ISO Hebrew Supplemental (raw 'H', flags 0); the entry above
    // always wins since it's listed first.
    Entry { cs: Charset::SwedishNrcs, raw: b'H', flags: 0 },
    // Tertiary choice.
    Entry { cs: Charset::NorwegianDanishNrcs, raw: b'6', flags: 0 },
];

/// Resolve a `(terminator, intermediates)` pair to a charset. When
/// `require_96` is set, only 96-character-set ids are accepted (used for
/// the `-`, `.`, `/` introducers).
pub fn from_terminator(raw: u8, flags: u32, require_96: bool) -> Option<Charset> {
    for entry in TABLE {
        if entry.raw == raw && entry.flags == flags {
            if !require_96 || is_96(entry.cs) {
                return Some(entry.cs);
            }
        }
    }
    None
}
