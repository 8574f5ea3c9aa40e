//! The closed set of commands the classifier maps completed sequences to.
//!
//! Most of these are never fully implemented by a given consumer — the
//! classifier's job stops at naming the command; the Screen façade (out
//! of scope for this crate) decides what to do with it, and may simply
//! log anything it doesn't handle yet.
#![allow(clippy::upper_case_acronyms)]

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Command {
    /// Not yet resolved by the classifier, or genuinely unmapped input.
    None,

    // C0 / C1 controls (dispatched from `Event::Control`).
    NUL,
    ENQ,
    BEL,
    BS,
    HT,
    LF,
    VT,
    FF,
    CR,
    SO,
    SI,
    DC1,
    DC3,
    SUB,
    IND,
    NEL,
    HTS,
    RI,
    SS2,
    SS3,
    SPA,
    EPA,
    DECID,
    ST,

    // Cursor movement.
    CUU,
    CUD,
    CUF,
    CUB,
    CNL,
    CPL,
    CHA,
    CUP,
    CHT,
    CBT,
    HPA,
    HPR,
    VPA,
    VPR,
    HVP,
    REP,

    // Device attributes / status.
    DA1,
    DA2,
    DA3,
    DSR_ANSI,
    DSR_DEC,
    DECREQTPARM,

    // Editing.
    ICH,
    DCH,
    ECH,
    IL,
    DL,
    TBC,

    // Erasing.
    ED,
    EL,
    DECSED,
    DECSEL,

    // Scrolling / margins.
    SU,
    SD,
    DECSTBM,
    DECSLRM_OR_SC,
    RC,

    // Character attributes and sets.
    SGR,
    SCS,

    // Modes.
    SM_ANSI,
    SM_DEC,
    RM_ANSI,
    RM_DEC,
    DECRQM_ANSI,
    DECRQM_DEC,
    DECANM,
    DECKPAM,
    DECKPNM,

    // Media copy.
    MC_ANSI,
    MC_DEC,

    // Reset / state save.
    RIS,
    DECSTR,
    DECSC,
    DECRC,
    DECALN,

    // Pages.
    NP,
    PP,
    PPA,
    PPB,
    PPR,

    // Locking/single shifts.
    LS1R,
    LS2,
    LS2R,
    LS3,
    LS3R,

    // DEC line attributes.
    DECDHL_TH,
    DECDHL_BH,
    DECSWL,
    DECDWL,
    DECBI,
    DECFI,

    // DEC rectangular area operations.
    DECCARA,
    DECCRA,
    DECERA,
    DECFRA,
    DECRARA,
    DECRQCRA,
    DECSERA,
    DECSACE,

    // DEC miscellaneous device configuration.
    DECSCA,
    DECSCL,
    DECSCP,
    DECSCPP,
    DECSCS,
    DECSCUSR,
    DECSDDT,
    DECSDPT,
    DECSFC,
    DECSKCV,
    DECSLCK,
    DECSLE,
    DECSLPP,
    DECSMBV,
    DECSMKR,
    DECSNLS,
    DECSPP,
    DECSPPCS,
    DECSPRTT,
    DECSR,
    DECSRFR,
    DECSSCLS,
    DECSSDT,
    DECSSL,
    DECST8C,
    DECSTRL,
    DECSWBV,
    DECTME,
    DECTST,
    DECEFR,
    DECELF,
    DECELR,
    DECIC,
    DECDC,
    DECINVM,
    DECKBD,
    DECLFKC,
    DECLL,
    DECLTOD,
    DECPCTERM,
    DECPKA,
    DECPKFMR,
    DECRPKT,
    DECRQDE,
    DECRQKT,
    DECRQLP,
    DECRQPKFM,
    DECRQPSR,
    DECRQTSR,
    DECRQUPSS,
    DECSASD,
    DECTID,

    // xterm extensions.
    XTERM_CLLHP,
    XTERM_IHMT,
    XTERM_MLHP,
    XTERM_MUHP,
    XTERM_RPM,
    XTERM_RRV,
    XTERM_RTM,
    XTERM_SACL1,
    XTERM_SACL2,
    XTERM_SACL3,
    XTERM_SDCS,
    XTERM_SGFX,
    XTERM_SPM,
    XTERM_SRV,
    XTERM_STM,
    XTERM_SUCS,
    XTERM_WM,

    // C1 compatibility announcements.
    S7C1T,
    S8C1T,
}

impl Default for Command {
    fn default() -> Self {
        Command::None
    }
}
