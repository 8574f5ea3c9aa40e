//! Color attributes and the default palette.
//!
//! Adapted from the source's `ColorAttribute`/`ColorPalette` split: a
//! small tagged value describing *what* a cell's color means, resolved
//! against a palette only when something actually needs pixels (the
//! out-of-scope renderer). `NamedColor` mirrors the classic 16-entry ANSI
//! set, promoted to its bright half by `bold`.

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Maroon,
    Green,
    Olive,
    Navy,
    Purple,
    Teal,
    Silver,
    Grey,
    Red,
    Lime,
    Yellow,
    Blue,
    Fuschia,
    Aqua,
    White,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Color {
    Default,
    Palette256(u8),
    Rgb(u8, u8, u8),
    Named(NamedColor),
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    const fn new(red: u8, green: u8, blue: u8) -> Rgb {
        Rgb { red, green, blue }
    }
}

/// Component values for the 6x6x6 color cube (indices 16-231) and the
/// grayscale ramp (232-255) of the 256-color palette.
const CUBE_RAMP: [u8; 6] = [0x00, 0x5F, 0x87, 0xAF, 0xD7, 0xFF];

const DEFAULT_PALETTE_16: [Rgb; 16] = [
    Rgb::new(0, 0, 0),
    Rgb::new(205, 0, 0),
    Rgb::new(0, 205, 0),
    Rgb::new(205, 205, 0),
    Rgb::new(0, 0, 238),
    Rgb::new(205, 0, 205),
    Rgb::new(0, 205, 205),
    Rgb::new(229, 229, 229),
    Rgb::new(127, 127, 127),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(92, 92, 255),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 255, 255),
];

/// Maps color attributes to 32-bit ARGB pixels. Built once and reused by
/// whatever external renderer consumes cell contents; the page model
/// itself never resolves colors.
#[derive(Debug, Clone)]
pub struct Palette {
    named: [Rgb; 16],
    foreground: Rgb,
    background: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette { named: DEFAULT_PALETTE_16, foreground: Rgb::new(229, 229, 229), background: Rgb::new(0, 0, 0) }
    }
}

impl Palette {
    fn cube(t: u8) -> Rgb {
        let idx = t as usize;
        Rgb::new(CUBE_RAMP[idx / 36 % 6], CUBE_RAMP[idx / 6 % 6], CUBE_RAMP[idx % 6])
    }

    fn gray(t: u8) -> u8 {
        t.saturating_mul(10).saturating_add(8)
    }

    pub fn resolve_256(&self, index: u8) -> Rgb {
        match index {
            0..=15 => self.named[index as usize],
            16..=231 => Self::cube(index - 16),
            _ => {
                let level = Self::gray(index - 232);
                Rgb::new(level, level, level)
            }
        }
    }

    pub fn resolve(&self, color: Color, bold_fg: bool, is_foreground: bool) -> Rgb {
        match color {
            Color::Default => {
                if is_foreground {
                    self.foreground
                } else {
                    self.background
                }
            }
            Color::Palette256(idx) => self.resolve_256(idx),
            Color::Rgb(r, g, b) => Rgb::new(r, g, b),
            Color::Named(code) => {
                let idx = code as u8;
                let idx = if bold_fg && is_foreground && idx < 8 { idx + 8 } else { idx };
                self.named[idx as usize]
            }
        }
    }

    /// `attr_to_argb32` from the source, specialised to the fg/bg pair of
    /// one cell: `inverse` swaps the resolved colors, not the attribute
    /// tags, so a `DEFAULT` foreground under `inverse` still resolves
    /// against the foreground slot before the swap.
    pub fn attr_to_argb32(&self, fg: Color, bg: Color, bold: bool, inverse: bool) -> (u32, u32) {
        let fg_rgb = self.resolve(fg, bold, true);
        let bg_rgb = self.resolve(bg, bold, false);
        let (fg_rgb, bg_rgb) = if inverse { (bg_rgb, fg_rgb) } else { (fg_rgb, bg_rgb) };
        (to_argb32(fg_rgb), to_argb32(bg_rgb))
    }
}

fn to_argb32(c: Rgb) -> u32 {
    0xFF00_0000 | ((c.red as u32) << 16) | ((c.green as u32) << 8) | c.blue as u32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn named_bold_promotes_to_bright() {
        let pal = Palette::default();
        let dim = pal.resolve(Color::Named(NamedColor::Red), false, true);
        let bright = pal.resolve(Color::Named(NamedColor::Red), true, true);
        assert_eq!(dim, Rgb::new(205, 0, 0));
        assert_eq!(bright, Rgb::new(255, 0, 0));
    }

    #[test]
    fn cube_endpoints() {
        let pal = Palette::default();
        assert_eq!(pal.resolve_256(16), Rgb::new(0, 0, 0));
        assert_eq!(pal.resolve_256(231), Rgb::new(255, 255, 255));
    }

    #[test]
    fn grayscale_ramp() {
        let pal = Palette::default();
        let g = pal.resolve_256(232);
        assert_eq!(g, Rgb::new(8, 8, 8));
        let g = pal.resolve_256(255);
        assert_eq!(g, Rgb::new(238, 238, 238));
    }

    #[test]
    fn inverse_swaps_after_resolution() {
        let pal = Palette::default();
        let (fg, bg) = pal.attr_to_argb32(Color::Named(NamedColor::Red), Color::Default, false, true);
        let (fg2, bg2) = pal.attr_to_argb32(Color::Named(NamedColor::Red), Color::Default, false, false);
        assert_eq!(fg, bg2);
        assert_eq!(bg, fg2);
    }
}
