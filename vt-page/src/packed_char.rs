//! A cell's character content: a base codepoint plus up to a handful of
//! combining marks, stored inline for the common case and spilling to the
//! heap only for long combining sequences.
//!
//! The source packs this into a single 64-bit tagged value (three 21-bit
//! fields plus a tag bit, or a heap pointer). `enum PackedChar` gets the
//! same size class for the inline case and lets the heap case carry an
//! owned allocation instead of a raw pointer, so there's no unsafe and no
//! reference counting: a `PackedChar` is moved, not shared, exactly as the
//! source's ownership discipline requires.

use unicode_width::UnicodeWidthChar;

/// Codepoints held inline before a [`PackedChar`] spills to the heap.
pub const INLINE_CAP: usize = 3;
/// `merge` stops growing a heap-backed character once it holds this many
/// codepoints; further combining marks are silently dropped.
pub const MERGE_SOFT_LIMIT: usize = 64;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PackedChar {
    Null,
    Inline { cps: [u32; INLINE_CAP], len: u8 },
    Heap(Box<Vec<u32>>),
}

impl Default for PackedChar {
    fn default() -> Self {
        PackedChar::Null
    }
}

fn is_valid_codepoint(cp: u32) -> bool {
    cp <= 0x10FFFF
}

impl PackedChar {
    /// Replace `prev` with a fresh one-codepoint packing of `cp`.
    ///
    /// `prev` is consumed (and, if heap-backed, its allocation dropped)
    /// the same way the source frees the previous value before returning
    /// the new one.
    pub fn set(_prev: PackedChar, cp: u32) -> PackedChar {
        let cp = if is_valid_codepoint(cp) { cp } else { 0xFFFD };
        PackedChar::Inline { cps: [cp, 0, 0], len: 1 }
    }

    /// Append a combining mark to `base`. Invalid codepoints and marks
    /// past the soft limit are dropped, leaving `base` unchanged.
    pub fn merge(base: PackedChar, cp: u32) -> PackedChar {
        if !is_valid_codepoint(cp) {
            return base;
        }
        match base {
            PackedChar::Null => PackedChar::Inline { cps: [cp, 0, 0], len: 1 },
            PackedChar::Inline { cps, len } if (len as usize) < INLINE_CAP => {
                let mut cps = cps;
                cps[len as usize] = cp;
                PackedChar::Inline { cps, len: len + 1 }
            }
            PackedChar::Inline { cps, len } => {
                // Already full at INLINE_CAP; spill to the heap.
                let mut v = Vec::with_capacity(len as usize + 1);
                v.extend_from_slice(&cps[..len as usize]);
                v.push(cp);
                PackedChar::Heap(Box::new(v))
            }
            PackedChar::Heap(mut v) => {
                if v.len() >= MERGE_SOFT_LIMIT {
                    PackedChar::Heap(v)
                } else {
                    v.push(cp);
                    PackedChar::Heap(v)
                }
            }
        }
    }

    /// An independent copy. Never fails: Rust's allocator aborts rather
    /// than returning an error, so unlike the source's `dup` this can't
    /// actually degrade to a U+FFFD fallback — it is kept for interface
    /// parity and documented as a deliberate deviation.
    pub fn dup(&self) -> PackedChar {
        self.clone()
    }

    /// Release heap storage, if any. A no-op on `Null` and inline values;
    /// kept only so callers that mirror the source's explicit free/merge
    /// pairing have a symmetric call to make. Rust drops `ch` on return.
    pub fn free(_ch: PackedChar) {}

    /// Yield the codepoint run this character represents. Inline and null
    /// values are copied into `out_buf` (with a trailing zero); heap
    /// values alias their own storage.
    pub fn resolve<'a>(&'a self, out_buf: &'a mut [u32; 4]) -> &'a [u32] {
        match self {
            PackedChar::Null => &out_buf[..0],
            PackedChar::Inline { cps, len } => {
                let len = *len as usize;
                out_buf[..len].copy_from_slice(&cps[..len]);
                out_buf[len] = 0;
                &out_buf[..len]
            }
            PackedChar::Heap(v) => v.as_slice(),
        }
    }

    /// Display width of the base codepoint: 0 if unprintable, else its
    /// East Asian width (1 or 2). Combining marks never contribute.
    pub fn width(&self) -> u8 {
        let base = match self {
            PackedChar::Null => return 0,
            PackedChar::Inline { cps, .. } => cps[0],
            PackedChar::Heap(v) => v[0],
        };
        match char::from_u32(base) {
            Some(c) => c.width().unwrap_or(0) as u8,
            None => 0,
        }
    }

    /// Bit-for-bit equality of the packed representation. For heap values
    /// this means the same allocation, not merely equal contents — the
    /// source's notion of "same" is pointer identity on that branch.
    pub fn same(&self, other: &PackedChar) -> bool {
        match (self, other) {
            (PackedChar::Null, PackedChar::Null) => true,
            (
                PackedChar::Inline { cps: a, len: al },
                PackedChar::Inline { cps: b, len: bl },
            ) => al == bl && a == b,
            (PackedChar::Heap(a), PackedChar::Heap(b)) => std::ptr::eq(a.as_ptr(), b.as_ptr()),
            _ => false,
        }
    }

    /// Structural equality: same codepoint run, regardless of whether
    /// both sides happen to use the same representation.
    pub fn equal(&self, other: &PackedChar) -> bool {
        let mut a_buf = [0u32; 4];
        let mut b_buf = [0u32; 4];
        self.resolve(&mut a_buf) == other.resolve(&mut b_buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_replaces_and_frees_previous() {
        let a = PackedChar::set(PackedChar::Null, 'x' as u32);
        let b = PackedChar::set(a, 'y' as u32);
        let mut buf = [0u32; 4];
        assert_eq!(b.resolve(&mut buf), &['y' as u32]);
    }

    #[test]
    fn merge_combining_marks_stay_inline() {
        let ch = PackedChar::set(PackedChar::Null, 'a' as u32);
        let ch = PackedChar::merge(ch, 0x0301);
        let ch = PackedChar::merge(ch, 0x0302);
        let mut buf = [0u32; 4];
        assert_eq!(ch.resolve(&mut buf), &['a' as u32, 0x0301, 0x0302]);
        assert_eq!(ch.width(), 1);
        assert!(matches!(ch, PackedChar::Inline { len: 3, .. }));
    }

    #[test]
    fn merge_spills_to_heap_past_inline_capacity() {
        let mut ch = PackedChar::set(PackedChar::Null, 'a' as u32);
        for mark in [0x0301, 0x0302, 0x0303] {
            ch = PackedChar::merge(ch, mark);
        }
        assert!(matches!(ch, PackedChar::Heap(_)));
        let mut buf = [0u32; 4];
        assert_eq!(ch.resolve(&mut buf).len(), 4);
    }

    #[test]
    fn merge_drops_invalid_codepoint() {
        let ch = PackedChar::set(PackedChar::Null, 'a' as u32);
        let ch = PackedChar::merge(ch, 0x20_0000);
        let mut buf = [0u32; 4];
        assert_eq!(ch.resolve(&mut buf), &['a' as u32]);
    }

    #[test]
    fn merge_stops_at_soft_limit() {
        let mut ch = PackedChar::set(PackedChar::Null, 'a' as u32);
        for _ in 0..(MERGE_SOFT_LIMIT + 10) {
            ch = PackedChar::merge(ch, 0x0301);
        }
        let mut buf = [0u32; 4];
        assert_eq!(ch.resolve(&mut buf).len(), MERGE_SOFT_LIMIT);
    }

    #[test]
    fn equal_is_structural_same_is_identity() {
        let a = PackedChar::set(PackedChar::Null, 'x' as u32);
        let b = PackedChar::set(PackedChar::Null, 'x' as u32);
        assert!(a.equal(&b));
        assert!(a.same(&b));

        let mut long_a = PackedChar::set(PackedChar::Null, 'a' as u32);
        for _ in 0..5 {
            long_a = PackedChar::merge(long_a, 0x0301);
        }
        let long_b = long_a.dup();
        assert!(long_a.equal(&long_b));
        assert!(!long_a.same(&long_b));
    }

    #[test]
    fn null_resolves_empty_and_zero_width() {
        let ch = PackedChar::Null;
        let mut buf = [0u32; 4];
        assert_eq!(ch.resolve(&mut buf), &[] as &[u32]);
        assert_eq!(ch.width(), 0);
    }
}
