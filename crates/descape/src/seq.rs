// SPDX-License-Identifier: MIT
//
// CSI sequence grammar and the scanning state machine.
//
// A control sequence is `ESC [` followed by any run of parameter and
// intermediate bytes, closed by a single letter or `@`. The closing
// byte doubles as the sequence's category tag: `m` selects colors and
// attributes, `J` clears the screen, `A` through `H` move the cursor,
// and so on. Recognition needs nothing beyond this shape. The filter
// never interprets what a sequence does; it only decides whether the
// bytes pass through.
//
// Everything here is byte-oriented. Data outside a sequence is never
// inspected beyond the search for the next introducer, which keeps the
// filter encoding-agnostic: UTF-8, Latin-1, or arbitrary binary all
// pass through byte-exact as long as they contain no `ESC`.
//
// The Scanner owns the incremental state. Sequences arrive split
// across arbitrary chunk boundaries, so the in-progress bytes and the
// grammar position persist between calls. Both stream adapters
// (`writer`, `reader`) drive the same scanner and differ only in where
// the surviving bytes go.

use std::io;

use bitflags::bitflags;

// ─── Byte Classes ───────────────────────────────────────────────────────────

/// Escape introducer (`ESC`, 0x1B).
pub const INTRODUCER: u8 = 0x1B;

/// Control sequence marker: the `[` that must follow the introducer.
pub const CSI_MARKER: u8 = 0x5B;

/// Whether `byte` opens an escape sequence.
#[inline]
#[must_use]
pub const fn is_introducer(byte: u8) -> bool {
    byte == INTRODUCER
}

/// Whether `byte` is the control sequence marker (`[`).
#[inline]
#[must_use]
pub const fn is_csi_marker(byte: u8) -> bool {
    byte == CSI_MARKER
}

/// Whether `byte` closes a sequence body.
///
/// Any ASCII letter or `@` ends a sequence; everything else belongs to
/// the body. The closing byte is the sequence's category tag.
#[inline]
#[must_use]
pub const fn is_terminator(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'@'
}

// ─── Category Tags ──────────────────────────────────────────────────────────

/// The category of a recognized sequence: its terminator byte.
///
/// Every structurally valid terminator yields a tag, whether or not a
/// name exists for it. `ESC [ 5 q` is a complete sequence with the
/// unnamed category `q`, and suppression policies can still target it.
///
/// ```
/// use descape::Tag;
///
/// let tag = Tag::from_terminator(b'm').unwrap();
/// assert_eq!(tag, Tag::SGR);
/// assert_eq!(tag.name(), Some("select graphic rendition"));
/// assert_eq!(Tag::from_terminator(b'1'), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(u8);

impl Tag {
    /// Cursor up (`CSI n A`).
    pub const CURSOR_UP: Self = Self(b'A');
    /// Cursor down (`CSI n B`).
    pub const CURSOR_DOWN: Self = Self(b'B');
    /// Cursor right (`CSI n C`).
    pub const CURSOR_RIGHT: Self = Self(b'C');
    /// Cursor left (`CSI n D`).
    pub const CURSOR_LEFT: Self = Self(b'D');
    /// Cursor to start of line, `n` rows down (`CSI n E`).
    pub const NEXT_LINE: Self = Self(b'E');
    /// Cursor to start of line, `n` rows up (`CSI n F`).
    pub const PREV_LINE: Self = Self(b'F');
    /// Cursor to column `n` (`CSI n G`).
    pub const COLUMN: Self = Self(b'G');
    /// Cursor to row and column (`CSI r ; c H`).
    pub const POSITION: Self = Self(b'H');
    /// Clear all or part of the screen (`CSI n J`).
    pub const CLEAR_SCREEN: Self = Self(b'J');
    /// Clear all or part of the current line (`CSI n K`).
    pub const CLEAR_LINE: Self = Self(b'K');
    /// Scroll the viewport up (`CSI n S`).
    pub const SCROLL_UP: Self = Self(b'S');
    /// Scroll the viewport down (`CSI n T`).
    pub const SCROLL_DOWN: Self = Self(b'T');
    /// Select graphic rendition: colors and text attributes (`CSI n ; .. m`).
    pub const SGR: Self = Self(b'm');
    /// Save the cursor position (`CSI s`).
    pub const SAVE_CURSOR: Self = Self(b's');
    /// Restore the saved cursor position (`CSI u`).
    pub const RESTORE_CURSOR: Self = Self(b'u');

    /// Build a tag from a sequence terminator byte.
    ///
    /// Returns `None` when `byte` cannot close a sequence.
    #[must_use]
    pub const fn from_terminator(byte: u8) -> Option<Self> {
        if is_terminator(byte) {
            Some(Self(byte))
        } else {
            None
        }
    }

    /// The raw terminator byte.
    #[inline]
    #[must_use]
    pub const fn byte(self) -> u8 {
        self.0
    }

    /// The semantic name of a known category, `None` for the rest.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            b'A' => Some("cursor up"),
            b'B' => Some("cursor down"),
            b'C' => Some("cursor right"),
            b'D' => Some("cursor left"),
            b'E' => Some("next line"),
            b'F' => Some("previous line"),
            b'G' => Some("column"),
            b'H' => Some("position"),
            b'J' => Some("clear screen"),
            b'K' => Some("clear line"),
            b'S' => Some("scroll up"),
            b'T' => Some("scroll down"),
            b'm' => Some("select graphic rendition"),
            b's' => Some("save cursor"),
            b'u' => Some("restore cursor"),
            _ => None,
        }
    }

    /// Bit for this tag inside a [`TagSet`].
    const fn mask(self) -> u64 {
        1 << (self.0 - 0x40)
    }
}

bitflags! {
    /// A set of category tags, one bit per terminator byte.
    ///
    /// Bit `n` is terminator byte `0x40 + n`, so the whole `@`, `A`-`Z`,
    /// `a`-`z` range fits in a `u64` with room to spare. Unnamed but
    /// valid categories are representable through [`TagSet::only`].
    ///
    /// ```
    /// use descape::TagSet;
    ///
    /// let set = TagSet::SGR | TagSet::CLEAR_SCREEN;
    /// assert!(set.contains(TagSet::SGR));
    /// assert!(!set.contains(TagSet::CLEAR_LINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct TagSet: u64 {
        const CURSOR_UP      = Tag::CURSOR_UP.mask();
        const CURSOR_DOWN    = Tag::CURSOR_DOWN.mask();
        const CURSOR_RIGHT   = Tag::CURSOR_RIGHT.mask();
        const CURSOR_LEFT    = Tag::CURSOR_LEFT.mask();
        const NEXT_LINE      = Tag::NEXT_LINE.mask();
        const PREV_LINE      = Tag::PREV_LINE.mask();
        const COLUMN         = Tag::COLUMN.mask();
        const POSITION       = Tag::POSITION.mask();
        const CLEAR_SCREEN   = Tag::CLEAR_SCREEN.mask();
        const CLEAR_LINE     = Tag::CLEAR_LINE.mask();
        const SCROLL_UP      = Tag::SCROLL_UP.mask();
        const SCROLL_DOWN    = Tag::SCROLL_DOWN.mask();
        const SGR            = Tag::SGR.mask();
        const SAVE_CURSOR    = Tag::SAVE_CURSOR.mask();
        const RESTORE_CURSOR = Tag::RESTORE_CURSOR.mask();
    }
}

impl TagSet {
    /// The set containing exactly one tag, named or not.
    #[must_use]
    pub const fn only(tag: Tag) -> Self {
        Self::from_bits_retain(tag.mask())
    }

    /// Whether `tag` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains_tag(self, tag: Tag) -> bool {
        self.bits() & tag.mask() != 0
    }

    /// Add `tag` to the set.
    pub fn insert_tag(&mut self, tag: Tag) {
        *self = self.union(Self::only(tag));
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        Self::only(tag)
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, tag| set.union(Self::only(tag)))
    }
}

// ─── Suppression Policy ─────────────────────────────────────────────────────

/// Which sequence categories are removed from the stream.
///
/// Fixed at filter construction and never changed afterwards. The
/// default forwards everything.
///
/// ```
/// use descape::{Strip, Tag, TagSet};
///
/// let policy = Strip::tags(TagSet::SGR | TagSet::CLEAR_SCREEN);
/// assert!(policy.suppresses(Tag::SGR));
/// assert!(!policy.suppresses(Tag::CURSOR_UP));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strip {
    tags: TagSet,
    all: bool,
}

impl Strip {
    /// Forward every sequence untouched.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            tags: TagSet::empty(),
            all: false,
        }
    }

    /// Remove every recognized sequence, known category or not.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            tags: TagSet::empty(),
            all: true,
        }
    }

    /// Remove only the listed categories.
    #[must_use]
    pub const fn tags(tags: TagSet) -> Self {
        Self { tags, all: false }
    }

    /// Whether sequences in category `tag` are removed.
    #[inline]
    #[must_use]
    pub const fn suppresses(self, tag: Tag) -> bool {
        self.all || self.tags.contains_tag(tag)
    }

    /// Whether this policy forwards everything.
    #[inline]
    #[must_use]
    pub const fn is_passthrough(self) -> bool {
        !self.all && self.tags.is_empty()
    }
}

// ─── Scanner ────────────────────────────────────────────────────────────────

/// Position of the scanner within the sequence grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// Plain data, no sequence in progress.
    Ground,
    /// Introducer seen; the next byte decides sequence or literal pair.
    Escape,
    /// Inside a sequence body, accumulating until the terminator.
    Body,
}

/// The incremental sequence scanner shared by both stream adapters.
///
/// Feed chunks with [`scan`](Scanner::scan); bytes that survive the
/// policy come back through the `emit` callback in input order, in the
/// largest slices available. A sequence is emitted or dropped only
/// once its terminator arrives, never in part. Bytes of an unfinished
/// sequence stay buffered here across calls.
pub(crate) struct Scanner {
    state: ScanState,
    /// In-progress sequence bytes, introducer included.
    pending: Vec<u8>,
}

impl Scanner {
    pub(crate) fn new() -> Self {
        Self {
            state: ScanState::Ground,
            pending: Vec::with_capacity(64),
        }
    }

    /// Whether a partial sequence is buffered.
    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop any partial sequence and return to ground.
    pub(crate) fn reset(&mut self) {
        self.pending.clear();
        self.state = ScanState::Ground;
    }

    /// Scan one chunk, sending surviving bytes to `emit`.
    ///
    /// Literal data is emitted as slices of `chunk` without copying;
    /// only sequence bytes pass through the internal buffer. An error
    /// from `emit` aborts the scan immediately: already-emitted bytes
    /// stand, and the scanner keeps whatever progress it had made.
    pub(crate) fn scan<E>(&mut self, chunk: &[u8], strip: Strip, mut emit: E) -> io::Result<()>
    where
        E: FnMut(&[u8]) -> io::Result<()>,
    {
        debug_assert_eq!(self.pending.is_empty(), self.state == ScanState::Ground);

        let mut run = 0;
        for (i, &byte) in chunk.iter().enumerate() {
            match self.state {
                ScanState::Ground => {
                    if is_introducer(byte) {
                        if run < i {
                            emit(&chunk[run..i])?;
                        }
                        self.pending.push(byte);
                        self.state = ScanState::Escape;
                    }
                    // Anything else extends the current literal run.
                }
                ScanState::Escape => {
                    self.pending.push(byte);
                    if is_csi_marker(byte) {
                        self.state = ScanState::Body;
                    } else {
                        // Not a sequence after all. Both bytes pass
                        // through as ordinary data, introducer included.
                        emit(&self.pending)?;
                        self.pending.clear();
                        self.state = ScanState::Ground;
                        run = i + 1;
                    }
                }
                ScanState::Body => {
                    self.pending.push(byte);
                    if let Some(tag) = Tag::from_terminator(byte) {
                        if !strip.suppresses(tag) {
                            emit(&self.pending)?;
                        }
                        self.pending.clear();
                        self.state = ScanState::Ground;
                        run = i + 1;
                    }
                }
            }
        }

        if self.state == ScanState::Ground && run < chunk.len() {
            emit(&chunk[run..])?;
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run one scan over `data`, collecting surviving bytes.
    fn scan_collect(scanner: &mut Scanner, strip: Strip, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        scanner
            .scan(data, strip, |bytes| {
                out.extend_from_slice(bytes);
                Ok(())
            })
            .unwrap();
        out
    }

    // ── Byte classes ────────────────────────────────────────────────

    #[test]
    fn terminator_range_boundaries() {
        assert!(is_terminator(b'@')); // 0x40, the lowest terminator
        assert!(is_terminator(b'A'));
        assert!(is_terminator(b'Z'));
        assert!(is_terminator(b'a'));
        assert!(is_terminator(b'z')); // 0x7A, the highest
        assert!(!is_terminator(b'?')); // 0x3F, parameter byte
        assert!(!is_terminator(b'[')); // 0x5B, between the letter blocks
        assert!(!is_terminator(b'`')); // 0x60, just before lowercase
        assert!(!is_terminator(b'{')); // 0x7B, just past lowercase
        assert!(!is_terminator(b'0'));
        assert!(!is_terminator(0x1B));
    }

    #[test]
    fn introducer_and_marker() {
        assert!(is_introducer(0x1B));
        assert!(!is_introducer(b'['));
        assert!(is_csi_marker(b'['));
        assert!(!is_csi_marker(0x1B));
    }

    // ── Tags ────────────────────────────────────────────────────────

    #[test]
    fn tag_from_valid_terminator() {
        assert_eq!(Tag::from_terminator(b'm'), Some(Tag::SGR));
        assert_eq!(Tag::from_terminator(b'J'), Some(Tag::CLEAR_SCREEN));
        assert_eq!(Tag::from_terminator(b'u'), Some(Tag::RESTORE_CURSOR));
    }

    #[test]
    fn tag_from_invalid_byte() {
        assert_eq!(Tag::from_terminator(b'1'), None);
        assert_eq!(Tag::from_terminator(b';'), None);
        assert_eq!(Tag::from_terminator(b'['), None);
        assert_eq!(Tag::from_terminator(0x1B), None);
    }

    #[test]
    fn unknown_terminator_is_still_a_tag() {
        let tag = Tag::from_terminator(b'q').unwrap();
        assert_eq!(tag.byte(), b'q');
        assert_eq!(tag.name(), None);
    }

    #[test]
    fn all_named_tags_resolve() {
        let named = [
            (Tag::CURSOR_UP, "cursor up"),
            (Tag::CURSOR_DOWN, "cursor down"),
            (Tag::CURSOR_RIGHT, "cursor right"),
            (Tag::CURSOR_LEFT, "cursor left"),
            (Tag::NEXT_LINE, "next line"),
            (Tag::PREV_LINE, "previous line"),
            (Tag::COLUMN, "column"),
            (Tag::POSITION, "position"),
            (Tag::CLEAR_SCREEN, "clear screen"),
            (Tag::CLEAR_LINE, "clear line"),
            (Tag::SCROLL_UP, "scroll up"),
            (Tag::SCROLL_DOWN, "scroll down"),
            (Tag::SGR, "select graphic rendition"),
            (Tag::SAVE_CURSOR, "save cursor"),
            (Tag::RESTORE_CURSOR, "restore cursor"),
        ];
        for (tag, name) in named {
            assert_eq!(tag.name(), Some(name));
            assert_eq!(Tag::from_terminator(tag.byte()), Some(tag));
        }
    }

    // ── TagSet ──────────────────────────────────────────────────────

    #[test]
    fn tagset_contains_named_tags() {
        let set = TagSet::SGR | TagSet::CLEAR_SCREEN;
        assert!(set.contains_tag(Tag::SGR));
        assert!(set.contains_tag(Tag::CLEAR_SCREEN));
        assert!(!set.contains_tag(Tag::CURSOR_UP));
    }

    #[test]
    fn tagset_holds_unnamed_tags() {
        let q = Tag::from_terminator(b'q').unwrap();
        let mut set = TagSet::empty();
        assert!(!set.contains_tag(q));
        set.insert_tag(q);
        assert!(set.contains_tag(q));
        assert!(!set.contains_tag(Tag::SGR));
    }

    #[test]
    fn tagset_named_flags_match_tag_constants() {
        assert_eq!(TagSet::only(Tag::SGR), TagSet::SGR);
        assert_eq!(TagSet::only(Tag::CURSOR_UP), TagSet::CURSOR_UP);
        assert_eq!(TagSet::only(Tag::SAVE_CURSOR), TagSet::SAVE_CURSOR);
    }

    #[test]
    fn tagset_from_iterator() {
        let set: TagSet = [Tag::SGR, Tag::CLEAR_LINE].into_iter().collect();
        assert_eq!(set, TagSet::SGR | TagSet::CLEAR_LINE);
        assert_eq!(TagSet::from(Tag::SGR), TagSet::SGR);
    }

    // ── Strip ───────────────────────────────────────────────────────

    #[test]
    fn strip_none_suppresses_nothing() {
        assert!(!Strip::none().suppresses(Tag::SGR));
        assert!(!Strip::none().suppresses(Tag::from_terminator(b'q').unwrap()));
    }

    #[test]
    fn strip_all_suppresses_everything() {
        assert!(Strip::all().suppresses(Tag::SGR));
        assert!(Strip::all().suppresses(Tag::from_terminator(b'q').unwrap()));
    }

    #[test]
    fn strip_tags_is_selective() {
        let policy = Strip::tags(TagSet::SGR | TagSet::CLEAR_SCREEN);
        assert!(policy.suppresses(Tag::SGR));
        assert!(policy.suppresses(Tag::CLEAR_SCREEN));
        assert!(!policy.suppresses(Tag::CLEAR_LINE));
        assert!(!policy.suppresses(Tag::from_terminator(b'q').unwrap()));
    }

    #[test]
    fn strip_default_is_passthrough() {
        assert_eq!(Strip::default(), Strip::none());
        assert!(Strip::none().is_passthrough());
        assert!(!Strip::all().is_passthrough());
        assert!(!Strip::tags(TagSet::SGR).is_passthrough());
    }

    // ── Scanner: literals ───────────────────────────────────────────

    #[test]
    fn plain_bytes_survive_any_policy() {
        for strip in [Strip::none(), Strip::all(), Strip::tags(TagSet::SGR)] {
            let mut s = Scanner::new();
            assert_eq!(scan_collect(&mut s, strip, b"hello world"), b"hello world");
        }
    }

    #[test]
    fn empty_chunk_emits_nothing() {
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), b""), b"");
    }

    #[test]
    fn non_ascii_bytes_survive() {
        // One codepoint as UTF-8 (0xC3 0xA9) and as Latin-1 (0xE9).
        let data = [b'h', 0xC3, 0xA9, 0xE9, b'!'];
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), &data), data);
    }

    // ── Scanner: sequences ──────────────────────────────────────────

    #[test]
    fn sequence_forwarded_whole() {
        let mut s = Scanner::new();
        assert_eq!(
            scan_collect(&mut s, Strip::none(), b"a\x1b[1;31mb"),
            b"a\x1b[1;31mb"
        );
    }

    #[test]
    fn sequence_suppressed_whole() {
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), b"a\x1b[1;31mb"), b"ab");
    }

    #[test]
    fn at_sign_terminates() {
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), b"x\x1b[4@y"), b"xy");
    }

    #[test]
    fn marker_inside_body_is_not_a_terminator() {
        // `[` sits between the letter blocks; `ESC [ [ A` is one sequence.
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), b"x\x1b[[Ay"), b"xy");
    }

    #[test]
    fn introducer_inside_body_is_accumulated() {
        // A stray ESC in the body does not restart recognition.
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), b"x\x1b[1\x1b2my"), b"xy");
    }

    #[test]
    fn abandoned_pair_passes_through() {
        let mut s = Scanner::new();
        assert_eq!(scan_collect(&mut s, Strip::all(), b"a\x1bXb"), b"a\x1bXb");
    }

    #[test]
    fn double_introducer_is_an_abandoned_pair() {
        // The second ESC is consumed by the pair, so the `[2J` that
        // follows is plain data.
        let mut s = Scanner::new();
        assert_eq!(
            scan_collect(&mut s, Strip::all(), b"\x1b\x1b[2J"),
            b"\x1b\x1b[2J"
        );
    }

    #[test]
    fn back_to_back_sequences() {
        let mut s = Scanner::new();
        assert_eq!(
            scan_collect(&mut s, Strip::tags(TagSet::SGR), b"\x1b[1m\x1b[2J\x1b[0m"),
            b"\x1b[2J"
        );
    }

    // ── Scanner: chunk boundaries ───────────────────────────────────

    #[test]
    fn split_sequence_matches_one_shot() {
        let input = b"pre\x1b[1;31mmid\x1b[0mpost";
        let strip = Strip::tags(TagSet::SGR);
        let mut one = Scanner::new();
        let expect = scan_collect(&mut one, strip, input);
        for cut in 0..=input.len() {
            let mut s = Scanner::new();
            let mut out = scan_collect(&mut s, strip, &input[..cut]);
            out.extend(scan_collect(&mut s, strip, &input[cut..]));
            assert_eq!(out, expect, "cut at {cut}");
        }
    }

    #[test]
    fn byte_at_a_time_matches_one_shot() {
        let input = b"a\x1b[2Jb\x1bXc\x1b[5qd";
        for strip in [Strip::none(), Strip::all()] {
            let mut one = Scanner::new();
            let expect = scan_collect(&mut one, strip, input);
            let mut s = Scanner::new();
            let mut out = Vec::new();
            for &byte in input {
                out.extend(scan_collect(&mut s, strip, &[byte]));
            }
            assert_eq!(out, expect);
        }
    }

    #[test]
    fn pending_is_tracked_across_calls() {
        let mut s = Scanner::new();
        assert!(!s.has_pending());
        scan_collect(&mut s, Strip::none(), b"\x1b[1;3");
        assert!(s.has_pending());
        scan_collect(&mut s, Strip::none(), b"1m");
        assert!(!s.has_pending());
    }

    #[test]
    fn reset_drops_partial_sequence() {
        let mut s = Scanner::new();
        scan_collect(&mut s, Strip::none(), b"\x1b[12");
        s.reset();
        assert!(!s.has_pending());
        // Scanning resumes from ground: these bytes are plain data.
        assert_eq!(scan_collect(&mut s, Strip::none(), b"34m"), b"34m");
    }

    #[test]
    fn emit_error_aborts_scan() {
        let mut s = Scanner::new();
        let err = s
            .scan(b"abc", Strip::none(), |_| {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            })
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
