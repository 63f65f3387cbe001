/// A cursor for character-by-character parsing with position tracking.
///
/// Operates over a slice of `char`s while tracking the absolute character
/// position in the parse buffer (via `base` offset), so nested content parsed
/// from a sub-slice still reports document positions.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The characters being parsed.
    pub chars: &'a [char],
    /// Base offset in the parse buffer (added to local index for absolute positions).
    pub base: usize,
    /// Current local index into `chars`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `chars` with the given base offset.
    pub fn new(chars: &'a [char], base: usize) -> Self {
        Self { chars, base, i: 0 }
    }

    /// Returns the current absolute position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.chars.len()
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given pattern.
    pub fn starts_with(&self, pat: &[char]) -> bool {
        self.chars
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one character, returning the consumed character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.i).copied()?;
        self.i += 1;
        Some(c)
    }

    /// Advances by `n` characters.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Moves to a local index.
    pub fn seek(&mut self, i: usize) {
        self.i = i;
    }

    /// Local index of the first occurrence of `pat` at or after `from`.
    ///
    /// With `allow_newlines == false` a newline that does not start `pat`
    /// ends the search. This is a plain first-occurrence search: nested
    /// openings of the same delimiter are not balanced.
    pub fn find(&self, from: usize, pat: &[char], allow_newlines: bool) -> Option<usize> {
        let mut i = from;
        while i + pat.len() <= self.chars.len() {
            if self.chars[i..].starts_with(pat) {
                return Some(i);
            }
            if !allow_newlines && self.chars[i] == '\n' {
                return None;
            }
            i += 1;
        }
        None
    }
}
