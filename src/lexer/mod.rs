use logos::Logos;

/// Leading word of a G-code line.
/// Only the first token of a line matters to the post; the rest is passed through untouched.

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexerError)]
pub enum Head {
    // Program number, e.g. O1234
    #[regex(r"O[0-9]+")]
    ProgramNumber,

    // Tool change needs at least two digits (T01, T0101)
    #[regex(r"T[0-9][0-9]+")]
    ToolNumber,

    #[token("%")]
    Percent,

    #[token("M99")]
    #[token("M30")]
    EndMarker,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LexerError;

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lexer error")
    }
}

impl std::error::Error for LexerError {}

/// What a trimmed line means to the post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `( ... )`
    Comment,
    /// `O` followed only by digits
    ProgramNumber,
    /// `T` followed by at least two digits
    ToolChange,
    /// Bare `M99` / `M30`
    EndMarker,
    /// Bare `%`
    Percent,
    /// Anything else, copied verbatim
    Code,
}

/// Leading characters of lines worth keeping
pub const LEADING_TOKENS: [char; 5] = ['G', 'N', 'T', 'O', '('];

/// Lines kept even though they don't start with a leading token
pub const BARE_MARKERS: [&str; 3] = ["%", "M99", "M30"];

/// Lex the head of a line, returning the token and whether it spans the whole line
fn lex_head(line: &str) -> Option<(Head, bool)> {
    let mut lexer = Head::lexer(line);
    match lexer.next() {
        Some(Ok(head)) if lexer.span().start == 0 => Some((head, lexer.span().end == line.len())),
        _ => None,
    }
}

/// Classify a line. Leading/trailing whitespace is ignored.
pub fn classify(line: &str) -> LineKind {
    let s = line.trim();
    if s.is_empty() {
        return LineKind::Blank;
    }
    if s.starts_with('(') && s.ends_with(')') {
        return LineKind::Comment;
    }

    match lex_head(s) {
        Some((Head::ProgramNumber, true)) => LineKind::ProgramNumber,
        Some((Head::ToolNumber, _)) => LineKind::ToolChange,
        Some((Head::Percent, true)) => LineKind::Percent,
        Some((Head::EndMarker, true)) => LineKind::EndMarker,
        _ => LineKind::Code,
    }
}

/// Whether a trimmed line belongs to the machining program at all
pub fn is_relevant(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return false;
    }
    s.starts_with(LEADING_TOKENS) || BARE_MARKERS.contains(&s)
}
