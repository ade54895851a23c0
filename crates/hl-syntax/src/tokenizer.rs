//! Tokenizer — one line in, classified byte ranges out.
//!
//! The tokenizer never sees more than one line. Anything that spans lines
//! (block comments, multi-line strings) is carried in a [`LineState`] that
//! the caller threads from each call into the next:
//!
//! ```
//! use hl_syntax::syntax::Syntax;
//! use hl_syntax::tokenizer::{LineState, TokenKind, Tokenizer};
//!
//! let c = Syntax::by_name("c").unwrap();
//! let tokenizer = Tokenizer::new(c).unwrap();
//!
//! let (_, state) = tokenizer.tokenize("int a; /* open", LineState::default());
//! assert!(!state.is_initial());
//!
//! let (tokens, state) = tokenizer.tokenize("still */ int b;", state);
//! assert_eq!(tokens[0].kind, TokenKind::Comment);
//! assert!(state.is_initial());
//! ```
//!
//! # Token stream
//!
//! Tokens are contiguous and cover the whole line: the first starts at byte
//! 0, each next one starts where the previous ended, and the last ends at
//! `line.len()`. Adjacent tokens of the same kind are merged. Every token
//! boundary is a UTF-8 character boundary, so `&line[offset..offset + len]`
//! never panics.
//!
//! # Classification
//!
//! Scanning is greedy and left to right. At each position the first rule
//! that matches wins:
//!
//! 1. the syntax's meta rule (preprocessor line, attribute, decorator, TOML
//!    table header)
//! 2. line comment, to the end of the line
//! 3. block comment, possibly nested, possibly left open
//! 4. string (triple-quoted first), possibly left open
//! 5. character literal
//! 6. number
//! 7. identifier: keyword, type, constant, function call, or plain
//! 8. anything else is one byte of [`TokenKind::Normal`]
//!
//! Bytes `>= 0x80` are identifier bytes, so multi-byte characters are never
//! split.

use regex::Regex;

use crate::syntax::{MetaRule, Syntax};

// ---------------------------------------------------------------------------
// Token kinds
// ---------------------------------------------------------------------------

/// What a run of bytes is. Themes assign one style per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Normal,
    Keyword,
    Type,
    Constant,
    Number,
    String,
    Comment,
    Meta,
    Function,
}

impl TokenKind {
    /// Number of kinds. Sizes per-kind lookup tables.
    pub const COUNT: usize = 9;

    /// Every kind, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Normal,
        Self::Keyword,
        Self::Type,
        Self::Constant,
        Self::Number,
        Self::String,
        Self::Comment,
        Self::Meta,
        Self::Function,
    ];

    /// Position in [`TokenKind::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Keyword => "keyword",
            Self::Type => "type",
            Self::Constant => "constant",
            Self::Number => "number",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Meta => "meta",
            Self::Function => "function",
        }
    }
}

/// A classified byte range of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub offset: usize,
    pub len: usize,
    pub kind: TokenKind,
}

impl Token {
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

// ---------------------------------------------------------------------------
// Line state
// ---------------------------------------------------------------------------

/// Scanner state at a line boundary.
///
/// Opaque on purpose: the only things a caller may do with it are start
/// from [`LineState::default`] at the top of a file and pass each returned
/// state to the next line. States are tied to the syntax that produced
/// them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineState(Mode);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
enum Mode {
    #[default]
    Code,
    /// Inside a block comment, `depth` levels deep (always >= 1).
    Comment { depth: u8 },
    /// Inside a string opened by `quote`.
    Str { quote: u8, triple: bool },
}

impl LineState {
    /// Whether this is the state at the top of a file: nothing left open.
    #[inline]
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(self.0, Mode::Code)
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

const NUMBER_PATTERN: &str = r"^(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*(?:\.[0-9][0-9_]*)?(?:[eE][+-]?[0-9_]+)?)[a-zA-Z0-9_]*";

const CHAR_LITERAL_PATTERN: &str = r"^'(?:\\.[^']*|[^\\'])'";

/// Line tokenizer for one [`Syntax`].
///
/// Holds the compiled number and character-literal patterns; build once per
/// file and reuse for every line.
#[derive(Debug)]
pub struct Tokenizer {
    syntax: &'static Syntax,
    number: Regex,
    char_literal: Regex,
}

impl Tokenizer {
    /// Compile the patterns for `syntax`.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a pattern fails to compile.
    pub fn new(syntax: &'static Syntax) -> Result<Self, regex::Error> {
        Ok(Self {
            syntax,
            number: Regex::new(NUMBER_PATTERN)?,
            char_literal: Regex::new(CHAR_LITERAL_PATTERN)?,
        })
    }

    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> &'static Syntax {
        self.syntax
    }

    /// Tokenize one line (without its line terminator), starting in `state`.
    ///
    /// Returns the tokens and the state to pass with the next line.
    #[must_use]
    pub fn tokenize(&self, line: &str, state: LineState) -> (Vec<Token>, LineState) {
        if self.syntax.is_plain() {
            let tokens = (!line.is_empty())
                .then(|| Token {
                    offset: 0,
                    len: line.len(),
                    kind: TokenKind::Normal,
                })
                .into_iter()
                .collect();
            return (tokens, LineState::default());
        }

        let mut scan = Scan::new(line);
        let mut mode = state.0;

        while scan.pos < line.len() {
            mode = match mode {
                Mode::Comment { depth } => self.block_comment(&mut scan, depth),
                Mode::Str { quote, triple } => string_body(&mut scan, quote, triple),
                Mode::Code => self.code(&mut scan),
            };
        }

        // Strings only survive the line break where the language allows it.
        if let Mode::Str { quote, triple } = mode {
            let continues = triple
                || self.syntax.multiline_quotes.contains(&quote)
                || line.ends_with('\\');
            if !continues {
                mode = Mode::Code;
            }
        }

        (scan.tokens, LineState(mode))
    }

    // -- Code ---------------------------------------------------------------

    /// Consume one construct starting at `scan.pos` in code mode.
    fn code(&self, scan: &mut Scan<'_>) -> Mode {
        let syntax = self.syntax;
        let start = scan.pos;
        let rest = scan.rest();
        let b = rest[0];

        if let Some(end) = self.meta(scan) {
            scan.push(end, TokenKind::Meta);
            return Mode::Code;
        }

        if syntax
            .line_comments
            .iter()
            .any(|marker| rest.starts_with(marker.as_bytes()))
        {
            scan.push(scan.len(), TokenKind::Comment);
            return Mode::Code;
        }

        if let Some((open, _)) = syntax.block_comment {
            if rest.starts_with(open.as_bytes()) {
                scan.pos += open.len();
                return self.block_comment(scan, 1);
            }
        }

        if syntax.quotes.contains(&b) {
            if syntax.triple_quotes && rest.starts_with(&[b, b, b]) {
                scan.pos += 3;
                return string_body(scan, b, true);
            }
            scan.pos += 1;
            return string_body(scan, b, false);
        }

        if syntax.char_literals && b == b'\'' {
            let end = self
                .char_literal
                .find(&scan.line[start..])
                .map_or(start + 1, |m| start + m.end());
            let kind = if end > start + 1 {
                TokenKind::String
            } else {
                TokenKind::Normal
            };
            scan.push(end, kind);
            return Mode::Code;
        }

        if b.is_ascii_digit() {
            let end = self
                .number
                .find(&scan.line[start..])
                .map_or(start + 1, |m| start + m.end());
            scan.push(end, TokenKind::Number);
            return Mode::Code;
        }

        if is_ident_start(b) {
            let end = start + rest.iter().take_while(|&&b| is_ident_byte(b)).count();
            let kind = self.classify(&scan.line[start..end], scan.bytes().get(end));
            scan.push(end, kind);
            return Mode::Code;
        }

        scan.push(start + 1, TokenKind::Normal);
        Mode::Code
    }

    /// End of a meta construct starting at `scan.pos`, if one starts there.
    fn meta(&self, scan: &Scan<'_>) -> Option<usize> {
        let rest = scan.rest();
        let at_line_start = scan.bytes()[..scan.pos]
            .iter()
            .all(u8::is_ascii_whitespace);

        match self.syntax.meta {
            MetaRule::None => None,
            MetaRule::Preprocessor => (at_line_start && rest[0] == b'#').then(|| scan.len()),
            MetaRule::Attribute => {
                let open = if rest.starts_with(b"#[") {
                    2
                } else if rest.starts_with(b"#![") {
                    3
                } else {
                    return None;
                };
                let mut depth = 1usize;
                for (i, &b) in rest.iter().enumerate().skip(open) {
                    match b {
                        b'[' => depth += 1,
                        b']' => {
                            depth -= 1;
                            if depth == 0 {
                                return Some(scan.pos + i + 1);
                            }
                        }
                        _ => {}
                    }
                }
                Some(scan.len())
            }
            MetaRule::Decorator => {
                if rest[0] != b'@' || !rest.get(1).copied().is_some_and(is_ident_start) {
                    return None;
                }
                let name = rest[1..]
                    .iter()
                    .take_while(|&&b| is_ident_byte(b) || b == b'.')
                    .count();
                Some(scan.pos + 1 + name)
            }
            MetaRule::Section => {
                if !at_line_start || rest[0] != b'[' {
                    return None;
                }
                let close = rest.iter().position(|&b| b == b']')?;
                let brackets = rest[close..].iter().take_while(|&&b| b == b']').count();
                Some(scan.pos + close + brackets)
            }
        }
    }

    /// Classify an identifier. `next` is the byte right after it.
    fn classify(&self, word: &str, next: Option<&u8>) -> TokenKind {
        let syntax = self.syntax;
        if syntax.keywords.contains(&word) {
            TokenKind::Keyword
        } else if syntax.types.contains(&word) {
            TokenKind::Type
        } else if syntax.constants.contains(&word) {
            TokenKind::Constant
        } else if next == Some(&b'(') {
            TokenKind::Function
        } else if syntax.capitalized_types && word.as_bytes()[0].is_ascii_uppercase() {
            TokenKind::Type
        } else {
            TokenKind::Normal
        }
    }

    // -- Comments -----------------------------------------------------------

    /// Scan the body of a block comment `depth` levels deep, through the
    /// closing delimiter or to the end of the line.
    fn block_comment(&self, scan: &mut Scan<'_>, mut depth: u8) -> Mode {
        let start = scan.pos;
        let Some((open, close)) = self.syntax.block_comment else {
            // A comment state from a syntax without block comments.
            scan.push(scan.len(), TokenKind::Comment);
            return Mode::Code;
        };

        let bytes = scan.bytes();
        let mut pos = start;
        while pos < bytes.len() {
            let rest = &bytes[pos..];
            if rest.starts_with(close.as_bytes()) {
                pos += close.len();
                depth -= 1;
                if depth == 0 {
                    scan.push(pos, TokenKind::Comment);
                    return Mode::Code;
                }
            } else if self.syntax.nested_comments && rest.starts_with(open.as_bytes()) {
                pos += open.len();
                depth = depth.saturating_add(1);
            } else {
                pos += 1;
            }
        }

        scan.push(pos, TokenKind::Comment);
        Mode::Comment { depth }
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Scan a string body through its closing quote or to the end of the line.
///
/// The opening quote (if on this line) has already been consumed; the token
/// is pushed from wherever the last token ended, so it includes it.
fn string_body(scan: &mut Scan<'_>, quote: u8, triple: bool) -> Mode {
    let bytes = scan.bytes();
    let closing = [quote; 3];
    let closing = if triple { &closing[..] } else { &closing[..1] };

    let mut pos = scan.pos;
    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            pos = (pos + 2).min(bytes.len());
        } else if bytes[pos..].starts_with(closing) {
            scan.push(pos + closing.len(), TokenKind::String);
            return Mode::Code;
        } else {
            pos += 1;
        }
    }

    scan.push(bytes.len(), TokenKind::String);
    Mode::Str { quote, triple }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Cursor over one line plus the tokens emitted so far.
struct Scan<'a> {
    line: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Scan<'a> {
    const fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    const fn bytes(&self) -> &'a [u8] {
        self.line.as_bytes()
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes()[self.pos..]
    }

    const fn len(&self) -> usize {
        self.line.len()
    }

    /// Emit a token from the end of the previous token up to `end` and move
    /// the cursor there. Merges with the previous token when kinds match.
    fn push(&mut self, end: usize, kind: TokenKind) {
        let start = self.tokens.last().map_or(0, Token::end);
        self.pos = end;
        if end <= start {
            return;
        }
        if let Some(last) = self.tokens.last_mut() {
            if last.kind == kind {
                last.len = end - last.offset;
                return;
            }
        }
        self.tokens.push(Token {
            offset: start,
            len: end - start,
            kind,
        });
    }
}

#[inline]
const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

#[inline]
const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenizer(name: &str) -> Tokenizer {
        Tokenizer::new(Syntax::by_name(name).unwrap()).unwrap()
    }

    /// `(text, kind)` pairs for one line tokenized from the initial state.
    fn pieces<'a>(t: &Tokenizer, line: &'a str) -> Vec<(&'a str, TokenKind)> {
        let (tokens, _) = t.tokenize(line, LineState::default());
        tokens
            .iter()
            .map(|tok| (&line[tok.offset..tok.end()], tok.kind))
            .collect()
    }

    fn kind_of(t: &Tokenizer, line: &str, text: &str) -> Option<TokenKind> {
        pieces(t, line)
            .into_iter()
            .find(|(piece, _)| *piece == text)
            .map(|(_, kind)| kind)
    }

    use super::TokenKind::{Comment, Constant, Function, Keyword, Meta, Normal, Number, Type};

    // ── Coverage ────────────────────────────────────────────────────────

    #[test]
    fn empty_line_has_no_tokens() {
        let t = tokenizer("rust");
        let (tokens, state) = t.tokenize("", LineState::default());
        assert!(tokens.is_empty());
        assert!(state.is_initial());
    }

    #[test]
    fn tokens_cover_line_contiguously() {
        let samples = [
            ("rust", "pub fn café(x: &'a str) -> u8 { 0x1f /* é */ } // ok"),
            ("c", "#include <stdio.h>"),
            ("c", "  int n = sizeof(x) + 'c'; /* open"),
            ("python", "@dataclass  # note"),
            ("python", "s = '''a ünï'''"),
            ("shell", "echo \"$HOME\" 'x' `date`"),
            ("javascript", "const f = (a) => `t ${a}`;"),
            ("toml", "[[bin]] name = \"x\" # c"),
            ("plain", "just «text» here"),
        ];
        for (name, line) in samples {
            let (tokens, _) = tokenizer(name).tokenize(line, LineState::default());
            let mut expected_start = 0;
            for tok in &tokens {
                assert_eq!(tok.offset, expected_start, "{name}: {line:?}");
                assert!(tok.len > 0);
                assert!(line.get(tok.offset..tok.end()).is_some());
                expected_start = tok.end();
            }
            assert_eq!(expected_start, line.len(), "{name}: {line:?}");
        }
    }

    #[test]
    fn adjacent_same_kind_merged() {
        let t = tokenizer("rust");
        for pair in t.tokenize("a + b;  c", LineState::default()).0.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
        assert_eq!(pieces(&t, "a + b;  c"), vec![("a + b;  c", Normal)]);
    }

    #[test]
    fn plain_is_one_normal_token() {
        let t = Tokenizer::new(&Syntax::PLAIN).unwrap();
        assert_eq!(
            pieces(&t, "fn main() { \"x\" } // 42"),
            vec![("fn main() { \"x\" } // 42", Normal)]
        );
    }

    // ── Identifiers ─────────────────────────────────────────────────────

    #[test]
    fn rust_function_header() {
        let t = tokenizer("rust");
        assert_eq!(
            pieces(&t, "fn main() {"),
            vec![("fn", Keyword), (" ", Normal), ("main", Function), ("() {", Normal)]
        );
    }

    #[test]
    fn types_and_constants() {
        let t = tokenizer("rust");
        assert_eq!(kind_of(&t, "let x: u32 = 1;", "u32"), Some(Type));
        assert_eq!(kind_of(&t, "let v: Vec<u8>;", "Vec"), Some(Type));
        assert_eq!(kind_of(&t, "return None;", "None"), Some(Constant));
        assert_eq!(kind_of(&t, "Some(1)", "Some"), Some(Constant));
    }

    #[test]
    fn call_needs_adjacent_paren() {
        let t = tokenizer("c");
        assert_eq!(kind_of(&t, "foo(1);", "foo"), Some(Function));
        assert_eq!(pieces(&t, "foo (1);")[0], ("foo (", Normal));
    }

    #[test]
    fn keywords_need_word_boundaries() {
        let t = tokenizer("python");
        assert_eq!(kind_of(&t, "format = 1", "format"), None);
        assert_eq!(pieces(&t, "format = 1")[0], ("format = ", Normal));
        assert_eq!(kind_of(&t, "for x in y:", "for"), Some(Keyword));
    }

    #[test]
    fn non_ascii_identifiers_stay_whole() {
        let t = tokenizer("rust");
        assert_eq!(kind_of(&t, "let naïve = 1;", "let"), Some(Keyword));
        assert_eq!(kind_of(&t, "grüße(1)", "grüße"), Some(Function));
    }

    // ── Numbers ─────────────────────────────────────────────────────────

    #[test]
    fn number_forms() {
        let t = tokenizer("rust");
        for lit in ["0", "42", "1_000", "0xff_u8", "0b1010", "0o777", "3.14", "1e10", "2.5e-3f64"] {
            let line = format!("x = {lit};");
            assert_eq!(kind_of(&t, &line, lit), Some(Number), "{lit}");
        }
    }

    #[test]
    fn range_is_not_float() {
        let t = tokenizer("rust");
        assert_eq!(
            pieces(&t, "1..2"),
            vec![("1", Number), ("..", Normal), ("2", Number)]
        );
    }

    #[test]
    fn digits_inside_identifiers() {
        let t = tokenizer("c");
        assert_eq!(kind_of(&t, "int32_t x2 = 0;", "int32_t"), Some(Type));
        assert_eq!(kind_of(&t, "x2 = 0;", "0"), Some(Number));
        assert_eq!(pieces(&t, "x2 = 0;")[0], ("x2 = ", Normal));
    }

    // ── Strings ─────────────────────────────────────────────────────────

    #[test]
    fn string_with_escaped_quote() {
        let t = tokenizer("rust");
        assert_eq!(
            kind_of(&t, r#"let s = "a \" b";"#, r#""a \" b""#),
            Some(TokenKind::String)
        );
    }

    #[test]
    fn unterminated_string_resets_at_line_end() {
        let t = tokenizer("c");
        let (tokens, state) = t.tokenize("char *s = \"abc", LineState::default());
        assert_eq!(tokens.last().unwrap().kind, TokenKind::String);
        assert!(state.is_initial());
    }

    #[test]
    fn backslash_continues_string() {
        let t = tokenizer("c");
        let (_, state) = t.tokenize("char *s = \"abc\\", LineState::default());
        assert!(!state.is_initial());
        let (tokens, state) = t.tokenize("def\";", state);
        assert_eq!(tokens[0], Token { offset: 0, len: 4, kind: TokenKind::String });
        assert!(state.is_initial());
    }

    #[test]
    fn rust_strings_span_lines() {
        let t = tokenizer("rust");
        let (_, state) = t.tokenize("let s = \"abc", LineState::default());
        assert!(!state.is_initial());
        let (tokens, state) = t.tokenize("def\"; x", state);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].len, 4);
        assert!(state.is_initial());
    }

    #[test]
    fn python_triple_quotes_span_lines() {
        let t = tokenizer("python");
        let (_, state) = t.tokenize("x = \"\"\"doc", LineState::default());
        assert!(!state.is_initial());
        let (_, state) = t.tokenize("still \" doc", state);
        assert!(!state.is_initial());
        let (tokens, state) = t.tokenize("end\"\"\" + y", state);
        assert_eq!(tokens[0], Token { offset: 0, len: 6, kind: TokenKind::String });
        assert!(state.is_initial());
    }

    #[test]
    fn empty_triple_quoted_string() {
        let t = tokenizer("python");
        assert_eq!(kind_of(&t, "x = ''''''", "''''''"), Some(TokenKind::String));
    }

    #[test]
    fn javascript_template_spans_lines_plain_quotes_do_not() {
        let t = tokenizer("javascript");
        let (_, state) = t.tokenize("const s = `abc", LineState::default());
        assert!(!state.is_initial());
        let (_, state) = t.tokenize("const s = 'abc", LineState::default());
        assert!(state.is_initial());
    }

    #[test]
    fn rust_char_literals_and_lifetimes() {
        let t = tokenizer("rust");
        assert_eq!(kind_of(&t, "let c = 'x';", "'x'"), Some(TokenKind::String));
        assert_eq!(kind_of(&t, r"let c = '\n';", r"'\n'"), Some(TokenKind::String));
        assert_eq!(kind_of(&t, "let c = 'é';", "'é'"), Some(TokenKind::String));
        let line = "fn f<'a>(x: &'a str) {}";
        assert!(pieces(&t, line).iter().all(|(_, k)| *k != TokenKind::String));
    }

    // ── Comments ────────────────────────────────────────────────────────

    #[test]
    fn line_comment_runs_to_end() {
        let t = tokenizer("rust");
        assert_eq!(
            pieces(&t, "x // \"hi\" 42"),
            vec![("x ", Normal), ("// \"hi\" 42", Comment)]
        );
    }

    #[test]
    fn comment_markers_inside_strings_ignored() {
        let t = tokenizer("python");
        assert_eq!(
            pieces(&t, "s = '# no'"),
            vec![("s = ", Normal), ("'# no'", TokenKind::String)]
        );
    }

    #[test]
    fn block_comment_continues_to_next_line() {
        let t = tokenizer("c");
        let (tokens, state) = t.tokenize("int a; /* open", LineState::default());
        assert_eq!(
            tokens.last().copied(),
            Some(Token { offset: 7, len: 7, kind: Comment })
        );
        assert!(!state.is_initial());

        let (tokens, state) = t.tokenize("still comment */ int b;", state);
        assert_eq!(tokens[0], Token { offset: 0, len: 16, kind: Comment });
        assert_eq!(tokens[2].kind, Type);
        assert!(state.is_initial());
    }

    #[test]
    fn comment_state_survives_blank_lines() {
        let t = tokenizer("c");
        let (_, state) = t.tokenize("/*", LineState::default());
        let (tokens, state) = t.tokenize("", state);
        assert!(tokens.is_empty());
        let (tokens, _) = t.tokenize("*/ x", state);
        assert_eq!(tokens[0].kind, Comment);
    }

    #[test]
    fn rust_block_comments_nest() {
        let t = tokenizer("rust");
        let (_, state) = t.tokenize("/* a /* b */ still", LineState::default());
        assert!(!state.is_initial());
        let (tokens, state) = t.tokenize("*/ x", state);
        assert_eq!(tokens[0], Token { offset: 0, len: 2, kind: Comment });
        assert!(state.is_initial());
    }

    #[test]
    fn c_block_comments_do_not_nest() {
        let t = tokenizer("c");
        let (tokens, state) = t.tokenize("/* a /* b */ x", LineState::default());
        assert!(state.is_initial());
        assert_eq!(tokens.last().unwrap().kind, Normal);
    }

    #[test]
    fn foreign_comment_state_is_harmless() {
        let c = tokenizer("c");
        let (_, state) = c.tokenize("/* open", LineState::default());
        let py = tokenizer("python");
        let (tokens, state) = py.tokenize("x = 1", state);
        assert_eq!(tokens, vec![Token { offset: 0, len: 5, kind: Comment }]);
        assert!(state.is_initial());
    }

    // ── Meta ────────────────────────────────────────────────────────────

    #[test]
    fn c_preprocessor_lines() {
        let t = tokenizer("c");
        assert_eq!(pieces(&t, "#include <stdio.h>"), vec![("#include <stdio.h>", Meta)]);
        assert_eq!(pieces(&t, "  #define N 1"), vec![("  ", Normal), ("#define N 1", Meta)]);
        assert_eq!(kind_of(&t, "x # y", "x # y"), Some(Normal));
    }

    #[test]
    fn rust_attributes() {
        let t = tokenizer("rust");
        assert_eq!(
            pieces(&t, "#[derive(Debug, Clone)] struct"),
            vec![("#[derive(Debug, Clone)]", Meta), (" ", Normal), ("struct", Keyword)]
        );
        assert_eq!(kind_of(&t, "#![allow(x)]", "#![allow(x)]"), Some(Meta));
        assert_eq!(kind_of(&t, "#[cfg(all(a, b))]", "#[cfg(all(a, b))]"), Some(Meta));
    }

    #[test]
    fn decorators() {
        let t = tokenizer("python");
        assert_eq!(
            pieces(&t, "@functools.cache"),
            vec![("@functools.cache", Meta)]
        );
        assert_eq!(kind_of(&t, "a @ b", "a @ b"), Some(Normal));
    }

    #[test]
    fn toml_sections() {
        let t = tokenizer("toml");
        assert_eq!(pieces(&t, "[package]"), vec![("[package]", Meta)]);
        assert_eq!(pieces(&t, "[[bin]]"), vec![("[[bin]]", Meta)]);
        assert_eq!(kind_of(&t, "a = [1, 2]", "[1, 2]"), None);
        assert_eq!(kind_of(&t, "ok = true", "true"), Some(Constant));
    }

    #[test]
    fn kinds_table_is_consistent() {
        for (i, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
