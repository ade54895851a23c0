//! # hl-syntax — tokenizer and themes for hlcat
//!
//! Produces the styled spans that `hl-term` renders. Source text is
//! tokenized one line at a time, and each call hands back an opaque
//! [`LineState`] that must be fed into the next line's call. That is how
//! a block comment opened on line 10 still colors line 11.
//!
//! # Architecture
//!
//! ```text
//! Syntax (static definition, picked by name or file name)
//!     │
//!     ▼
//! tokenizer.rs: line + LineState → Vec<Token> + LineState
//!     │
//!     ▼
//! theme.rs:     TokenKind → hl_term::Style
//!     │
//!     ▼
//! highlight.rs: Vec<StyleSpan> ready for AnsiRenderer
//! ```
//!
//! Definitions are deliberately small: keywords, comments, strings,
//! numbers, and a meta rule (preprocessor, attributes, decorators, table
//! headers). No grammar is parsed.

pub mod highlight;
pub mod syntax;
pub mod theme;
pub mod tokenizer;

pub use highlight::Highlighter;
pub use syntax::Syntax;
pub use theme::Theme;
pub use tokenizer::{LineState, Token, TokenKind, Tokenizer};
