//! Built-in language definitions and detection.
//!
//! A [`Syntax`] is plain static data: word lists, comment and string
//! delimiters, and a few switches. The tokenizer interprets it. Detection
//! works on file names (exact name first, then extension) and falls back to
//! [`Syntax::PLAIN`], which highlights nothing.

use std::path::Path;

/// Language-specific "meta" construct highlighted as [`TokenKind::Meta`].
///
/// [`TokenKind::Meta`]: crate::tokenizer::TokenKind::Meta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaRule {
    None,
    /// `#` as the first non-blank character starts a directive that runs to
    /// the end of the line (C, C++).
    Preprocessor,
    /// `#[...]` and `#![...]` attributes (Rust).
    Attribute,
    /// `@name` decorators (Python, JavaScript).
    Decorator,
    /// `[table]` headers at the start of a line (TOML).
    Section,
}

/// A language definition.
#[derive(Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Syntax {
    pub name: &'static str,
    /// Extra names accepted by [`Syntax::by_name`].
    pub aliases: &'static [&'static str],
    /// File extensions without the dot, lowercase.
    pub extensions: &'static [&'static str],
    /// Exact file names.
    pub filenames: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub constants: &'static [&'static str],
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Block comments nest (`/* /* */ */` is one comment).
    pub nested_comments: bool,
    /// String delimiters.
    pub quotes: &'static [u8],
    /// Delimiters whose strings may continue onto the next line.
    pub multiline_quotes: &'static [u8],
    /// `"""` / `'''` open strings that may span lines.
    pub triple_quotes: bool,
    /// `'x'` is a character literal and a lone `'` is not a string
    /// (lifetimes, labels).
    pub char_literals: bool,
    /// Identifiers starting with an uppercase letter are types.
    pub capitalized_types: bool,
    pub meta: MetaRule,
}

const EMPTY: &[&str] = &[];

impl Syntax {
    /// No highlighting at all. Every line is one plain span.
    pub const PLAIN: Self = Self {
        name: "Plain",
        aliases: &["text", "none"],
        extensions: &["txt"],
        filenames: EMPTY,
        keywords: EMPTY,
        types: EMPTY,
        constants: EMPTY,
        line_comments: EMPTY,
        block_comment: None,
        nested_comments: false,
        quotes: &[],
        multiline_quotes: &[],
        triple_quotes: false,
        char_literals: false,
        capitalized_types: false,
        meta: MetaRule::None,
    };

    /// Look up a definition by name or alias, ignoring case.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Self> {
        ALL.iter().copied().find(|syntax| {
            syntax.name.eq_ignore_ascii_case(name)
                || syntax.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Pick a definition from a file name. Exact names win over extensions.
    ///
    /// Unknown files get [`Syntax::PLAIN`].
    #[must_use]
    pub fn for_path(path: &Path) -> &'static Self {
        let by_filename = path.file_name().and_then(|n| n.to_str()).and_then(|name| {
            ALL.iter()
                .copied()
                .find(|syntax| syntax.filenames.contains(&name))
        });
        let by_extension = || {
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            ALL.iter()
                .copied()
                .find(|syntax| syntax.extensions.contains(&ext.as_str()))
        };
        by_filename.or_else(by_extension).unwrap_or(&Self::PLAIN)
    }

    /// Whether this is the no-op definition.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.name == Self::PLAIN.name
    }

    /// All built-in definitions.
    #[must_use]
    pub fn all() -> &'static [&'static Self] {
        ALL
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

static ALL: &[&Syntax] = &[&Syntax::PLAIN, &RUST, &C, &CPP, &PYTHON, &SHELL, &JAVASCRIPT, &TOML];

const C_KEYWORDS: &[&str] = &[
    "break", "case", "continue", "default", "do", "else", "enum", "extern", "for", "goto", "if",
    "inline", "register", "restrict", "return", "sizeof", "static", "struct", "switch",
    "typedef", "union", "volatile", "while", "const",
];

const C_TYPES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
    "_Bool", "size_t", "ssize_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
    "uint16_t", "uint32_t", "uint64_t", "FILE",
];

pub static RUST: Syntax = Syntax {
    name: "Rust",
    aliases: &["rs"],
    extensions: &["rs"],
    filenames: EMPTY,
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "type",
        "unsafe", "use", "where", "while",
    ],
    types: &[
        "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
        "i64", "i128", "isize", "f32", "f64",
    ],
    constants: &["true", "false", "None", "Some", "Ok", "Err"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    nested_comments: true,
    quotes: b"\"",
    multiline_quotes: b"\"",
    triple_quotes: false,
    char_literals: true,
    capitalized_types: true,
    meta: MetaRule::Attribute,
};

pub static C: Syntax = Syntax {
    name: "C",
    aliases: EMPTY,
    extensions: &["c", "h"],
    filenames: EMPTY,
    keywords: C_KEYWORDS,
    types: C_TYPES,
    constants: &["NULL", "true", "false", "EOF"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    nested_comments: false,
    quotes: b"\"'",
    multiline_quotes: &[],
    triple_quotes: false,
    char_literals: false,
    capitalized_types: false,
    meta: MetaRule::Preprocessor,
};

pub static CPP: Syntax = Syntax {
    name: "C++",
    aliases: &["cpp", "cxx"],
    extensions: &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
    filenames: EMPTY,
    keywords: &[
        "break", "case", "catch", "class", "const", "constexpr", "continue", "default", "delete",
        "do", "else", "enum", "explicit", "extern", "for", "friend", "if", "inline", "namespace",
        "new", "noexcept", "operator", "override", "private", "protected", "public", "return",
        "sizeof", "static", "struct", "switch", "template", "this", "throw", "try", "typedef",
        "typename", "union", "using", "virtual", "volatile", "while",
    ],
    types: &[
        "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
        "auto", "size_t", "string", "vector",
    ],
    constants: &["nullptr", "NULL", "true", "false"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    nested_comments: false,
    quotes: b"\"'",
    multiline_quotes: &[],
    triple_quotes: false,
    char_literals: false,
    capitalized_types: true,
    meta: MetaRule::Preprocessor,
};

pub static PYTHON: Syntax = Syntax {
    name: "Python",
    aliases: &["py", "python3"],
    extensions: &["py", "pyw", "pyi"],
    filenames: &["SConstruct", "SConscript"],
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
        "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
        "yield",
    ],
    types: &[
        "int", "float", "str", "bytes", "bool", "list", "dict", "set", "tuple", "object",
    ],
    constants: &["True", "False", "None"],
    line_comments: &["#"],
    block_comment: None,
    nested_comments: false,
    quotes: b"\"'",
    multiline_quotes: &[],
    triple_quotes: true,
    char_literals: false,
    capitalized_types: false,
    meta: MetaRule::Decorator,
};

pub static SHELL: Syntax = Syntax {
    name: "Shell",
    aliases: &["sh", "bash", "zsh"],
    extensions: &["sh", "bash", "zsh"],
    filenames: &[".bashrc", ".bash_profile", ".profile", ".zshrc"],
    keywords: &[
        "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
        "in", "function", "return", "local", "export", "readonly", "break", "continue",
    ],
    types: EMPTY,
    constants: &["true", "false"],
    line_comments: &["#"],
    block_comment: None,
    nested_comments: false,
    quotes: b"\"'`",
    multiline_quotes: b"\"'`",
    triple_quotes: false,
    char_literals: false,
    capitalized_types: false,
    meta: MetaRule::None,
};

pub static JAVASCRIPT: Syntax = Syntax {
    name: "JavaScript",
    aliases: &["js", "typescript", "ts"],
    extensions: &["js", "mjs", "cjs", "jsx", "ts", "tsx"],
    filenames: EMPTY,
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "delete", "do", "else", "export", "extends", "finally", "for", "from", "function", "if",
        "import", "in", "instanceof", "let", "new", "of", "return", "static", "super", "switch",
        "this", "throw", "try", "typeof", "var", "void", "while", "yield",
    ],
    types: &["number", "string", "boolean", "any", "unknown", "never", "object"],
    constants: &["true", "false", "null", "undefined", "NaN", "Infinity"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    nested_comments: false,
    quotes: b"\"'`",
    multiline_quotes: b"`",
    triple_quotes: false,
    char_literals: false,
    capitalized_types: true,
    meta: MetaRule::Decorator,
};

pub static TOML: Syntax = Syntax {
    name: "TOML",
    aliases: EMPTY,
    extensions: &["toml"],
    filenames: &["Cargo.lock"],
    keywords: EMPTY,
    types: EMPTY,
    constants: &["true", "false", "inf", "nan"],
    line_comments: &["#"],
    block_comment: None,
    nested_comments: false,
    quotes: b"\"'",
    multiline_quotes: &[],
    triple_quotes: true,
    char_literals: false,
    capitalized_types: false,
    meta: MetaRule::Section,
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
