//! Named preset tokenizers.
//!
//! - `sections` - runs of text between newlines and sentence punctuation
//! - `words` - maximal runs outside [`WORD_BOUNDARY_CHARS`]
//! - `characters` - every non-whitespace character
//!
//! # Example
//!
//! ```rust
//! use tokenflow::Tokenizer;
//!
//! let tokenize = Tokenizer::default();
//! let words = tokenize.preset("words").unwrap();
//! assert_eq!(words.run("a b c").unwrap().len(), 3);
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Characters that end a word: whitespace, no-break space and ASCII
/// punctuation except `'` and `\`.
pub const WORD_BOUNDARY_CHARS: &str = "\t\r\n\u{A0} !\"#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// Non-empty runs of text without newline, `.`, `,`, `;`, `!` or `?`.
pub const SECTIONS_PATTERN: &str = r"[^\n.,;!?]+";

/// Maximal runs of characters outside [`WORD_BOUNDARY_CHARS`].
pub const WORDS_PATTERN: &str = r##"[^\t\r\n\x{A0} !"#$%&()*+,\-./:;<=>?@\[\]^_`{|}~]+"##;

/// Any single non-whitespace character.
pub const CHARACTERS_PATTERN: &str = r"\S";

static SECTIONS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SECTIONS_PATTERN).expect("sections pattern compiles"));
static WORDS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WORDS_PATTERN).expect("words pattern compiles"));
static CHARACTERS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CHARACTERS_PATTERN).expect("characters pattern compiles"));

/// Built-in tokenizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Sections,
    Words,
    Characters,
}

impl Preset {
    /// Parse a preset name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sections" | "sentences" => Some(Self::Sections),
            "words" => Some(Self::Words),
            "characters" | "chars" => Some(Self::Characters),
            _ => None,
        }
    }

    /// Get all supported preset names.
    pub fn supported_names() -> &'static [&'static str] {
        &["sections", "sentences", "words", "characters", "chars"]
    }

    pub fn pattern(self) -> &'static str {
        match self {
            Self::Sections => SECTIONS_PATTERN,
            Self::Words => WORDS_PATTERN,
            Self::Characters => CHARACTERS_PATTERN,
        }
    }

    /// The compiled pattern, built once per process.
    pub fn regex(self) -> &'static Regex {
        match self {
            Self::Sections => &SECTIONS_REGEX,
            Self::Words => &WORDS_REGEX,
            Self::Characters => &CHARACTERS_REGEX,
        }
    }
}
