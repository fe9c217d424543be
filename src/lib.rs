//! tokenflow - composable, position-tracking text tokenization.
//!
//! Tokenizers are built from small passes: regex extraction, filters,
//! property extension, conditional branches and merges, chained with
//! [`Tokenizer::flow`]. Every token records its absolute byte position in the
//! original input, however deeply passes are nested.
//!
//! ```rust
//! use tokenflow::{MergeOptions, TokenResult, Tokenizer};
//!
//! let tokenize = Tokenizer::default();
//!
//! let words = tokenize.words().run("a b c").unwrap();
//! assert_eq!(words[1].value, "b");
//! assert_eq!(words[1].index, 2);
//!
//! // Merge characters into chunks ending with a dot.
//! let chunks = tokenize.flow([
//!     tokenize.characters(),
//!     tokenize.split_and_merge(
//!         |cx| {
//!             if cx.value == "." {
//!                 vec![TokenResult::from("."), TokenResult::Split]
//!             } else {
//!                 vec![TokenResult::from(cx.value)]
//!             }
//!         },
//!         MergeOptions::default(),
//!     ),
//! ]);
//! let tokens = chunks.run("ab.c").unwrap();
//! assert_eq!(tokens[0].value, "ab.");
//! assert_eq!(tokens[1].index, 3);
//! ```

pub mod core;

pub use core::{
    fingerprint, merge, normalize, properties, transform, Context, Engine, FnCache, Input,
    IntoTokenResult, LruTokenCache, MatchData, MergeOptions, NoCache, PartialToken, Preset,
    Properties, ReOptions, Token, TokenCache, TokenResult, TokenizeError, Tokenize, Tokenizer,
    TokenizerConfig, CHARACTERS_PATTERN, SECTIONS_PATTERN, WORDS_PATTERN, WORD_BOUNDARY_CHARS,
};
