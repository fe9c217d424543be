//! Core tokenization engine for tokenflow.
//!
//! # Architecture
//!
//! The core is organized leaf first:
//!
//! - [`token`]: the [`Token`] value type and the [`TokenResult`] shapes a
//!   transform may return
//! - [`algebra`]: fingerprinting, normalization and merging of tokens; keeps
//!   every position absolute into the original input
//! - [`cache`]: the [`TokenCache`] capability plus [`NoCache`], [`FnCache`]
//!   and the bounded [`LruTokenCache`]
//! - [`engine`]: the [`Engine`] that drives a transform over a token sequence
//!   with neighbour context
//! - [`Tokenizer`]: combinators built on the engine (`re`, `filter`, `flow`,
//!   `split_and_merge`, ...) and the named [`presets`]

pub mod algebra;
pub mod cache;
pub mod engine;
pub mod presets;
pub mod token;
mod tokenizer;

pub use algebra::{fingerprint, merge, normalize, properties};
pub use cache::{FnCache, LruTokenCache, NoCache, TokenCache, DEFAULT_CACHE_SIZE};
pub use engine::{transform, Context, Engine, TransformFn};
pub use presets::{
    Preset, CHARACTERS_PATTERN, SECTIONS_PATTERN, WORDS_PATTERN, WORD_BOUNDARY_CHARS,
};
pub use token::{Input, IntoTokenResult, MatchData, PartialToken, Properties, Token, TokenResult};
pub use tokenizer::{MergeOptions, ReOptions, TokenizeError, Tokenize, Tokenizer, TokenizerConfig};
