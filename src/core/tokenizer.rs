use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, trace};

use super::algebra::merge;
use super::cache::{NoCache, TokenCache};
use super::engine::{transform, Context, Engine, TransformFn};
use super::presets::Preset;
use super::token::{
    Input, IntoTokenResult, MatchData, PartialToken, Properties, Token, TokenResult,
};

#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("Regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
    #[error("Malformed transform result: {0}")]
    MalformedResult(String),
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Options for [`Tokenizer::re_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReOptions {
    /// Also emit the text between matches, so the output covers the whole input.
    pub split: bool,
}

impl ReOptions {
    pub fn split() -> Self {
        Self { split: true }
    }
}

/// Options for [`Tokenizer::split_and_merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Filler repeated once per byte of gap between merged tokens.
    pub merge_with: String,
}

impl MergeOptions {
    pub fn merge_with(fill: impl Into<String>) -> Self {
        Self {
            merge_with: fill.into(),
        }
    }
}

/// Configuration shared by every runner a [`Tokenizer`] builds.
#[derive(Clone)]
pub struct TokenizerConfig {
    /// Memoization store for cacheable passes. Defaults to [`NoCache`].
    pub cache: Arc<dyn TokenCache>,
    /// Copy a token's properties onto the tokens derived from it. Defaults to `true`.
    pub preserve_properties: bool,
}

impl TokenizerConfig {
    pub fn with_cache(self, cache: impl TokenCache + 'static) -> Self {
        self.with_shared_cache(Arc::new(cache))
    }

    /// Use a cache that is also held elsewhere.
    pub fn with_shared_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn preserve_properties(mut self, preserve: bool) -> Self {
        self.preserve_properties = preserve;
        self
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            cache: Arc::new(NoCache),
            preserve_properties: true,
        }
    }
}

impl fmt::Debug for TokenizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenizerConfig")
            .field("preserve_properties", &self.preserve_properties)
            .finish_non_exhaustive()
    }
}

type RunFn = dyn Fn(&[Token]) -> Result<Vec<Token>, TokenizeError> + Send + Sync;

/// A built tokenizer pass: text or tokens in, tokens out.
///
/// Cheap to clone; clones share the same pass.
#[derive(Clone)]
pub struct Tokenize {
    run: Arc<RunFn>,
}

impl Tokenize {
    fn new<F>(run: F) -> Self
    where
        F: Fn(&[Token]) -> Result<Vec<Token>, TokenizeError> + Send + Sync + 'static,
    {
        Self { run: Arc::new(run) }
    }

    /// Run the pass. Text is wrapped into one token spanning the whole string.
    pub fn run<'a>(&self, input: impl Into<Input<'a>>) -> Result<Vec<Token>, TokenizeError> {
        match input.into() {
            Input::Text(text) => (self.run)(std::slice::from_ref(&Token::root(text))),
            Input::Tokens(tokens) => (self.run)(tokens),
        }
    }

    /// Run the pass over an existing token sequence.
    pub fn run_tokens(&self, tokens: &[Token]) -> Result<Vec<Token>, TokenizeError> {
        (self.run)(tokens)
    }

    /// Use this pass as a transform: each token's value is tokenized on its
    /// own and the results are positioned inside that token.
    pub fn as_transform(
        &self,
    ) -> impl Fn(&Context<'_>) -> Result<TokenResult, TokenizeError> + Clone + Send + Sync + 'static
    {
        compose(vec![self.clone()])
    }
}

impl fmt::Debug for Tokenize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenize").finish_non_exhaustive()
    }
}

/// Factory for composable tokenizer passes.
///
/// # Example
///
/// ```rust
/// use tokenflow::Tokenizer;
///
/// let tokenize = Tokenizer::default();
/// let repeated = tokenize.flow([
///     tokenize.sections(),
///     tokenize.flow([
///         tokenize.words(),
///         tokenize.filter(|cx| {
///             cx.prev
///                 .is_some_and(|prev| prev.value.to_lowercase() == cx.value.to_lowercase())
///         }),
///     ]),
/// ]);
///
/// let tokens = repeated.run("This is great great. Great is an an awesome words").unwrap();
/// assert_eq!(tokens[0].value, "great");
/// assert_eq!(tokens[0].index, 14);
/// assert_eq!(tokens[1].index, 33);
/// ```
#[derive(Clone)]
pub struct Tokenizer {
    engine: Engine,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            engine: Engine::new(config.cache, config.preserve_properties),
        }
    }

    /// Create a tokenizer that memoizes cacheable passes in `cache`.
    pub fn with_cache(cache: impl TokenCache + 'static) -> Self {
        Self::new(TokenizerConfig::default().with_cache(cache))
    }

    fn runner(&self, f: TransformFn, salt: Option<String>) -> Tokenize {
        let engine = self.engine.clone();
        Tokenize::new(move |tokens| engine.run(f.as_ref(), tokens, salt.as_deref()))
    }

    /// Tokenize with a transform function.
    ///
    /// The transform returns text, partial tokens, split markers or a
    /// sequence of those; positions it gives are local to the current token.
    pub fn split<F, R>(&self, f: F) -> Tokenize
    where
        F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
        R: IntoTokenResult,
    {
        self.runner(transform(f), None)
    }

    /// Extract every match of `pattern`.
    pub fn re(&self, pattern: &str) -> Result<Tokenize, TokenizeError> {
        self.re_with(pattern, ReOptions::default())
    }

    /// Extract matches of `pattern`, optionally keeping the text in between.
    pub fn re_with(&self, pattern: &str, options: ReOptions) -> Result<Tokenize, TokenizeError> {
        let regex = Regex::new(pattern)?;
        Ok(self.regex_salted(regex, options, true))
    }

    /// Like [`re_with`](Self::re_with) with an already compiled regex.
    ///
    /// Results are not cached: `Regex::as_str` omits the flags a
    /// `RegexBuilder` compiled in, so the pattern cannot key the cache.
    pub fn regex(&self, regex: Regex, options: ReOptions) -> Tokenize {
        self.regex_salted(regex, options, false)
    }

    fn regex_salted(&self, regex: Regex, options: ReOptions, cached: bool) -> Tokenize {
        let mode = if options.split { "split" } else { "match" };
        let salt = cached.then(|| format!("re:{}:{}", regex.as_str(), mode));
        let f = transform(move |cx: &Context<'_>| extract(&regex, cx.value, options.split));
        self.runner(f, salt)
    }

    /// Keep the tokens for which `predicate` holds.
    pub fn filter<F>(&self, predicate: F) -> Tokenize
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        self.filter_salted(predicate, None)
    }

    fn filter_salted<F>(&self, predicate: F, salt: Option<String>) -> Tokenize
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        let f = transform(move |cx: &Context<'_>| {
            predicate(cx).then(|| PartialToken::passthrough(cx.token))
        });
        self.runner(f, salt)
    }

    /// Keep the tokens whose value matches `pattern`.
    pub fn test(&self, pattern: &str) -> Result<Tokenize, TokenizeError> {
        let regex = Regex::new(pattern)?;
        let salt = format!("test:{}", regex.as_str());
        Ok(self.filter_salted(move |cx| regex.is_match(cx.value), Some(salt)))
    }

    /// Merge `properties` into every token, overriding existing keys.
    pub fn extend(&self, properties: Properties) -> Tokenize {
        self.extend_with(move |_| properties.clone())
    }

    /// Merge per-token computed properties into every token.
    pub fn extend_with<F>(&self, f: F) -> Tokenize
    where
        F: Fn(&Context<'_>) -> Properties + Send + Sync + 'static,
    {
        self.split(move |cx| {
            let mut token = PartialToken::passthrough(cx.token);
            token.properties.extend(f(cx));
            token
        })
    }

    /// Apply `then` to the tokens matching `condition`, pass the others through.
    pub fn ifthen<C, F, R>(&self, condition: C, then: F) -> Tokenize
    where
        C: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
        R: IntoTokenResult,
    {
        let then = transform(then);
        self.split(move |cx| {
            if condition(cx) {
                then(cx)
            } else {
                Ok(PartialToken::passthrough(cx.token).into())
            }
        })
    }

    /// Chain passes left to right; each token of the input goes through the
    /// whole chain and the results are positioned inside it.
    pub fn flow<I>(&self, passes: I) -> Tokenize
    where
        I: IntoIterator<Item = Tokenize>,
    {
        self.split(self.serie(passes))
    }

    /// The composition behind [`flow`](Self::flow), as a transform for use
    /// inside another combinator.
    pub fn serie<I>(
        &self,
        passes: I,
    ) -> impl Fn(&Context<'_>) -> Result<TokenResult, TokenizeError> + Clone + Send + Sync + 'static
    where
        I: IntoIterator<Item = Tokenize>,
    {
        compose(passes.into_iter().collect())
    }

    /// Tokenize with `f`, then merge the tokens between split markers.
    ///
    /// Useful for units spanning several tokens, e.g. sentences broken up by
    /// inline markup.
    pub fn split_and_merge<F, R>(&self, f: F, options: MergeOptions) -> Tokenize
    where
        F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
        R: IntoTokenResult,
    {
        let f = transform(f);
        let engine = self.engine.clone();
        let fill = options.merge_with;

        Tokenize::new(move |tokens| {
            let mut result = Vec::new();
            let mut buffer = Vec::new();

            for item in engine.drive(f.as_ref(), tokens)? {
                match item {
                    Some(token) => buffer.push(token),
                    None => flush(&mut buffer, &mut result, &fill),
                }
            }
            flush(&mut buffer, &mut result, &fill);

            Ok(result)
        })
    }

    /// Merge the whole sequence into one token.
    pub fn merge(&self) -> Tokenize {
        self.split_and_merge(|cx| PartialToken::passthrough(cx.token), MergeOptions::default())
    }

    pub fn sections(&self) -> Tokenize {
        self.builtin(Preset::Sections)
    }

    pub fn words(&self) -> Tokenize {
        self.builtin(Preset::Words)
    }

    pub fn characters(&self) -> Tokenize {
        self.builtin(Preset::Characters)
    }

    /// Look up a preset by name (`sections`, `words`, `characters`).
    pub fn preset(&self, name: &str) -> Result<Tokenize, TokenizeError> {
        let preset = Preset::from_name(name).ok_or_else(|| {
            TokenizeError::UnknownPreset(format!(
                "{}. Supported: {}",
                name,
                Preset::supported_names().join(", ")
            ))
        })?;
        Ok(self.builtin(preset))
    }

    pub fn builtin(&self, preset: Preset) -> Tokenize {
        self.regex_salted(preset.regex().clone(), ReOptions::default(), true)
    }

    /// Log every token at `debug` level and keep it.
    pub fn debug(&self, prefix: impl Into<String>) -> Tokenize {
        let prefix = prefix.into();
        self.filter(move |cx| {
            debug!(
                prefix = %prefix,
                start = cx.token.index,
                end = cx.token.end(),
                value = %cx.value,
                properties = ?cx.token.properties,
                "token"
            );
            true
        })
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("preserve_properties", &self.engine.preserves_properties())
            .finish_non_exhaustive()
    }
}

/// Run `passes` in order over a token's value and report the resulting
/// tokens with positions local to that token.
fn compose(
    passes: Vec<Tokenize>,
) -> impl Fn(&Context<'_>) -> Result<TokenResult, TokenizeError> + Clone + Send + Sync + 'static {
    let passes: Arc<[Tokenize]> = passes.into();
    move |cx: &Context<'_>| {
        let mut tokens = vec![Token::root(cx.value)];
        for pass in passes.iter() {
            tokens = pass.run_tokens(&tokens)?;
        }
        Ok(TokenResult::Seq(
            tokens
                .into_iter()
                .map(|token| PartialToken::local(token).into())
                .collect(),
        ))
    }
}

fn flush(buffer: &mut Vec<Token>, result: &mut Vec<Token>, fill: &str) {
    if let Some(token) = merge(buffer, fill) {
        result.push(token);
    }
    buffer.clear();
}

/// Find every match of `regex` in `text`, walking with an explicit cursor.
///
/// Empty matches are skipped and the cursor is moved one character past
/// them. In split mode the text between matches is emitted as well.
fn extract(regex: &Regex, text: &str, split: bool) -> Vec<TokenResult> {
    let mut out = Vec::new();
    // End of the last emitted match.
    let mut start = 0;
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(m) = caps.get(0) else {
            break;
        };

        if m.is_empty() {
            let step = text[m.end()..].chars().next().map_or(1, char::len_utf8);
            trace!(at = m.start(), pattern = regex.as_str(), "zero-length match, advancing");
            pos = m.end() + step;
            continue;
        }

        if split && start < m.start() {
            out.push(gap(text, start, m.start()));
        }

        out.push(
            PartialToken::new(m.as_str())
                .at(m.start())
                .with_offset(m.len())
                .with_match(match_data(regex, &caps, m.start()))
                .into(),
        );

        start = m.end();
        pos = m.end();
    }

    if split && start < text.len() {
        out.push(gap(text, start, text.len()));
    }

    out
}

fn gap(text: &str, start: usize, end: usize) -> TokenResult {
    PartialToken::new(&text[start..end])
        .at(start)
        .with_offset(end - start)
        .into()
}

fn match_data(regex: &Regex, caps: &Captures<'_>, index: usize) -> MatchData {
    let groups = caps
        .iter()
        .map(|group| group.map(|g| g.as_str().to_string()))
        .collect();
    let named = regex
        .capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|g| (name.to_string(), g.as_str().to_string())))
        .collect();

    MatchData {
        index,
        groups,
        named,
    }
}
