//! Token model shared by the algebra, the engine and the combinators.
//!
//! A [`Token`] is a positioned span of text. Positions are byte offsets into
//! the string that seeded the current pipeline invocation, so they stay valid
//! however deeply passes are nested.
//!
//! Transforms do not build tokens directly. They return a [`TokenResult`]
//! (text, a [`PartialToken`] with optional local positions, a split marker,
//! or a sequence of those) and the algebra resolves it against the token
//! being processed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tokenizer::TokenizeError;

/// Arbitrary caller data attached to a token.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// A positioned span of text.
///
/// Serializes to `{"value", "index", "offset", ...properties, "match"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    /// Absolute start offset in the original input.
    pub index: usize,
    /// Length of the covered span. Equals `value.len()` unless overridden.
    pub offset: usize,
    #[serde(flatten)]
    pub properties: Properties,
    /// Capture groups, only set on tokens produced by regex extraction.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchData>,
}

impl Token {
    /// Create a token whose offset is the length of its value.
    pub fn new(value: impl Into<String>, index: usize) -> Self {
        let value = value.into();
        let offset = value.len();
        Self {
            value,
            index,
            offset,
            properties: Properties::new(),
            matched: None,
        }
    }

    /// Wrap a whole input string into the synthetic root token.
    pub fn root(text: &str) -> Self {
        Self::new(text, 0)
    }

    /// Override the covered span length.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Attach one property.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Absolute end of the covered span.
    #[inline]
    pub fn end(&self) -> usize {
        self.index + self.offset
    }

    /// Caller data on this token (everything except value, positions and match data).
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Look up a single property.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

/// Capture groups of the regex match that produced a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchData {
    /// Start of the match within the value of the token it was found in.
    pub index: usize,
    /// Group 0 is the whole match; unmatched optional groups are `None`.
    pub groups: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named: BTreeMap<String, String>,
}

impl MatchData {
    /// Text of capture group `i`.
    pub fn group(&self, i: usize) -> Option<&str> {
        self.groups.get(i).and_then(|g| g.as_deref())
    }

    /// Text of a named capture group.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

/// A token-like object returned by a transform, with positions local to the
/// token being processed. Missing positions are filled in by normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartialToken {
    pub value: String,
    pub index: Option<usize>,
    pub offset: Option<usize>,
    pub properties: Properties,
    pub matched: Option<MatchData>,
}

impl PartialToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the local start position.
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_match(mut self, matched: MatchData) -> Self {
        self.matched = Some(matched);
        self
    }

    /// Keep value, offset, properties and match data of `token` but let
    /// normalization pick the position.
    pub fn passthrough(token: &Token) -> Self {
        Self {
            value: token.value.clone(),
            index: None,
            offset: Some(token.offset),
            properties: token.properties.clone(),
            matched: token.matched.clone(),
        }
    }

    /// Keep every field of `token`, reading its index as a local position.
    pub fn local(token: Token) -> Self {
        Self {
            value: token.value,
            index: Some(token.index),
            offset: Some(token.offset),
            properties: token.properties,
            matched: token.matched,
        }
    }
}

/// What a transform returns for one token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenResult {
    /// Plain text, positioned at the running cursor.
    Text(String),
    /// A token-like object with optional local positions.
    Partial(PartialToken),
    /// Forced boundary for merge-style combinators.
    Split,
    /// Several results in order. Must not contain another `Seq`.
    Seq(Vec<TokenResult>),
}

impl TokenResult {
    /// Produce nothing for this token.
    pub fn none() -> Self {
        TokenResult::Seq(Vec::new())
    }
}

impl From<String> for TokenResult {
    fn from(value: String) -> Self {
        TokenResult::Text(value)
    }
}

impl From<&str> for TokenResult {
    fn from(value: &str) -> Self {
        TokenResult::Text(value.to_string())
    }
}

impl From<PartialToken> for TokenResult {
    fn from(value: PartialToken) -> Self {
        TokenResult::Partial(value)
    }
}

impl From<Vec<TokenResult>> for TokenResult {
    fn from(value: Vec<TokenResult>) -> Self {
        TokenResult::Seq(value)
    }
}

/// Return types accepted from a transform closure.
pub trait IntoTokenResult {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError>;
}

impl IntoTokenResult for TokenResult {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(self)
    }
}

impl IntoTokenResult for String {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(TokenResult::Text(self))
    }
}

impl IntoTokenResult for &str {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(TokenResult::Text(self.to_string()))
    }
}

impl IntoTokenResult for PartialToken {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(TokenResult::Partial(self))
    }
}

impl IntoTokenResult for Vec<TokenResult> {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(TokenResult::Seq(self))
    }
}

impl IntoTokenResult for Option<String> {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(self.map_or_else(TokenResult::none, TokenResult::Text))
    }
}

impl IntoTokenResult for Option<PartialToken> {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        Ok(self.map_or_else(TokenResult::none, TokenResult::Partial))
    }
}

impl IntoTokenResult for Result<TokenResult, TokenizeError> {
    fn into_token_result(self) -> Result<TokenResult, TokenizeError> {
        self
    }
}

/// Input accepted by a runner: raw text or an existing token sequence.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Text(&'a str),
    Tokens(&'a [Token]),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Input::Text(value)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(value: &'a String) -> Self {
        Input::Text(value.as_str())
    }
}

impl<'a> From<&'a [Token]> for Input<'a> {
    fn from(value: &'a [Token]) -> Self {
        Input::Tokens(value)
    }
}

impl<'a> From<&'a Vec<Token>> for Input<'a> {
    fn from(value: &'a Vec<Token>) -> Self {
        Input::Tokens(value.as_slice())
    }
}
