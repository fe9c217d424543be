//! The transform engine.
//!
//! Every combinator is a transform run through [`Engine`]: the engine walks a
//! token sequence, hands each token to the transform together with its
//! neighbours, and normalizes whatever comes back against that token.

use std::sync::Arc;

use tracing::trace;

use super::algebra::{fingerprint, normalize};
use super::cache::TokenCache;
use super::token::{IntoTokenResult, Token, TokenResult};
use super::tokenizer::TokenizeError;

/// What a transform sees for one token.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Text of the current token.
    pub value: &'a str,
    pub token: &'a Token,
    pub prev: Option<&'a Token>,
    pub next: Option<&'a Token>,
    /// Position of the current token within `tokens`.
    pub index: usize,
    /// The whole sequence being processed, for lookahead.
    pub tokens: &'a [Token],
}

/// A type-erased transform.
pub type TransformFn =
    Arc<dyn Fn(&Context<'_>) -> Result<TokenResult, TokenizeError> + Send + Sync>;

/// Erase a transform closure into a [`TransformFn`].
pub fn transform<F, R>(f: F) -> TransformFn
where
    F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
    R: IntoTokenResult,
{
    Arc::new(move |cx: &Context<'_>| f(cx).into_token_result())
}

/// Drives transforms over token sequences.
#[derive(Clone)]
pub struct Engine {
    cache: Arc<dyn TokenCache>,
    preserve_properties: bool,
}

impl Engine {
    pub fn new(cache: Arc<dyn TokenCache>, preserve_properties: bool) -> Self {
        Self {
            cache,
            preserve_properties,
        }
    }

    pub fn preserves_properties(&self) -> bool {
        self.preserve_properties
    }

    /// Apply `transform` to every token and concatenate the normalized
    /// results in order. Split markers are kept as `None`.
    pub fn drive(
        &self,
        transform: &(dyn Fn(&Context<'_>) -> Result<TokenResult, TokenizeError> + Send + Sync),
        tokens: &[Token],
    ) -> Result<Vec<Option<Token>>, TokenizeError> {
        let mut out = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let cx = Context {
                value: &token.value,
                token,
                prev: i.checked_sub(1).and_then(|p| tokens.get(p)),
                next: tokens.get(i + 1),
                index: i,
                tokens,
            };

            let produced = normalize(token, transform(&cx)?)?;
            for mut sub in produced {
                if let Some(sub) = sub.as_mut() {
                    if self.preserve_properties {
                        inherit_properties(sub, token);
                    }
                }
                out.push(sub);
            }
        }

        Ok(out)
    }

    /// Like [`drive`](Self::drive) but returns only tokens, consulting the
    /// cache when `salt` is given.
    pub fn run(
        &self,
        transform: &(dyn Fn(&Context<'_>) -> Result<TokenResult, TokenizeError> + Send + Sync),
        tokens: &[Token],
        salt: Option<&str>,
    ) -> Result<Vec<Token>, TokenizeError> {
        let key = fingerprint(tokens, salt);

        if let Some(key) = key.as_deref() {
            if let Some(hit) = self.cache.get(key) {
                trace!(salt, tokens = tokens.len(), "cache hit");
                return Ok(hit);
            }
            trace!(salt, tokens = tokens.len(), "cache miss");
        }

        let out: Vec<Token> = self.drive(transform, tokens)?.into_iter().flatten().collect();

        if let Some(key) = key.as_deref() {
            self.cache.set(key, &out);
        }

        Ok(out)
    }
}

/// Copy the source token's properties onto a produced token without
/// overwriting what the transform set.
fn inherit_properties(target: &mut Token, source: &Token) {
    for (key, value) in &source.properties {
        target
            .properties
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}
