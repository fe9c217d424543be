//! Token algebra: fingerprinting, normalization and merging.
//!
//! These are the pure functions every combinator relies on to keep token
//! positions absolute. `normalize` turns a transform's local view of a token
//! into absolute tokens; `merge` collapses a run of absolute tokens into one.

use std::fmt::Write;

use super::token::{Properties, Token, TokenResult};
use super::tokenizer::TokenizeError;

/// Build a cache key for a token sequence.
///
/// Returns `None` when no salt is given, which disables caching for the call.
/// The key has the shape `salt:index-offset-len-value:...`, where `len` is the
/// byte length of `value`, so no value can imitate a token boundary.
pub fn fingerprint(tokens: &[Token], salt: Option<&str>) -> Option<String> {
    let salt = salt?;
    let capacity = salt.len() + tokens.iter().map(|t| t.value.len() + 24).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push_str(salt);
    for token in tokens {
        // Writing into a String cannot fail.
        let _ = write!(
            key,
            ":{}-{}-{}-{}",
            token.index,
            token.offset,
            token.value.len(),
            token.value
        );
    }
    Some(key)
}

/// Resolve a transform result against the token it was produced from.
///
/// Every text or partial element gets a local index (its own, or the running
/// cursor) and an offset (its own, or the length of its value); the local
/// index is then shifted by `relative.index`. The cursor moves to the local
/// end of each element. Split markers come back as `None`, in place.
pub fn normalize(relative: &Token, raw: TokenResult) -> Result<Vec<Option<Token>>, TokenizeError> {
    let items = match raw {
        TokenResult::Seq(items) => items,
        single => vec![single],
    };

    let mut cursor = 0usize;
    let mut out = Vec::with_capacity(items.len());

    for item in items {
        let (value, local_index, offset, properties, matched) = match item {
            TokenResult::Split => {
                out.push(None);
                continue;
            }
            TokenResult::Text(value) => {
                let offset = value.len();
                (value, cursor, offset, Properties::new(), None)
            }
            TokenResult::Partial(partial) => {
                let local_index = partial.index.unwrap_or(cursor);
                let offset = partial.offset.unwrap_or(partial.value.len());
                (
                    partial.value,
                    local_index,
                    offset,
                    partial.properties,
                    partial.matched,
                )
            }
            TokenResult::Seq(nested) => {
                return Err(TokenizeError::MalformedResult(format!(
                    "nested sequence of {} results while normalizing token at {}",
                    nested.len(),
                    relative.index
                )));
            }
        };

        cursor = local_index + offset;
        out.push(Some(Token {
            value,
            index: relative.index + local_index,
            offset,
            properties,
            matched,
        }));
    }

    Ok(out)
}

/// Caller data attached to a token.
pub fn properties(token: &Token) -> &Properties {
    token.properties()
}

/// Merge a run of absolute tokens into one.
///
/// Gaps between a token's start and the previous token's end are padded with
/// `fill` once per byte; overlapping tokens are concatenated as they are.
/// The offset always reaches the end of the furthest token, so a short
/// (or empty) `fill` never shrinks the reported span.
pub fn merge(tokens: &[Token], fill: &str) -> Option<Token> {
    let first = tokens.first()?;

    let mut value = String::new();
    let mut span = 0usize;
    let mut prev: Option<&Token> = None;

    for token in tokens {
        if let Some(prev) = prev {
            let gap = token.index.saturating_sub(prev.end());
            if gap > 0 && !fill.is_empty() {
                value.push_str(&fill.repeat(gap));
            }
        }
        value.push_str(&token.value);
        span = span.max(token.index.saturating_sub(first.index) + token.offset);
        prev = Some(token);
    }

    let offset = span.max(value.len());
    Some(Token {
        value,
        index: first.index,
        offset,
        properties: Properties::new(),
        matched: None,
    })
}
