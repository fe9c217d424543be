use pretty_assertions::assert_eq;
use tokenflow::{MergeOptions, Token, TokenResult, Tokenizer};

fn spans(tokens: &[Token]) -> Vec<(&str, usize, usize)> {
    tokens
        .iter()
        .map(|t| (t.value.as_str(), t.index, t.offset))
        .collect()
}

fn pipe_split(fill: &str) -> Vec<Token> {
    let tokenize = Tokenizer::default();
    tokenize
        .flow([
            tokenize.re(r"\S+").unwrap(),
            tokenize.split_and_merge(
                |cx| {
                    if cx.value == "|" {
                        TokenResult::Split
                    } else {
                        TokenResult::from(cx.value)
                    }
                },
                MergeOptions::merge_with(fill),
            ),
        ])
        .run("ab cd | ef gh")
        .unwrap()
}

#[test]
fn test_merge_according_to_criteria() {
    let tokenize = Tokenizer::default();
    let tokens = tokenize
        .flow([
            tokenize.characters(),
            tokenize.split_and_merge(
                |cx| {
                    if cx.value == "." {
                        vec![TokenResult::from(cx.value), TokenResult::Split]
                    } else {
                        vec![TokenResult::from(cx.value)]
                    }
                },
                MergeOptions::default(),
            ),
        ])
        .run("ab.c")
        .unwrap();

    assert_eq!(spans(&tokens), vec![("ab.", 0, 3), ("c", 3, 1)]);
}

#[test]
fn test_disperse_tokens() {
    assert_eq!(
        spans(&pipe_split(" ")),
        vec![("ab cd", 0, 5), ("ef gh", 8, 5)]
    );
}

#[test]
fn test_offset_with_empty_fill() {
    assert_eq!(
        spans(&pipe_split("")),
        vec![("abcd", 0, 5), ("efgh", 8, 5)]
    );
}

#[test]
fn test_split_in_the_middle_of_tokens() {
    let tokenize = Tokenizer::default();
    let tokens = tokenize
        .flow([
            tokenize.words(),
            tokenize.split_and_merge(
                |cx| {
                    let half = cx.value.len() / 2;
                    vec![
                        TokenResult::from(&cx.value[..half]),
                        TokenResult::Split,
                        TokenResult::from(&cx.value[half..]),
                    ]
                },
                MergeOptions::default(),
            ),
        ])
        .run("tata dada")
        .unwrap();

    let values: Vec<_> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["ta", "tada", "da"]);
    assert_eq!(spans(&tokens)[1], ("tada", 2, 5));
}

#[test]
fn test_merge_all() {
    let tokenize = Tokenizer::default();
    let tokens = tokenize
        .flow([tokenize.words(), tokenize.merge()])
        .run("to be, or not")
        .unwrap();
    assert_eq!(spans(&tokens), vec![("tobeornot", 0, 13)]);
}

#[test]
fn test_leading_and_repeated_markers() {
    let tokenize = Tokenizer::default();
    let tokens = tokenize
        .split_and_merge(
            |cx| {
                vec![
                    TokenResult::Split,
                    TokenResult::from(cx.value),
                    TokenResult::Split,
                    TokenResult::Split,
                ]
            },
            MergeOptions::default(),
        )
        .run(&vec![Token::new("x", 1), Token::new("y", 4)])
        .unwrap();
    assert_eq!(spans(&tokens), vec![("x", 1, 1), ("y", 4, 1)]);
}
