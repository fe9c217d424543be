use tokenflow::{fingerprint, merge, normalize, properties, PartialToken, Token, TokenResult};

#[test]
fn test_normalize() {
    let parent = Token::new("test hello", 5);
    let tokens = normalize(
        &parent,
        TokenResult::Seq(vec![
            PartialToken::new("test").at(0).with_offset(4).into(),
            PartialToken::new("hello").at(5).with_offset(5).into(),
        ]),
    )
    .unwrap();

    assert_eq!(tokens.len(), 2);
    let tokens: Vec<_> = tokens.into_iter().flatten().collect();
    assert_eq!(tokens[0].value, "test");
    assert_eq!(tokens[0].index, 5);
    assert_eq!(tokens[1].value, "hello");
    assert_eq!(tokens[1].index, 10);
}

#[test]
fn test_normalize_ignores_nulls() {
    let parent = Token::new("test hello", 5);
    let tokens = normalize(
        &parent,
        TokenResult::Seq(vec![
            PartialToken::new("test").at(0).with_offset(4).into(),
            TokenResult::Split,
            PartialToken::new("hello").at(5).with_offset(5).into(),
        ]),
    )
    .unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].as_ref().map(|t| t.index), Some(5));
    assert!(tokens[1].is_none());
    assert_eq!(tokens[2].as_ref().map(|t| t.index), Some(10));
}

#[test]
fn test_normalize_texts_and_nulls() {
    let parent = Token::new("Barney.The", 6).with_offset(10);
    let tokens = normalize(
        &parent,
        TokenResult::Seq(vec!["Barney".into(), TokenResult::Split, "The".into()]),
    )
    .unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].as_ref().map(|t| (t.value.as_str(), t.index)), Some(("Barney", 6)));
    assert_eq!(tokens[2].as_ref().map(|t| (t.value.as_str(), t.index)), Some(("The", 12)));
}

#[test]
fn test_merge_singleton_is_identity() {
    let token = Token::new("word", 9);
    let merged = merge(std::slice::from_ref(&token), " ").unwrap();
    assert_eq!(merged.value, token.value);
    assert_eq!(merged.index, token.index);
    assert!(merged.offset >= token.offset);
}

#[test]
fn test_merge_drops_properties() {
    let tokens = vec![Token::new("a", 0).with_property("k", 1), Token::new("b", 1)];
    let merged = merge(&tokens, "").unwrap();
    assert!(properties(&merged).is_empty());
    assert!(merged.matched.is_none());
}

#[test]
fn test_fingerprint_identity() {
    let a = vec![Token::new("a", 0), Token::new("b", 2)];
    let b = vec![Token::new("a", 0), Token::new("b", 2)];
    let c = vec![Token::new("a", 0), Token::new("b", 3)];
    assert_eq!(fingerprint(&a, Some("salt")), fingerprint(&b, Some("salt")));
    assert_ne!(fingerprint(&a, Some("salt")), fingerprint(&c, Some("salt")));
    assert_eq!(fingerprint(&a, None), None);
}
