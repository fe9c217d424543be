use proptest::prelude::*;
use serde_json::json;
use tokenflow::{ReOptions, Token, Tokenizer, TokenizerConfig};

proptest! {
    #[test]
    fn split_mode_reconstructs_input(
        text in "[a-c ,.\\n]{0,40}",
        pattern in prop::sample::select(vec!["a", "[ ,.]+", "a?b", r"\s", "x*", r"\b", "."]),
    ) {
        let tokens = Tokenizer::default()
            .re_with(pattern, ReOptions::split())
            .unwrap()
            .run(text.as_str())
            .unwrap();

        let rebuilt: String = tokens.iter().map(|t| t.value.as_str()).collect();
        prop_assert_eq!(rebuilt, text.clone());

        let mut expected = 0;
        for token in &tokens {
            prop_assert_eq!(token.index, expected);
            prop_assert_eq!(token.offset, token.value.len());
            expected = token.end();
        }
        prop_assert_eq!(expected, text.len());
    }

    #[test]
    fn nested_words_are_absolute(text in "[a-zé ]{0,20}([.,;] [a-zé ]{0,20}){0,4}") {
        let tokenize = Tokenizer::default();
        let words = tokenize
            .flow([tokenize.sections(), tokenize.flow([tokenize.words()])])
            .run(text.as_str())
            .unwrap();

        for word in &words {
            prop_assert_eq!(&text[word.index..word.end()], word.value.as_str());
        }
    }
}

#[test]
fn test_properties_survive_passes() {
    let tokenize = Tokenizer::default();
    let tokens = vec![Token::new("hello world", 3).with_property("doc", "intro")];

    let words = tokenize.words().run(&tokens).unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[1].index, 9);
    for word in &words {
        assert_eq!(word.property("doc"), Some(&json!("intro")));
    }
}

#[test]
fn test_properties_can_be_dropped() {
    let tokenize = Tokenizer::new(TokenizerConfig::default().preserve_properties(false));
    let tokens = vec![Token::new("hello world", 0).with_property("doc", "intro")];
    let words = tokenize.words().run(&tokens).unwrap();
    assert!(words.iter().all(|w| w.properties().is_empty()));
}
