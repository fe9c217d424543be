use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tokenflow::{Token, Tokenizer};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

type Fields = BTreeMap<String, String>;

/// Layer that keeps the fields of every `debug` event.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<Fields>>>,
}

impl Recorder {
    fn events(&self) -> Vec<Fields> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor<'a>(&'a mut Fields);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _cx: Context<'_, S>) {
        if *event.metadata().level() != Level::DEBUG {
            return;
        }
        let mut fields = Fields::new();
        event.record(&mut FieldVisitor(&mut fields));
        self.events.lock().unwrap().push(fields);
    }
}

fn field<'a>(event: &'a Fields, name: &str) -> &'a str {
    event.get(name).map(String::as_str).unwrap_or_default()
}

#[test]
fn test_debug_emits_one_event_per_token() {
    let tokenize = Tokenizer::default();
    let tokens = vec![
        Token::new("hello", 0).with_property("kind", "greeting"),
        Token::new("world", 6),
    ];
    let debug = tokenize.debug("words");

    let recorder = Recorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    let out = tracing::subscriber::with_default(subscriber, || debug.run(&tokens).unwrap());

    assert_eq!(out, tokens);

    let events = recorder.events();
    assert_eq!(events.len(), 2);

    let first = &events[0];
    assert_eq!(field(first, "prefix"), "words");
    assert_eq!(field(first, "start"), "0");
    assert_eq!(field(first, "end"), "5");
    assert_eq!(field(first, "value"), "hello");
    assert!(field(first, "properties").contains("kind"));
    assert!(field(first, "properties").contains("greeting"));

    let second = &events[1];
    assert_eq!(field(second, "start"), "6");
    assert_eq!(field(second, "end"), "11");
    assert_eq!(field(second, "value"), "world");
    assert_eq!(field(second, "properties"), "{}");
}

#[test]
fn test_debug_is_silent_on_empty_input() {
    let tokenize = Tokenizer::default();
    let debug = tokenize.debug("none");

    let recorder = Recorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    let empty: Vec<Token> = Vec::new();
    let out = tracing::subscriber::with_default(subscriber, || debug.run(&empty).unwrap());

    assert!(out.is_empty());
    assert!(recorder.events().is_empty());
}
