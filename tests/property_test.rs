use autolinker_lib::config::FilterSettings;
use autolinker_lib::policy::SchemeList;
use autolinker_lib::tokenizer::{is_well_formed, reassemble, tokenize};
use autolinker_lib::Linker;
use proptest::prelude::*;
use std::sync::LazyLock;

/// Compiled once; building the patterns dominates the cost of a single case
static LINKER: LazyLock<Linker> =
    LazyLock::new(|| Linker::new(&FilterSettings::default(), &SchemeList::default()).unwrap());

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "hello",
        "http://example.com",
        "https://example.org/path?q=1",
        "www.example.net",
        "me@example.com",
        "(see",
        "http://example.com)",
        "<p>",
        "</p>",
        "<code>",
        "</code>",
        "<!--",
        "-->",
        "end.",
        "<b>www.bold.example.com</b>",
    ])
}

proptest! {
    #[test]
    fn text_without_link_characters_is_unchanged(input in "[a-zA-Z0-9 <>/!\"=\n-]{0,200}") {
        prop_assert_eq!(LINKER.linkify(&input), input);
    }

    #[test]
    fn tokenize_is_lossless_and_alternating(input in "\\PC{0,200}") {
        let chunks = tokenize(&input);
        prop_assert!(is_well_formed(&chunks));
        prop_assert_eq!(reassemble(&chunks), input);
    }

    #[test]
    fn linking_is_idempotent(words in prop::collection::vec(word(), 0..20)) {
        let input = words.join(" ");
        let once = LINKER.linkify(&input);
        prop_assert_eq!(LINKER.linkify(&once), once);
    }

    #[test]
    fn output_only_grows(words in prop::collection::vec(word(), 0..20)) {
        let input = words.join(" ");
        let output = LINKER.linkify(&input);
        prop_assert!(output.len() >= input.len());
    }
}
