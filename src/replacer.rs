//! Link matching and anchor generation for a single text chunk

use crate::patterns::{LinkKind, LinkPattern};
use crate::policy::has_allowed_scheme;
use std::borrow::Cow;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// A link found in a text chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'t> {
    pub kind: LinkKind,
    /// Byte range inside the chunk
    pub range: Range<usize>,
    pub text: &'t str,
}

/// Display options shared by every replacement of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions<'a> {
    /// Character limit for display text (0 = unlimited)
    pub max_length: usize,
    pub ellipsis: &'a str,
}

impl DisplayOptions<'_> {
    pub fn unlimited() -> Self {
        DisplayOptions {
            max_length: 0,
            ellipsis: "",
        }
    }
}

/// Shorten `text` to at most `max_length` characters plus `ellipsis`.
///
/// Text within the limit (or any text when the limit is 0) is returned unchanged. The cut moves back
/// to the start of the grapheme cluster it would split, so a base letter never loses its combining
/// marks.
pub fn truncate_display<'t>(text: &'t str, max_length: usize, ellipsis: &str) -> Cow<'t, str> {
    if max_length == 0 {
        return Cow::Borrowed(text);
    }
    let Some((cut, _)) = text.char_indices().nth(max_length) else {
        return Cow::Borrowed(text);
    };
    let cut = text
        .grapheme_indices(true)
        .map(|(start, _)| start)
        .take_while(|&start| start <= cut)
        .last()
        .unwrap_or(0);
    Cow::Owned(format!("{}{ellipsis}", &text[..cut]))
}

/// Replaces the matches of one link pattern with anchors
pub struct LinkReplacer<'a> {
    pattern: &'a LinkPattern,
    schemes: &'a [String],
    display: DisplayOptions<'a>,
}

impl<'a> LinkReplacer<'a> {
    pub fn new(pattern: &'a LinkPattern, schemes: &'a [String], display: DisplayOptions<'a>) -> Self {
        Self {
            pattern,
            schemes,
            display,
        }
    }

    pub fn kind(&self) -> LinkKind {
        self.pattern.kind
    }

    /// All non-overlapping matches in `text`, left to right
    pub fn find_matches<'t>(&self, text: &'t str) -> Vec<LinkMatch<'t>> {
        self.pattern
            .regex
            .find_iter(text)
            .map(|m| LinkMatch {
                kind: self.pattern.kind,
                range: m.range(),
                text: m.as_str(),
            })
            .collect()
    }

    /// Link target for matched (entity-decoded) text
    pub fn href(&self, text: &str) -> String {
        match self.pattern.kind {
            LinkKind::Email => format!("mailto:{text}"),
            LinkKind::FullUrl | LinkKind::WwwUrl => {
                if has_allowed_scheme(text, self.schemes) {
                    text.to_string()
                } else {
                    format!("http://{text}")
                }
            }
        }
    }

    /// Anchor markup for one matched substring.
    ///
    /// Entities are decoded before the href and display text are built, so text that was already
    /// escaped is not escaped twice and truncation never cuts an entity in half.
    pub fn anchor(&self, matched: &str) -> String {
        let decoded = html_escape::decode_html_entities(matched);
        let href = self.href(&decoded);
        let display = truncate_display(&decoded, self.display.max_length, self.display.ellipsis);
        format!(
            "<a href=\"{}\">{}</a>",
            html_escape::encode_double_quoted_attribute(&href),
            html_escape::encode_text(&display)
        )
    }

    /// Replace every match in `text` with an anchor, returning the new text and the match count
    pub fn replace<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let matches = self.find_matches(text);
        if matches.is_empty() {
            return (Cow::Borrowed(text), 0);
        }

        let mut out = String::with_capacity(text.len() + matches.len() * 32);
        let mut last = 0;
        for link in &matches {
            out.push_str(&text[last..link.range.start]);
            out.push_str(&self.anchor(link.text));
            last = link.range.end;
        }
        out.push_str(&text[last..]);

        (Cow::Owned(out), matches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterSettings;
    use crate::patterns::build_patterns;
    use crate::policy::SchemeList;
    use std::sync::LazyLock;

    static PATTERNS: LazyLock<Vec<LinkPattern>> =
        LazyLock::new(|| build_patterns(&FilterSettings::default(), &SchemeList::default()).unwrap());

    fn patterns() -> &'static [LinkPattern] {
        &PATTERNS
    }

    fn schemes() -> Vec<String> {
        SchemeList::default().allowed_schemes
    }

    fn pattern(patterns: &[LinkPattern], kind: LinkKind) -> &LinkPattern {
        patterns.iter().find(|p| p.kind == kind).unwrap()
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("abcdef", 0, "…"), "abcdef");
        assert_eq!(truncate_display("abcdef", 6, "…"), "abcdef");
        assert_eq!(truncate_display("abcdef", 3, "…"), "abc…");
        assert_eq!(truncate_display("abcdef", 3, "..."), "abc...");
    }

    #[test]
    fn test_truncate_counts_chars() {
        // "e" + combining acute accent: one grapheme, two chars
        let text = "cafe\u{301}s";
        assert_eq!(truncate_display(text, 6, "…"), text);
        assert_eq!(truncate_display(text, 5, "…"), "cafe\u{301}…");
        assert_eq!(truncate_display("日本語のURL", 3, "…"), "日本語…");
    }

    #[test]
    fn test_truncate_never_splits_a_grapheme() {
        let text = "cafe\u{301}s";
        assert_eq!(truncate_display(text, 4, "…"), "caf…");
        assert_eq!(truncate_display("e\u{301}\u{302}x", 2, "…"), "…");
    }

    #[test]
    fn test_find_matches_positions() {
        let patterns = patterns();
        let schemes = schemes();
        let replacer = LinkReplacer::new(
            pattern(patterns, LinkKind::Email),
            &schemes,
            DisplayOptions::unlimited(),
        );
        let found = replacer.find_matches("a@example.com, b@example.org");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].range, 0..13);
        assert_eq!(found[1].text, "b@example.org");
        assert_eq!(found[1].kind, LinkKind::Email);
    }

    #[test]
    fn test_href_rules() {
        let patterns = patterns();
        let schemes = schemes();
        let display = DisplayOptions::unlimited();
        let full = LinkReplacer::new(pattern(patterns, LinkKind::FullUrl), &schemes, display);
        let www = LinkReplacer::new(pattern(patterns, LinkKind::WwwUrl), &schemes, display);
        let mail = LinkReplacer::new(pattern(patterns, LinkKind::Email), &schemes, display);

        assert_eq!(full.href("https://example.com"), "https://example.com");
        assert_eq!(full.href("example.com"), "http://example.com");
        assert_eq!(www.href("www.example.com"), "http://www.example.com");
        assert_eq!(mail.href("me@example.com"), "mailto:me@example.com");
    }

    #[test]
    fn test_replace_wraps_matches() {
        let patterns = patterns();
        let schemes = schemes();
        let replacer = LinkReplacer::new(
            pattern(patterns, LinkKind::FullUrl),
            &schemes,
            DisplayOptions::unlimited(),
        );
        let (out, count) = replacer.replace("Check http://example.com/path?a=1.");
        assert_eq!(count, 1);
        assert_eq!(
            out,
            "Check <a href=\"http://example.com/path?a=1\">http://example.com/path?a=1</a>."
        );
    }

    #[test]
    fn test_replace_without_matches_borrows() {
        let patterns = patterns();
        let schemes = schemes();
        let replacer = LinkReplacer::new(
            pattern(patterns, LinkKind::WwwUrl),
            &schemes,
            DisplayOptions::unlimited(),
        );
        let (out, count) = replacer.replace("nothing to see");
        assert_eq!(count, 0);
        assert!(matches!(out, Cow::Borrowed("nothing to see")));
    }

    #[test]
    fn test_truncation_only_affects_display() {
        let patterns = patterns();
        let schemes = schemes();
        let replacer = LinkReplacer::new(
            pattern(patterns, LinkKind::FullUrl),
            &schemes,
            DisplayOptions {
                max_length: 10,
                ellipsis: "…",
            },
        );
        let url = "http://example.com/abcdefghijk";
        assert_eq!(url.chars().count(), 30);
        assert_eq!(
            replacer.anchor(url),
            "<a href=\"http://example.com/abcdefghijk\">http://exa…</a>"
        );
    }

    #[test]
    fn test_entities_are_not_double_escaped() {
        let patterns = patterns();
        let schemes = schemes();
        let replacer = LinkReplacer::new(
            pattern(patterns, LinkKind::FullUrl),
            &schemes,
            DisplayOptions::unlimited(),
        );
        let (out, _) = replacer.replace("go to http://example.com/?a=1&amp;b=2 now");
        assert_eq!(
            out,
            "go to <a href=\"http://example.com/?a=1&amp;b=2\">http://example.com/?a=1&amp;b=2</a> now"
        );
    }

    #[test]
    fn test_bare_ampersand_is_escaped() {
        let patterns = patterns();
        let schemes = schemes();
        let replacer = LinkReplacer::new(
            pattern(patterns, LinkKind::FullUrl),
            &schemes,
            DisplayOptions::unlimited(),
        );
        assert_eq!(
            replacer.anchor("http://example.com/?a=1&b=2"),
            "<a href=\"http://example.com/?a=1&amp;b=2\">http://example.com/?a=1&amp;b=2</a>"
        );
    }
}
